//! # Reveal 效果
//!
//! 元素首次进入视口时添加显现 class；如配置了错开延迟，先设置 `transition-delay`，
//! 让同组元素依次出现。

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::command::Command;
use crate::element::ElementId;

/// Reveal 配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevealConfig {
    /// 错开延迟
    pub stagger: Option<Duration>,
}

impl RevealConfig {
    pub fn with_stagger(stagger: Duration) -> Self {
        Self {
            stagger: Some(stagger),
        }
    }

    /// 从延迟属性值（毫秒）解析；缺失或非法时没有延迟
    pub fn from_attribute(value: Option<&str>) -> Self {
        let stagger = value.and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(ms) => Some(Duration::from_millis(ms)),
            Err(_) => {
                debug!(value = raw, "忽略无法解析的 reveal 延迟");
                None
            }
        });
        Self { stagger }
    }
}

/// 生成 reveal 指令：延迟在前，class 在后
pub fn reveal_commands(target: ElementId, config: &RevealConfig, class: &str) -> Vec<Command> {
    let mut commands = Vec::with_capacity(2);
    if let Some(delay) = config.stagger {
        commands.push(Command::set_style(
            target,
            "transition-delay",
            format!("{}ms", delay.as_millis()),
        ));
    }
    commands.push(Command::add_class(target, class));
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_is_set_before_class() {
        let el = ElementId::Page(1);
        let commands = reveal_commands(
            el,
            &RevealConfig::with_stagger(Duration::from_millis(200)),
            "aos-animate",
        );
        assert_eq!(
            commands,
            vec![
                Command::set_style(el, "transition-delay", "200ms"),
                Command::add_class(el, "aos-animate"),
            ]
        );
    }

    #[test]
    fn test_no_delay() {
        let el = ElementId::Page(1);
        let commands = reveal_commands(el, &RevealConfig::default(), "aos-animate");
        assert_eq!(commands, vec![Command::add_class(el, "aos-animate")]);
    }

    #[test]
    fn test_parse_delay_attribute() {
        assert_eq!(
            RevealConfig::from_attribute(Some("150")).stagger,
            Some(Duration::from_millis(150))
        );
        assert_eq!(
            RevealConfig::from_attribute(Some(" 50 ")).stagger,
            Some(Duration::from_millis(50))
        );
        assert_eq!(RevealConfig::from_attribute(Some("fast")).stagger, None);
        assert_eq!(RevealConfig::from_attribute(None).stagger, None);
    }
}
