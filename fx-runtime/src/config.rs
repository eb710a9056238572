//! # Config 模块
//!
//! 页面特效配置。所有字段都有默认值，默认值与页面约定的 class/属性名一致，
//! 因此空 JSON `{}` 就是一份完整配置。
//!
//! ## 配置来源
//!
//! 1. 页面内 `<script type="application/json" id="fx-config">`（由 Host 读取）
//! 2. 默认值

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// 页面特效配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FxConfig {
    /// 页面元素选择器
    #[serde(default)]
    pub selectors: Selectors,

    /// 标记 class 名
    #[serde(default)]
    pub classes: ClassNames,

    /// 滚动显现
    #[serde(default)]
    pub reveal: RevealSettings,

    /// 数字计数动画
    #[serde(default)]
    pub counter: CounterSettings,

    /// 代码打字动画
    #[serde(default)]
    pub typing: TypingSettings,

    /// 滚动联动效果
    #[serde(default)]
    pub scroll: ScrollSettings,

    /// 页面生命周期
    #[serde(default)]
    pub lifecycle: LifecycleSettings,

    /// 复制按钮
    #[serde(default)]
    pub copy: CopySettings,

    /// 雪花
    #[serde(default)]
    pub snow: SnowSettings,
}

/// 页面元素选择器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub nav_toggle: String,
    pub nav_menu: String,
    pub nav_link: String,
    pub header: String,
    pub anchors: String,
    pub reveal: String,
    /// 首屏中需要在 DOM 就绪后直接显现的元素
    pub hero_reveal: String,
    pub sections: String,
    pub hero_background: String,
    pub table_rows: String,
    pub tilt_cards: String,
    pub code_block: String,
    pub code: String,
    pub stat_values: String,
    pub preloader: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            nav_toggle: ".nav-toggle".to_string(),
            nav_menu: ".nav-menu".to_string(),
            nav_link: ".nav-link".to_string(),
            header: ".navbar".to_string(),
            anchors: "a[href^=\"#\"]".to_string(),
            reveal: "[data-aos]".to_string(),
            hero_reveal: ".hero [data-aos]".to_string(),
            sections: "section[id]".to_string(),
            hero_background: ".hero-bg".to_string(),
            table_rows: ".comparison-table tbody tr".to_string(),
            tilt_cards: ".model-card, .infra-card, .quant-card".to_string(),
            code_block: ".code-preview pre".to_string(),
            code: ".code-preview code".to_string(),
            stat_values: ".stat-value".to_string(),
            preloader: ".preloader".to_string(),
        }
    }
}

/// 标记 class 名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// reveal 完成后添加
    pub revealed: String,
    /// 菜单展开时加在开关与菜单上
    pub nav_open: String,
    /// 当前 section 对应的导航链接
    pub link_active: String,
    /// 页面滚动超过阈值时加在 header 上
    pub scrolled: String,
    /// DOM 就绪后加在 body 上
    pub loaded: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            revealed: "aos-animate".to_string(),
            nav_open: "active".to_string(),
            link_active: "active".to_string(),
            scrolled: "scrolled".to_string(),
            loaded: "loaded".to_string(),
        }
    }
}

/// 滚动显现配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    pub threshold: f64,
    /// 错开延迟（毫秒）所在的属性
    pub delay_attribute: String,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            delay_attribute: "data-aos-delay".to_string(),
        }
    }
}

/// 计数动画配置
///
/// 步数固定：总时长 = `steps * step_interval_ms`，与目标数值大小无关。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterSettings {
    pub threshold: f64,
    pub step_interval_ms: u64,
    pub steps: u32,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            step_interval_ms: 30,
            steps: 50,
        }
    }
}

impl CounterSettings {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

/// 打字动画配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingSettings {
    pub threshold: f64,
    pub line_interval_ms: u64,
}

impl Default for TypingSettings {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            line_interval_ms: 100,
        }
    }
}

impl TypingSettings {
    pub fn line_interval(&self) -> Duration {
        Duration::from_millis(self.line_interval_ms)
    }
}

/// 滚动联动配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSettings {
    /// 超过该偏移（px）header 加 scrolled
    pub header_offset: f64,
    /// section 顶部提前量（px），用于导航高亮
    pub section_offset: f64,
    /// 首屏背景视差系数
    pub parallax_factor: f64,
    /// 是否生成顶部阅读进度条
    pub progress_bar: bool,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            header_offset: 50.0,
            section_offset: 100.0,
            parallax_factor: 0.3,
            progress_bar: true,
        }
    }
}

/// 生命周期配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleSettings {
    pub hero_reveal_delay_ms: u64,
    pub preloader_fade_ms: u64,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            hero_reveal_delay_ms: 100,
            preloader_fade_ms: 500,
        }
    }
}

/// 复制按钮配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopySettings {
    pub label: String,
    pub copied_label: String,
    pub failed_label: String,
    pub reset_ms: u64,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            label: "Copy".to_string(),
            copied_label: "Copied!".to_string(),
            failed_label: "Failed".to_string(),
            reset_ms: 2000,
        }
    }
}

/// 雪花配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowSettings {
    pub enabled: bool,
    /// 启动时错开生成的雪花数量
    pub initial_flakes: u32,
    pub initial_stagger_ms: u64,
    pub spawn_interval_ms: u64,
}

impl Default for SnowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_flakes: 50,
            initial_stagger_ms: 200,
            spawn_interval_ms: 300,
        }
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { field, value })
    }
}

fn check_nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroDuration { field })
    } else {
        Ok(())
    }
}

impl FxConfig {
    /// 从 JSON 解析并校验
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("reveal.threshold", self.reveal.threshold)?;
        check_threshold("counter.threshold", self.counter.threshold)?;
        check_threshold("typing.threshold", self.typing.threshold)?;

        check_nonzero("counter.step_interval_ms", self.counter.step_interval_ms)?;
        check_nonzero("typing.line_interval_ms", self.typing.line_interval_ms)?;
        check_nonzero("snow.spawn_interval_ms", self.snow.spawn_interval_ms)?;

        if self.counter.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = FxConfig::from_json("{}").unwrap();
        assert_eq!(config, FxConfig::default());
        assert_eq!(config.reveal.threshold, 0.1);
        assert_eq!(config.counter.threshold, 0.5);
        assert_eq!(config.counter.steps, 50);
        assert_eq!(config.classes.revealed, "aos-animate");
    }

    #[test]
    fn test_partial_override() {
        let config = FxConfig::from_json(
            r#"{ "snow": { "enabled": false }, "classes": { "nav_open": "open" } }"#,
        )
        .unwrap();
        assert!(!config.snow.enabled);
        assert_eq!(config.snow.spawn_interval_ms, 300);
        assert_eq!(config.classes.nav_open, "open");
        assert_eq!(config.classes.scrolled, "scrolled");
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = FxConfig::from_json(r#"{ "reveal": { "threshold": 1.5 } }"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ThresholdOutOfRange {
                field: "reveal.threshold",
                value: 1.5
            }
        );
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = FxConfig::from_json(r#"{ "typing": { "line_interval_ms": 0 } }"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ZeroDuration {
                field: "typing.line_interval_ms"
            }
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = FxConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
