//! # Typing 效果
//!
//! 按行"打出"代码块：清空元素，立即显示第一行，之后每隔固定间隔多显示一行。
//!
//! 每一帧都写入"原始内容的前 N 行"，而不是往已有内容后面追加，
//! 因此单行内的标记不会被浏览器提前闭合，最后一帧与原始内容逐字节相同。

use crate::command::Command;
use crate::config::TypingSettings;
use crate::element::ElementId;
use crate::timer::{TimerTable, TimerTask};

/// 打字目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingTarget {
    pub element: ElementId,
    pub lines: Vec<String>,
}

impl TypingTarget {
    pub fn new(element: ElementId, content: &str) -> Self {
        Self {
            element,
            lines: content.split('\n').map(str::to_string).collect(),
        }
    }

    /// 前 `count` 行，用换行连接
    pub fn first_lines(&self, count: usize) -> String {
        self.lines[..count.min(self.lines.len())].join("\n")
    }

    /// 原始内容
    pub fn original(&self) -> String {
        self.first_lines(self.lines.len())
    }
}

/// 进行中的打字动画
#[derive(Debug)]
pub(crate) struct TypingRun {
    target: TypingTarget,
    shown: usize,
    interval: std::time::Duration,
}

impl TypingRun {
    /// 清空元素并显示第一行；返回动画是否已经结束（只有一行时）
    pub(crate) fn start(
        target: TypingTarget,
        settings: &TypingSettings,
        timers: &mut TimerTable,
    ) -> (Self, Vec<Command>, bool) {
        let element = target.element;
        let mut run = Self {
            target,
            shown: 0,
            interval: settings.line_interval(),
        };
        let mut commands = vec![
            Command::SetInnerHtml {
                target: element,
                html: String::new(),
            },
            Command::set_style(element, "opacity", "1"),
        ];
        let (next, done) = run.next_line(timers);
        commands.extend(next);
        (run, commands, done)
    }

    /// 多显示一行；还有剩余行时登记下一次定时器
    pub(crate) fn next_line(&mut self, timers: &mut TimerTable) -> (Vec<Command>, bool) {
        let total = self.target.lines.len();
        if self.shown >= total {
            return (Vec::new(), true);
        }

        self.shown += 1;
        let mut commands = vec![Command::SetInnerHtml {
            target: self.target.element,
            html: self.target.first_lines(self.shown),
        }];

        let done = self.shown >= total;
        if !done {
            let (_, start_timer) = timers.after(
                TimerTask::TypingLine {
                    target: self.target.element,
                },
                self.interval,
            );
            commands.push(start_timer);
        }
        (commands, done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html_frames(commands: &[Command]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::SetInnerHtml { html, .. } => Some(html.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_split_and_rejoin() {
        let content = "<span>fn</span> main() {\n    run();\n}\n";
        let target = TypingTarget::new(ElementId::Page(1), content);
        assert_eq!(target.lines.len(), 4);
        assert_eq!(target.original(), content);
        assert_eq!(target.first_lines(2), "<span>fn</span> main() {\n    run();");
    }

    #[test]
    fn test_lines_appear_in_order() {
        let content = "a\nb\nc";
        let target = TypingTarget::new(ElementId::Page(1), content);
        let mut timers = TimerTable::new();
        let (mut run, commands, done) =
            TypingRun::start(target, &TypingSettings::default(), &mut timers);
        assert!(!done);

        let mut frames = html_frames(&commands);
        loop {
            let (commands, done) = run.next_line(&mut timers);
            frames.extend(html_frames(&commands));
            if done {
                break;
            }
        }

        insta::assert_debug_snapshot!(frames, @r#"
        [
            "",
            "a",
            "a\nb",
            "a\nb\nc",
        ]
        "#);
        assert_eq!(frames.last().map(String::as_str), Some(content));
    }

    #[test]
    fn test_single_line_finishes_immediately() {
        let target = TypingTarget::new(ElementId::Page(1), "only");
        let mut timers = TimerTable::new();
        let (_, commands, done) = TypingRun::start(target, &TypingSettings::default(), &mut timers);
        assert!(done);
        assert_eq!(timers.pending_count(), 0);
        assert!(!commands.iter().any(|c| matches!(c, Command::StartTimer { .. })));
    }
}
