//! # Count-up 效果
//!
//! 把 `"$150K+"` 这类文本拆成 `("$", 150, "K+")`，从 0 数到目标值。
//!
//! 步数固定（默认 50 步、每步 30ms），总时长与数值大小无关。
//! 到达或越过目标时写回**原始文本**，累加误差不会影响最终显示。

use tracing::debug;

use crate::command::Command;
use crate::config::CounterSettings;
use crate::element::ElementId;
use crate::timer::{TimerId, TimerTable, TimerTask};

/// 计数目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterTarget {
    pub element: ElementId,
    pub prefix: String,
    pub value: u64,
    pub suffix: String,
    /// 动画前的完整文本
    pub original: String,
}

impl CounterTarget {
    /// 取文本中第一段 ASCII 数字作为目标值
    ///
    /// 没有数字或数值超出 `u64` 时返回 None。
    pub fn parse(element: ElementId, text: &str) -> Option<Self> {
        let start = text.find(|c: char| c.is_ascii_digit())?;
        let len = text[start..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len() - start);
        let end = start + len;
        let value = text[start..end].parse::<u64>().ok()?;

        Some(Self {
            element,
            prefix: text[..start].to_string(),
            value,
            suffix: text[end..].to_string(),
            original: text.to_string(),
        })
    }

    /// 动画中间帧的文本
    pub fn frame(&self, shown: u64) -> String {
        format!("{}{}{}", self.prefix, shown, self.suffix)
    }
}

/// 进行中的计数动画
#[derive(Debug)]
pub(crate) struct CounterRun {
    target: CounterTarget,
    current: f64,
    increment: f64,
    timer: TimerId,
}

impl CounterRun {
    /// 写入第 0 帧并启动周期定时器
    pub(crate) fn start(
        target: CounterTarget,
        settings: &CounterSettings,
        timers: &mut TimerTable,
    ) -> (Self, Vec<Command>) {
        let increment = target.value as f64 / f64::from(settings.steps);
        let (timer, start_timer) = timers.every(
            TimerTask::CounterStep {
                target: target.element,
            },
            settings.step_interval(),
        );
        let commands = vec![
            Command::set_text(target.element, target.frame(0)),
            start_timer,
        ];

        debug!(element = %target.element, value = target.value, "开始计数动画");
        let run = Self {
            target,
            current: 0.0,
            increment,
            timer,
        };
        (run, commands)
    }

    /// 前进一步；返回产生的指令以及动画是否结束
    pub(crate) fn step(&mut self, timers: &mut TimerTable) -> (Vec<Command>, bool) {
        self.current += self.increment;

        if self.current >= self.target.value as f64 {
            let mut commands = vec![Command::set_text(
                self.target.element,
                self.target.original.clone(),
            )];
            commands.extend(timers.cancel(self.timer));
            return (commands, true);
        }

        let shown = self.current.floor() as u64;
        (
            vec![Command::set_text(self.target.element, self.target.frame(shown))],
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(text: &str) -> (Vec<String>, usize) {
        let el = ElementId::Page(1);
        let target = CounterTarget::parse(el, text).unwrap();
        let mut timers = TimerTable::new();
        let (mut run, commands) =
            CounterRun::start(target, &CounterSettings::default(), &mut timers);

        let mut frames = Vec::new();
        let mut collect = |commands: &[Command]| {
            for cmd in commands {
                if let Command::SetText { text, .. } = cmd {
                    frames.push(text.clone());
                }
            }
        };
        collect(&commands);

        let mut steps = 0;
        loop {
            steps += 1;
            let (commands, done) = run.step(&mut timers);
            collect(&commands);
            if done {
                break;
            }
            assert!(steps < 1000, "计数动画没有结束");
        }
        assert_eq!(timers.pending_count(), 0);
        (frames, steps)
    }

    #[test]
    fn test_parse_prefix_and_suffix() {
        let t = CounterTarget::parse(ElementId::Page(1), "$150K+").unwrap();
        assert_eq!(t.prefix, "$");
        assert_eq!(t.value, 150);
        assert_eq!(t.suffix, "K+");
        assert_eq!(t.frame(12), "$12K+");
    }

    #[test]
    fn test_parse_takes_first_number() {
        let t = CounterTarget::parse(ElementId::Page(1), "24/7").unwrap();
        assert_eq!(t.value, 24);
        assert_eq!(t.suffix, "/7");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(CounterTarget::parse(ElementId::Page(1), "Unlimited").is_none());
        assert!(CounterTarget::parse(ElementId::Page(1), "").is_none());
        assert!(CounterTarget::parse(ElementId::Page(1), "99999999999999999999999x").is_none());
    }

    #[test]
    fn test_150_plus_frames() {
        let (frames, steps) = run_to_end("150+");
        assert_eq!(steps, 50);
        insta::assert_snapshot!(frames.join(" "), @"0+ 3+ 6+ 9+ 12+ 15+ 18+ 21+ 24+ 27+ 30+ 33+ 36+ 39+ 42+ 45+ 48+ 51+ 54+ 57+ 60+ 63+ 66+ 69+ 72+ 75+ 78+ 81+ 84+ 87+ 90+ 93+ 96+ 99+ 102+ 105+ 108+ 111+ 114+ 117+ 120+ 123+ 126+ 129+ 132+ 135+ 138+ 141+ 144+ 147+ 150+");
    }

    #[test]
    fn test_final_frame_is_original_text() {
        for text in ["0", "007", "7 days", "$1,000", "~3x faster", "1000000000000+", "1"] {
            let (frames, steps) = run_to_end(text);
            assert_eq!(frames.last().map(String::as_str), Some(text), "文本 {text:?}");
            // 步数固定，浮点误差最多多走一步
            assert!(steps <= 51, "文本 {text:?} 用了 {steps} 步");
        }
    }

    #[test]
    fn test_zero_target_finishes_on_first_step() {
        let (frames, steps) = run_to_end("0%");
        assert_eq!(steps, 1);
        assert_eq!(frames, vec!["0%".to_string(), "0%".to_string()]);
    }

    #[test]
    fn test_intermediate_frames_never_exceed_target() {
        let (frames, _) = run_to_end("37 ms");
        for frame in &frames[..frames.len() - 1] {
            let n: u64 = frame.trim_end_matches(" ms").parse().unwrap();
            assert!(n < 37);
        }
    }
}
