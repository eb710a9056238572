//! # State 模块
//!
//! 一次性动画的显式状态机。
//!
//! ```text
//! NotStarted ──start()──► Running ──finish()──► Done
//!      └──────────────finish()─────────────────┘
//! ```
//!
//! 任何状态下再次 `start()` 都不会回到 `Running`：重新进入视口不会重播动画。

use serde::{Deserialize, Serialize};

/// 一次性动画状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OneShot {
    /// 尚未触发
    #[default]
    NotStarted,
    /// 进行中（计数、打字等需要多帧完成的效果）
    Running,
    /// 已完成
    Done,
}

impl OneShot {
    /// 尝试开始；只有 `NotStarted` 会成功
    pub fn start(&mut self) -> bool {
        if *self == Self::NotStarted {
            *self = Self::Running;
            true
        } else {
            false
        }
    }

    /// 标记完成
    pub fn finish(&mut self) {
        *self = Self::Done;
    }

    /// 是否已经触发过（进行中或已完成）
    pub fn has_fired(&self) -> bool {
        !matches!(self, Self::NotStarted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_transitions() {
        let mut state = OneShot::default();
        assert!(!state.has_fired());

        assert!(state.start());
        assert_eq!(state, OneShot::Running);

        // 进行中再次触发无效
        assert!(!state.start());
        assert_eq!(state, OneShot::Running);

        state.finish();
        assert_eq!(state, OneShot::Done);

        // 完成后再次触发无效
        assert!(!state.start());
        assert_eq!(state, OneShot::Done);
    }

    #[test]
    fn test_finish_without_start() {
        let mut state = OneShot::NotStarted;
        state.finish();
        assert!(state.has_fired());
        assert!(!state.start());
    }
}
