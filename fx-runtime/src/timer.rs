//! # Timer 模块
//!
//! 定时器能力：Runtime 只登记"什么时候、为什么"，真正的计时由 Host 完成。
//!
//! ```text
//! TimerTable::after(task, delay) ──► Command::StartTimer ──► Host setTimeout
//!                                                             │
//! TimerTable::fire(id) ◄── PageInput::TimerFired ◄────────────┘
//! ```
//!
//! 测试中直接构造 `TimerFired` 即可模拟时间流逝。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::command::Command;
use crate::element::ElementId;

/// 定时器标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u32);

impl TimerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimerId({})", self.0)
    }
}

/// 定时器到期时要做的事
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerTask {
    /// 计数动画前进一步
    CounterStep { target: ElementId },
    /// 打字动画显示下一行
    TypingLine { target: ElementId },
    /// DOM 就绪后的首屏 reveal
    HeroReveal,
    /// 预加载遮罩淡出结束
    PreloaderHide { target: ElementId },
    /// 复制按钮文案复位
    CopyLabelReset,
    /// 生成一片雪花
    SnowSpawn,
    /// 雪花动画结束，移除
    SnowflakeExpire { flake: ElementId },
}

#[derive(Debug)]
struct PendingTimer {
    task: TimerTask,
    repeat: bool,
}

/// 待触发定时器表
#[derive(Debug, Default)]
pub struct TimerTable {
    next_id: u32,
    pending: HashMap<TimerId, PendingTimer>,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_timer_id(&mut self) -> TimerId {
        let id = TimerId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn start(&mut self, task: TimerTask, delay: Duration, repeat: bool) -> (TimerId, Command) {
        let timer = self.next_timer_id();
        self.pending.insert(timer, PendingTimer { task, repeat });
        (
            timer,
            Command::StartTimer {
                timer,
                delay,
                repeat,
            },
        )
    }

    /// 登记一次性定时器（`setTimeout`）
    pub fn after(&mut self, task: TimerTask, delay: Duration) -> (TimerId, Command) {
        self.start(task, delay, false)
    }

    /// 登记周期定时器（`setInterval`）
    pub fn every(&mut self, task: TimerTask, interval: Duration) -> (TimerId, Command) {
        self.start(task, interval, true)
    }

    /// 取消定时器；未登记的 ID 返回 None
    pub fn cancel(&mut self, timer: TimerId) -> Option<Command> {
        self.pending
            .remove(&timer)
            .map(|_| Command::CancelTimer { timer })
    }

    /// 定时器到期：返回对应任务，一次性定时器同时出表
    pub fn fire(&mut self, timer: TimerId) -> Option<TimerTask> {
        let pending = self.pending.get(&timer)?;
        let task = pending.task;
        if !pending.repeat {
            self.pending.remove(&timer);
        }
        Some(task)
    }

    /// 仍在等待的定时器数量
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
