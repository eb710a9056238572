//! # Animator 模块
//!
//! 可见度触发的一次性动画。
//!
//! ## 执行模型
//!
//! ```text
//! register(element, effect, options) ──► Command::Observe
//!
//! on_visibility_change(entries)
//!   └─ 对元素上的每个效果：可见比例 ≥ 该效果的阈值 且 未触发过
//!        ├─ Command::Unobserve（只针对该阈值）
//!        └─ 效果指令（Reveal / CountUp / Typing）
//! ```
//!
//! 同一元素可以挂多个不同种类的效果（例如既显现又计数），各自有阈值与
//! [`OneShot`] 状态，互不影响。每个效果在一次页面生命周期中**最多触发一次**。
//! 计数与打字需要多帧完成，后续帧由定时器驱动（见 [`Animator::on_counter_step`]
//! 与 [`Animator::on_typing_line`]）。

pub mod counter;
pub mod reveal;
pub mod typing;

pub use counter::CounterTarget;
pub use reveal::RevealConfig;
pub use typing::TypingTarget;

use std::collections::HashMap;
use tracing::debug;

use crate::command::Command;
use crate::config::{CounterSettings, FxConfig, TypingSettings};
use crate::element::{ElementId, PageQuery};
use crate::input::VisibilityEntry;
use crate::state::OneShot;
use crate::timer::TimerTable;

use counter::CounterRun;
use typing::TypingRun;

/// 元素可见时触发的效果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// 添加显现 class
    Reveal(RevealConfig),
    /// 数字从 0 数到原值
    CountUp,
    /// 按行打出内容
    Typing,
}

/// 效果种类；同一元素上每种效果最多注册一次
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Reveal,
    CountUp,
    Typing,
}

impl Effect {
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Reveal(_) => EffectKind::Reveal,
            Self::CountUp => EffectKind::CountUp,
            Self::Typing => EffectKind::Typing,
        }
    }
}

/// 观察参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// 可见面积比例阈值 (0.0 - 1.0)
    pub threshold: f64,
}

impl WatchOptions {
    pub fn threshold(threshold: f64) -> Self {
        Self { threshold }
    }
}

/// 一个元素上的一个效果
#[derive(Debug)]
struct Watch {
    element: ElementId,
    effect: Effect,
    threshold: f64,
    state: OneShot,
}

/// 可见度触发动画器
#[derive(Debug)]
pub struct Animator {
    /// 按注册顺序
    watches: Vec<Watch>,
    counters: HashMap<ElementId, CounterRun>,
    typing: HashMap<ElementId, TypingRun>,
    revealed_class: String,
    counter_settings: CounterSettings,
    typing_settings: TypingSettings,
}

impl Animator {
    pub fn new(config: &FxConfig) -> Self {
        Self {
            watches: Vec::new(),
            counters: HashMap::new(),
            typing: HashMap::new(),
            revealed_class: config.classes.revealed.clone(),
            counter_settings: config.counter.clone(),
            typing_settings: config.typing.clone(),
        }
    }

    fn position(&self, element: ElementId, kind: EffectKind) -> Option<usize> {
        self.watches
            .iter()
            .position(|w| w.element == element && w.effect.kind() == kind)
    }

    /// 为元素注册一个效果
    ///
    /// 同一元素同一种效果重复注册时保留第一次，不会重复观察。
    pub fn register(
        &mut self,
        element: ElementId,
        effect: Effect,
        options: WatchOptions,
    ) -> Vec<Command> {
        if self.position(element, effect.kind()).is_some() {
            debug!(element = %element, effect = ?effect.kind(), "效果已注册，忽略");
            return Vec::new();
        }
        self.watches.push(Watch {
            element,
            effect,
            threshold: options.threshold,
            state: OneShot::NotStarted,
        });
        vec![Command::Observe {
            target: element,
            threshold: options.threshold,
        }]
    }

    /// 一批可见度变化（按到达顺序处理）
    pub fn on_visibility_change(
        &mut self,
        entries: &[VisibilityEntry],
        page: &dyn PageQuery,
        timers: &mut TimerTable,
    ) -> Vec<Command> {
        let mut commands = Vec::new();
        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }
            let due: Vec<usize> = self
                .watches
                .iter()
                .enumerate()
                .filter(|(_, w)| {
                    w.element == entry.target
                        && !w.state.has_fired()
                        && entry.intersection_ratio >= w.threshold
                })
                .map(|(index, _)| index)
                .collect();
            for index in due {
                commands.extend(self.fire(index, page, timers));
            }
        }
        commands
    }

    /// 不经可见度检查直接触发显现（首屏元素）
    ///
    /// 已注册的显现效果仍然遵守"最多一次"；未注册的元素只添加显现 class。
    pub fn trigger(
        &mut self,
        element: ElementId,
        page: &dyn PageQuery,
        timers: &mut TimerTable,
    ) -> Vec<Command> {
        match self.position(element, EffectKind::Reveal) {
            Some(index) => self.fire(index, page, timers),
            None => vec![Command::add_class(element, self.revealed_class.clone())],
        }
    }

    /// 停止观察该阈值；同元素同阈值上还有未触发的效果时保留观察
    fn unobserve(&self, index: usize) -> Option<Command> {
        let fired = &self.watches[index];
        let shared = self.watches.iter().any(|w| {
            w.element == fired.element
                && w.threshold.to_bits() == fired.threshold.to_bits()
                && !w.state.has_fired()
        });
        (!shared).then_some(Command::Unobserve {
            target: fired.element,
            threshold: fired.threshold,
        })
    }

    fn fire(
        &mut self,
        index: usize,
        page: &dyn PageQuery,
        timers: &mut TimerTable,
    ) -> Vec<Command> {
        let Some(watch) = self.watches.get_mut(index) else {
            return Vec::new();
        };
        if !watch.state.start() {
            return Vec::new();
        }
        let element = watch.element;
        let effect = watch.effect;

        let mut commands: Vec<Command> = self.unobserve(index).into_iter().collect();
        let finished = match effect {
            Effect::Reveal(config) => {
                commands.extend(reveal::reveal_commands(
                    element,
                    &config,
                    &self.revealed_class,
                ));
                true
            }
            Effect::CountUp => {
                let text = page.text_content(element).unwrap_or_default();
                match CounterTarget::parse(element, &text) {
                    Some(target) => {
                        let (run, start) =
                            CounterRun::start(target, &self.counter_settings, timers);
                        commands.extend(start);
                        self.counters.insert(element, run);
                        false
                    }
                    None => {
                        debug!(element = %element, text = %text, "文本不含数字，跳过计数动画");
                        true
                    }
                }
            }
            Effect::Typing => {
                let content = page.inner_html(element).unwrap_or_default();
                let target = TypingTarget::new(element, &content);
                let (run, start, done) = TypingRun::start(target, &self.typing_settings, timers);
                commands.extend(start);
                if !done {
                    self.typing.insert(element, run);
                }
                done
            }
        };
        if finished {
            self.watches[index].state.finish();
        }
        commands
    }

    /// 计数动画定时器到期
    pub fn on_counter_step(&mut self, element: ElementId, timers: &mut TimerTable) -> Vec<Command> {
        let Some(run) = self.counters.get_mut(&element) else {
            return Vec::new();
        };
        let (commands, done) = run.step(timers);
        if done {
            self.counters.remove(&element);
            self.finish(element, EffectKind::CountUp);
        }
        commands
    }

    /// 打字动画定时器到期
    pub fn on_typing_line(&mut self, element: ElementId, timers: &mut TimerTable) -> Vec<Command> {
        let Some(run) = self.typing.get_mut(&element) else {
            return Vec::new();
        };
        let (commands, done) = run.next_line(timers);
        if done {
            self.typing.remove(&element);
            self.finish(element, EffectKind::Typing);
        }
        commands
    }

    fn finish(&mut self, element: ElementId, kind: EffectKind) {
        if let Some(index) = self.position(element, kind) {
            self.watches[index].state.finish();
            debug!(element = %element, effect = ?kind, "动画完成");
        }
    }

    /// 元素上某个效果的当前状态
    pub fn state_of(&self, element: ElementId, kind: EffectKind) -> Option<OneShot> {
        self.position(element, kind).map(|index| self.watches[index].state)
    }

    /// 仍在等待触发的效果（注册顺序）
    pub fn pending_watches(&self) -> Vec<(ElementId, EffectKind)> {
        self.watches
            .iter()
            .filter(|w| !w.state.has_fired())
            .map(|w| (w.element, w.effect.kind()))
            .collect()
    }
}
