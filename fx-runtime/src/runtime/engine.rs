//! # Engine 模块
//!
//! 页面特效运行时。
//!
//! ## 执行模型
//!
//! ```text
//! boot(&page)            -> Vec<Command>   查找元素、注册观察与监听、生成元素
//! handle(input, &page)   -> Vec<Command>   把一次浏览器回调翻译成页面修改
//! ```
//!
//! `handle` 只是按输入类型分发到 `on_*` 方法；Host 也可以直接调用这些方法。

use tracing::{debug, warn};

use crate::animator::{Animator, Effect, RevealConfig, WatchOptions};
use crate::command::Command;
use crate::config::FxConfig;
use crate::element::{ElementId, GeneratedIds, PageQuery, Rect};
use crate::error::RuntimeError;
use crate::input::{PageInput, ScrollMetrics, VisibilityEntry};
use crate::interaction::{
    AnchorScroll, CopyButton, HoverEffects, Lifecycle, NavMenu, ScrollEffects, Snowfall,
};
use crate::timer::{TimerId, TimerTable, TimerTask};

/// boot 时发现的页面部件
#[derive(Debug)]
struct Widgets {
    nav: NavMenu,
    scroll: ScrollEffects,
    anchors: AnchorScroll,
    hover: HoverEffects,
    copy: Option<CopyButton>,
    snow: Option<Snowfall>,
    lifecycle: Lifecycle,
}

/// 页面特效运行时
///
/// # 使用示例
///
/// ```ignore
/// let mut runtime = PageRuntime::new(config, seed);
/// host.apply(runtime.boot(&page));
///
/// // 每次浏览器回调
/// let commands = runtime.handle(input, &page)?;
/// host.apply(commands);
/// ```
#[derive(Debug)]
pub struct PageRuntime {
    config: FxConfig,
    seed: u64,
    timers: TimerTable,
    ids: GeneratedIds,
    animator: Animator,
    widgets: Option<Widgets>,
}

impl PageRuntime {
    /// 创建 Runtime
    ///
    /// # 参数
    ///
    /// - `config`: 已校验的配置
    /// - `seed`: 雪花随机数种子
    pub fn new(config: FxConfig, seed: u64) -> Self {
        let animator = Animator::new(&config);
        Self {
            config,
            seed,
            timers: TimerTable::new(),
            ids: GeneratedIds::new(),
            animator,
            widgets: None,
        }
    }

    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    pub fn is_booted(&self) -> bool {
        self.widgets.is_some()
    }

    /// 扫描页面并安装全部特效；重复调用返回空
    pub fn boot(&mut self, page: &dyn PageQuery) -> Vec<Command> {
        if self.is_booted() {
            debug!("Runtime 已初始化，忽略重复 boot");
            return Vec::new();
        }
        let mut commands = Vec::new();

        let (nav, cmds) = NavMenu::discover(page, &self.config, &mut self.ids);
        commands.extend(cmds);
        let (scroll, cmds) = ScrollEffects::discover(page, &self.config, &mut self.ids);
        commands.extend(cmds);
        let (anchors, cmds) = AnchorScroll::discover(page, &self.config);
        commands.extend(cmds);
        let (hover, cmds) = HoverEffects::discover(page, &self.config);
        commands.extend(cmds);

        commands.extend(self.register_animations(page));

        let copy = CopyButton::discover(page, &self.config, &mut self.ids).map(|(copy, cmds)| {
            commands.extend(cmds);
            copy
        });

        let snow = if self.config.snow.enabled {
            let (snow, cmds) =
                Snowfall::start(&self.config, self.seed, &mut self.ids, &mut self.timers);
            commands.extend(cmds);
            Some(snow)
        } else {
            None
        };

        let lifecycle = Lifecycle::discover(page, &self.config);

        debug!(
            commands = commands.len(),
            watched = self.animator.pending_watches().len(),
            "页面特效初始化完成"
        );
        self.widgets = Some(Widgets {
            nav,
            scroll,
            anchors,
            hover,
            copy,
            snow,
            lifecycle,
        });
        commands
    }

    fn register_animations(&mut self, page: &dyn PageQuery) -> Vec<Command> {
        let mut commands = Vec::new();
        let selectors = &self.config.selectors;

        let reveal = WatchOptions::threshold(self.config.reveal.threshold);
        for element in page.select_all(&selectors.reveal) {
            let delay = page.attribute(element, &self.config.reveal.delay_attribute);
            let effect = Effect::Reveal(RevealConfig::from_attribute(delay.as_deref()));
            commands.extend(self.animator.register(element, effect, reveal));
        }

        let counter = WatchOptions::threshold(self.config.counter.threshold);
        for element in page.select_all(&selectors.stat_values) {
            commands.extend(self.animator.register(element, Effect::CountUp, counter));
        }

        match page.select(&selectors.code) {
            Some(element) => commands.extend(self.animator.register(
                element,
                Effect::Typing,
                WatchOptions::threshold(self.config.typing.threshold),
            )),
            None => debug!("页面没有代码块，跳过打字动画"),
        }
        commands
    }

    /// 核心分发函数
    pub fn handle(
        &mut self,
        input: PageInput,
        page: &dyn PageQuery,
    ) -> Result<Vec<Command>, RuntimeError> {
        if !self.is_booted() {
            return Err(RuntimeError::NotBooted {
                input: format!("{input:?}"),
            });
        }
        let commands = match input {
            PageInput::DomReady => self.on_dom_ready(),
            PageInput::Loaded => self.on_load(),
            PageInput::Visibility { entries } => self.on_visibility_change(&entries, page),
            PageInput::Scroll(metrics) => self.on_scroll(&metrics, page),
            PageInput::Click { target } => self.on_click(target, page),
            PageInput::PointerEnter { target } => self.on_pointer_enter(target),
            PageInput::PointerLeave { target } => self.on_pointer_leave(target),
            PageInput::PointerMove {
                target,
                client_x,
                client_y,
                rect,
            } => self.on_pointer_move(target, client_x, client_y, &rect),
            PageInput::TimerFired { timer } => self.on_timer(timer, page)?,
            PageInput::ClipboardWritten { ok } => self.on_clipboard_result(ok),
        };
        Ok(commands)
    }

    pub fn on_visibility_change(
        &mut self,
        entries: &[VisibilityEntry],
        page: &dyn PageQuery,
    ) -> Vec<Command> {
        self.animator
            .on_visibility_change(entries, page, &mut self.timers)
    }

    pub fn on_scroll(&mut self, metrics: &ScrollMetrics, page: &dyn PageQuery) -> Vec<Command> {
        let Some(widgets) = self.widgets.as_mut() else {
            return Vec::new();
        };
        let mut commands = widgets.scroll.on_scroll(metrics);
        commands.extend(widgets.nav.highlight(metrics.scroll_y, page));
        commands
    }

    /// 同一个元素可能同时是导航链接和页内锚点，两边都要处理
    pub fn on_click(&mut self, target: ElementId, page: &dyn PageQuery) -> Vec<Command> {
        let Some(widgets) = self.widgets.as_mut() else {
            return Vec::new();
        };
        let mut commands = widgets.nav.on_click(target);
        commands.extend(widgets.anchors.on_click(target, page));
        if let Some(copy) = &widgets.copy {
            commands.extend(copy.on_click(target, page));
        }
        commands
    }

    pub fn on_pointer_enter(&mut self, target: ElementId) -> Vec<Command> {
        let Some(widgets) = self.widgets.as_ref() else {
            return Vec::new();
        };
        let mut commands = widgets.hover.on_pointer_enter(target);
        if let Some(copy) = &widgets.copy {
            commands.extend(copy.on_pointer_enter(target));
        }
        commands
    }

    pub fn on_pointer_leave(&mut self, target: ElementId) -> Vec<Command> {
        let Some(widgets) = self.widgets.as_ref() else {
            return Vec::new();
        };
        let mut commands = widgets.hover.on_pointer_leave(target);
        if let Some(copy) = &widgets.copy {
            commands.extend(copy.on_pointer_leave(target));
        }
        commands
    }

    pub fn on_pointer_move(
        &mut self,
        target: ElementId,
        client_x: f64,
        client_y: f64,
        rect: &Rect,
    ) -> Vec<Command> {
        self.widgets
            .as_ref()
            .map(|widgets| {
                widgets
                    .hover
                    .on_pointer_move(target, client_x, client_y, rect)
            })
            .unwrap_or_default()
    }

    /// 定时器到期
    ///
    /// 回报未登记（或已取消）的定时器属于 Host 协议错误。
    pub fn on_timer(
        &mut self,
        timer: TimerId,
        page: &dyn PageQuery,
    ) -> Result<Vec<Command>, RuntimeError> {
        let task = self
            .timers
            .fire(timer)
            .ok_or(RuntimeError::UnknownTimer { timer })?;
        let Some(widgets) = self.widgets.as_mut() else {
            return Ok(Vec::new());
        };

        let commands = match task {
            TimerTask::CounterStep { target } => {
                self.animator.on_counter_step(target, &mut self.timers)
            }
            TimerTask::TypingLine { target } => {
                self.animator.on_typing_line(target, &mut self.timers)
            }
            TimerTask::HeroReveal => {
                let mut commands = Vec::new();
                for element in page.select_all(&self.config.selectors.hero_reveal) {
                    commands.extend(self.animator.trigger(element, page, &mut self.timers));
                }
                commands
            }
            TimerTask::PreloaderHide { target } => widgets.lifecycle.on_preloader_hidden(target),
            TimerTask::CopyLabelReset => widgets
                .copy
                .as_mut()
                .map(CopyButton::on_reset)
                .unwrap_or_default(),
            TimerTask::SnowSpawn => match widgets.snow.as_mut() {
                Some(snow) => snow.spawn(page, &mut self.ids, &mut self.timers),
                None => Vec::new(),
            },
            TimerTask::SnowflakeExpire { flake } => widgets
                .snow
                .as_mut()
                .map(|snow| snow.expire(flake))
                .unwrap_or_default(),
        };
        Ok(commands)
    }

    pub fn on_dom_ready(&mut self) -> Vec<Command> {
        match self.widgets.as_mut() {
            Some(widgets) => widgets.lifecycle.on_dom_ready(&mut self.timers),
            None => Vec::new(),
        }
    }

    pub fn on_load(&mut self) -> Vec<Command> {
        match self.widgets.as_mut() {
            Some(widgets) => widgets.lifecycle.on_load(&mut self.timers),
            None => Vec::new(),
        }
    }

    pub fn on_clipboard_result(&mut self, ok: bool) -> Vec<Command> {
        let Some(copy) = self.widgets.as_mut().and_then(|w| w.copy.as_mut()) else {
            warn!(ok, "收到剪贴板结果，但页面没有复制按钮");
            return Vec::new();
        };
        copy.on_clipboard_result(ok, &mut self.timers)
    }

    /// 可见度动画器（只读）
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// 仍在等待的定时器数量
    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    /// 雪花容器（雪花关闭或未初始化时为 None）
    pub fn snow_container(&self) -> Option<ElementId> {
        self.widgets
            .as_ref()
            .and_then(|w| w.snow.as_ref())
            .map(Snowfall::container)
    }

    /// 复制按钮（页面没有代码块或未初始化时为 None）
    pub fn copy_button(&self) -> Option<ElementId> {
        self.widgets
            .as_ref()
            .and_then(|w| w.copy.as_ref())
            .map(CopyButton::button)
    }
}
