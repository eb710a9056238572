//! # 页面生命周期
//!
//! - DOM 就绪：`<body>` 加 `loaded`，稍后触发首屏 reveal
//! - 资源加载完毕：预加载遮罩淡出，淡出结束后隐藏

use std::time::Duration;
use tracing::debug;

use crate::command::Command;
use crate::config::{FxConfig, LifecycleSettings};
use crate::element::{ElementId, PageQuery};
use crate::state::OneShot;
use crate::timer::{TimerTable, TimerTask};

/// 页面生命周期
#[derive(Debug)]
pub struct Lifecycle {
    dom_ready: OneShot,
    loaded: OneShot,
    preloader: Option<ElementId>,
    loaded_class: String,
    settings: LifecycleSettings,
}

impl Lifecycle {
    pub fn discover(page: &dyn PageQuery, config: &FxConfig) -> Self {
        Self {
            dom_ready: OneShot::NotStarted,
            loaded: OneShot::NotStarted,
            preloader: page.select(&config.selectors.preloader),
            loaded_class: config.classes.loaded.clone(),
            settings: config.lifecycle.clone(),
        }
    }

    /// `DOMContentLoaded`；重复通知被忽略
    pub fn on_dom_ready(&mut self, timers: &mut TimerTable) -> Vec<Command> {
        if !self.dom_ready.start() {
            return Vec::new();
        }
        self.dom_ready.finish();
        let (_, start) = timers.after(
            TimerTask::HeroReveal,
            Duration::from_millis(self.settings.hero_reveal_delay_ms),
        );
        vec![
            Command::add_class(ElementId::Body, self.loaded_class.clone()),
            start,
        ]
    }

    /// `load`；页面没有预加载遮罩时什么也不做
    pub fn on_load(&mut self, timers: &mut TimerTable) -> Vec<Command> {
        if !self.loaded.start() {
            return Vec::new();
        }
        self.loaded.finish();
        let Some(preloader) = self.preloader else {
            debug!("页面没有预加载遮罩");
            return Vec::new();
        };
        let (_, start) = timers.after(
            TimerTask::PreloaderHide { target: preloader },
            Duration::from_millis(self.settings.preloader_fade_ms),
        );
        vec![Command::set_style(preloader, "opacity", "0"), start]
    }

    pub fn on_preloader_hidden(&self, preloader: ElementId) -> Vec<Command> {
        vec![Command::set_style(preloader, "display", "none")]
    }
}
