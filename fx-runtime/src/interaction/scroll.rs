//! # 滚动联动
//!
//! header 标记、顶部阅读进度条、首屏背景视差。

use crate::command::{Command, ElementSpec};
use crate::config::{FxConfig, ScrollSettings};
use crate::element::{ElementId, GeneratedIds, PageQuery};
use crate::input::ScrollMetrics;

const PROGRESS_BAR_CSS: &str = "
    position: fixed;
    top: 0;
    left: 0;
    width: 0%;
    height: 3px;
    background: linear-gradient(135deg, #60a5fa 0%, #67e8f9 50%, #c4b5fd 100%);
    z-index: 1001;
    transition: width 0.1s ease;
    box-shadow: 0 0 10px rgba(103, 232, 249, 0.5);
";

/// 滚动进度百分比：`scroll_y / (document_height - viewport_height) * 100`
///
/// 页面不可滚动时为 0；回弹等越界值夹到 [0, 100]。
pub fn progress_percent(metrics: &ScrollMetrics) -> f64 {
    let range = metrics.document_height - metrics.viewport_height;
    if range <= 0.0 {
        return 0.0;
    }
    (metrics.scroll_y / range * 100.0).clamp(0.0, 100.0)
}

/// 滚动联动效果
#[derive(Debug)]
pub struct ScrollEffects {
    header: Option<ElementId>,
    hero_background: Option<ElementId>,
    progress_bar: Option<ElementId>,
    scrolled: bool,
    scrolled_class: String,
    settings: ScrollSettings,
}

impl ScrollEffects {
    pub fn discover(
        page: &dyn PageQuery,
        config: &FxConfig,
        ids: &mut GeneratedIds,
    ) -> (Self, Vec<Command>) {
        let mut commands = Vec::new();
        let progress_bar = config.scroll.progress_bar.then(|| {
            let id = ids.allocate();
            commands.push(Command::CreateElement {
                id,
                parent: ElementId::Body,
                spec: ElementSpec::new("div").css(PROGRESS_BAR_CSS),
            });
            id
        });

        let effects = Self {
            header: page.select(&config.selectors.header),
            hero_background: page.select(&config.selectors.hero_background),
            progress_bar,
            scrolled: false,
            scrolled_class: config.classes.scrolled.clone(),
            settings: config.scroll.clone(),
        };
        (effects, commands)
    }

    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) -> Vec<Command> {
        let mut commands = Vec::new();

        if let Some(header) = self.header {
            let scrolled = metrics.scroll_y > self.settings.header_offset;
            if scrolled != self.scrolled {
                self.scrolled = scrolled;
                commands.push(if scrolled {
                    Command::add_class(header, self.scrolled_class.clone())
                } else {
                    Command::remove_class(header, self.scrolled_class.clone())
                });
            }
        }

        if let Some(background) = self.hero_background {
            if metrics.scroll_y < metrics.viewport_height {
                commands.push(Command::set_style(
                    background,
                    "transform",
                    format!(
                        "translateY({}px)",
                        metrics.scroll_y * self.settings.parallax_factor
                    ),
                ));
            }
        }

        if let Some(bar) = self.progress_bar {
            commands.push(Command::set_style(
                bar,
                "width",
                format!("{}%", progress_percent(metrics)),
            ));
        }

        commands
    }

    pub fn progress_bar(&self) -> Option<ElementId> {
        self.progress_bar
    }
}
