//! 页内锚点平滑滚动

use std::collections::HashSet;
use tracing::debug;

use crate::command::{Command, DomEvent};
use crate::config::FxConfig;
use crate::element::{ElementId, PageQuery};

/// 页内锚点（`href` 以 `#` 开头的链接）
#[derive(Debug, Default)]
pub struct AnchorScroll {
    anchors: HashSet<ElementId>,
}

impl AnchorScroll {
    pub fn discover(page: &dyn PageQuery, config: &FxConfig) -> (Self, Vec<Command>) {
        let anchors: Vec<ElementId> = page.select_all(&config.selectors.anchors);
        let commands = anchors
            .iter()
            .map(|&target| Command::Listen {
                target,
                event: DomEvent::Click,
            })
            .collect();
        (
            Self {
                anchors: anchors.into_iter().collect(),
            },
            commands,
        )
    }

    pub fn handles(&self, target: ElementId) -> bool {
        self.anchors.contains(&target)
    }

    /// 点击锚点：总是阻止默认跳转；目标在点击时才解析，不存在则不滚动
    pub fn on_click(&self, target: ElementId, page: &dyn PageQuery) -> Vec<Command> {
        if !self.handles(target) {
            return Vec::new();
        }
        let mut commands = vec![Command::PreventDefault];

        let href = page.attribute(target, "href").unwrap_or_default();
        // 单独的 "#" 不是合法选择器
        let destination = if href.len() > 1 {
            page.select(&href)
        } else {
            None
        };
        match destination {
            Some(destination) => commands.push(Command::ScrollIntoView {
                target: destination,
            }),
            None => debug!(anchor = %target, href = %href, "锚点目标不存在"),
        }
        commands
    }
}
