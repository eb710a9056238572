//! # 导航
//!
//! - 菜单开关：点击开关切换展开状态，点击任意导航链接收起
//! - 当前 section 高亮：滚动时给对应的 `.nav-link[href="#id"]` 加 `active`
//! - 启动时注入高亮样式

use std::collections::HashSet;

use crate::command::{Command, DomEvent, ElementSpec};
use crate::config::FxConfig;
use crate::element::{ElementId, GeneratedIds, PageQuery};

const ACTIVE_LINK_STYLE: &str = "
    .nav-link.{class} {
        color: #93c5fd !important;
        background: rgba(147, 197, 253, 0.1);
    }
";

#[derive(Debug, Clone, Copy)]
struct SectionLink {
    section: ElementId,
    link: ElementId,
}

/// 导航菜单
#[derive(Debug)]
pub struct NavMenu {
    toggle: Option<ElementId>,
    menu: Option<ElementId>,
    links: HashSet<ElementId>,
    sections: Vec<SectionLink>,
    open: bool,
    active_links: HashSet<ElementId>,
    open_class: String,
    active_class: String,
    section_offset: f64,
}

impl NavMenu {
    /// 查找导航元素，返回需要转发的事件与注入的样式
    pub fn discover(
        page: &dyn PageQuery,
        config: &FxConfig,
        ids: &mut GeneratedIds,
    ) -> (Self, Vec<Command>) {
        let selectors = &config.selectors;
        let toggle = page.select(&selectors.nav_toggle);
        let menu = page.select(&selectors.nav_menu);
        let links: Vec<ElementId> = page.select_all(&selectors.nav_link);

        let sections = page
            .select_all(&selectors.sections)
            .into_iter()
            .filter_map(|section| {
                let id = page.attribute(section, "id")?;
                let link = page.select(&format!("{}[href=\"#{}\"]", selectors.nav_link, id))?;
                Some(SectionLink { section, link })
            })
            .collect();

        let mut commands = Vec::new();
        if let Some(toggle) = toggle {
            commands.push(Command::Listen {
                target: toggle,
                event: DomEvent::Click,
            });
        }
        for link in &links {
            commands.push(Command::Listen {
                target: *link,
                event: DomEvent::Click,
            });
        }
        commands.push(Command::CreateElement {
            id: ids.allocate(),
            parent: ElementId::Head,
            spec: ElementSpec::new("style").text(
                ACTIVE_LINK_STYLE.replace("{class}", &config.classes.link_active),
            ),
        });

        let nav = Self {
            toggle,
            menu,
            links: links.into_iter().collect(),
            sections,
            open: false,
            active_links: HashSet::new(),
            open_class: config.classes.nav_open.clone(),
            active_class: config.classes.link_active.clone(),
            section_offset: config.scroll.section_offset,
        };
        (nav, commands)
    }

    fn set_open(&mut self, open: bool) -> Vec<Command> {
        self.open = open;
        [self.toggle, self.menu]
            .into_iter()
            .flatten()
            .map(|target| {
                if open {
                    Command::add_class(target, self.open_class.clone())
                } else {
                    Command::remove_class(target, self.open_class.clone())
                }
            })
            .collect()
    }

    pub fn on_click(&mut self, target: ElementId) -> Vec<Command> {
        if Some(target) == self.toggle {
            let open = !self.open;
            self.set_open(open)
        } else if self.links.contains(&target) {
            self.set_open(false)
        } else {
            Vec::new()
        }
    }

    /// 根据滚动位置更新链接高亮，只输出状态变化
    pub fn highlight(&mut self, scroll_y: f64, page: &dyn PageQuery) -> Vec<Command> {
        let mut commands = Vec::new();
        for &SectionLink { section, link } in &self.sections {
            let Some(offset) = page.offset_box(section) else {
                continue;
            };
            let top = offset.top - self.section_offset;
            let active = scroll_y > top && scroll_y <= top + offset.height;

            if active && self.active_links.insert(link) {
                commands.push(Command::add_class(link, self.active_class.clone()));
            } else if !active && self.active_links.remove(&link) {
                commands.push(Command::remove_class(link, self.active_class.clone()));
            }
        }
        commands
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
