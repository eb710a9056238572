//! # 页面会话集成测试
//!
//! 只通过公共 API 驱动 `PageRuntime`：一张静态页面、一串浏览器输入，
//! 检查 Runtime 发出的指令。不依赖 DOM。

use std::collections::HashMap;

use fx_runtime::{
    Command, ElementId, FxConfig, OffsetBox, PageInput, PageQuery, PageRuntime, RuntimeError,
    TimerId, VisibilityEntry,
};

/// 只读的静态页面
#[derive(Default)]
struct StaticPage {
    selectors: HashMap<&'static str, Vec<ElementId>>,
    text: HashMap<ElementId, String>,
}

impl StaticPage {
    fn with(mut self, selector: &'static str, element: ElementId) -> Self {
        self.selectors.entry(selector).or_default().push(element);
        self
    }

    fn text(mut self, element: ElementId, text: &str) -> Self {
        self.text.insert(element, text.to_string());
        self
    }
}

impl PageQuery for StaticPage {
    fn select_all(&self, selector: &str) -> Vec<ElementId> {
        self.selectors.get(selector).cloned().unwrap_or_default()
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.text.get(&element).cloned()
    }

    fn inner_html(&self, element: ElementId) -> Option<String> {
        self.text.get(&element).cloned()
    }

    fn attribute(&self, _element: ElementId, _name: &str) -> Option<String> {
        None
    }

    fn parent(&self, _element: ElementId) -> Option<ElementId> {
        None
    }

    fn offset_box(&self, _element: ElementId) -> Option<OffsetBox> {
        None
    }

    fn viewport_width(&self) -> f64 {
        1024.0
    }
}

fn quiet_config() -> FxConfig {
    FxConfig::from_json(r#"{ "snow": { "enabled": false }, "scroll": { "progress_bar": false } }"#)
        .unwrap()
}

fn timers_in(commands: &[Command]) -> Vec<TimerId> {
    commands
        .iter()
        .filter_map(|cmd| match cmd {
            Command::StartTimer { timer, .. } => Some(*timer),
            _ => None,
        })
        .collect()
}

/// 计数动画：从 "0%" 开始，结束时写回 "99.9%"
#[test]
fn test_count_up_restores_original_text() {
    let stat = ElementId::Page(1);
    let page = StaticPage::default()
        .with(".stat-value", stat)
        .text(stat, "99.9%");
    let mut runtime = PageRuntime::new(quiet_config(), 0);
    let boot = runtime.boot(&page);
    assert!(boot.contains(&Command::Observe {
        target: stat,
        threshold: 0.5
    }));

    let commands = runtime
        .handle(
            PageInput::Visibility {
                entries: vec![VisibilityEntry::visible(stat, 0.9)],
            },
            &page,
        )
        .unwrap();
    assert_eq!(
        commands[0],
        Command::Unobserve {
            target: stat,
            threshold: 0.5
        }
    );
    assert_eq!(commands[1], Command::set_text(stat, "0.9%"));
    let timers = timers_in(&commands);
    assert_eq!(timers.len(), 1);

    // 99 / 50 的累加有浮点误差，最后一步可能落在第 50 或第 51 次
    let mut steps = 0;
    let last = loop {
        steps += 1;
        let commands = runtime.handle(PageInput::timer(timers[0]), &page).unwrap();
        if commands.len() == 2 || steps > 60 {
            break commands;
        }
    };
    assert!((50..=51).contains(&steps));
    assert_eq!(
        last,
        vec![
            Command::set_text(stat, "99.9%"),
            Command::CancelTimer { timer: timers[0] },
        ]
    );

    // 定时器已取消，再次回报是协议错误
    assert_eq!(
        runtime.handle(PageInput::timer(timers[0]), &page),
        Err(RuntimeError::UnknownTimer { timer: timers[0] })
    );
}

/// 可见度重复进出只触发一次
#[test]
fn test_reveal_fires_once_per_page_load() {
    let item = ElementId::Page(7);
    let page = StaticPage::default().with("[data-aos]", item);
    let mut runtime = PageRuntime::new(quiet_config(), 0);
    runtime.boot(&page);

    let mut fired = 0;
    for ratio in [0.05, 0.3, 0.0, 1.0, 0.5] {
        let entry = if ratio > 0.0 {
            VisibilityEntry::visible(item, ratio)
        } else {
            VisibilityEntry::hidden(item)
        };
        let commands = runtime
            .handle(
                PageInput::Visibility {
                    entries: vec![entry],
                },
                &page,
            )
            .unwrap();
        fired += commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::AddClass { .. }))
            .count();
    }
    assert_eq!(fired, 1);
}

/// 空页面上所有输入都安全
#[test]
fn test_empty_page_is_inert() {
    let page = StaticPage::default();
    let mut runtime = PageRuntime::new(quiet_config(), 0);
    runtime.boot(&page);

    for input in [
        PageInput::scroll(300.0, 800.0, 800.0),
        PageInput::click(ElementId::Page(0)),
        PageInput::Loaded,
        PageInput::ClipboardWritten { ok: true },
    ] {
        let commands = runtime.handle(input, &page).unwrap();
        assert!(commands.is_empty(), "unexpected {commands:?}");
    }
}
