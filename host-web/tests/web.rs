//! # 浏览器集成测试
//!
//! `wasm-pack test --headless --firefox host-web`
//!
//! 在真实 DOM 上验证 PageQuery 实现与 Command 执行。

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use fx_runtime::{Command, ElementId, FxConfig, PageInput, PageQuery};
use host_web::{DomPage, Host, app::dispatch};

wasm_bindgen_test_configure!(run_in_browser);

const FIXTURE: &str = r##"
    <nav class="navbar">
        <button class="nav-toggle"></button>
        <ul class="nav-menu"><a class="nav-link" href="#pricing">Pricing</a></ul>
    </nav>
    <section id="pricing" data-aos="fade-up" data-aos-delay="150">
        <div class="stat-value">42x</div>
    </section>
    <div class="code-preview"><pre><code>line 1
line 2</code></pre></div>
"##;

fn mount() -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();
    body.set_inner_html(FIXTURE);
    body
}

fn quiet_config() -> FxConfig {
    let mut config = FxConfig::default();
    config.snow.enabled = false;
    config
}

#[wasm_bindgen_test]
fn dom_page_assigns_stable_ids() {
    mount();
    let page = DomPage::new().unwrap();

    let first = page.select_all(".stat-value");
    let second = page.select_all(".stat-value");
    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert_eq!(page.text_content(first[0]).as_deref(), Some("42x"));

    let element = page.resolve(first[0]).unwrap();
    assert!(element.get_attribute("data-fx-id").is_some());
    assert_eq!(page.lookup(&element), Some(first[0]));
}

#[wasm_bindgen_test]
fn invalid_selector_matches_nothing() {
    mount();
    let page = DomPage::new().unwrap();
    assert!(page.select_all("[[[").is_empty());
}

#[wasm_bindgen_test]
fn boot_creates_generated_markup() {
    let body = mount();
    let host = Host::new(Some(quiet_config())).unwrap();
    host.start().unwrap();

    let document = web_sys::window().unwrap().document().unwrap();
    assert!(document.query_selector(".code-preview .copy-btn").unwrap().is_some());
    assert!(body.last_element_child().is_some());
    let styles = document.head().unwrap().inner_html();
    assert!(styles.contains(".nav-link.active"));
}

#[wasm_bindgen_test]
fn nav_toggle_click_opens_menu() {
    mount();
    let host = Host::new(Some(quiet_config())).unwrap();
    host.start().unwrap();

    let toggle = {
        let state = host.state().borrow();
        state.page.select(".nav-toggle").unwrap()
    };
    dispatch(&std::rc::Rc::downgrade(host.state()), None, |_| {
        Some(PageInput::click(toggle))
    });

    let document = web_sys::window().unwrap().document().unwrap();
    let menu = document.query_selector(".nav-menu").unwrap().unwrap();
    assert!(menu.class_list().contains("active"));
}

#[wasm_bindgen_test]
fn executor_applies_text_and_class() {
    mount();
    let host = Host::new(Some(quiet_config())).unwrap();
    let mut state = host.state().borrow_mut();
    let host_web::HostState { page, executor, .. } = &mut *state;

    let stat = page.select(".stat-value").unwrap();
    executor.apply(
        vec![
            Command::set_text(stat, "0x"),
            Command::add_class(ElementId::Body, "loaded"),
        ],
        page,
        None,
    );
    assert_eq!(page.text_content(stat).as_deref(), Some("0x"));
    assert!(page.resolve(ElementId::Body).unwrap().class_list().contains("loaded"));
}
