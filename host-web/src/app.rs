//! # App 模块
//!
//! Host 的组装与输入分发。
//!
//! ```text
//! 浏览器回调 ──► dispatch ──► PageRuntime::handle ──► CommandExecutor::apply ──► DOM
//! ```
//!
//! 所有状态放在一个 `Rc<RefCell<HostState>>` 里。回调里用 `try_borrow_mut`：
//! 同步触发的嵌套回调会被丢弃，而不是 panic。

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Event;

use fx_runtime::{FxConfig, PageInput, PageRuntime};

use crate::dom::DomPage;
use crate::error::HostResult;
use crate::executor::CommandExecutor;

/// 页面内配置块的 id
pub const CONFIG_ELEMENT_ID: &str = "fx-config";

/// Host 全部状态
pub struct HostState {
    pub runtime: PageRuntime,
    pub page: DomPage,
    pub executor: CommandExecutor,
}

/// 把一次浏览器回调送进 Runtime 并执行返回的指令
///
/// `make_input` 在持有页面的情况下构造输入；返回 None 表示这次回调无事可做。
pub fn dispatch(
    host: &Weak<RefCell<HostState>>,
    trigger: Option<&Event>,
    make_input: impl FnOnce(&DomPage) -> Option<PageInput>,
) {
    let Some(host) = host.upgrade() else {
        return;
    };
    let Ok(mut state) = host.try_borrow_mut() else {
        warn!("回调重入，丢弃本次输入");
        return;
    };
    let HostState {
        runtime,
        page,
        executor,
    } = &mut *state;
    executor.collect_garbage();

    let Some(input) = make_input(page) else {
        return;
    };
    if let PageInput::TimerFired { timer } = &input {
        executor.timer_fired(*timer);
    }
    match runtime.handle(input, page) {
        Ok(commands) => executor.apply(commands, page, trigger),
        Err(e) => warn!(error = %e, "输入被拒绝"),
    }
}

/// 读取页面内的 `<script type="application/json" id="fx-config">`
///
/// 没有配置块时使用默认值；配置无效时警告并使用默认值。
pub fn load_config(page: &DomPage) -> FxConfig {
    let Some(text) = page
        .document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        debug!("页面没有配置块，使用默认配置");
        return FxConfig::default();
    };
    match FxConfig::from_json(&text) {
        Ok(config) => {
            info!("已加载页面配置");
            config
        }
        Err(e) => {
            warn!(error = %e, "页面配置无效，使用默认配置");
            FxConfig::default()
        }
    }
}

/// 随机数种子
fn random_seed() -> u64 {
    let high = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let low = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (high << 32) | low
}

/// 浏览器 Host
pub struct Host {
    state: Rc<RefCell<HostState>>,
}

impl Host {
    /// 创建 Host；配置为 None 时从页面读取
    pub fn new(config: Option<FxConfig>) -> HostResult<Self> {
        let page = DomPage::new()?;
        let config = config.unwrap_or_else(|| load_config(&page));
        let runtime = PageRuntime::new(config, random_seed());
        let state = Rc::new_cyclic(|weak| {
            RefCell::new(HostState {
                runtime,
                page,
                executor: CommandExecutor::new(weak.clone()),
            })
        });
        Ok(Self { state })
    }

    /// 安装全部特效与页面级监听
    ///
    /// 脚本加载时 DOM 可能已经就绪（甚至已经加载完毕），此时立即补发对应输入。
    pub fn start(&self) -> HostResult<()> {
        let ready_state = {
            let mut state = self.state.borrow_mut();
            let HostState {
                runtime,
                page,
                executor,
            } = &mut *state;
            let commands = runtime.boot(page);
            info!(commands = commands.len(), "页面特效已安装");
            executor.apply(commands, page, None);
            page.document().ready_state()
        };

        self.listen_window("scroll", |page| Some(PageInput::Scroll(page.scroll_metrics())))?;
        self.listen_window("load", |_| Some(PageInput::Loaded))?;
        self.listen_document("DOMContentLoaded", |_| Some(PageInput::DomReady))?;

        let weak = Rc::downgrade(&self.state);
        match ready_state.as_str() {
            "loading" => {}
            "interactive" => {
                dispatch(&weak, None, |_| Some(PageInput::DomReady));
            }
            _ => {
                dispatch(&weak, None, |_| Some(PageInput::DomReady));
                dispatch(&weak, None, |_| Some(PageInput::Loaded));
            }
        }
        Ok(())
    }

    fn listen_window(
        &self,
        name: &str,
        make_input: fn(&DomPage) -> Option<PageInput>,
    ) -> HostResult<()> {
        let window = self.state.borrow().page.window().clone();
        add_listener(window.unchecked_ref(), name, Rc::downgrade(&self.state), make_input)
    }

    fn listen_document(
        &self,
        name: &str,
        make_input: fn(&DomPage) -> Option<PageInput>,
    ) -> HostResult<()> {
        let document = self.state.borrow().page.document().clone();
        add_listener(document.unchecked_ref(), name, Rc::downgrade(&self.state), make_input)
    }

    /// 共享状态（测试与调试用）
    pub fn state(&self) -> &Rc<RefCell<HostState>> {
        &self.state
    }
}

fn add_listener(
    target: &web_sys::EventTarget,
    name: &str,
    host: Weak<RefCell<HostState>>,
    make_input: fn(&DomPage) -> Option<PageInput>,
) -> HostResult<()> {
    let callback = Closure::<dyn FnMut(_)>::new(move |event: Event| {
        dispatch(&host, Some(&event), make_input);
    });
    target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}
