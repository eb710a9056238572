//! # Host Web
//!
//! fx-runtime 的浏览器宿主层，编译为 wasm 随页面加载。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 用真实 DOM 实现 `PageQuery`（[`dom`]）
//! - 将 Runtime 的 Command 转换为 DOM 操作（[`executor`]）
//! - 把浏览器回调翻译成 `PageInput` 并分发（[`app`]）
//! - 日志输出到浏览器控制台（[`logging`]）
//!
//! Host 层不包含特效逻辑，只负责执行 Runtime 发出的 Command。

pub mod app;
pub mod dom;
pub mod error;
pub mod executor;
pub mod logging;

pub use app::{Host, HostState, load_config};
pub use dom::DomPage;
pub use error::{HostError, HostResult};
pub use executor::CommandExecutor;

use std::cell::RefCell;

use tracing::{Level, error};
use wasm_bindgen::prelude::*;

thread_local! {
    /// 页面生命周期内常驻的 Host
    static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    });

    match Host::new(None).and_then(|host| host.start().map(|()| host)) {
        Ok(host) => HOST.with(|slot| *slot.borrow_mut() = Some(host)),
        Err(e) => error!(error = %e, "页面特效启动失败"),
    }
}
