//! Host 错误类型

use thiserror::Error;
use wasm_bindgen::JsValue;

use fx_runtime::ElementId;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("没有 window 对象（不在浏览器主线程中运行）")]
    NoWindow,

    #[error("没有 document 对象")]
    NoDocument,

    #[error("元素 {0} 不存在或已移除")]
    MissingElement(ElementId),

    /// DOM 调用抛出的 JS 异常
    #[error("JS 异常: {0}")]
    Js(String),
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Js(message)
    }
}

pub type HostResult<T> = Result<T, HostError>;
