//! # FX Runtime
//!
//! 落地页交互特效的核心运行时库。
//!
//! ## 架构概述
//!
//! `fx-runtime` 是纯逻辑核心，不依赖 DOM、时钟或随机数源。
//! 它通过 **命令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                          Runtime
//!   │                              │
//!   │──── PageInput ─────────────►│
//!   │                              │ handle(input, &page)
//!   │◄─── Vec<Command> ───────────│
//!   │                              │
//! ```
//!
//! Runtime 读取页面只通过 [`PageQuery`]，修改页面只通过 [`Command`]，
//! 计时由 Host 执行 `Command::StartTimer` 并回报 `PageInput::TimerFired`。
//!
//! ## 核心类型
//!
//! - [`PageRuntime`]：组装全部特效并分发输入
//! - [`Animator`]：可见度触发的一次性动画（reveal / 计数 / 打字）
//! - [`Command`]：Runtime 向 Host 发出的指令
//! - [`PageInput`]：Host 向 Runtime 传递的输入
//! - [`FxConfig`]：选择器、class 名与时间参数
//!
//! ## 使用示例
//!
//! ```ignore
//! use fx_runtime::{FxConfig, PageInput, PageRuntime};
//!
//! let mut runtime = PageRuntime::new(FxConfig::default(), seed);
//! host.apply(runtime.boot(&page));
//!
//! // 浏览器回调
//! match runtime.handle(PageInput::DomReady, &page) {
//!     Ok(commands) => host.apply(commands),
//!     Err(e) => tracing::warn!(error = %e, "输入被拒绝"),
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`animator`]：可见度触发动画
//! - [`interaction`]：导航、滚动、悬停、复制、雪花、生命周期
//! - [`runtime`]：执行引擎
//! - [`command`] / [`input`]：Host 协议
//! - [`element`]：元素引用与页面读取能力
//! - [`timer`]：定时器登记
//! - [`config`]：配置
//! - [`error`]：错误类型

pub mod animator;
pub mod command;
pub mod config;
pub mod element;
pub mod error;
pub mod input;
pub mod interaction;
pub mod runtime;
pub mod state;
pub mod timer;

#[cfg(test)]
mod testing;

// 重导出核心类型
pub use animator::{
    Animator, CounterTarget, Effect, EffectKind, RevealConfig, TypingTarget, WatchOptions,
};
pub use command::{Command, DomEvent, ElementSpec};
pub use config::{
    ClassNames, CopySettings, CounterSettings, FxConfig, LifecycleSettings, RevealSettings,
    ScrollSettings, Selectors, SnowSettings, TypingSettings,
};
pub use element::{ElementId, GeneratedIds, OffsetBox, PageQuery, Rect};
pub use error::{ConfigError, FxError, FxResult, RuntimeError};
pub use input::{PageInput, ScrollMetrics, VisibilityEntry};
pub use interaction::{progress_percent, tilt_transform};
pub use runtime::PageRuntime;
pub use state::OneShot;
pub use timer::{TimerId, TimerTable, TimerTask};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _cmd = Command::add_class(ElementId::Body, "loaded");
        let _input = PageInput::DomReady;
        let _state = OneShot::default();
        let config = FxConfig::default();
        assert!(config.validate().is_ok());
        let runtime = PageRuntime::new(config, 0);
        assert!(!runtime.is_booted());
    }
}
