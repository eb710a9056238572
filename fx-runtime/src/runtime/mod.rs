//! # Runtime 模块
//!
//! 页面特效运行时，负责把各部件组装起来并分发输入。
//!
//! ## 模块结构
//!
//! - [`engine`]：[`PageRuntime`] 与输入分发

pub mod engine;


pub use engine::PageRuntime;
