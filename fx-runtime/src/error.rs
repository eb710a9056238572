//! # Error 模块
//!
//! 定义 fx-runtime 中使用的错误类型。
//!
//! 页面特效都是装饰性的：单个特效失败不会向上传播，这里只覆盖
//! 配置加载与 Host/Runtime 协议层面的错误。

use thiserror::Error;

use crate::timer::TimerId;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// JSON 解析失败
    #[error("配置解析失败: {message}")]
    Parse { message: String },

    /// 阈值超出 [0, 1]
    #[error("配置项 '{field}' 的阈值 {value} 超出范围 [0, 1]")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    /// 间隔/时长不能为 0
    #[error("配置项 '{field}' 必须大于 0")]
    ZeroDuration { field: &'static str },

    /// 计数动画步数不能为 0
    #[error("计数动画步数必须大于 0")]
    ZeroSteps,
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
        }
    }
}

/// 运行时错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Host 回报了一个 Runtime 从未调度（或已结束）的定时器
    #[error("未知的定时器 {timer}")]
    UnknownTimer { timer: TimerId },

    /// 在 boot 之前收到输入
    #[error("页面尚未初始化，忽略输入 {input}")]
    NotBooted { input: String },
}

/// fx-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 运行时错误
    #[error("运行时错误: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Result 类型别名
pub type FxResult<T> = Result<T, FxError>;
