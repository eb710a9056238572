//! # Command 模块
//!
//! 定义 Runtime 向 Host 发出的所有指令。
//! Command 是 Runtime 修改页面的**唯一方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：Command 描述"改什么"，不描述"怎么改"
//! - **无副作用**：Command 本身不执行任何操作
//! - **DOM 无关**：不包含任何 `web_sys` 类型，Host 负责翻译

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::element::ElementId;
use crate::timer::TimerId;

/// Host 需要为某个元素转发的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DomEvent {
    /// `click`
    Click,
    /// `mouseenter`
    PointerEnter,
    /// `mouseleave`
    PointerLeave,
    /// `mousemove`
    PointerMove,
}

impl DomEvent {
    /// 浏览器事件名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::PointerEnter => "mouseenter",
            Self::PointerLeave => "mouseleave",
            Self::PointerMove => "mousemove",
        }
    }
}

/// 待创建元素的描述
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementSpec {
    /// 标签名
    pub tag: String,
    /// `className`
    pub class: Option<String>,
    /// `style.cssText`
    pub css_text: Option<String>,
    /// `textContent`
    pub text: Option<String>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn css(mut self, css_text: impl Into<String>) -> Self {
        self.css_text = Some(css_text.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Runtime 向 Host 发出的指令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// 开始观察元素可见度
    Observe {
        target: ElementId,
        /// 可见面积比例阈值 (0.0 - 1.0)
        threshold: f64,
    },

    /// 停止在某个阈值上观察元素可见度
    Unobserve { target: ElementId, threshold: f64 },

    /// 为元素转发事件（Host 注册监听器，终身有效）
    Listen { target: ElementId, event: DomEvent },

    /// 添加 class
    AddClass { target: ElementId, class: String },

    /// 移除 class
    RemoveClass { target: ElementId, class: String },

    /// 设置 `textContent`
    SetText { target: ElementId, text: String },

    /// 设置 `innerHTML`
    SetInnerHtml { target: ElementId, html: String },

    /// 设置单个内联样式（CSS 属性名，如 `transition-delay`）
    SetStyle {
        target: ElementId,
        property: String,
        value: String,
    },

    /// 创建元素并追加到 `parent` 末尾
    CreateElement {
        id: ElementId,
        parent: ElementId,
        spec: ElementSpec,
    },

    /// 从页面移除元素
    RemoveElement { target: ElementId },

    /// 平滑滚动到元素顶部
    ScrollIntoView { target: ElementId },

    /// 阻止当前事件的默认行为（只在同步处理事件时有意义）
    PreventDefault,

    /// 写入剪贴板，结果通过 `PageInput::ClipboardWritten` 回报
    WriteClipboard { text: String },

    /// 启动定时器，到期后 Host 回报 `PageInput::TimerFired`
    StartTimer {
        timer: TimerId,
        delay: Duration,
        /// true 为 `setInterval`，false 为 `setTimeout`
        repeat: bool,
    },

    /// 取消定时器
    CancelTimer { timer: TimerId },
}

impl Command {
    pub fn add_class(target: ElementId, class: impl Into<String>) -> Self {
        Self::AddClass {
            target,
            class: class.into(),
        }
    }

    pub fn remove_class(target: ElementId, class: impl Into<String>) -> Self {
        Self::RemoveClass {
            target,
            class: class.into(),
        }
    }

    pub fn set_text(target: ElementId, text: impl Into<String>) -> Self {
        Self::SetText {
            target,
            text: text.into(),
        }
    }

    pub fn set_style(
        target: ElementId,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::SetStyle {
            target,
            property: property.into(),
            value: value.into(),
        }
    }

    /// 指令作用的元素（如果有）
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::Observe { target, .. }
            | Self::Unobserve { target, .. }
            | Self::Listen { target, .. }
            | Self::AddClass { target, .. }
            | Self::RemoveClass { target, .. }
            | Self::SetText { target, .. }
            | Self::SetInnerHtml { target, .. }
            | Self::SetStyle { target, .. }
            | Self::RemoveElement { target }
            | Self::ScrollIntoView { target } => Some(*target),
            Self::CreateElement { id, .. } => Some(*id),
            Self::PreventDefault
            | Self::WriteClipboard { .. }
            | Self::StartTimer { .. }
            | Self::CancelTimer { .. } => None,
        }
    }
}
