//! # Input 模块
//!
//! 定义 Host 向 Runtime 传递的输入事件。
//!
//! ## 设计说明
//!
//! - `PageInput` 是 Host 把浏览器回调翻译后的语义化输入
//! - Runtime 不知道真实时间流逝：定时器到期由 Host 以 `TimerFired` 回报
//! - 几何信息（滚动位置、元素矩形）随事件一起传入，Runtime 不主动测量

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, Rect};
use crate::timer::TimerId;

/// 一次可见度通知中的单个条目（`IntersectionObserverEntry`）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilityEntry {
    pub target: ElementId,
    /// 可见面积比例 (0.0 - 1.0)
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
}

impl VisibilityEntry {
    /// 元素进入视口
    pub fn visible(target: ElementId, intersection_ratio: f64) -> Self {
        Self {
            target,
            intersection_ratio,
            is_intersecting: true,
        }
    }

    /// 元素离开视口
    pub fn hidden(target: ElementId) -> Self {
        Self {
            target,
            intersection_ratio: 0.0,
            is_intersecting: false,
        }
    }
}

/// 滚动时的页面度量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// `pageYOffset`
    pub scroll_y: f64,
    /// `innerHeight`
    pub viewport_height: f64,
    /// `documentElement.scrollHeight`
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_y,
            viewport_height,
            document_height,
        }
    }
}

/// Host 向 Runtime 传递的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageInput {
    /// `DOMContentLoaded`
    DomReady,

    /// `load`（所有资源加载完毕）
    Loaded,

    /// 一批可见度变化（同一帧内合并）
    Visibility { entries: Vec<VisibilityEntry> },

    /// 窗口滚动
    Scroll(ScrollMetrics),

    /// 点击
    Click { target: ElementId },

    /// 指针进入
    PointerEnter { target: ElementId },

    /// 指针离开
    PointerLeave { target: ElementId },

    /// 指针移动（`clientX` / `clientY` 与目标元素矩形）
    PointerMove {
        target: ElementId,
        client_x: f64,
        client_y: f64,
        rect: Rect,
    },

    /// 定时器到期
    TimerFired { timer: TimerId },

    /// 剪贴板写入结果
    ClipboardWritten { ok: bool },
}

impl PageInput {
    /// 创建点击输入
    pub fn click(target: ElementId) -> Self {
        Self::Click { target }
    }

    /// 创建定时器输入
    pub fn timer(timer: TimerId) -> Self {
        Self::TimerFired { timer }
    }

    /// 创建滚动输入
    pub fn scroll(scroll_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self::Scroll(ScrollMetrics::new(
            scroll_y,
            viewport_height,
            document_height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_creation() {
        let click = PageInput::click(ElementId::Page(2));
        assert_eq!(
            click,
            PageInput::Click {
                target: ElementId::Page(2)
            }
        );

        let scroll = PageInput::scroll(10.0, 800.0, 3000.0);
        assert!(matches!(scroll, PageInput::Scroll(m) if m.scroll_y == 10.0));
    }

    #[test]
    fn test_visibility_entry_helpers() {
        let shown = VisibilityEntry::visible(ElementId::Page(1), 0.6);
        assert!(shown.is_intersecting);
        let hidden = VisibilityEntry::hidden(ElementId::Page(1));
        assert!(!hidden.is_intersecting);
        assert_eq!(hidden.intersection_ratio, 0.0);
    }

    #[test]
    fn test_input_serialization() {
        let input = PageInput::Visibility {
            entries: vec![VisibilityEntry::visible(ElementId::Page(5), 1.0)],
        };
        let json = serde_json::to_string(&input).unwrap();
        let deserialized: PageInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, deserialized);
    }
}
