//! # Element 模块
//!
//! 页面元素的抽象引用，以及 Runtime 读取页面的能力接口。
//!
//! ## 设计说明
//!
//! - Runtime 不持有任何 DOM 对象，只持有 [`ElementId`]
//! - 页面上已有的元素由 Host 分配 `Page(n)`
//! - Runtime 自己生成的元素（进度条、复制按钮、雪花……）由 Runtime 分配 `Generated(n)`
//! - 读取页面通过 [`PageQuery`] 注入，测试中可以替换为内存中的假页面

use serde::{Deserialize, Serialize};

/// 页面元素引用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementId {
    /// `<body>`
    Body,
    /// `<head>`
    Head,
    /// 页面已有元素（Host 分配）
    Page(u32),
    /// Runtime 生成的元素
    Generated(u32),
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Body => write!(f, "body"),
            Self::Head => write!(f, "head"),
            Self::Page(n) => write!(f, "page#{n}"),
            Self::Generated(n) => write!(f, "gen#{n}"),
        }
    }
}

/// 生成元素的 ID 分配器
#[derive(Debug, Default)]
pub struct GeneratedIds {
    next: u32,
}

impl GeneratedIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配下一个 `Generated` ID，永不重复
    pub fn allocate(&mut self) -> ElementId {
        let id = ElementId::Generated(self.next);
        self.next += 1;
        id
    }
}

/// 元素相对视口的矩形（`getBoundingClientRect`）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// 元素在文档中的位置（`offsetTop` / `offsetHeight`）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OffsetBox {
    pub top: f64,
    pub height: f64,
}

/// 页面读取能力
///
/// Host 用真实 DOM 实现；测试用假页面实现。
/// 所有方法都是只读的，写操作一律通过 `Command` 返回给 Host。
pub trait PageQuery {
    /// 按 CSS 选择器查询所有匹配元素（文档顺序）
    fn select_all(&self, selector: &str) -> Vec<ElementId>;

    /// 第一个匹配元素
    fn select(&self, selector: &str) -> Option<ElementId> {
        self.select_all(selector).into_iter().next()
    }

    /// `textContent`
    fn text_content(&self, element: ElementId) -> Option<String>;

    /// `innerHTML`
    fn inner_html(&self, element: ElementId) -> Option<String>;

    /// 读取属性
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// 父元素
    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// 文档内偏移
    fn offset_box(&self, element: ElementId) -> Option<OffsetBox>;

    /// 视口宽度（`innerWidth`）
    fn viewport_width(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let mut ids = GeneratedIds::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_eq!(a, ElementId::Generated(0));
        assert_eq!(b, ElementId::Generated(1));
    }

    #[test]
    fn test_element_id_display() {
        assert_eq!(ElementId::Page(3).to_string(), "page#3");
        assert_eq!(ElementId::Generated(7).to_string(), "gen#7");
        assert_eq!(ElementId::Body.to_string(), "body");
    }
}
