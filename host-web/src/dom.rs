//! # DOM 页面
//!
//! 用真实 DOM 实现 [`PageQuery`]，并维护 `ElementId` 与 DOM 元素的对应关系。
//!
//! ## ID 分配
//!
//! - 页面已有元素第一次被查到时分配 `Page(n)`，并写入 `data-fx-id="n"`，
//!   之后 IntersectionObserver 回调里拿到的元素可以据此反查
//! - Runtime 生成的元素在 `CreateElement` 时登记，不写属性
//! - `Body` / `Head` 每次直接从 document 取

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use fx_runtime::{ElementId, OffsetBox, PageQuery, ScrollMetrics};

use crate::error::{HostError, HostResult};

const ID_ATTRIBUTE: &str = "data-fx-id";

/// 浏览器中的页面
pub struct DomPage {
    window: Window,
    document: Document,
    elements: RefCell<HashMap<ElementId, Element>>,
    next_page_id: Cell<u32>,
}

impl DomPage {
    pub fn new() -> HostResult<Self> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        Ok(Self {
            window,
            document,
            elements: RefCell::new(HashMap::new()),
            next_page_id: Cell::new(0),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// 页面已有元素的 ID；第一次见到时分配
    pub fn id_of(&self, element: &Element) -> ElementId {
        if let Some(n) = element
            .get_attribute(ID_ATTRIBUTE)
            .and_then(|raw| raw.parse::<u32>().ok())
        {
            let id = ElementId::Page(n);
            self.elements
                .borrow_mut()
                .entry(id)
                .or_insert_with(|| element.clone());
            return id;
        }

        let n = self.next_page_id.get();
        self.next_page_id.set(n + 1);
        let id = ElementId::Page(n);
        if let Err(e) = element.set_attribute(ID_ATTRIBUTE, &n.to_string()) {
            warn!(element = %id, error = %HostError::from(e), "无法写入元素 ID");
        }
        self.elements.borrow_mut().insert(id, element.clone());
        id
    }

    /// 观察回调中反查元素 ID；未登记的元素返回 None
    pub fn lookup(&self, element: &Element) -> Option<ElementId> {
        let n = element.get_attribute(ID_ATTRIBUTE)?.parse::<u32>().ok()?;
        let id = ElementId::Page(n);
        self.elements.borrow().contains_key(&id).then_some(id)
    }

    /// 登记 Runtime 生成的元素
    pub fn insert_generated(&self, id: ElementId, element: Element) {
        self.elements.borrow_mut().insert(id, element);
    }

    pub fn forget(&self, id: ElementId) {
        self.elements.borrow_mut().remove(&id);
    }

    pub fn resolve(&self, id: ElementId) -> HostResult<Element> {
        let element = match id {
            ElementId::Body => self.document.body().map(Element::from),
            ElementId::Head => self.document.head().map(Element::from),
            ElementId::Page(_) | ElementId::Generated(_) => {
                self.elements.borrow().get(&id).cloned()
            }
        };
        element.ok_or(HostError::MissingElement(id))
    }

    pub fn resolve_html(&self, id: ElementId) -> HostResult<HtmlElement> {
        self.resolve(id)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| HostError::MissingElement(id))
    }

    /// 当前滚动位置与页面尺寸
    pub fn scroll_metrics(&self) -> ScrollMetrics {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        let document_height = self
            .document
            .document_element()
            .map(|root| f64::from(root.scroll_height()))
            .unwrap_or(0.0);
        ScrollMetrics::new(scroll_y, viewport_height, document_height)
    }
}

impl PageQuery for DomPage {
    fn select_all(&self, selector: &str) -> Vec<ElementId> {
        let nodes = match self.document.query_selector_all(selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(selector, error = %HostError::from(e), "选择器无效");
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.id_of(&element))
            .collect()
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.resolve(element).ok()?.text_content()
    }

    fn inner_html(&self, element: ElementId) -> Option<String> {
        self.resolve(element).ok().map(|e| e.inner_html())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.resolve(element).ok()?.get_attribute(name)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.resolve(element).ok()?.parent_element()?;
        Some(self.id_of(&parent))
    }

    fn offset_box(&self, element: ElementId) -> Option<OffsetBox> {
        let element = self.resolve_html(element).ok()?;
        Some(OffsetBox {
            top: f64::from(element.offset_top()),
            height: f64::from(element.offset_height()),
        })
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }
}
