//! 测试用假页面：实现 `PageQuery`，并能把 `Command` 回放到内存中的元素上。

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use crate::command::{Command, DomEvent, ElementSpec};
use crate::element::{ElementId, OffsetBox, PageQuery};
use crate::timer::TimerId;

#[derive(Debug, Default, Clone)]
pub struct FakeElement {
    pub text: String,
    pub html: String,
    pub attributes: HashMap<String, String>,
    pub classes: BTreeSet<String>,
    pub styles: BTreeMap<String, String>,
    pub parent: Option<ElementId>,
    pub offset: Option<OffsetBox>,
    pub spec: Option<ElementSpec>,
    pub removed: bool,
}

#[derive(Debug)]
pub struct FakePage {
    elements: BTreeMap<ElementId, FakeElement>,
    selectors: HashMap<String, Vec<ElementId>>,
    next_page_id: u32,
    pub viewport_width: f64,
    /// 元素 → 正在观察的阈值（按注册顺序）
    pub observed: BTreeMap<ElementId, Vec<f64>>,
    pub listeners: BTreeSet<(ElementId, DomEvent)>,
    pub timers: BTreeMap<TimerId, (Duration, bool)>,
    pub clipboard_writes: Vec<String>,
    pub scrolled_to: Vec<ElementId>,
    pub prevented: usize,
}

impl FakePage {
    pub fn new() -> Self {
        let mut elements = BTreeMap::new();
        elements.insert(ElementId::Body, FakeElement::default());
        elements.insert(ElementId::Head, FakeElement::default());
        Self {
            elements,
            selectors: HashMap::new(),
            next_page_id: 0,
            viewport_width: 1280.0,
            observed: BTreeMap::new(),
            listeners: BTreeSet::new(),
            timers: BTreeMap::new(),
            clipboard_writes: Vec::new(),
            scrolled_to: Vec::new(),
            prevented: 0,
        }
    }

    /// 添加一个能被 `selectors` 中任意选择器查到的元素
    pub fn add(&mut self, selectors: &[&str]) -> ElementId {
        let id = ElementId::Page(self.next_page_id);
        self.next_page_id += 1;
        self.elements.insert(id, FakeElement::default());
        for selector in selectors {
            self.selectors
                .entry((*selector).to_string())
                .or_default()
                .push(id);
        }
        id
    }

    fn element_mut(&mut self, id: ElementId) -> &mut FakeElement {
        self.elements.entry(id).or_default()
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        let el = self.element_mut(id);
        el.text = text.to_string();
        el.html = text.to_string();
    }

    pub fn set_html(&mut self, id: ElementId, html: &str) {
        let el = self.element_mut(id);
        el.html = html.to_string();
        el.text = html.to_string();
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        self.element_mut(id)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_parent(&mut self, id: ElementId, parent: ElementId) {
        self.element_mut(id).parent = Some(parent);
    }

    pub fn set_offset(&mut self, id: ElementId, top: f64, height: f64) {
        self.element_mut(id).offset = Some(OffsetBox { top, height });
    }

    pub fn element(&self, id: ElementId) -> Option<&FakeElement> {
        self.elements.get(&id)
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.elements.get(&id).map(|e| e.text.as_str()).unwrap_or("")
    }

    pub fn html(&self, id: ElementId) -> &str {
        self.elements.get(&id).map(|e| e.html.as_str()).unwrap_or("")
    }

    pub fn thresholds(&self, id: ElementId) -> Vec<f64> {
        self.observed.get(&id).cloned().unwrap_or_default()
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(&id)
            .is_some_and(|e| e.classes.contains(class))
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.elements
            .get(&id)
            .and_then(|e| e.styles.get(property))
            .map(String::as_str)
    }

    /// 指定父元素下仍在页面上的生成元素
    pub fn children_of(&self, parent: ElementId) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|(_, e)| e.parent == Some(parent) && e.spec.is_some() && !e.removed)
            .map(|(id, _)| *id)
            .collect()
    }

    /// 把指令回放到假页面
    pub fn apply(&mut self, commands: &[Command]) {
        for command in commands {
            match command {
                Command::Observe { target, threshold } => {
                    self.observed.entry(*target).or_default().push(*threshold);
                }
                Command::Unobserve { target, threshold } => {
                    if let Some(thresholds) = self.observed.get_mut(target) {
                        thresholds.retain(|t| t != threshold);
                        if thresholds.is_empty() {
                            self.observed.remove(target);
                        }
                    }
                }
                Command::Listen { target, event } => {
                    self.listeners.insert((*target, *event));
                }
                Command::AddClass { target, class } => {
                    self.element_mut(*target).classes.insert(class.clone());
                }
                Command::RemoveClass { target, class } => {
                    self.element_mut(*target).classes.remove(class);
                }
                Command::SetText { target, text } => self.set_text(*target, text),
                Command::SetInnerHtml { target, html } => self.set_html(*target, html),
                Command::SetStyle {
                    target,
                    property,
                    value,
                } => {
                    self.element_mut(*target)
                        .styles
                        .insert(property.clone(), value.clone());
                }
                Command::CreateElement { id, parent, spec } => {
                    let el = self.element_mut(*id);
                    el.parent = Some(*parent);
                    el.text = spec.text.clone().unwrap_or_default();
                    el.html = el.text.clone();
                    if let Some(class) = &spec.class {
                        el.classes.insert(class.clone());
                    }
                    el.spec = Some(spec.clone());
                }
                Command::RemoveElement { target } => {
                    self.element_mut(*target).removed = true;
                }
                Command::ScrollIntoView { target } => self.scrolled_to.push(*target),
                Command::PreventDefault => self.prevented += 1,
                Command::WriteClipboard { text } => self.clipboard_writes.push(text.clone()),
                Command::StartTimer {
                    timer,
                    delay,
                    repeat,
                } => {
                    self.timers.insert(*timer, (*delay, *repeat));
                }
                Command::CancelTimer { timer } => {
                    self.timers.remove(timer);
                }
            }
        }
    }
}

impl PageQuery for FakePage {
    fn select_all(&self, selector: &str) -> Vec<ElementId> {
        self.selectors
            .get(selector)
            .map(|ids| {
                ids.iter()
                    .copied()
                    .filter(|id| self.elements.get(id).is_some_and(|e| !e.removed))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.elements.get(&element).map(|e| e.text.clone())
    }

    fn inner_html(&self, element: ElementId) -> Option<String> {
        self.elements.get(&element).map(|e| e.html.clone())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.elements
            .get(&element)
            .and_then(|e| e.attributes.get(name).cloned())
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.elements.get(&element).and_then(|e| e.parent)
    }

    fn offset_box(&self, element: ElementId) -> Option<OffsetBox> {
        self.elements.get(&element).and_then(|e| e.offset)
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }
}
