//! # Command Executor 模块
//!
//! 把 Runtime 发出的 `Command` 翻译成 DOM 操作。
//!
//! ## 设计说明
//!
//! - 可见度观察：每个阈值一个 `IntersectionObserver`；同一元素可以同时挂在多个观察器上
//! - 事件监听：为元素注册后终身有效（闭包 `forget`）
//! - 定时器：一次性用 `setTimeout`，周期用 `setInterval`；周期闭包在取消后
//!   放入 `retired`，下一次分发开始时才释放（取消可能发生在它自己的回调里）
//! - 剪贴板：异步写入，完成后以 `ClipboardWritten` 回到 Runtime
//!
//! 单条指令失败只记录警告，不影响后续指令。

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::Weak;
use std::time::Duration;

use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use fx_runtime::{
    Command, DomEvent, ElementId, ElementSpec, PageInput, Rect, TimerId, VisibilityEntry,
};

use crate::app::{HostState, dispatch};
use crate::dom::DomPage;
use crate::error::{HostError, HostResult};

/// 一个阈值对应的观察器
struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl Observer {
    fn new(threshold: f64, host: Weak<RefCell<HostState>>) -> HostResult<Self> {
        let callback = Closure::<dyn FnMut(_, _)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                dispatch(&host, None, |page| {
                    let entries: Vec<VisibilityEntry> = entries
                        .iter()
                        .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                        .filter_map(|entry| {
                            Some(VisibilityEntry {
                                target: page.lookup(&entry.target())?,
                                intersection_ratio: entry.intersection_ratio(),
                                is_intersecting: entry.is_intersecting(),
                            })
                        })
                        .collect();
                    (!entries.is_empty()).then_some(PageInput::Visibility { entries })
                });
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

struct Interval {
    handle: i32,
    callback: Closure<dyn FnMut()>,
}

/// Command 执行器
pub struct CommandExecutor {
    host: Weak<RefCell<HostState>>,
    /// 阈值（`f64::to_bits`）→ 观察器
    observers: HashMap<u64, Observer>,
    timeouts: HashMap<TimerId, i32>,
    intervals: HashMap<TimerId, Interval>,
    retired: Vec<Closure<dyn FnMut()>>,
}

impl CommandExecutor {
    pub fn new(host: Weak<RefCell<HostState>>) -> Self {
        Self {
            host,
            observers: HashMap::new(),
            timeouts: HashMap::new(),
            intervals: HashMap::new(),
            retired: Vec::new(),
        }
    }

    /// 释放已取消的周期定时器闭包
    pub fn collect_garbage(&mut self) {
        self.retired.clear();
    }

    /// 一次性定时器到期后出表
    pub fn timer_fired(&mut self, timer: TimerId) {
        self.timeouts.remove(&timer);
    }

    /// 依次执行指令
    ///
    /// `trigger` 是触发本次分发的浏览器事件，`PreventDefault` 作用于它。
    pub fn apply(&mut self, commands: Vec<Command>, page: &DomPage, trigger: Option<&Event>) {
        for command in commands {
            if let Err(e) = self.execute(&command, page, trigger) {
                warn!(error = %e, command = ?command, "指令执行失败");
            }
        }
    }

    fn execute(
        &mut self,
        command: &Command,
        page: &DomPage,
        trigger: Option<&Event>,
    ) -> HostResult<()> {
        match command {
            Command::Observe { target, threshold } => self.observe(page, *target, *threshold)?,
            Command::Unobserve { target, threshold } => self.unobserve(page, *target, *threshold),
            Command::Listen { target, event } => self.listen(page, *target, *event)?,
            Command::AddClass { target, class } => {
                page.resolve(*target)?.class_list().add_1(class)?;
            }
            Command::RemoveClass { target, class } => {
                page.resolve(*target)?.class_list().remove_1(class)?;
            }
            Command::SetText { target, text } => {
                page.resolve(*target)?.set_text_content(Some(text));
            }
            Command::SetInnerHtml { target, html } => {
                page.resolve(*target)?.set_inner_html(html);
            }
            Command::SetStyle {
                target,
                property,
                value,
            } => {
                page.resolve_html(*target)?
                    .style()
                    .set_property(property, value)?;
            }
            Command::CreateElement { id, parent, spec } => {
                self.create_element(page, *id, *parent, spec)?;
            }
            Command::RemoveElement { target } => {
                page.resolve(*target)?.remove();
                page.forget(*target);
            }
            Command::ScrollIntoView { target } => {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(ScrollLogicalPosition::Start);
                page.resolve(*target)?
                    .scroll_into_view_with_scroll_into_view_options(&options);
            }
            Command::PreventDefault => match trigger {
                Some(event) => event.prevent_default(),
                None => debug!("PreventDefault 没有对应的事件"),
            },
            Command::WriteClipboard { text } => self.write_clipboard(page, text),
            Command::StartTimer {
                timer,
                delay,
                repeat,
            } => self.start_timer(page, *timer, *delay, *repeat)?,
            Command::CancelTimer { timer } => self.cancel_timer(page, *timer),
        }
        Ok(())
    }

    fn observe(&mut self, page: &DomPage, target: ElementId, threshold: f64) -> HostResult<()> {
        let element = page.resolve(target)?;
        let key = threshold.to_bits();
        let observer = match self.observers.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Observer::new(threshold, self.host.clone())?),
        };
        observer.observer.observe(&element);
        Ok(())
    }

    fn unobserve(&self, page: &DomPage, target: ElementId, threshold: f64) {
        if let Some(observer) = self.observers.get(&threshold.to_bits())
            && let Ok(element) = page.resolve(target)
        {
            observer.observer.unobserve(&element);
        }
    }

    fn listen(&mut self, page: &DomPage, target: ElementId, event: DomEvent) -> HostResult<()> {
        let element = page.resolve(target)?;
        let host = self.host.clone();
        let source = element.clone();
        let callback = Closure::<dyn FnMut(_)>::new(move |ev: Event| {
            dispatch(&host, Some(&ev), |_| {
                let input = match event {
                    DomEvent::Click => PageInput::Click { target },
                    DomEvent::PointerEnter => PageInput::PointerEnter { target },
                    DomEvent::PointerLeave => PageInput::PointerLeave { target },
                    DomEvent::PointerMove => {
                        let mouse = ev.dyn_ref::<MouseEvent>()?;
                        let rect = source.get_bounding_client_rect();
                        PageInput::PointerMove {
                            target,
                            client_x: f64::from(mouse.client_x()),
                            client_y: f64::from(mouse.client_y()),
                            rect: Rect::new(rect.left(), rect.top(), rect.width(), rect.height()),
                        }
                    }
                };
                Some(input)
            });
        });
        element.add_event_listener_with_callback(event.name(), callback.as_ref().unchecked_ref())?;
        callback.forget();
        Ok(())
    }

    fn create_element(
        &mut self,
        page: &DomPage,
        id: ElementId,
        parent: ElementId,
        spec: &ElementSpec,
    ) -> HostResult<()> {
        let element = page.document().create_element(&spec.tag)?;
        if let Some(class) = &spec.class {
            element.set_class_name(class);
        }
        if let Some(css) = &spec.css_text
            && let Some(html) = element.dyn_ref::<HtmlElement>()
        {
            html.style().set_css_text(css);
        }
        if let Some(text) = &spec.text {
            element.set_text_content(Some(text));
        }
        page.resolve(parent)?.append_child(&element)?;
        page.insert_generated(id, element);
        Ok(())
    }

    fn write_clipboard(&mut self, page: &DomPage, text: &str) {
        let promise = page.window().navigator().clipboard().write_text(text);
        let host = self.host.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let ok = match JsFuture::from(promise).await {
                Ok(_) => true,
                Err(e) => {
                    warn!(error = %HostError::from(e), "写入剪贴板失败");
                    false
                }
            };
            dispatch(&host, None, |_| Some(PageInput::ClipboardWritten { ok }));
        });
    }

    fn start_timer(
        &mut self,
        page: &DomPage,
        timer: TimerId,
        delay: Duration,
        repeat: bool,
    ) -> HostResult<()> {
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let host = self.host.clone();
        let window = page.window();

        if repeat {
            let callback = Closure::<dyn FnMut()>::new(move || {
                dispatch(&host, None, |_| Some(PageInput::timer(timer)));
            });
            let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            )?;
            self.intervals.insert(timer, Interval { handle, callback });
        } else {
            let callback = Closure::once_into_js(move || {
                dispatch(&host, None, |_| Some(PageInput::timer(timer)));
            });
            let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis,
            )?;
            self.timeouts.insert(timer, handle);
        }
        Ok(())
    }

    fn cancel_timer(&mut self, page: &DomPage, timer: TimerId) {
        if let Some(handle) = self.timeouts.remove(&timer) {
            page.window().clear_timeout_with_handle(handle);
        }
        if let Some(interval) = self.intervals.remove(&timer) {
            page.window().clear_interval_with_handle(interval.handle);
            self.retired.push(interval.callback);
        }
    }

    /// 仍在运行的定时器数量
    pub fn active_timers(&self) -> usize {
        self.timeouts.len() + self.intervals.len()
    }
}
