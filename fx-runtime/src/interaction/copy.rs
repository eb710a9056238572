//! # 复制按钮
//!
//! 在代码预览块旁生成 `Copy` 按钮，点击后把代码文本写入剪贴板。
//!
//! 剪贴板写入是异步的：Runtime 发出 `WriteClipboard`，Host 完成后以
//! `PageInput::ClipboardWritten` 回报结果，再由 [`CopyButton::on_clipboard_result`] 更新文案。

use std::time::Duration;
use tracing::{debug, warn};

use crate::command::{Command, DomEvent, ElementSpec};
use crate::config::{CopySettings, FxConfig};
use crate::element::{ElementId, GeneratedIds, PageQuery};
use crate::timer::{TimerId, TimerTable, TimerTask};

const BUTTON_CSS: &str = "
    position: absolute;
    top: 60px;
    right: 16px;
    padding: 6px 12px;
    background: rgba(147, 197, 253, 0.2);
    border: 1px solid rgba(147, 197, 253, 0.3);
    border-radius: 6px;
    color: #93c5fd;
    font-size: 0.75rem;
    cursor: pointer;
    transition: all 0.3s ease;
";
const HOVER_BACKGROUND: &str = "rgba(147, 197, 253, 0.3)";
const IDLE_BACKGROUND: &str = "rgba(147, 197, 253, 0.2)";

/// 复制按钮
#[derive(Debug)]
pub struct CopyButton {
    button: ElementId,
    code: Option<ElementId>,
    reset_timer: Option<TimerId>,
    settings: CopySettings,
}

impl CopyButton {
    /// 页面没有代码块，或代码块没有父元素时返回 None
    pub fn discover(
        page: &dyn PageQuery,
        config: &FxConfig,
        ids: &mut GeneratedIds,
    ) -> Option<(Self, Vec<Command>)> {
        let Some(block) = page.select(&config.selectors.code_block) else {
            debug!("页面没有代码块，跳过复制按钮");
            return None;
        };
        let Some(container) = page.parent(block) else {
            debug!(block = %block, "代码块没有父元素，跳过复制按钮");
            return None;
        };

        let button = ids.allocate();
        let commands = vec![
            Command::set_style(container, "position", "relative"),
            Command::CreateElement {
                id: button,
                parent: container,
                spec: ElementSpec::new("button")
                    .class("copy-btn")
                    .css(BUTTON_CSS)
                    .text(config.copy.label.clone()),
            },
            Command::Listen {
                target: button,
                event: DomEvent::Click,
            },
            Command::Listen {
                target: button,
                event: DomEvent::PointerEnter,
            },
            Command::Listen {
                target: button,
                event: DomEvent::PointerLeave,
            },
        ];

        let copy = Self {
            button,
            code: page.select(&config.selectors.code),
            reset_timer: None,
            settings: config.copy.clone(),
        };
        Some((copy, commands))
    }

    pub fn button(&self) -> ElementId {
        self.button
    }

    pub fn on_pointer_enter(&self, target: ElementId) -> Vec<Command> {
        if target == self.button {
            vec![Command::set_style(target, "background", HOVER_BACKGROUND)]
        } else {
            Vec::new()
        }
    }

    pub fn on_pointer_leave(&self, target: ElementId) -> Vec<Command> {
        if target == self.button {
            vec![Command::set_style(target, "background", IDLE_BACKGROUND)]
        } else {
            Vec::new()
        }
    }

    /// 点击时读取代码块的当前文本
    pub fn on_click(&self, target: ElementId, page: &dyn PageQuery) -> Vec<Command> {
        if target != self.button {
            return Vec::new();
        }
        let text = self
            .code
            .and_then(|code| page.text_content(code))
            .unwrap_or_default();
        vec![Command::WriteClipboard { text }]
    }

    /// 剪贴板写入结果
    ///
    /// 成功后显示已复制并在 `reset_ms` 后复位；连续成功时只保留最后一次的复位定时器。
    pub fn on_clipboard_result(&mut self, ok: bool, timers: &mut TimerTable) -> Vec<Command> {
        let mut commands = Vec::new();
        if let Some(previous) = self.reset_timer.take() {
            commands.extend(timers.cancel(previous));
        }

        if ok {
            commands.push(Command::set_text(
                self.button,
                self.settings.copied_label.clone(),
            ));
            let (timer, start) = timers.after(
                TimerTask::CopyLabelReset,
                Duration::from_millis(self.settings.reset_ms),
            );
            self.reset_timer = Some(timer);
            commands.push(start);
        } else {
            warn!("写入剪贴板失败");
            commands.push(Command::set_text(
                self.button,
                self.settings.failed_label.clone(),
            ));
        }
        commands
    }

    pub fn on_reset(&mut self) -> Vec<Command> {
        self.reset_timer = None;
        vec![Command::set_text(self.button, self.settings.label.clone())]
    }
}
