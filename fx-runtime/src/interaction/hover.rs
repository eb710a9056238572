//! # 悬停效果
//!
//! 对比表格行放大、卡片随指针倾斜。

use std::collections::HashSet;

use crate::command::{Command, DomEvent};
use crate::config::FxConfig;
use crate::element::{ElementId, PageQuery, Rect};

const ROW_ENTER: &str = "scale(1.01)";
const ROW_LEAVE: &str = "scale(1)";
const TILT_RESET: &str = "perspective(1000px) rotateX(0) rotateY(0) translateY(0)";

/// 指针在卡片内的位置对应的倾斜变换
///
/// 以卡片中心为原点，每 20px 偏移对应 1deg。
pub fn tilt_transform(client_x: f64, client_y: f64, rect: &Rect) -> String {
    let x = client_x - rect.left;
    let y = client_y - rect.top;
    let rotate_x = (y - rect.height / 2.0) / 20.0;
    let rotate_y = (rect.width / 2.0 - x) / 20.0;
    format!(
        "perspective(1000px) rotateX({rotate_x}deg) rotateY({rotate_y}deg) translateY(-8px)"
    )
}

/// 悬停效果
#[derive(Debug, Default)]
pub struct HoverEffects {
    rows: HashSet<ElementId>,
    cards: HashSet<ElementId>,
}

impl HoverEffects {
    pub fn discover(page: &dyn PageQuery, config: &FxConfig) -> (Self, Vec<Command>) {
        let rows = page.select_all(&config.selectors.table_rows);
        let cards = page.select_all(&config.selectors.tilt_cards);

        let mut commands = Vec::new();
        for &target in &rows {
            for event in [DomEvent::PointerEnter, DomEvent::PointerLeave] {
                commands.push(Command::Listen { target, event });
            }
        }
        for &target in &cards {
            for event in [DomEvent::PointerMove, DomEvent::PointerLeave] {
                commands.push(Command::Listen { target, event });
            }
        }

        let effects = Self {
            rows: rows.into_iter().collect(),
            cards: cards.into_iter().collect(),
        };
        (effects, commands)
    }

    pub fn on_pointer_enter(&self, target: ElementId) -> Vec<Command> {
        if self.rows.contains(&target) {
            vec![Command::set_style(target, "transform", ROW_ENTER)]
        } else {
            Vec::new()
        }
    }

    pub fn on_pointer_leave(&self, target: ElementId) -> Vec<Command> {
        let mut commands = Vec::new();
        if self.rows.contains(&target) {
            commands.push(Command::set_style(target, "transform", ROW_LEAVE));
        }
        if self.cards.contains(&target) {
            commands.push(Command::set_style(target, "transform", TILT_RESET));
        }
        commands
    }

    pub fn on_pointer_move(
        &self,
        target: ElementId,
        client_x: f64,
        client_y: f64,
        rect: &Rect,
    ) -> Vec<Command> {
        if self.cards.contains(&target) {
            vec![Command::set_style(
                target,
                "transform",
                tilt_transform(client_x, client_y, rect),
            )]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    #[test]
    fn test_tilt_at_center_is_flat() {
        let rect = Rect::new(100.0, 50.0, 200.0, 100.0);
        assert_eq!(
            tilt_transform(200.0, 100.0, &rect),
            "perspective(1000px) rotateX(0deg) rotateY(0deg) translateY(-8px)"
        );
    }

    #[test]
    fn test_tilt_at_corner() {
        // 左上角：y 在中心上方 50px，x 在中心左侧 100px
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(
            tilt_transform(0.0, 0.0, &rect),
            "perspective(1000px) rotateX(-2.5deg) rotateY(5deg) translateY(-8px)"
        );
    }

    #[test]
    fn test_row_and_card_hover() {
        let mut page = FakePage::new();
        let row = page.add(&[".comparison-table tbody tr"]);
        let card = page.add(&[".model-card, .infra-card, .quant-card"]);
        let (hover, commands) = HoverEffects::discover(&page, &FxConfig::default());
        page.apply(&commands);
        assert!(page.listeners.contains(&(row, DomEvent::PointerEnter)));
        assert!(page.listeners.contains(&(card, DomEvent::PointerMove)));

        page.apply(&hover.on_pointer_enter(row));
        assert_eq!(page.style(row, "transform"), Some(ROW_ENTER));
        page.apply(&hover.on_pointer_leave(row));
        assert_eq!(page.style(row, "transform"), Some(ROW_LEAVE));

        page.apply(&hover.on_pointer_move(card, 10.0, 10.0, &Rect::new(0.0, 0.0, 20.0, 20.0)));
        let tilt = page.style(card, "transform").unwrap_or_default();
        assert!(tilt.ends_with("translateY(-8px)"));
        page.apply(&hover.on_pointer_leave(card));
        assert_eq!(page.style(card, "transform"), Some(TILT_RESET));

        // 卡片没有进入效果，行没有倾斜
        assert!(hover.on_pointer_enter(card).is_empty());
        assert!(hover.on_pointer_move(row, 0.0, 0.0, &Rect::default()).is_empty());
    }
}
