//! Mapping between percent coordinates on the play area and terminal cells.

use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthStr;

use crate::layout::{Target, TargetId};
use crate::snapshot::Snapshot;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u16 = 2;

/// Largest visually-square board that fits in `area`, centered
pub fn board_rect(area: Rect) -> Rect {
    let width = area.width.min(area.height.saturating_mul(CELL_ASPECT));
    let height = (width / CELL_ASPECT).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Board without its border
pub fn inner(board: Rect) -> Rect {
    Rect {
        x: board.x.saturating_add(1),
        y: board.y.saturating_add(1),
        width: board.width.saturating_sub(2),
        height: board.height.saturating_sub(2),
    }
}

pub fn label(id: TargetId) -> String {
    format!("[{id}]")
}

/// Cell a target's center falls on
pub fn anchor(inner: Rect, target: &Target) -> Position {
    let col = (target.x / 100.0 * f64::from(inner.width)) as u16;
    let row = (target.y / 100.0 * f64::from(inner.height)) as u16;
    Position {
        x: inner.x + col.min(inner.width.saturating_sub(1)),
        y: inner.y + row.min(inner.height.saturating_sub(1)),
    }
}

/// One-row rect holding `text` centered on `pos`, kept inside `inner`
pub fn centered_span(inner: Rect, pos: Position, text: &str) -> Rect {
    let width = (text.width() as u16).min(inner.width);
    let max_x = inner.x + inner.width - width;
    let x = pos.x.saturating_sub(width / 2).clamp(inner.x, max_x);
    Rect {
        x,
        y: pos.y,
        width,
        height: 1,
    }
}

pub fn label_rect(inner: Rect, target: &Target) -> Rect {
    centered_span(inner, anchor(inner, target), &label(target.id))
}

/// Visible target whose label covers the cell, preferring the one drawn last
pub fn target_at(board: Rect, snapshot: &Snapshot<'_>, col: u16, row: u16) -> Option<TargetId> {
    let inner = inner(board);
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    let pos = Position { x: col, y: row };
    snapshot
        .targets
        .iter()
        .rev()
        .filter(|t| snapshot.is_visible(t.id))
        .find(|t| label_rect(inner, t).contains(pos))
        .map(|t| t.id)
}
