//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas shared by every route
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title bar (app name, route, session indicator)
    pub header: Rect,

    /// Route content
    pub body: Rect,

    /// One-line status bar with key hints
    pub status: Rect,
}

/// Split the terminal into header, body and status bar
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header (glass container)
        Constraint::Min(3),    // Body
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        status: chunks[2],
    }
}

/// Catalog body: filter sidebar on the left, challenge list on the right.
///
/// The sidebar is dropped on narrow terminals.
pub fn catalog_columns(area: Rect) -> (Option<Rect>, Rect) {
    if area.width < 60 {
        return (None, area);
    }
    let sidebar_width = (area.width / 3).clamp(24, 36);
    let chunks = Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(20)])
        .split(area);
    (Some(chunks[0]), chunks[1])
}

/// Centered box for forms, capped to the available space
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
