//! Status bar widget
//!
//! Key hints for the current screen, the latest status message, and when the
//! catalog was last refreshed.

use instancer_app::catalog::CatalogFocus;
use instancer_app::AppState;
use instancer_core::Route;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

/// One-line footer
pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// `(key, description)` pairs for the current screen
    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match &self.state.route {
            Route::Catalog => match self.state.catalog.focus {
                CatalogFocus::List => &[
                    ("enter", "open"),
                    ("/", "search"),
                    ("f", "filter"),
                    ("r", "refresh"),
                    ("p", "profile"),
                    ("q", "quit"),
                ],
                CatalogFocus::Sidebar => &[("space", "toggle"), ("esc", "back"), ("q", "quit")],
                CatalogFocus::Search => &[("enter", "done"), ("esc", "done")],
            },
            Route::Challenge { .. } => &[
                ("d", "deploy"),
                ("e", "extend"),
                ("t", "terminate"),
                ("r", "reload"),
                ("esc", "back"),
            ],
            Route::Login { .. } => &[
                ("enter", "login"),
                ("^p", "preview"),
                ("^r", "register"),
                ("esc", "quit"),
            ],
            Route::Register => &[("enter", "register"), ("tab", "next field"), ("esc", "back")],
            Route::Profile => &[
                ("enter", "save"),
                ("tab", "next field"),
                ("^l", "logout"),
                ("esc", "back"),
            ],
        }
    }

    fn last_refreshed(&self) -> Option<Span<'static>> {
        if self.state.route != Route::Catalog {
            return None;
        }
        self.state.catalog.last_refreshed.map(|at| {
            Span::styled(
                format!("updated {}", at.format("%H:%M:%S")),
                styles::text_muted(),
            )
        })
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut spans = vec![Span::raw(" ")];
        if let Some(status) = &self.state.status {
            spans.push(Span::styled(status.clone(), styles::status_yellow()));
            spans.push(Span::styled(" │ ", styles::text_muted()));
        }
        for (i, (key, desc)) in self.hints().iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, styles::keybinding()));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(*desc, styles::text_secondary()));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);

        if let Some(refreshed) = self.last_refreshed() {
            let line = Line::from(vec![refreshed, Span::raw(" ")]);
            let width = line.width() as u16;
            if width < area.width / 3 {
                let right = Rect {
                    x: area.x + area.width - width,
                    y: area.y,
                    width,
                    height: 1,
                };
                Paragraph::new(line).render(right, buf);
            }
        }
    }
}
