//! Header bar widget
//!
//! App title, current screen, and the session indicator.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use instancer_app::AppState;
use instancer_core::Route;

use crate::theme::{palette, styles};

/// Main header showing the app title, screen name and session state
pub struct MainHeader<'a> {
    state: &'a AppState,
}

impl<'a> MainHeader<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn screen_title(&self) -> String {
        match &self.state.route {
            Route::Catalog => "Challenges".to_string(),
            Route::Challenge { id } => match self.state.challenge.as_ref().and_then(|v| v.info()) {
                Some(info) => info.name.clone(),
                None => id.clone(),
            },
            Route::Login { .. } => "Login".to_string(),
            Route::Register => "Register".to_string(),
            Route::Profile => "Profile".to_string(),
        }
    }

    fn session_indicator(&self) -> Span<'static> {
        if self.state.session.is_some() {
            Span::styled("● signed in", styles::status_green())
        } else {
            Span::styled("○ signed out", styles::text_muted())
        }
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let left = Line::from(vec![
            Span::raw(" "),
            Span::styled("Instancer", styles::accent_bold()),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(self.screen_title(), styles::text_secondary()),
        ]);
        let right = Line::from(vec![self.session_indicator(), Span::raw(" ")]);

        let right_width = right.width() as u16;
        let left_width = left.width() as u16;

        Paragraph::new(left).render(inner, buf);

        // Session indicator right-aligned, only when it fits beside the title
        if left_width + right_width + 1 <= inner.width {
            let right_area = Rect {
                x: inner.x + inner.width - right_width,
                y: inner.y,
                width: right_width,
                height: 1,
            };
            Paragraph::new(right).render(right_area, buf);
        }
    }
}
