//! Main render/view function (View in TEA pattern)


use instancer_app::catalog::CatalogState;
use instancer_app::AppState;
use instancer_core::{now_epoch, Route};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::theme::{palette, styles};
use crate::{layout, widgets};

/// Render the complete UI (View function in TEA)
///
/// Pure with respect to `state`; time-dependent pieces (port readiness,
/// catalog countdowns) are evaluated against the current clock.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::CARD_BG)),
        area,
    );

    let areas = layout::create(area);
    frame.render_widget(widgets::MainHeader::new(state), areas.header);

    let now = now_epoch();
    match &state.route {
        Route::Catalog => render_catalog(frame, areas.body, &state.catalog, now),
        Route::Challenge { .. } => match &state.challenge {
            Some(view) => frame.render_widget(widgets::ChallengePanel::new(view, now), areas.body),
            None => frame.render_widget(
                Paragraph::new(Span::styled("Loading challenge…", styles::text_muted())),
                areas.body,
            ),
        },
        Route::Login { .. } => frame.render_widget(
            widgets::LoginPanel::new(&state.login, &state.client),
            areas.body,
        ),
        Route::Register => {
            frame.render_widget(widgets::RegisterPanel::new(&state.register), areas.body)
        }
        Route::Profile => {
            frame.render_widget(widgets::ProfilePanel::new(&state.profile), areas.body)
        }
    }

    frame.render_widget(widgets::StatusBar::new(state), areas.status);
}

fn render_catalog(frame: &mut Frame, area: Rect, catalog: &CatalogState, now: i64) {
    let (sidebar, main) = layout::catalog_columns(area);
    if let Some(sidebar) = sidebar {
        frame.render_widget(widgets::FilterSidebar::new(catalog), sidebar);
    }

    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(main);
    frame.render_widget(widgets::SearchInput::new(catalog), chunks[0]);
    frame.render_widget(widgets::ChallengeList::new(catalog, now), chunks[1]);
}
