//! Catalog handlers

use tracing::{debug, warn};

use crate::catalog::CatalogFocus;
use crate::message::Message;
use crate::state::AppState;
use instancer_api::ApiResult;
use instancer_core::{now_epoch, ChallengeSummary, Route};

use super::{gate, Task, UpdateResult};

pub fn fetch(state: &mut AppState) -> UpdateResult {
    let token = match gate::require_session(state) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };
    state.catalog.loading = true;
    UpdateResult::task(Task::FetchChallenges { token })
}

pub fn handle_loaded(
    state: &mut AppState,
    result: ApiResult<Vec<ChallengeSummary>>,
) -> UpdateResult {
    state.catalog.loading = false;
    match result {
        Ok(items) => {
            debug!("Catalog loaded: {} challenges", items.len());
            state.catalog.set_items(items, now_epoch());
            state.status = None;
            UpdateResult::none()
        }
        Err(e) if e.is_transport() => {
            warn!("Failed to load catalog: {}", e);
            state.status = Some("Could not load challenges. Press r to retry.".to_string());
            UpdateResult::none()
        }
        Err(e) => {
            warn!("Catalog fetch rejected: {}", e);
            gate::session_rejected(state)
        }
    }
}

pub fn handle_open(state: &mut AppState) -> UpdateResult {
    match state.catalog.selected(now_epoch()) {
        Some(summary) => UpdateResult::message(Message::Navigate(Route::challenge(
            summary.challenge_info.id.clone(),
        ))),
        None => UpdateResult::none(),
    }
}

pub fn handle_cursor(state: &mut AppState, delta: isize) -> UpdateResult {
    state.catalog.move_cursor(delta, now_epoch());
    UpdateResult::none()
}

pub fn handle_focus(state: &mut AppState, focus: CatalogFocus) -> UpdateResult {
    state.catalog.focus = focus;
    UpdateResult::none()
}

pub fn handle_sidebar_cursor(state: &mut AppState, delta: isize) -> UpdateResult {
    state.catalog.move_sidebar_cursor(delta);
    UpdateResult::none()
}

pub fn handle_sidebar_toggle(state: &mut AppState) -> UpdateResult {
    state.catalog.toggle_sidebar_entry(now_epoch());
    UpdateResult::none()
}

pub fn handle_search_input(state: &mut AppState, c: char) -> UpdateResult {
    state.catalog.push_search(c, now_epoch());
    UpdateResult::none()
}

pub fn handle_search_backspace(state: &mut AppState) -> UpdateResult {
    state.catalog.pop_search(now_epoch());
    UpdateResult::none()
}

pub fn handle_reset_filter(state: &mut AppState) -> UpdateResult {
    state.catalog.reset_filter(now_epoch());
    UpdateResult::none()
}
