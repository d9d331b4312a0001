//! Main update function - handles state transitions (TEA pattern)

use tracing::debug;

use crate::message::Message;
use crate::state::AppState;
use instancer_core::{AppPhase, Route};

use super::{account, catalog, challenge, gate, keys::handle_key, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        // Rendering reads the clock directly; nothing to advance
        Message::Tick => UpdateResult::none(),

        // ─────────────────────────────────────────────────────────
        // Routing
        // ─────────────────────────────────────────────────────────
        Message::Navigate(route) => handle_navigate(state, route),
        Message::EnterRoute => handle_enter_route(state),

        // ─────────────────────────────────────────────────────────
        // Challenge Loader / Deployment Controller
        // ─────────────────────────────────────────────────────────
        Message::LoadChallenge => challenge::load(state),
        Message::ChallengeLoaded { id, result } => {
            challenge::handle_challenge_loaded(state, id, result)
        }
        Message::DeploymentLoaded { id, result } => {
            challenge::handle_deployment_loaded(state, id, result)
        }
        Message::Control(action) => challenge::handle_control(state, action),
        Message::CaptchaSolved { id, action, token } => {
            challenge::handle_captcha_solved(state, id, action, token)
        }
        Message::CaptchaFailed { id, action, error } => {
            challenge::handle_captcha_failed(state, id, action, error)
        }
        Message::DeployCompleted { id, action, result } => {
            challenge::handle_deploy_completed(state, id, action, result)
        }
        Message::TerminateCompleted { id, result } => {
            challenge::handle_terminate_completed(state, id, result)
        }
        Message::CountdownTick { id, generation } => {
            challenge::handle_countdown_tick(state, id, generation)
        }

        // ─────────────────────────────────────────────────────────
        // Catalog
        // ─────────────────────────────────────────────────────────
        Message::FetchChallenges => catalog::fetch(state),
        Message::ChallengesLoaded { result } => catalog::handle_loaded(state, result),
        Message::CatalogCursor(delta) => catalog::handle_cursor(state, delta),
        Message::CatalogFocus(focus) => catalog::handle_focus(state, focus),
        Message::SidebarCursor(delta) => catalog::handle_sidebar_cursor(state, delta),
        Message::SidebarToggle => catalog::handle_sidebar_toggle(state),
        Message::SearchInput(c) => catalog::handle_search_input(state, c),
        Message::SearchBackspace => catalog::handle_search_backspace(state),
        Message::ResetFilter => catalog::handle_reset_filter(state),
        Message::OpenChallenge => catalog::handle_open(state),

        // ─────────────────────────────────────────────────────────
        // Account screens
        // ─────────────────────────────────────────────────────────
        Message::FormInput(c) => {
            match &state.route {
                Route::Login { .. } => state.login.push(c),
                Route::Register => state.register.push(c),
                Route::Profile => state.profile.push(c),
                _ => {}
            }
            UpdateResult::none()
        }
        Message::FormBackspace => {
            match &state.route {
                Route::Login { .. } => state.login.pop(),
                Route::Register => state.register.pop(),
                Route::Profile => state.profile.pop(),
                _ => {}
            }
            UpdateResult::none()
        }
        Message::FormNextField => {
            match &state.route {
                Route::Register => state.register.focus = state.register.focus.next(),
                Route::Profile => state.profile.focus = state.profile.focus.next(),
                _ => {}
            }
            UpdateResult::none()
        }
        Message::SessionValidated { result } => account::handle_session_validated(state, result),
        Message::PreviewLoginToken => account::handle_preview_request(state),
        Message::PreviewLoaded {
            login_token,
            result,
        } => account::handle_preview_loaded(state, login_token, result),
        Message::LoginSubmit => account::handle_login_submit(state),
        Message::LoginCompleted { result } => account::handle_login_completed(state, result),
        Message::RegisterSubmit => account::handle_register_submit(state),
        Message::RegisterCompleted { result } => account::handle_register_completed(state, result),
        Message::FetchProfile => account::fetch_profile(state),
        Message::ProfileLoaded { result } => account::handle_profile_loaded(state, result),
        Message::ProfileSubmit => account::handle_profile_submit(state),
        Message::ProfileUpdated { update, result } => {
            account::handle_profile_updated(state, update, result)
        }
        Message::Logout => account::handle_logout(state),
    }
}

/// Leave the current screen. Leaving a challenge unmounts its view, which
/// always stops the countdown interval.
fn handle_navigate(state: &mut AppState, route: Route) -> UpdateResult {
    debug!("Navigate {} -> {}", state.route, route);
    let leaving_challenge = state.challenge.take().is_some();
    state.route = route;
    state.status = None;

    if leaving_challenge {
        UpdateResult::action_then(UpdateAction::StopCountdown, Message::EnterRoute)
    } else {
        UpdateResult::message(Message::EnterRoute)
    }
}

fn handle_enter_route(state: &mut AppState) -> UpdateResult {
    if let Some(redirect) = gate::check(state, &state.route) {
        return UpdateResult::message(Message::Navigate(redirect));
    }

    match state.route.clone() {
        Route::Catalog => catalog::fetch(state),
        Route::Challenge { id } => challenge::enter(state, id),
        Route::Login { token, chall } => account::enter_login(state, token, chall),
        Route::Register => account::enter_register(state),
        Route::Profile => account::fetch_profile(state),
    }
}
