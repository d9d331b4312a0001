//! Login, registration and profile handlers

use tracing::{debug, info, warn};

use crate::account::{LoginForm, ProfileState, RegisterForm};
use crate::challenge_view::MSG_GENERIC;
use crate::message::Message;
use crate::state::AppState;
use instancer_api::{ApiError, ApiResult};
use instancer_core::{login_redirect, post_login_route, Profile, ProfileUpdate, Route};

use super::{gate, Task, UpdateAction, UpdateResult};

const MSG_INVALID_LOGIN_TOKEN: &str = "This login token is not valid.";

/// Server-provided explanation for a refused form, or the generic message
fn form_error(e: &ApiError) -> String {
    match e {
        ApiError::Rejected { msg, .. } if !msg.is_empty() => msg.clone(),
        _ => MSG_GENERIC.to_string(),
    }
}

// ─────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────

pub fn enter_login(
    state: &mut AppState,
    token: Option<String>,
    chall: Option<String>,
) -> UpdateResult {
    if let Some(token) = &token {
        state.login_token_hint = Some(token.clone());
    }
    state.login = LoginForm::new(token, chall);

    match state.session.clone() {
        Some(session) => {
            state.login.validating_session = true;
            UpdateResult::task(Task::ValidateSession { token: session })
        }
        None => UpdateResult::message(Message::PreviewLoginToken),
    }
}

pub fn handle_session_validated(state: &mut AppState, result: ApiResult<Profile>) -> UpdateResult {
    state.login.validating_session = false;
    match result {
        Ok(_) => {
            info!("Stored session is valid, skipping login");
            UpdateResult::message(Message::Navigate(post_login_route(
                state.login.chall.as_deref(),
            )))
        }
        Err(e) if e.is_auth_failure() => {
            debug!("Stored session rejected: {}", e);
            state.session = None;
            UpdateResult::action_then(UpdateAction::ForgetSession, Message::PreviewLoginToken)
        }
        Err(e) => {
            warn!("Could not validate stored session: {}", e);
            UpdateResult::message(Message::PreviewLoginToken)
        }
    }
}

pub fn handle_preview_request(state: &mut AppState) -> UpdateResult {
    match state.login.login_token() {
        Ok(login_token) => UpdateResult::task(Task::Preview {
            login_token: login_token.to_string(),
        }),
        Err(_) => UpdateResult::none(),
    }
}

pub fn handle_preview_loaded(
    state: &mut AppState,
    login_token: String,
    result: ApiResult<String>,
) -> UpdateResult {
    // The token was edited since the preview was requested
    if state.login.login_token().ok() != Some(login_token.as_str()) {
        return UpdateResult::none();
    }
    match result {
        Ok(team_name) => state.login.preview = Some(team_name),
        Err(e) if e.is_transport() => warn!("Login token preview failed: {}", e),
        Err(_) => state.login.error = Some(MSG_INVALID_LOGIN_TOKEN.to_string()),
    }
    UpdateResult::none()
}

pub fn handle_login_submit(state: &mut AppState) -> UpdateResult {
    if state.login.submitting {
        return UpdateResult::none();
    }
    match state.login.login_token() {
        Ok(login_token) => {
            let login_token = login_token.to_string();
            state.login.submitting = true;
            state.login.error = None;
            UpdateResult::task(Task::Login { login_token })
        }
        Err(e) => {
            state.login.error = Some(e.to_string());
            UpdateResult::none()
        }
    }
}

pub fn handle_login_completed(state: &mut AppState, result: ApiResult<String>) -> UpdateResult {
    state.login.submitting = false;
    match result {
        Ok(token) => {
            info!("Logged in");
            state.session = Some(token.clone());
            let next = post_login_route(state.login.chall.as_deref());
            UpdateResult::action_then(
                UpdateAction::PersistSession { token },
                Message::Navigate(next),
            )
        }
        Err(e) => {
            warn!("Login failed: {}", e);
            state.login.error = Some(form_error(&e));
            UpdateResult::none()
        }
    }
}

// ─────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────

pub fn enter_register(state: &mut AppState) -> UpdateResult {
    state.register = RegisterForm::new();
    UpdateResult::none()
}

pub fn handle_register_submit(state: &mut AppState) -> UpdateResult {
    if state.register.submitting {
        return UpdateResult::none();
    }
    match state.register.submission() {
        Ok((username, email)) => {
            state.register.submitting = true;
            state.register.error = None;
            UpdateResult::task(Task::Register { username, email })
        }
        Err(e) => {
            state.register.error = Some(e.to_string());
            UpdateResult::none()
        }
    }
}

pub fn handle_register_completed(state: &mut AppState, result: ApiResult<String>) -> UpdateResult {
    state.register.submitting = false;
    match result {
        Ok(token) => {
            info!("Registered team {}", state.register.username.trim());
            state.session = Some(token.clone());
            UpdateResult::action_then(
                UpdateAction::PersistSession { token },
                Message::Navigate(Route::Profile),
            )
        }
        Err(e) => {
            warn!("Registration failed: {}", e);
            state.register.error = Some(form_error(&e));
            UpdateResult::none()
        }
    }
}

// ─────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────

pub fn fetch_profile(state: &mut AppState) -> UpdateResult {
    let token = match gate::require_session(state) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };
    state.profile = ProfileState::loading();
    UpdateResult::task(Task::FetchProfile { token })
}

pub fn handle_profile_loaded(state: &mut AppState, result: ApiResult<Profile>) -> UpdateResult {
    match result {
        Ok(profile) => {
            state.profile.set_profile(profile);
            UpdateResult::none()
        }
        Err(e) if e.is_transport() => {
            warn!("Failed to load profile: {}", e);
            state.profile.loading = false;
            state.profile.error = Some(MSG_GENERIC.to_string());
            UpdateResult::none()
        }
        Err(e) => {
            warn!("Profile fetch rejected: {}", e);
            gate::session_rejected(state)
        }
    }
}

pub fn handle_profile_submit(state: &mut AppState) -> UpdateResult {
    if state.profile.submitting || state.profile.profile.is_none() {
        return UpdateResult::none();
    }
    let update = match state.profile.pending_update() {
        Ok(update) => update,
        Err(e) => {
            state.profile.error = Some(e.to_string());
            return UpdateResult::none();
        }
    };
    let token = match gate::require_session(state) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };
    state.profile.submitting = true;
    state.profile.error = None;
    state.profile.notice = None;
    UpdateResult::task(Task::UpdateProfile { token, update })
}

pub fn handle_profile_updated(
    state: &mut AppState,
    update: ProfileUpdate,
    result: ApiResult<String>,
) -> UpdateResult {
    state.profile.submitting = false;
    match result {
        Ok(msg) => {
            state.profile.apply_update(&update);
            state.profile.notice = Some(if msg.is_empty() {
                "Profile updated".to_string()
            } else {
                msg
            });
            UpdateResult::none()
        }
        Err(e) if e.is_auth_failure() => gate::session_rejected(state),
        Err(e) => {
            warn!("Profile update failed: {}", e);
            state.profile.error = Some(form_error(&e));
            UpdateResult::none()
        }
    }
}

pub fn handle_logout(state: &mut AppState) -> UpdateResult {
    info!("Logging out");
    state.session = None;
    state.login_token_hint = None;
    UpdateResult::action_then(
        UpdateAction::ForgetSession,
        Message::Navigate(login_redirect(None, None)),
    )
}
