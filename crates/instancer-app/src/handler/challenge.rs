//! Challenge screen handlers: loader results, deployment controls, countdown

use tracing::{debug, info, warn};

use crate::challenge_view::{
    ChallengeView, ControlAction, LoadState, TickOutcome, MSG_CAPTCHA_FAILED, MSG_GENERIC,
    MSG_INVALID_CAPTCHA, MSG_TEMPORARILY_UNAVAILABLE,
};
use crate::message::Message;
use crate::state::AppState;
use instancer_api::{ApiError, ApiResult};
use instancer_core::{now_epoch, ChallengeInfo, Deployment};

use super::{gate, Task, UpdateAction, UpdateResult};

/// Mount a fresh view for `id` and start the loader
pub fn enter(state: &mut AppState, id: String) -> UpdateResult {
    state.challenge = Some(ChallengeView::new(id));
    load(state)
}

/// Run the loader for the view on screen. A reload keeps what is shown
/// until fresh results arrive.
pub fn load(state: &mut AppState) -> UpdateResult {
    let Some(id) = state.challenge.as_ref().map(|v| v.id.clone()) else {
        return UpdateResult::none();
    };
    let token = match gate::require_session(state) {
        Ok(token) => token,
        Err(redirect) => return redirect,
    };
    debug!("Loading challenge {}", id);
    UpdateResult::task(Task::LoadChallenge { id, token })
}

/// Reseed from the view's deployment and pick the matching timer action
fn countdown_action(view: &mut ChallengeView, now: i64) -> UpdateAction {
    match view.resync_countdown(now) {
        Some(generation) => UpdateAction::StartCountdown {
            id: view.id.clone(),
            generation,
        },
        None => UpdateAction::StopCountdown,
    }
}

pub fn handle_challenge_loaded(
    state: &mut AppState,
    id: String,
    result: ApiResult<ChallengeInfo>,
) -> UpdateResult {
    let Some(view) = state.challenge_mut(&id) else {
        debug!("Dropping challenge result for {} (no longer shown)", id);
        return UpdateResult::none();
    };

    match result {
        Ok(info) => {
            view.load = LoadState::Found(info);
            UpdateResult::none()
        }
        Err(ApiError::NotFound) => {
            info!("Challenge {} not found", id);
            view.load = LoadState::NotFound;
            view.deployment = None;
            view.countdown.stop();
            UpdateResult::action(UpdateAction::StopCountdown)
        }
        Err(e) if e.is_transport() => {
            warn!("Failed to load challenge {}: {}", id, e);
            UpdateResult::none()
        }
        Err(e) => {
            warn!("Challenge {} fetch rejected: {}", id, e);
            gate::session_rejected(state)
        }
    }
}

pub fn handle_deployment_loaded(
    state: &mut AppState,
    id: String,
    result: ApiResult<Option<Deployment>>,
) -> UpdateResult {
    let now = now_epoch();
    let Some(view) = state.challenge_mut(&id) else {
        return UpdateResult::none();
    };

    match result {
        Ok(deployment) => {
            view.deployment = deployment;
            UpdateResult::action(countdown_action(view, now))
        }
        Err(e) if e.is_transport() => {
            warn!("Failed to load deployment for {}: {}", id, e);
            UpdateResult::none()
        }
        Err(e) => {
            warn!("Deployment fetch for {} rejected: {}", id, e);
            gate::session_rejected(state)
        }
    }
}

// ─────────────────────────────────────────────────────────
// Deployment Controller
// ─────────────────────────────────────────────────────────

pub fn handle_control(state: &mut AppState, action: ControlAction) -> UpdateResult {
    let now = now_epoch();
    let site_key = state.client.captcha_site_key().map(str::to_string);
    let session = state.session.clone();

    let Some(view) = state.challenge.as_mut() else {
        return UpdateResult::none();
    };
    if !view.can(action, now) {
        debug!("Ignoring {} on {} ({:?})", action, view.id, view.controller_state(now));
        return UpdateResult::none();
    }
    let Some(token) = session else {
        return gate::session_rejected(state);
    };

    view.begin(action);
    let id = view.id.clone();
    info!("{} requested for {}", action, id);

    match (action.needs_captcha(), site_key) {
        (true, Some(site_key)) => UpdateResult::action(UpdateAction::SolveCaptcha {
            id,
            action,
            site_key,
        }),
        _ if action == ControlAction::Terminate => {
            UpdateResult::task(Task::Terminate { id, token })
        }
        _ => UpdateResult::task(Task::Deploy {
            id,
            token,
            action,
            captcha_token: None,
        }),
    }
}

pub fn handle_captcha_solved(
    state: &mut AppState,
    id: String,
    action: ControlAction,
    token: String,
) -> UpdateResult {
    let session = state.session.clone();
    let Some(view) = state.challenge_mut(&id) else {
        return UpdateResult::none();
    };
    if !view.busy.get(action) {
        return UpdateResult::none();
    }
    let Some(session) = session else {
        return gate::session_rejected(state);
    };

    UpdateResult::task(Task::Deploy {
        id,
        token: session,
        action,
        captcha_token: Some(token),
    })
}

pub fn handle_captcha_failed(
    state: &mut AppState,
    id: String,
    action: ControlAction,
    error: String,
) -> UpdateResult {
    warn!("CAPTCHA for {} on {} failed: {}", action, id, error);
    if let Some(view) = state.challenge_mut(&id) {
        view.fail(action, MSG_CAPTCHA_FAILED);
    }
    UpdateResult::none()
}

pub fn handle_deploy_completed(
    state: &mut AppState,
    id: String,
    action: ControlAction,
    result: ApiResult<Deployment>,
) -> UpdateResult {
    let now = now_epoch();
    let Some(view) = state.challenge_mut(&id) else {
        return UpdateResult::none();
    };

    match result {
        Ok(deployment) => {
            info!("{} succeeded for {}", action, id);
            view.busy.set(action, false);
            view.deployment = Some(deployment);
            view.notice = Some(match action {
                ControlAction::Extend => "Instance extended".to_string(),
                _ => "Instance deployed".to_string(),
            });
            UpdateResult::action(countdown_action(view, now))
        }
        Err(ApiError::TemporarilyUnavailable) => {
            view.fail(action, MSG_TEMPORARILY_UNAVAILABLE);
            UpdateResult::none()
        }
        Err(ApiError::InvalidCaptcha) => {
            view.fail(action, MSG_INVALID_CAPTCHA);
            UpdateResult::none()
        }
        Err(e) if e.is_auth_failure() => {
            view.busy.set(action, false);
            gate::session_rejected(state)
        }
        Err(e) => {
            warn!("{} for {} failed: {}", action, id, e);
            view.fail(action, MSG_GENERIC);
            UpdateResult::none()
        }
    }
}

pub fn handle_terminate_completed(
    state: &mut AppState,
    id: String,
    result: ApiResult<String>,
) -> UpdateResult {
    let Some(view) = state.challenge_mut(&id) else {
        return UpdateResult::none();
    };

    match result {
        Ok(msg) => {
            info!("Terminated {}", id);
            view.busy.terminate = false;
            view.deployment = None;
            view.countdown.stop();
            view.notice = Some(if msg.is_empty() {
                "Instance terminated".to_string()
            } else {
                msg
            });
            UpdateResult::action(UpdateAction::StopCountdown)
        }
        Err(e) if e.is_auth_failure() => {
            view.busy.terminate = false;
            gate::session_rejected(state)
        }
        Err(e) => {
            warn!("terminate for {} failed: {}", id, e);
            view.fail(ControlAction::Terminate, MSG_GENERIC);
            UpdateResult::none()
        }
    }
}

// ─────────────────────────────────────────────────────────
// Countdown
// ─────────────────────────────────────────────────────────

pub fn handle_countdown_tick(state: &mut AppState, id: String, generation: u64) -> UpdateResult {
    let Some(view) = state.challenge_mut(&id) else {
        return UpdateResult::none();
    };

    match view.countdown.tick(generation) {
        TickOutcome::Stale | TickOutcome::Running => UpdateResult::none(),
        TickOutcome::Elapsed => {
            debug!("Countdown for {} elapsed, re-checking deployment", view.id);
            UpdateResult::action_then(UpdateAction::StopCountdown, Message::LoadChallenge)
        }
    }
}
