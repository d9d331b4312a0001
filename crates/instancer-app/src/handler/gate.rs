//! Session gate
//!
//! Routes that need a session are entered only while a token is held. Any
//! response that says the token is no longer accepted drops it and sends the
//! viewer to login, keeping the challenge they were on as the return target.

use crate::message::Message;
use crate::state::AppState;
use instancer_core::{login_redirect, Route};

use super::{UpdateAction, UpdateResult};

/// Redirect for `route` when it needs a session that is not held
pub fn check(state: &AppState, route: &Route) -> Option<Route> {
    if route.requires_session() && state.session.is_none() {
        Some(login_redirect(
            state.login_token_hint.as_deref(),
            route.challenge_id(),
        ))
    } else {
        None
    }
}

/// The session was rejected: forget it and go to login
pub fn session_rejected(state: &mut AppState) -> UpdateResult {
    tracing::info!("Session rejected on {}, redirecting to login", state.route);
    let redirect = state.expire_session();
    UpdateResult::action_then(UpdateAction::ForgetSession, Message::Navigate(redirect))
}

/// Session token for an authenticated request, or the redirect to issue
pub fn require_session(state: &AppState) -> Result<String, UpdateResult> {
    match &state.session {
        Some(token) => Ok(token.clone()),
        None => Err(UpdateResult::message(Message::Navigate(login_redirect(
            state.login_token_hint.as_deref(),
            state.route.challenge_id(),
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_allows_public_routes() {
        let state = AppState::new();
        assert_eq!(check(&state, &Route::Register), None);
        assert_eq!(check(&state, &login_redirect(None, None)), None);
    }

    #[test]
    fn test_check_redirects_without_session() {
        let mut state = AppState::new();
        state.login_token_hint = Some("T".into());
        let redirect = check(&state, &Route::challenge("abc-123")).unwrap();
        assert_eq!(redirect.path(), "/login?token=T&chall=abc-123");
    }

    #[test]
    fn test_check_drops_tainted_challenge_id() {
        let state = AppState::new();
        let redirect = check(&state, &Route::challenge("../evil")).unwrap();
        assert_eq!(redirect.path(), "/login");
    }

    #[test]
    fn test_check_passes_with_session() {
        let mut state = AppState::new();
        state.session = Some("tok".into());
        assert_eq!(check(&state, &Route::Profile), None);
    }

    #[test]
    fn test_session_rejected_forgets_and_redirects() {
        let mut state = AppState::new();
        state.session = Some("tok".into());
        state.route = Route::challenge("web-1");

        let result = session_rejected(&mut state);

        assert!(state.session.is_none());
        assert_eq!(result.action, Some(UpdateAction::ForgetSession));
        match result.message {
            Some(Message::Navigate(route)) => assert_eq!(route.path(), "/login?chall=web-1"),
            other => panic!("expected navigate, got {:?}", other),
        }
    }
}
