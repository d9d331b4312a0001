//! Tests for handler module

use super::*;
use crate::account::AccountField;
use crate::catalog::CatalogFocus;
use crate::challenge_view::{
    ChallengeView, ControllerState, LoadState, MSG_CAPTCHA_FAILED, MSG_GENERIC,
    MSG_INVALID_CAPTCHA, MSG_TEMPORARILY_UNAVAILABLE,
};
use crate::input_key::InputKey;
use crate::state::AppState;
use instancer_api::test_utils::{
    test_challenge, test_deployment, test_shared_challenge, test_summary,
};
use instancer_api::{ApiError, AuthFailure};
use instancer_core::{now_epoch, AppPhase, Profile, Route};

/// Drive `msg` and every follow-up message; collect the actions emitted
fn run(state: &mut AppState, msg: Message) -> Vec<UpdateAction> {
    let mut actions = Vec::new();
    let mut msg = Some(msg);
    while let Some(m) = msg {
        let result = update(state, m);
        if let Some(action) = result.action {
            actions.push(action);
        }
        msg = result.message;
    }
    actions
}

fn logged_in() -> AppState {
    let mut state = AppState::new();
    state.session = Some("session-tok".into());
    state
}

/// Logged-in state showing a loaded, undeployed challenge
fn on_challenge(id: &str) -> AppState {
    let mut state = logged_in();
    state.route = Route::challenge(id);
    let mut view = ChallengeView::new(id);
    view.load = LoadState::Found(test_challenge(id));
    state.challenge = Some(view);
    state
}

/// Same, with a live deployment and a running countdown
fn on_deployed_challenge(id: &str, ttl: i64) -> AppState {
    let mut state = on_challenge(id);
    run(
        &mut state,
        Message::DeploymentLoaded {
            id: id.into(),
            result: Ok(Some(test_deployment(now_epoch(), ttl))),
        },
    );
    state
}

fn view(state: &AppState) -> &ChallengeView {
    state.challenge.as_ref().expect("challenge view")
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized(AuthFailure::InvalidToken)
}

fn spawned(actions: &[UpdateAction]) -> Vec<&Task> {
    actions
        .iter()
        .filter_map(|a| match a {
            UpdateAction::SpawnTask(task) => Some(task),
            _ => None,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────
// Basics
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_quitting_phase() {
    let mut state = AppState::new();
    update(&mut state, Message::Quit);
    assert_eq!(state.phase, AppPhase::Quitting);
    assert!(state.should_quit());
}

#[test]
fn test_ctrl_c_quits_from_any_screen() {
    let mut state = AppState::new();
    state.route = Route::Register;
    assert!(matches!(
        handle_key(&state, InputKey::CharCtrl('c')),
        Some(Message::Quit)
    ));
}

#[test]
fn test_challenge_keys_map_to_controls() {
    let state = on_challenge("web-1");
    assert!(matches!(
        handle_key(&state, InputKey::Char('d')),
        Some(Message::Control(ControlAction::Deploy))
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('e')),
        Some(Message::Control(ControlAction::Extend))
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Char('t')),
        Some(Message::Control(ControlAction::Terminate))
    ));
    assert!(matches!(
        handle_key(&state, InputKey::Esc),
        Some(Message::Navigate(Route::Catalog))
    ));
}

#[test]
fn test_search_focus_captures_letters() {
    let mut state = logged_in();
    state.catalog.focus = CatalogFocus::Search;
    // 'q' types instead of quitting
    assert!(matches!(
        handle_key(&state, InputKey::Char('q')),
        Some(Message::SearchInput('q'))
    ));
}

// ─────────────────────────────────────────────────────────
// Session Gate
// ─────────────────────────────────────────────────────────

#[test]
fn test_unauthenticated_challenge_redirects_with_token_and_target() {
    let mut state = AppState::new();
    state.login_token_hint = Some("T".into());

    let actions = run(&mut state, Message::Navigate(Route::challenge("abc-123")));

    assert_eq!(state.route.path(), "/login?token=T&chall=abc-123");
    assert!(state.challenge.is_none());
    // The gate itself makes no network call; login only previews the token
    assert_eq!(
        spawned(&actions),
        vec![&Task::Preview {
            login_token: "T".into()
        }]
    );
    assert_eq!(state.login.token, "T");
    assert_eq!(state.login.chall.as_deref(), Some("abc-123"));
}

#[test]
fn test_unauthenticated_tainted_id_falls_back() {
    let mut state = AppState::new();
    run(&mut state, Message::Navigate(Route::challenge("../evil")));
    assert_eq!(state.route, Route::Login { token: None, chall: None });
}

// ─────────────────────────────────────────────────────────
// Challenge Loader
// ─────────────────────────────────────────────────────────

#[test]
fn test_entering_challenge_starts_loader() {
    let mut state = logged_in();
    let actions = run(&mut state, Message::Navigate(Route::challenge("web-1")));

    assert_eq!(
        spawned(&actions),
        vec![&Task::LoadChallenge {
            id: "web-1".into(),
            token: "session-tok".into()
        }]
    );
    assert_eq!(view(&state).load, LoadState::Loading);
}

#[test]
fn test_challenge_not_found_is_terminal() {
    let mut state = logged_in();
    run(&mut state, Message::Navigate(Route::challenge("gone")));

    let actions = run(
        &mut state,
        Message::ChallengeLoaded {
            id: "gone".into(),
            result: Err(ApiError::NotFound),
        },
    );

    assert_eq!(view(&state).load, LoadState::NotFound);
    assert_eq!(actions, vec![UpdateAction::StopCountdown]);
    assert!(state.session.is_some());
    assert_eq!(state.route, Route::challenge("gone"));
    assert!(!view(&state).can(ControlAction::Deploy, now_epoch()));
}

#[test]
fn test_challenge_network_failure_stays_loading() {
    let mut state = logged_in();
    run(&mut state, Message::Navigate(Route::challenge("web-1")));

    let actions = run(
        &mut state,
        Message::ChallengeLoaded {
            id: "web-1".into(),
            result: Err(ApiError::Network("connection refused".into())),
        },
    );

    assert!(actions.is_empty());
    assert_eq!(view(&state).load, LoadState::Loading);
}

#[test]
fn test_challenge_auth_failure_redirects_to_login() {
    let mut state = logged_in();
    run(&mut state, Message::Navigate(Route::challenge("web-1")));

    let actions = run(
        &mut state,
        Message::ChallengeLoaded {
            id: "web-1".into(),
            result: Err(unauthorized()),
        },
    );

    assert!(state.session.is_none());
    assert!(actions.contains(&UpdateAction::ForgetSession));
    assert!(actions.contains(&UpdateAction::StopCountdown));
    assert_eq!(state.route.path(), "/login?chall=web-1");
    assert!(state.challenge.is_none());
}

#[test]
fn test_deployment_fetch_failure_routes_through_gate() {
    let mut state = on_challenge("web-1");
    run(
        &mut state,
        Message::DeploymentLoaded {
            id: "web-1".into(),
            result: Err(ApiError::Unauthorized(AuthFailure::Status("error".into()))),
        },
    );
    assert!(matches!(state.route, Route::Login { .. }));
}

#[test]
fn test_live_deployment_starts_countdown() {
    let mut state = on_challenge("web-1");
    let actions = run(
        &mut state,
        Message::DeploymentLoaded {
            id: "web-1".into(),
            result: Ok(Some(test_deployment(now_epoch(), 600))),
        },
    );

    let generation = view(&state).countdown.generation;
    assert_eq!(
        actions,
        vec![UpdateAction::StartCountdown {
            id: "web-1".into(),
            generation
        }]
    );
    let remaining = view(&state).countdown.remaining;
    assert!((599..=600).contains(&remaining), "remaining = {}", remaining);
    assert_eq!(view(&state).controller_state(now_epoch()), ControllerState::Deployed);
}

#[test]
fn test_expired_deployment_does_not_start_countdown() {
    let mut state = on_challenge("web-1");
    let actions = run(
        &mut state,
        Message::DeploymentLoaded {
            id: "web-1".into(),
            result: Ok(Some(test_deployment(now_epoch(), -5))),
        },
    );

    assert_eq!(actions, vec![UpdateAction::StopCountdown]);
    assert!(!view(&state).countdown.running);
    assert!(!view(&state).is_deployed(now_epoch()));
}

#[test]
fn test_late_result_for_other_challenge_is_dropped() {
    let mut state = on_challenge("web-1");
    let actions = run(
        &mut state,
        Message::ChallengeLoaded {
            id: "pwn-1".into(),
            result: Err(unauthorized()),
        },
    );
    assert!(actions.is_empty());
    assert!(state.session.is_some());
}

// ─────────────────────────────────────────────────────────
// Deployment Controller
// ─────────────────────────────────────────────────────────

#[test]
fn test_double_deploy_issues_one_request() {
    let mut state = on_challenge("web-1");

    let first = run(&mut state, Message::Control(ControlAction::Deploy));
    let second = run(&mut state, Message::Control(ControlAction::Deploy));

    assert_eq!(
        spawned(&first),
        vec![&Task::Deploy {
            id: "web-1".into(),
            token: "session-tok".into(),
            action: ControlAction::Deploy,
            captcha_token: None,
        }]
    );
    assert!(second.is_empty());
    assert_eq!(view(&state).controller_state(now_epoch()), ControllerState::Deploying);
}

#[test]
fn test_deploy_success_shows_ports_and_countdown() {
    let mut state = on_challenge("web-1");
    run(&mut state, Message::Control(ControlAction::Deploy));

    let actions = run(
        &mut state,
        Message::DeployCompleted {
            id: "web-1".into(),
            action: ControlAction::Deploy,
            result: Ok(test_deployment(now_epoch(), 600)),
        },
    );

    assert!(matches!(actions[..], [UpdateAction::StartCountdown { .. }]));
    let view = view(&state);
    assert!(!view.busy.deploy);
    assert_eq!(view.controller_state(now_epoch()), ControllerState::Deployed);
    assert!(view.ports(now_epoch()).is_some());
}

#[test]
fn test_temporarily_unavailable_reenables_and_shakes() {
    let mut state = on_challenge("web-1");
    run(&mut state, Message::Control(ControlAction::Deploy));

    run(
        &mut state,
        Message::DeployCompleted {
            id: "web-1".into(),
            action: ControlAction::Deploy,
            result: Err(ApiError::TemporarilyUnavailable),
        },
    );

    let view = view(&state);
    assert!(!view.busy.deploy);
    assert!(view.shake);
    assert_eq!(view.error.as_deref(), Some(MSG_TEMPORARILY_UNAVAILABLE));
    assert!(view.deployment.is_none());
    assert!(view.can(ControlAction::Deploy, now_epoch()));
    assert!(matches!(state.route, Route::Challenge { .. }));
}

#[test]
fn test_invalid_captcha_has_distinct_message() {
    let mut state = on_challenge("web-1");
    run(&mut state, Message::Control(ControlAction::Deploy));
    run(
        &mut state,
        Message::DeployCompleted {
            id: "web-1".into(),
            action: ControlAction::Deploy,
            result: Err(ApiError::InvalidCaptcha),
        },
    );
    assert_eq!(view(&state).error.as_deref(), Some(MSG_INVALID_CAPTCHA));
    assert!(!view(&state).busy.deploy);
}

#[test]
fn test_unexpected_and_network_failures_show_generic_message() {
    for error in [
        ApiError::Unexpected {
            http: 500,
            status: "boom".into(),
        },
        ApiError::Network("timed out".into()),
    ] {
        let mut state = on_challenge("web-1");
        run(&mut state, Message::Control(ControlAction::Deploy));
        run(
            &mut state,
            Message::DeployCompleted {
                id: "web-1".into(),
                action: ControlAction::Deploy,
                result: Err(error),
            },
        );
        let view = view(&state);
        assert!(!view.busy.deploy);
        assert!(view.shake);
        assert_eq!(view.error.as_deref(), Some(MSG_GENERIC));
    }
}

#[test]
fn test_deploy_auth_failure_redirects() {
    let mut state = on_challenge("abc-123");
    run(&mut state, Message::Control(ControlAction::Deploy));
    let actions = run(
        &mut state,
        Message::DeployCompleted {
            id: "abc-123".into(),
            action: ControlAction::Deploy,
            result: Err(ApiError::Unauthorized(AuthFailure::MissingAuthorization)),
        },
    );
    assert!(actions.contains(&UpdateAction::ForgetSession));
    assert_eq!(state.route.path(), "/login?chall=abc-123");
}

#[test]
fn test_captcha_is_solved_fresh_for_every_attempt() {
    let mut state = on_challenge("web-1");
    state.client.recaptcha_site_key = Some("site-key".into());

    let actions = run(&mut state, Message::Control(ControlAction::Deploy));
    assert_eq!(
        actions,
        vec![UpdateAction::SolveCaptcha {
            id: "web-1".into(),
            action: ControlAction::Deploy,
            site_key: "site-key".into(),
        }]
    );

    let actions = run(
        &mut state,
        Message::CaptchaSolved {
            id: "web-1".into(),
            action: ControlAction::Deploy,
            token: "captcha-1".into(),
        },
    );
    assert_eq!(
        spawned(&actions),
        vec![&Task::Deploy {
            id: "web-1".into(),
            token: "session-tok".into(),
            action: ControlAction::Deploy,
            captcha_token: Some("captcha-1".into()),
        }]
    );

    run(
        &mut state,
        Message::DeployCompleted {
            id: "web-1".into(),
            action: ControlAction::Deploy,
            result: Err(ApiError::InvalidCaptcha),
        },
    );

    // The retry asks for a new token rather than reusing the first
    let actions = run(&mut state, Message::Control(ControlAction::Deploy));
    assert!(matches!(actions[..], [UpdateAction::SolveCaptcha { .. }]));
}

#[test]
fn test_captcha_failure_skips_request() {
    let mut state = on_challenge("web-1");
    state.client.recaptcha_site_key = Some("site-key".into());
    run(&mut state, Message::Control(ControlAction::Deploy));

    let actions = run(
        &mut state,
        Message::CaptchaFailed {
            id: "web-1".into(),
            action: ControlAction::Deploy,
            error: "helper exited".into(),
        },
    );

    assert!(actions.is_empty());
    let view = view(&state);
    assert!(!view.busy.deploy);
    assert!(view.shake);
    assert_eq!(view.error.as_deref(), Some(MSG_CAPTCHA_FAILED));
}

#[test]
fn test_terminate_never_needs_captcha() {
    let mut state = on_deployed_challenge("web-1", 600);
    state.client.recaptcha_site_key = Some("site-key".into());
    let actions = run(&mut state, Message::Control(ControlAction::Terminate));
    assert_eq!(
        spawned(&actions),
        vec![&Task::Terminate {
            id: "web-1".into(),
            token: "session-tok".into()
        }]
    );
}

#[test]
fn test_extend_reseeds_from_new_expiration() {
    let mut state = on_deployed_challenge("web-1", 60);
    let old_generation = view(&state).countdown.generation;

    run(&mut state, Message::Control(ControlAction::Extend));
    assert_eq!(view(&state).controller_state(now_epoch()), ControllerState::Extending);

    let actions = run(
        &mut state,
        Message::DeployCompleted {
            id: "web-1".into(),
            action: ControlAction::Extend,
            result: Ok(test_deployment(now_epoch(), 600)),
        },
    );
    let new_generation = view(&state).countdown.generation;
    assert!(new_generation > old_generation);
    assert_eq!(
        actions,
        vec![UpdateAction::StartCountdown {
            id: "web-1".into(),
            generation: new_generation
        }]
    );

    // A tick from the superseded interval changes nothing
    let before = view(&state).countdown.remaining;
    run(
        &mut state,
        Message::CountdownTick {
            id: "web-1".into(),
            generation: old_generation,
        },
    );
    assert_eq!(view(&state).countdown.remaining, before);
    assert!(before >= 599);
}

#[test]
fn test_terminate_clears_deployment_and_stops_timer() {
    let mut state = on_deployed_challenge("web-1", 600);
    run(&mut state, Message::Control(ControlAction::Terminate));

    let actions = run(
        &mut state,
        Message::TerminateCompleted {
            id: "web-1".into(),
            result: Ok("Challenge terminated".into()),
        },
    );

    assert_eq!(actions, vec![UpdateAction::StopCountdown]);
    let view = view(&state);
    assert!(view.deployment.is_none());
    assert!(!view.countdown.running);
    assert_eq!(view.countdown.remaining, 0);
    assert!(view.ports(now_epoch()).is_none());
    assert_eq!(view.controller_state(now_epoch()), ControllerState::Idle);
}

#[test]
fn test_terminate_failure_keeps_deployment() {
    let mut state = on_deployed_challenge("web-1", 600);
    run(&mut state, Message::Control(ControlAction::Terminate));
    run(
        &mut state,
        Message::TerminateCompleted {
            id: "web-1".into(),
            result: Err(ApiError::Unexpected {
                http: 500,
                status: "error".into(),
            }),
        },
    );
    let view = view(&state);
    assert!(view.deployment.is_some());
    assert!(!view.busy.terminate);
    assert_eq!(view.error.as_deref(), Some(MSG_GENERIC));
}

#[test]
fn test_shared_challenge_ignores_extend_and_terminate() {
    let mut state = on_deployed_challenge("pool-1", 600);
    if let Some(view) = state.challenge.as_mut() {
        view.load = LoadState::Found(test_shared_challenge("pool-1"));
    }
    assert!(run(&mut state, Message::Control(ControlAction::Extend)).is_empty());
    assert!(run(&mut state, Message::Control(ControlAction::Terminate)).is_empty());
}

#[test]
fn test_elapsed_countdown_reruns_loader() {
    let mut state = on_deployed_challenge("web-1", 600);
    let generation = state
        .challenge
        .as_mut()
        .map(|v| v.countdown.reseed(1))
        .unwrap();

    let actions = run(
        &mut state,
        Message::CountdownTick {
            id: "web-1".into(),
            generation,
        },
    );

    assert_eq!(actions[0], UpdateAction::StopCountdown);
    assert_eq!(
        spawned(&actions),
        vec![&Task::LoadChallenge {
            id: "web-1".into(),
            token: "session-tok".into()
        }]
    );
    // Reload keeps the loaded challenge on screen
    assert!(view(&state).info().is_some());
}

#[test]
fn test_leaving_challenge_stops_countdown() {
    let mut state = on_deployed_challenge("web-1", 600);
    let actions = run(&mut state, Message::Navigate(Route::Catalog));

    assert_eq!(actions[0], UpdateAction::StopCountdown);
    assert!(state.challenge.is_none());
    assert_eq!(
        spawned(&actions),
        vec![&Task::FetchChallenges {
            token: "session-tok".into()
        }]
    );
}

// ─────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────

#[test]
fn test_catalog_open_navigates_to_selection() {
    let mut state = logged_in();
    run(
        &mut state,
        Message::ChallengesLoaded {
            result: Ok(vec![test_summary("web-1", None), test_summary("web-2", None)]),
        },
    );
    run(&mut state, Message::CatalogCursor(1));
    let actions = run(&mut state, Message::OpenChallenge);

    assert_eq!(state.route, Route::challenge("web-2"));
    assert!(matches!(
        spawned(&actions)[..],
        [Task::LoadChallenge { id, .. }] if id == "web-2"
    ));
}

#[test]
fn test_catalog_auth_failure_redirects() {
    let mut state = logged_in();
    run(
        &mut state,
        Message::ChallengesLoaded {
            result: Err(unauthorized()),
        },
    );
    assert!(state.session.is_none());
    assert_eq!(state.route, Route::Login { token: None, chall: None });
}

#[test]
fn test_catalog_search_keys_edit_filter() {
    let mut state = logged_in();
    run(
        &mut state,
        Message::ChallengesLoaded {
            result: Ok(vec![test_summary("web-1", None), test_summary("pwn-1", None)]),
        },
    );
    run(&mut state, Message::Key(InputKey::Char('/')));
    for c in "PWN".chars() {
        run(&mut state, Message::Key(InputKey::Char(c)));
    }
    assert_eq!(state.catalog.visible(now_epoch()).len(), 1);

    run(&mut state, Message::Key(InputKey::Enter));
    run(&mut state, Message::Key(InputKey::Esc));
    assert_eq!(state.catalog.visible(now_epoch()).len(), 2);
}

// ─────────────────────────────────────────────────────────
// Account screens
// ─────────────────────────────────────────────────────────

#[test]
fn test_login_with_stored_session_validates_first() {
    let mut state = logged_in();
    let actions = run(
        &mut state,
        Message::Navigate(Route::Login {
            token: None,
            chall: Some("web-1".into()),
        }),
    );
    assert_eq!(
        spawned(&actions),
        vec![&Task::ValidateSession {
            token: "session-tok".into()
        }]
    );

    run(
        &mut state,
        Message::SessionValidated {
            result: Ok(Profile::default()),
        },
    );
    assert_eq!(state.route, Route::challenge("web-1"));
}

#[test]
fn test_stale_stored_session_is_forgotten() {
    let mut state = logged_in();
    run(
        &mut state,
        Message::Navigate(Route::Login {
            token: Some("T".into()),
            chall: None,
        }),
    );
    let actions = run(
        &mut state,
        Message::SessionValidated {
            result: Err(unauthorized()),
        },
    );
    assert!(state.session.is_none());
    assert_eq!(actions[0], UpdateAction::ForgetSession);
    assert_eq!(
        spawned(&actions),
        vec![&Task::Preview {
            login_token: "T".into()
        }]
    );
}

#[test]
fn test_login_success_persists_and_returns_to_challenge() {
    let mut state = AppState::new();
    run(
        &mut state,
        Message::Navigate(Route::Login {
            token: Some("T".into()),
            chall: Some("abc-123".into()),
        }),
    );
    let actions = run(&mut state, Message::LoginSubmit);
    assert_eq!(
        spawned(&actions),
        vec![&Task::Login {
            login_token: "T".into()
        }]
    );

    let actions = run(
        &mut state,
        Message::LoginCompleted {
            result: Ok("session".into()),
        },
    );
    assert_eq!(
        actions[0],
        UpdateAction::PersistSession {
            token: "session".into()
        }
    );
    assert_eq!(state.session.as_deref(), Some("session"));
    assert_eq!(state.route, Route::challenge("abc-123"));
}

#[test]
fn test_login_tainted_return_target_goes_to_profile() {
    let mut state = AppState::new();
    state.login.chall = Some("../evil".into());
    state.route = Route::Login {
        token: None,
        chall: None,
    };
    run(
        &mut state,
        Message::LoginCompleted {
            result: Ok("session".into()),
        },
    );
    assert_eq!(state.route, Route::Profile);
}

#[test]
fn test_login_rejection_shows_server_message() {
    let mut state = AppState::new();
    state.route = Route::Login {
        token: None,
        chall: None,
    };
    state.login.token = "bad".into();
    run(&mut state, Message::LoginSubmit);
    run(
        &mut state,
        Message::LoginCompleted {
            result: Err(ApiError::Rejected {
                status: "error".into(),
                msg: "Invalid login token".into(),
            }),
        },
    );
    assert_eq!(state.login.error.as_deref(), Some("Invalid login token"));
    assert!(!state.login.submitting);
    assert!(state.session.is_none());
}

#[test]
fn test_empty_login_token_is_not_submitted() {
    let mut state = AppState::new();
    state.route = Route::Login {
        token: None,
        chall: None,
    };
    assert!(run(&mut state, Message::LoginSubmit).is_empty());
    assert!(state.login.error.is_some());
}

#[test]
fn test_register_validates_before_submitting() {
    let mut state = AppState::new();
    run(&mut state, Message::Navigate(Route::Register));
    for c in "ab".chars() {
        run(&mut state, Message::Key(InputKey::Char(c)));
    }
    assert!(run(&mut state, Message::Key(InputKey::Enter)).is_empty());
    assert_eq!(
        state.register.error.as_deref(),
        Some("Username must be between 3 and 100 characters")
    );
}

#[test]
fn test_register_success_lands_on_profile() {
    let mut state = AppState::new();
    run(&mut state, Message::Navigate(Route::Register));
    for c in "team".chars() {
        run(&mut state, Message::FormInput(c));
    }
    run(&mut state, Message::FormNextField);
    assert_eq!(state.register.focus, AccountField::Email);
    for c in "team@ctf.example".chars() {
        run(&mut state, Message::FormInput(c));
    }

    let actions = run(&mut state, Message::RegisterSubmit);
    assert_eq!(
        spawned(&actions),
        vec![&Task::Register {
            username: "team".into(),
            email: "team@ctf.example".into()
        }]
    );

    let actions = run(
        &mut state,
        Message::RegisterCompleted {
            result: Ok("session".into()),
        },
    );
    assert_eq!(state.route, Route::Profile);
    assert!(actions.contains(&UpdateAction::PersistSession {
        token: "session".into()
    }));
    assert!(spawned(&actions).contains(&&Task::FetchProfile {
        token: "session".into()
    }));
}

#[test]
fn test_profile_fetch_rejection_redirects() {
    let mut state = logged_in();
    run(&mut state, Message::Navigate(Route::Profile));
    run(
        &mut state,
        Message::ProfileLoaded {
            result: Err(ApiError::Unauthorized(AuthFailure::Http(401))),
        },
    );
    assert!(state.session.is_none());
    assert!(matches!(state.route, Route::Login { .. }));
}

#[test]
fn test_profile_update_sends_changed_fields() {
    let mut state = logged_in();
    run(&mut state, Message::Navigate(Route::Profile));
    run(
        &mut state,
        Message::ProfileLoaded {
            result: Ok(Profile {
                username: Some("team".into()),
                email: Some("old@ctf.example".into()),
                login_url: "https://ctf.example/login?token=T".into(),
            }),
        },
    );
    run(&mut state, Message::FormNextField);
    for _ in 0.."old@ctf.example".len() {
        run(&mut state, Message::FormBackspace);
    }
    for c in "new@ctf.example".chars() {
        run(&mut state, Message::FormInput(c));
    }

    let actions = run(&mut state, Message::ProfileSubmit);
    let tasks = spawned(&actions);
    let [Task::UpdateProfile { update, .. }] = tasks[..] else {
        panic!("expected profile update, got {:?}", actions);
    };
    assert_eq!(update.username, None);
    assert_eq!(update.email.as_deref(), Some("new@ctf.example"));

    run(
        &mut state,
        Message::ProfileUpdated {
            update: update.clone(),
            result: Ok(String::new()),
        },
    );
    assert_eq!(
        state.profile.profile.as_ref().unwrap().email.as_deref(),
        Some("new@ctf.example")
    );
    assert!(state.profile.notice.is_some());
}

#[test]
fn test_logout_forgets_session() {
    let mut state = logged_in();
    let actions = run(&mut state, Message::Logout);
    assert_eq!(actions[0], UpdateAction::ForgetSession);
    assert!(state.session.is_none());
    assert_eq!(state.route, Route::Login { token: None, chall: None });
}
