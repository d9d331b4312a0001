//! Engine - shared orchestration state for TUI and headless runners
//!
//! The Engine owns the TEA state, the unified message channel and the
//! services actions run against (API client, CAPTCHA solver, countdown timer,
//! token store). Frontends only feed it messages and read its state.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::actions::Services;
use crate::captcha::CaptchaSolver;
use crate::challenge_view::{ControllerState, LoadState};
use crate::config::Settings;
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::AppState;
use crate::token_store::TokenStore;
use instancer_api::InstancerApi;
use instancer_core::{format_countdown, now_epoch, PortsView, Route};

/// Observable state, compared before/after message processing so the
/// headless runner reports only real changes.
///
/// The countdown value is left out; it changes every second and can be
/// derived from `expiration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub route: String,
    pub logged_in: bool,
    pub challenge: Option<ChallengeSnapshot>,
    pub catalog_size: usize,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeSnapshot {
    pub id: String,
    /// `loading`, `found` or `not_found`
    pub load: &'static str,
    pub name: Option<String>,
    /// `idle`, `deploying`, `deployed`, `extending` or `terminating`
    pub controller: &'static str,
    pub expiration: Option<i64>,
    pub countdown_running: bool,
    /// `None` while not deployed; empty while the instance boots
    pub ports: Option<Vec<String>>,
    pub booting: bool,
    pub shake: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl StateSnapshot {
    pub fn capture(state: &AppState) -> Self {
        let now = now_epoch();
        let challenge = state.challenge.as_ref().map(|view| {
            let ports = view.ports(now);
            ChallengeSnapshot {
                id: view.id.clone(),
                load: match view.load {
                    LoadState::Loading => "loading",
                    LoadState::Found(_) => "found",
                    LoadState::NotFound => "not_found",
                },
                name: view.info().map(|i| i.name.clone()),
                controller: match view.controller_state(now) {
                    ControllerState::Idle => "idle",
                    ControllerState::Deploying => "deploying",
                    ControllerState::Deployed => "deployed",
                    ControllerState::Extending => "extending",
                    ControllerState::Terminating => "terminating",
                },
                expiration: view
                    .deployment
                    .as_ref()
                    .filter(|d| d.is_live(now))
                    .map(|d| d.expiration),
                countdown_running: view.countdown.running,
                booting: matches!(ports, Some(PortsView::Booting)),
                ports: ports.map(|p| match p {
                    PortsView::Booting => Vec::new(),
                    PortsView::Ready(entries) => entries
                        .iter()
                        .map(|e| format!("{} {}", e.label(), e.target()))
                        .collect(),
                }),
                shake: view.shake,
                error: view.error.clone(),
                notice: view.notice.clone(),
            }
        });

        Self {
            route: state.route.path(),
            logged_in: state.session.is_some(),
            challenge,
            catalog_size: state.catalog.items.len(),
            status: state.status.clone(),
        }
    }

    /// Countdown text for the challenge on screen
    pub fn countdown(state: &AppState) -> Option<String> {
        state
            .challenge
            .as_ref()
            .filter(|v| v.countdown.running)
            .map(|v| format_countdown(v.countdown.remaining))
    }
}

/// Orchestration engine for the instancer client.
pub struct Engine<A, C> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the unified message channel.
    /// Clone this to give to input sources (signal handler, stdin reader).
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the unified message channel.
    /// The frontend event loop drains messages from here.
    pub msg_rx: mpsc::Receiver<Message>,

    services: Services<A, C>,
}

impl<A, C> Engine<A, C>
where
    A: InstancerApi + Send + Sync + 'static,
    C: CaptchaSolver + Send + Sync + 'static,
{
    /// Create an engine.
    ///
    /// Restores the stored session, creates the message channel (capacity
    /// 256) and spawns the signal handler. Must run inside a tokio runtime.
    pub fn new(settings: &Settings, api: A, captcha: C, token_store: Option<TokenStore>) -> Self {
        let mut state = AppState::with_settings(settings);

        if let Some(store) = &token_store {
            match store.load() {
                Ok(Some(token)) => {
                    info!("Restored session from {}", store.path().display());
                    state.session = Some(token);
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to read stored session: {}", e),
            }
        }

        let (msg_tx, msg_rx) = mpsc::channel::<Message>(256);
        signals::spawn_signal_handler(msg_tx.clone());

        Self {
            state,
            msg_tx,
            msg_rx,
            services: Services::new(api, captcha, token_store),
        }
    }

    /// Show the first screen. `login_token` is a one-time login token handed
    /// in from outside; it rides along on any redirect to login.
    pub fn start(&mut self, route: Route, login_token: Option<String>) {
        info!("Starting at {}", route);
        self.state.login_token_hint = login_token.filter(|t| !t.is_empty());
        self.process_message(Message::Navigate(route));
    }

    /// Process a single message through the TEA update cycle.
    pub fn process_message(&mut self, msg: Message) {
        process::process_message(&mut self.state, msg, &self.msg_tx, &mut self.services);
    }

    /// Drain and process all pending messages from the channel.
    ///
    /// Returns the number of messages processed. Used by the TUI runner
    /// which needs to drain all pending messages before rendering.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Get a clone of the message sender for input sources.
    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(&self.state)
    }

    /// Stop background work. In-flight requests are left to finish; their
    /// completions are never read.
    pub fn shutdown(&mut self) {
        info!("Engine shutting down");
        self.services.timer.stop();
    }

    /// Direct access to the API client (tests and headless diagnostics)
    pub fn api(&self) -> &A {
        &self.services.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captcha::NoCaptcha;
    use instancer_api::test_utils::{test_challenge, test_deployment, FakeApi};
    use std::time::Duration;

    async fn next_message(engine: &mut Engine<FakeApi, NoCaptcha>) -> Message {
        tokio::time::timeout(Duration::from_secs(2), engine.msg_rx.recv())
            .await
            .expect("message within timeout")
            .expect("channel open")
    }

    #[tokio::test]
    async fn test_new_restores_stored_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("auth_token"));
        store.save("stored").unwrap();

        let engine = Engine::new(&Settings::default(), FakeApi::new(), NoCaptcha, Some(store));

        assert_eq!(engine.state.session.as_deref(), Some("stored"));
        assert!(!engine.should_quit());
    }

    #[tokio::test]
    async fn test_start_without_session_lands_on_login() {
        let mut engine = Engine::new(&Settings::default(), FakeApi::new(), NoCaptcha, None);
        engine.start(Route::challenge("abc-123"), Some("T".into()));

        assert_eq!(engine.snapshot().route, "/login?token=T&chall=abc-123");
        assert!(engine.api().calls().challenge.is_empty());
    }

    #[tokio::test]
    async fn test_loader_round_trip() {
        let api = FakeApi::new();
        api.push_challenge(Ok(test_challenge("web-1")))
            .push_deployment(Ok(Some(test_deployment(now_epoch(), 600))));
        let mut engine = Engine::new(&Settings::default(), api, NoCaptcha, None);
        engine.state.session = Some("tok".into());

        engine.start(Route::challenge("web-1"), None);
        for _ in 0..2 {
            let msg = next_message(&mut engine).await;
            engine.process_message(msg);
        }

        let snapshot = engine.snapshot();
        let challenge = snapshot.challenge.expect("challenge snapshot");
        assert_eq!(challenge.load, "found");
        assert_eq!(challenge.controller, "deployed");
        assert!(challenge.countdown_running);
        assert_eq!(challenge.ports.map(|p| p.len()), Some(2));
        assert!(StateSnapshot::countdown(&engine.state).is_some());
        engine.shutdown();
    }

    #[tokio::test]
    async fn test_quit_message() {
        let mut engine = Engine::new(&Settings::default(), FakeApi::new(), NoCaptcha, None);
        engine.process_message(Message::Quit);
        assert!(engine.should_quit());
    }
}
