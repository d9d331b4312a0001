//! Headless mode runner - main event loop without TUI
//!
//! Processes engine messages and emits JSON events to stdout whenever the
//! observable state changes.

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use instancer_api::InstancerApi;
use instancer_app::config::Settings;
use instancer_app::{AppState, CaptchaSolver, Engine, Message, StateSnapshot};
use instancer_core::prelude::*;
use instancer_core::Route;

use super::commands::parse_command;
use super::HeadlessEvent;
use crate::startup;
use crate::Args;

/// Run in headless mode - output JSON events instead of TUI
pub async fn run_headless(
    settings: &Settings,
    args: &Args,
    route: Route,
    login_token: Option<String>,
) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("instancer starting in HEADLESS mode");
    info!("═══════════════════════════════════════════════════════");

    let mut engine = match startup::build_engine(settings, args) {
        Ok(engine) => engine,
        Err(e) => {
            HeadlessEvent::error(format!("Failed to start: {}", e), e.is_fatal()).emit();
            return Err(e);
        }
    };

    // Spawn headless-specific stdin reader
    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(stdin_tx);
    });

    engine.start(route, login_token);
    let mut tracker = ChangeTracker::new(&engine.state);
    HeadlessEvent::started(&tracker.last).emit();
    HeadlessEvent::state(tracker.last.clone()).emit();

    let result = headless_event_loop(&mut engine, &mut tracker).await;

    engine.shutdown();
    HeadlessEvent::stopped().emit();
    info!("instancer headless mode exiting");
    result
}

/// Main headless event loop
async fn headless_event_loop<A, C>(
    engine: &mut Engine<A, C>,
    tracker: &mut ChangeTracker,
) -> Result<()>
where
    A: InstancerApi + Send + Sync + 'static,
    C: CaptchaSolver + Send + Sync + 'static,
{
    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.msg_rx.recv().await {
            Some(msg) => {
                engine.process_message(msg);
                for event in tracker.observe(&engine.state) {
                    event.emit();
                }
            }
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Remembers what was last reported so only changes are emitted
struct ChangeTracker {
    last: StateSnapshot,
    last_countdown: Option<String>,
}

impl ChangeTracker {
    fn new(state: &AppState) -> Self {
        Self {
            last: StateSnapshot::capture(state),
            last_countdown: StateSnapshot::countdown(state),
        }
    }

    /// Events describing what changed since the previous call
    fn observe(&mut self, state: &AppState) -> Vec<HeadlessEvent> {
        let mut events = Vec::new();

        let snapshot = StateSnapshot::capture(state);
        if snapshot != self.last {
            self.last = snapshot.clone();
            events.push(HeadlessEvent::state(snapshot));
        }

        let countdown = StateSnapshot::countdown(state);
        if countdown != self.last_countdown {
            if let (Some(remaining), Some(view)) = (&countdown, &state.challenge) {
                events.push(HeadlessEvent::countdown(&view.id, remaining.clone()));
            }
            self.last_countdown = countdown;
        }

        events
    }
}

/// Read commands from stdin and forward them to the message channel (blocking)
fn spawn_stdin_reader_blocking(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            Ok(messages) => {
                for message in messages {
                    let quit = matches!(message, Message::Quit);
                    if msg_tx.blocking_send(message).is_err() {
                        return;
                    }
                    if quit {
                        info!("Stdin: quit requested");
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("Stdin: {}", e);
                HeadlessEvent::error(e, false).emit();
            }
        }
    }

    // EOF: nothing more will arrive, shut down like `quit`
    info!("Stdin reader exiting");
    let _ = msg_tx.blocking_send(Message::Quit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use instancer_api::test_utils::{test_challenge, test_deployment};
    use instancer_app::{ChallengeView, LoadState};
    use instancer_core::now_epoch;

    #[test]
    fn test_no_events_without_changes() {
        let state = AppState::new();
        let mut tracker = ChangeTracker::new(&state);
        assert!(tracker.observe(&state).is_empty());
    }

    #[test]
    fn test_state_change_emits_once() {
        let mut state = AppState::new();
        let mut tracker = ChangeTracker::new(&state);

        state.status = Some("Could not load challenges. Press r to retry.".into());
        let events = tracker.observe(&state);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], HeadlessEvent::State { .. }));

        assert!(tracker.observe(&state).is_empty());
    }

    #[test]
    fn test_countdown_change_emits_countdown_only() {
        let now = now_epoch();
        let mut state = AppState::new();
        state.session = Some("tok".into());
        state.route = Route::challenge("web-1");
        let mut view = ChallengeView::new("web-1");
        view.load = LoadState::Found(test_challenge("web-1"));
        view.deployment = Some(test_deployment(now, 600));
        let generation = view.resync_countdown(now).expect("live deployment");
        state.challenge = Some(view);

        let mut tracker = ChangeTracker::new(&state);

        if let Some(view) = state.challenge.as_mut() {
            view.countdown.tick(generation);
        }
        let events = tracker.observe(&state);

        assert_eq!(events.len(), 1);
        match &events[0] {
            HeadlessEvent::Countdown { id, remaining, .. } => {
                assert_eq!(id, "web-1");
                assert_eq!(remaining, "00:09:59");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
