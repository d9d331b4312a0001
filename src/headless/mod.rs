//! Headless mode - JSON event output for scripting and E2E testing
//!
//! Instead of drawing the TUI, the client prints NDJSON events to stdout and
//! reads line commands (`open web-1`, `deploy`, `quit`, ...) from stdin.
//!
//! # Example Output
//!
//! ```json
//! {"event":"started","route":"/chall/web-1/","logged_in":true,"timestamp":1704700001000}
//! {"event":"state","route":"/chall/web-1/","logged_in":true,"challenge":{"id":"web-1","load":"found",...},"timestamp":1704700001200}
//! {"event":"error","message":"unknown command: fly","fatal":false,"timestamp":1704700002000}
//! ```

pub mod commands;
pub mod runner;

use chrono::Utc;
use serde::Serialize;
use std::io::{self, Write};
use tracing::error;

use instancer_app::StateSnapshot;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// First route entered
    Started {
        route: String,
        logged_in: bool,
        timestamp: i64,
    },

    /// Observable state changed
    State {
        #[serde(flatten)]
        snapshot: StateSnapshot,
        timestamp: i64,
    },

    /// Countdown display for the challenge on screen
    Countdown {
        id: String,
        remaining: String,
        timestamp: i64,
    },

    /// Bad command or startup failure
    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },

    Stopped { timestamp: i64 },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        // Write to stdout with newline (NDJSON format)
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn started(snapshot: &StateSnapshot) -> Self {
        Self::Started {
            route: snapshot.route.clone(),
            logged_in: snapshot.logged_in,
            timestamp: Self::now(),
        }
    }

    pub fn state(snapshot: StateSnapshot) -> Self {
        Self::State {
            snapshot,
            timestamp: Self::now(),
        }
    }

    pub fn countdown(id: &str, remaining: String) -> Self {
        Self::Countdown {
            id: id.to_string(),
            remaining,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }

    pub fn stopped() -> Self {
        Self::Stopped {
            timestamp: Self::now(),
        }
    }
}
