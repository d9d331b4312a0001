//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `gate`: Session gate checks and login redirects
//! - `challenge`: Challenge loader, deployment controller and countdown ticks
//! - `catalog`: Catalog list, sidebar and search
//! - `account`: Login, registration and profile flows
//! - `keys`: Key event handlers per screen

pub(crate) mod account;
pub(crate) mod catalog;
pub(crate) mod challenge;
pub(crate) mod gate;
pub(crate) mod keys;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use crate::challenge_view::ControlAction;
use crate::message::Message;
use instancer_core::ProfileUpdate;

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Spawn a background task
    SpawnTask(Task),

    /// Obtain a fresh CAPTCHA token, then continue the deploy or extend
    SolveCaptcha {
        id: String,
        action: ControlAction,
        site_key: String,
    },

    /// (Re)start the countdown interval; any previous interval is aborted
    StartCountdown { id: String, generation: u64 },

    /// Abort the countdown interval
    StopCountdown,

    /// Write the session token to durable storage
    PersistSession { token: String },

    /// Remove the stored session token
    ForgetSession,
}

/// Background tasks; each reports back with exactly one completion message
/// (the loader reports up to two, in order)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    FetchChallenges {
        token: String,
    },
    /// Challenge fetch, then deployment fetch when the first succeeded
    LoadChallenge {
        id: String,
        token: String,
    },
    /// Deploy or extend
    Deploy {
        id: String,
        token: String,
        action: ControlAction,
        captcha_token: Option<String>,
    },
    Terminate {
        id: String,
        token: String,
    },
    ValidateSession {
        token: String,
    },
    Preview {
        login_token: String,
    },
    Login {
        login_token: String,
    },
    Register {
        username: String,
        email: String,
    },
    FetchProfile {
        token: String,
    },
    UpdateProfile {
        token: String,
        update: ProfileUpdate,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Perform `action`, then process `msg`
    pub fn action_then(action: UpdateAction, msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: Some(action),
        }
    }

    pub fn task(task: Task) -> Self {
        Self::action(UpdateAction::SpawnTask(task))
    }
}
