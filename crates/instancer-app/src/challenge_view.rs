//! Per-challenge view state: loader result, deployment, controller flags and
//! the countdown
//!
//! The view owns no booleans that could go stale against the deployment.
//! "Deployed" and the controller state are derived on demand from the latest
//! deployment and the busy flags.

use instancer_core::{
    is_deployed, present_ports, seconds_remaining, ChallengeInfo, Deployment, PortsView,
};

/// Shown when the backend cannot provision right now
pub const MSG_TEMPORARILY_UNAVAILABLE: &str =
    "This challenge is temporarily unavailable. Try again in a few moments.";
/// Shown when the backend rejected the CAPTCHA token
pub const MSG_INVALID_CAPTCHA: &str =
    "CAPTCHA verification failed. Complete the CAPTCHA again, then retry.";
/// Shown when no CAPTCHA token could be obtained
pub const MSG_CAPTCHA_FAILED: &str = "Could not complete the CAPTCHA. Please try again.";
/// Shown for unexpected responses and network failures
pub const MSG_GENERIC: &str = "Something went wrong. Please try again.";

/// Challenge metadata fetch outcome
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Found(ChallengeInfo),
    /// Terminal; never retried
    NotFound,
}

/// A deployment-mutating request the player can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Deploy,
    Extend,
    Terminate,
}

impl ControlAction {
    /// Name passed to the CAPTCHA helper and used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlAction::Deploy => "deploy",
            ControlAction::Extend => "extend",
            ControlAction::Terminate => "terminate",
        }
    }

    /// Deploy and extend carry a CAPTCHA token when a site key is configured
    pub fn needs_captcha(&self) -> bool {
        matches!(self, ControlAction::Deploy | ControlAction::Extend)
    }
}

impl std::fmt::Display for ControlAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One busy flag per control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlags {
    pub deploy: bool,
    pub extend: bool,
    pub terminate: bool,
}

impl BusyFlags {
    pub fn get(&self, action: ControlAction) -> bool {
        match action {
            ControlAction::Deploy => self.deploy,
            ControlAction::Extend => self.extend,
            ControlAction::Terminate => self.terminate,
        }
    }

    pub fn set(&mut self, action: ControlAction, busy: bool) {
        match action {
            ControlAction::Deploy => self.deploy = busy,
            ControlAction::Extend => self.extend = busy,
            ControlAction::Terminate => self.terminate = busy,
        }
    }

    pub fn any(&self) -> bool {
        self.deploy || self.extend || self.terminate
    }
}

/// Derived controller state; never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Deploying,
    Deployed,
    Extending,
    Terminating,
}

/// Outcome of applying one interval tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick from a superseded interval; nothing changed
    Stale,
    Running,
    /// Reached zero; the timer stopped itself
    Elapsed,
}

/// Local countdown seeded from a deployment's expiration.
///
/// Every reseed or stop bumps `generation`, so ticks still queued from an
/// earlier interval are recognised and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    pub remaining: i64,
    pub generation: u64,
    pub running: bool,
}

impl Countdown {
    /// Start over from `remaining` seconds; returns the new generation
    pub fn reseed(&mut self, remaining: i64) -> u64 {
        self.generation += 1;
        self.remaining = remaining;
        self.running = true;
        self.generation
    }

    /// Stop and reset to zero
    pub fn stop(&mut self) {
        self.generation += 1;
        self.remaining = 0;
        self.running = false;
    }

    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        if !self.running || generation != self.generation {
            return TickOutcome::Stale;
        }
        self.remaining -= 1;
        if self.remaining <= 0 {
            self.remaining = 0;
            self.running = false;
            TickOutcome::Elapsed
        } else {
            TickOutcome::Running
        }
    }
}

/// State of the challenge detail screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeView {
    pub id: String,
    pub load: LoadState,
    pub deployment: Option<Deployment>,
    pub busy: BusyFlags,
    /// Transient failure highlight; cleared when the next attempt starts
    pub shake: bool,
    pub error: Option<String>,
    /// Confirmation text from the last successful action
    pub notice: Option<String>,
    pub countdown: Countdown,
}

impl ChallengeView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            load: LoadState::Loading,
            deployment: None,
            busy: BusyFlags::default(),
            shake: false,
            error: None,
            notice: None,
            countdown: Countdown::default(),
        }
    }

    pub fn info(&self) -> Option<&ChallengeInfo> {
        match &self.load {
            LoadState::Found(info) => Some(info),
            _ => None,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.info().is_some_and(|i| i.is_shared)
    }

    pub fn is_deployed(&self, now: i64) -> bool {
        is_deployed(self.deployment.as_ref(), now)
    }

    pub fn controller_state(&self, now: i64) -> ControllerState {
        if self.busy.terminate {
            ControllerState::Terminating
        } else if self.busy.extend {
            ControllerState::Extending
        } else if self.busy.deploy {
            ControllerState::Deploying
        } else if self.is_deployed(now) {
            ControllerState::Deployed
        } else {
            ControllerState::Idle
        }
    }

    /// Whether `action` may be issued right now.
    ///
    /// At most one deployment-mutating request is in flight per view, and
    /// shared challenges cannot be extended or terminated by a single player.
    pub fn can(&self, action: ControlAction, now: i64) -> bool {
        if self.info().is_none() || self.busy.any() {
            return false;
        }
        let deployed = self.is_deployed(now);
        match action {
            ControlAction::Deploy => !deployed,
            ControlAction::Extend | ControlAction::Terminate => deployed && !self.is_shared(),
        }
    }

    /// Mark `action` in flight and clear feedback from the previous attempt
    pub fn begin(&mut self, action: ControlAction) {
        self.busy.set(action, true);
        self.shake = false;
        self.error = None;
        self.notice = None;
    }

    /// Settle a failed `action`: re-enable the control and raise feedback
    pub fn fail(&mut self, action: ControlAction, message: &str) {
        self.busy.set(action, false);
        self.shake = true;
        self.error = Some(message.to_string());
    }

    /// Seed the countdown from the current deployment.
    ///
    /// Returns the new generation when a live deployment is present; otherwise
    /// the countdown is stopped and `None` is returned.
    pub fn resync_countdown(&mut self, now: i64) -> Option<u64> {
        match self.deployment.as_ref().filter(|d| d.is_live(now)) {
            Some(d) => Some(self.countdown.reseed(seconds_remaining(d.expiration, now))),
            None => {
                self.countdown.stop();
                None
            }
        }
    }

    /// Connection entries, only while deployed
    pub fn ports(&self, now: i64) -> Option<PortsView> {
        self.deployment
            .as_ref()
            .filter(|d| d.is_live(now))
            .map(|d| present_ports(d, now))
    }
}
