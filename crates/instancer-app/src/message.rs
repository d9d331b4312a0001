//! Message types for the application (TEA pattern)

use crate::catalog::CatalogFocus;
use crate::challenge_view::ControlAction;
use crate::input_key::InputKey;
use instancer_api::ApiResult;
use instancer_core::{ChallengeInfo, ChallengeSummary, Deployment, Profile, ProfileUpdate, Route};

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Quit immediately (q, Ctrl+C, signal handler)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Routing
    // ─────────────────────────────────────────────────────────
    /// Replace the current screen
    Navigate(Route),

    /// Run entry effects for the current route (gate check, fetches)
    EnterRoute,

    // ─────────────────────────────────────────────────────────
    // Challenge Loader
    // ─────────────────────────────────────────────────────────
    /// Re-run the loader for the challenge on screen
    LoadChallenge,

    ChallengeLoaded {
        id: String,
        result: ApiResult<ChallengeInfo>,
    },

    /// Only ever follows a successful `ChallengeLoaded` for the same id
    DeploymentLoaded {
        id: String,
        result: ApiResult<Option<Deployment>>,
    },

    // ─────────────────────────────────────────────────────────
    // Deployment Controller
    // ─────────────────────────────────────────────────────────
    /// Player pressed deploy, extend or terminate
    Control(ControlAction),

    CaptchaSolved {
        id: String,
        action: ControlAction,
        token: String,
    },

    CaptchaFailed {
        id: String,
        action: ControlAction,
        error: String,
    },

    /// Response to a deploy or extend request
    DeployCompleted {
        id: String,
        action: ControlAction,
        result: ApiResult<Deployment>,
    },

    TerminateCompleted {
        id: String,
        result: ApiResult<String>,
    },

    /// One-second tick from the countdown interval
    CountdownTick { id: String, generation: u64 },

    // ─────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────
    FetchChallenges,

    ChallengesLoaded {
        result: ApiResult<Vec<ChallengeSummary>>,
    },

    /// Move the list cursor by a number of rows
    CatalogCursor(isize),

    CatalogFocus(CatalogFocus),

    SidebarCursor(isize),

    SidebarToggle,

    SearchInput(char),

    SearchBackspace,

    /// Clear every include/exclude/search constraint
    ResetFilter,

    /// Open the challenge under the cursor
    OpenChallenge,

    // ─────────────────────────────────────────────────────────
    // Account screens
    // ─────────────────────────────────────────────────────────
    /// Character typed into the focused form field
    FormInput(char),

    FormBackspace,

    /// Switch between username and email
    FormNextField,

    /// Stored session checked on entering the login screen
    SessionValidated { result: ApiResult<Profile> },

    PreviewLoginToken,

    PreviewLoaded {
        login_token: String,
        result: ApiResult<String>,
    },

    LoginSubmit,

    LoginCompleted { result: ApiResult<String> },

    RegisterSubmit,

    RegisterCompleted { result: ApiResult<String> },

    FetchProfile,

    ProfileLoaded { result: ApiResult<Profile> },

    ProfileSubmit,

    ProfileUpdated {
        update: ProfileUpdate,
        result: ApiResult<String>,
    },

    /// Drop the session token and return to login
    Logout,
}
