//! Application state (Model in TEA pattern)

use crate::account::{LoginForm, ProfileState, RegisterForm};
use crate::catalog::CatalogState;
use crate::challenge_view::ChallengeView;
use crate::config::{ClientConfig, Settings};
use instancer_core::{AppPhase, Route};

/// Complete application state (the Model in TEA)
#[derive(Debug, Clone)]
pub struct AppState {
    pub phase: AppPhase,

    /// Screen currently shown
    pub route: Route,

    /// Session token; the only state shared across screens
    pub session: Option<String>,

    /// One-time login token handed in at startup, carried through redirects
    pub login_token_hint: Option<String>,

    /// Client configuration, fixed at startup
    pub client: ClientConfig,

    /// Present only while the challenge route is shown
    pub challenge: Option<ChallengeView>,

    pub catalog: CatalogState,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub profile: ProfileState,

    /// One-line status shown in the footer
    pub status: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            phase: AppPhase::Running,
            route: Route::Catalog,
            session: None,
            login_token_hint: None,
            client: ClientConfig::default(),
            challenge: None,
            catalog: CatalogState::new(),
            login: LoginForm::default(),
            register: RegisterForm::new(),
            profile: ProfileState::default(),
            status: None,
        }
    }

    /// Create state from loaded settings
    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            client: settings.client.clone(),
            ..Self::new()
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    /// Challenge view for `id`, if that challenge is still on screen
    pub fn challenge_mut(&mut self, id: &str) -> Option<&mut ChallengeView> {
        self.challenge.as_mut().filter(|view| view.id == id)
    }

    /// Drop the session and return where the gate sends the viewer
    pub fn expire_session(&mut self) -> Route {
        self.session = None;
        let chall = self.route.challenge_id().map(str::to_string);
        instancer_core::login_redirect(self.login_token_hint.as_deref(), chall.as_deref())
    }
}
