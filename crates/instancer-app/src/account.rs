//! Login, registration and profile screens
//!
//! Form state plus the client-side checks applied before a request is sent.
//! The server re-validates everything; these checks only save a round trip.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use instancer_core::{Profile, ProfileUpdate};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 100;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid email regex")
});

/// A form value rejected before submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a login token")]
    MissingLoginToken,

    #[error("Username must be between 3 and 100 characters")]
    UsernameLength,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Nothing to update")]
    NothingChanged,
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.trim().chars().count();
    if (USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::UsernameLength)
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

// ─────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────

/// Login screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// One-time login token being typed or prefilled from a login link
    pub token: String,
    /// Challenge to return to after login
    pub chall: Option<String>,
    /// Team name the token belongs to, once previewed
    pub preview: Option<String>,
    pub submitting: bool,
    /// A stored session is being checked before showing the form
    pub validating_session: bool,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new(token: Option<String>, chall: Option<String>) -> Self {
        Self {
            token: token.unwrap_or_default(),
            chall,
            ..Default::default()
        }
    }

    /// Token to submit, trimmed
    pub fn login_token(&self) -> Result<&str, ValidationError> {
        let token = self.token.trim();
        if token.is_empty() {
            Err(ValidationError::MissingLoginToken)
        } else {
            Ok(token)
        }
    }

    pub fn push(&mut self, c: char) {
        self.token.push(c);
        self.preview = None;
        self.error = None;
    }

    pub fn pop(&mut self) {
        self.token.pop();
        self.preview = None;
        self.error = None;
    }
}

// ─────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────

/// Two-field form focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccountField {
    #[default]
    Username,
    Email,
}

impl AccountField {
    pub fn next(self) -> Self {
        match self {
            AccountField::Username => AccountField::Email,
            AccountField::Email => AccountField::Username,
        }
    }
}

/// Registration screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub focus: AccountField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            AccountField::Username => &mut self.username,
            AccountField::Email => &mut self.email,
        }
    }

    pub fn push(&mut self, c: char) {
        self.field_mut().push(c);
        self.error = None;
    }

    pub fn pop(&mut self) {
        self.field_mut().pop();
        self.error = None;
    }

    /// Validated `(username, email)`
    pub fn submission(&self) -> Result<(String, String), ValidationError> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        Ok((
            self.username.trim().to_string(),
            self.email.trim().to_string(),
        ))
    }
}

// ─────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────

/// Profile screen: the loaded profile plus edit buffers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    pub loading: bool,
    pub profile: Option<Profile>,
    pub username: String,
    pub email: String,
    pub focus: AccountField,
    pub submitting: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl ProfileState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    /// Show a freshly fetched profile and reset the edit buffers to it
    pub fn set_profile(&mut self, profile: Profile) {
        self.username = profile.username.clone().unwrap_or_default();
        self.email = profile.email.clone().unwrap_or_default();
        self.profile = Some(profile);
        self.loading = false;
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            AccountField::Username => &mut self.username,
            AccountField::Email => &mut self.email,
        }
    }

    pub fn push(&mut self, c: char) {
        self.field_mut().push(c);
        self.notice = None;
        self.error = None;
    }

    pub fn pop(&mut self) {
        self.field_mut().pop();
        self.notice = None;
        self.error = None;
    }

    /// Changed fields, validated
    pub fn pending_update(&self) -> Result<ProfileUpdate, ValidationError> {
        let current = self.profile.clone().unwrap_or_default();
        let username = self.username.trim();
        let email = self.email.trim();

        let mut update = ProfileUpdate::default();
        if current.username.as_deref().unwrap_or_default() != username {
            validate_username(username)?;
            update.username = Some(username.to_string());
        }
        if current.email.as_deref().unwrap_or_default() != email {
            validate_email(email)?;
            update.email = Some(email.to_string());
        }

        if update.is_empty() {
            Err(ValidationError::NothingChanged)
        } else {
            Ok(update)
        }
    }

    /// Fold an accepted update into the displayed profile
    pub fn apply_update(&mut self, update: &ProfileUpdate) {
        if let Some(profile) = self.profile.as_mut() {
            if let Some(username) = &update.username {
                profile.username = Some(username.clone());
            }
            if let Some(email) = &update.email {
                profile.email = Some(email.clone());
            }
        }
    }
}
