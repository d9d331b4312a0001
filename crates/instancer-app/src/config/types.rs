//! Configuration types for the instancer client
//!
//! Defines:
//! - `Settings` - Settings file contents (`config.toml`)
//! - `ClientConfig` - Front-end options published by the CTF (CAPTCHA, rCTF)
//! - Related sub-types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use instancer_core::prelude::*;

/// Global application settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub captcha: CaptchaSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

/// Instancer backend location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Base URL of the instancer (the API lives under `/api`)
    #[serde(default = "default_server_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerSettings {
    /// Parsed base URL
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(self.url.trim()).map_err(|_| Error::invalid_server_url(&self.url))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_server_url(&self.url));
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

/// Front-end options published by the CTF.
///
/// Read once at startup and immutable afterwards. Field names match the JSON
/// blob the web front end embeds in its page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Accounts are managed by an rCTF instance; login tokens come from there
    #[serde(default)]
    pub rctf_mode: bool,

    #[serde(default)]
    pub rctf_url: Option<String>,

    /// reCAPTCHA site key; when set, deploy and extend require a CAPTCHA token
    #[serde(default)]
    pub recaptcha_site_key: Option<String>,
}

impl ClientConfig {
    /// Parse the JSON form of the client configuration
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid client configuration JSON: {}", e)))
    }

    /// Site key when a CAPTCHA must accompany deploy requests
    pub fn captcha_site_key(&self) -> Option<&str> {
        self.recaptcha_site_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Where players obtain login tokens in rCTF mode
    pub fn rctf_login_hint(&self) -> Option<&str> {
        if !self.rctf_mode {
            return None;
        }
        self.rctf_url.as_deref().filter(|u| !u.is_empty())
    }
}

/// External CAPTCHA helper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptchaSettings {
    /// Program that prints a CAPTCHA assertion token on stdout
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    /// Seconds the helper may run before the attempt counts as failed
    #[serde(default = "default_captcha_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CaptchaSettings {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: default_captcha_timeout_secs(),
        }
    }
}

impl CaptchaSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn default_captcha_timeout_secs() -> u64 {
    120
}

/// UI settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiSettings {
    /// Event loop tick rate in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl UiSettings {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.clamp(10, 1_000))
    }
}

fn default_tick_rate_ms() -> u64 {
    50
}
