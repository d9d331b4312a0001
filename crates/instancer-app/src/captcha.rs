//! Human verification for deploy requests
//!
//! A terminal cannot host a reCAPTCHA widget, so assertion tokens come from an
//! external helper program. Every call to `solve` runs the helper again; a
//! token is handed to exactly one request.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::config::CaptchaSettings;
use instancer_core::prelude::*;

/// Environment variable carrying the site key to the helper
pub const SITE_KEY_ENV: &str = "INSTANCER_CAPTCHA_SITE_KEY";
/// Environment variable carrying the action name (`deploy` or `extend`)
pub const ACTION_ENV: &str = "INSTANCER_CAPTCHA_ACTION";

/// Obtains CAPTCHA assertion tokens
#[trait_variant::make(CaptchaSolver: Send)]
pub trait LocalCaptchaSolver {
    /// Produce a fresh token for `site_key`
    async fn solve(&self, site_key: &str, action: &str) -> Result<String>;
}

/// Runs a helper program and reads the token from its stdout.
///
/// A helper still running after `timeout` is killed and the attempt fails,
/// so the control that asked for the token is released.
#[derive(Debug, Clone)]
pub struct CommandCaptchaSolver {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCaptchaSolver {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            timeout: CaptchaSettings::default().timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl CaptchaSolver for CommandCaptchaSolver {
    async fn solve(&self, site_key: &str, action: &str) -> Result<String> {
        debug!("Running CAPTCHA helper {:?} for {}", self.command, action);

        let run = Command::new(&self.command)
            .args(&self.args)
            .env(SITE_KEY_ENV, site_key)
            .env(ACTION_ENV, action)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| {
                warn!("CAPTCHA helper {:?} timed out after {:?}", self.command, self.timeout);
                Error::captcha(format!(
                    "{} did not finish within {}s",
                    self.command,
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| Error::captcha(format!("failed to run {}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::captcha(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(Error::captcha(format!("{} printed no token", self.command)));
        }
        Ok(token)
    }
}

/// Solver used when no helper is configured; every attempt fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCaptcha;

impl CaptchaSolver for NoCaptcha {
    async fn solve(&self, _site_key: &str, _action: &str) -> Result<String> {
        Err(Error::captcha("no CAPTCHA helper configured"))
    }
}

/// Solver selected from settings
#[derive(Debug, Clone)]
pub enum ConfiguredCaptcha {
    Command(CommandCaptchaSolver),
    Disabled(NoCaptcha),
}

impl ConfiguredCaptcha {
    pub fn from_settings(settings: &CaptchaSettings) -> Self {
        match settings.command.as_deref().map(str::trim) {
            Some(command) if !command.is_empty() => {
                ConfiguredCaptcha::Command(
                    CommandCaptchaSolver::new(command, settings.args.clone())
                        .with_timeout(settings.timeout()),
                )
            }
            _ => ConfiguredCaptcha::Disabled(NoCaptcha),
        }
    }
}

impl CaptchaSolver for ConfiguredCaptcha {
    async fn solve(&self, site_key: &str, action: &str) -> Result<String> {
        match self {
            ConfiguredCaptcha::Command(solver) => CaptchaSolver::solve(solver, site_key, action).await,
            ConfiguredCaptcha::Disabled(solver) => CaptchaSolver::solve(solver, site_key, action).await,
        }
    }
}
