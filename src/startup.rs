//! Startup: settings overrides, first route, and engine construction

use instancer_api::HttpInstancerClient;
use instancer_app::config::{load_settings, ClientConfig, Settings};
use instancer_app::{ConfiguredCaptcha, Engine, TokenStore};
use instancer_core::prelude::*;
use instancer_core::Route;

use crate::Args;

pub type AppEngine = Engine<HttpInstancerClient, ConfiguredCaptcha>;

/// Settings file plus command-line overrides
pub fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_settings(args.config.as_deref());

    if let Some(server) = &args.server {
        settings.server.url = server.clone();
    }
    if let Some(json) = &args.client_conf {
        settings.client = ClientConfig::from_json(json).context("--client-conf")?;
    }

    // Fail early on an unusable server URL
    let base_url = settings.server.base_url().context("Server URL")?;
    info!("Instancer server: {}", base_url);

    Ok(settings)
}

/// First screen: a login link wins, then `--chall`, then the catalog.
///
/// Whatever is chosen still passes through the session gate.
pub fn initial_route(args: &Args) -> Route {
    if let Some(link) = &args.login_url {
        match Route::parse(link) {
            Some(route @ Route::Login { .. }) => return route,
            Some(other) => warn!("--login-url is not a login link ({}), ignoring", other),
            None => warn!("Could not parse --login-url {:?}, ignoring", link),
        }
    }

    match &args.chall {
        Some(id) => Route::challenge(id.trim()),
        None => Route::Catalog,
    }
}

pub fn build_engine(settings: &Settings, args: &Args) -> Result<AppEngine> {
    let api = HttpInstancerClient::new(settings.server.base_url()?, settings.server.timeout())
        .context("Failed to create API client")?;
    let captcha = ConfiguredCaptcha::from_settings(&settings.captcha);

    let token_store = if args.no_store {
        None
    } else {
        TokenStore::default_path().map(TokenStore::new)
    };
    if token_store.is_none() {
        info!("Session will not be persisted");
    }

    Ok(Engine::new(settings, api, captcha, token_store))
}
