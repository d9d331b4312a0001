//! Screen routes and the session gate's redirect rules
//!
//! Routes round-trip through the same path shapes the web front end uses
//! (`/chall/{id}/`, `/login?token=..&chall=..`), so login URLs issued by the
//! server can be pasted straight into the client.

use std::fmt;
use std::sync::LazyLock;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use url::Url;

/// Characters left unescaped by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const PARSE_BASE: &str = "http://instancer.invalid/";

static CHALLENGE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-zA-Z-]+$").expect("Invalid challenge id regex"));

/// Every screen the client can show
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Challenge catalog with the filter sidebar
    #[default]
    Catalog,
    /// Challenge detail with deployment controls
    Challenge { id: String },
    /// Login form; `token` is a one-time login token, `chall` the return target
    Login {
        token: Option<String>,
        chall: Option<String>,
    },
    Register,
    Profile,
}

impl Route {
    pub fn challenge(id: impl Into<String>) -> Self {
        Route::Challenge { id: id.into() }
    }

    /// Render the route as a path with a percent-encoded query
    pub fn path(&self) -> String {
        match self {
            Route::Catalog => "/challs".to_string(),
            Route::Challenge { id } => format!("/chall/{}/", encode(id)),
            Route::Login { token, chall } => {
                let params: Vec<String> = [("token", token), ("chall", chall)]
                    .into_iter()
                    .filter_map(|(key, value)| {
                        value.as_deref().map(|v| format!("{}={}", key, encode(v)))
                    })
                    .collect();
                if params.is_empty() {
                    "/login".to_string()
                } else {
                    format!("/login?{}", params.join("&"))
                }
            }
            Route::Register => "/register".to_string(),
            Route::Profile => "/profile".to_string(),
        }
    }

    /// Parse a relative path (`/chall/x/`) or an absolute URL
    /// (`https://ctf.example/login?token=..`). Unknown paths yield `None`.
    pub fn parse(input: &str) -> Option<Route> {
        let base = Url::parse(PARSE_BASE).ok()?;
        let url = base.join(input.trim()).ok()?;
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        let query = |key: &str| {
            url.query_pairs()
                .find(|(k, v)| k == key && !v.is_empty())
                .map(|(_, v)| v.into_owned())
        };

        match segments.as_slice() {
            [] | ["challs"] => Some(Route::Catalog),
            ["chall", id] => {
                let id = percent_decode_str(id).decode_utf8().ok()?.into_owned();
                Some(Route::Challenge { id })
            }
            ["login"] => Some(Route::Login {
                token: query("token"),
                chall: query("chall"),
            }),
            ["register"] => Some(Route::Register),
            ["profile"] => Some(Route::Profile),
            _ => None,
        }
    }

    /// Challenge id when this is a challenge route
    pub fn challenge_id(&self) -> Option<&str> {
        match self {
            Route::Challenge { id } => Some(id),
            _ => None,
        }
    }

    /// Routes that require a session token before any side effect
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Route::Catalog | Route::Challenge { .. } | Route::Profile
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Whether `id` may be reused as a redirect target (alphanumerics and `-`)
pub fn is_valid_challenge_id(id: &str) -> bool {
    CHALLENGE_ID.is_match(id)
}

/// Where an unauthenticated viewer is sent.
///
/// The one-time login token and the return target travel along; a return
/// target that fails validation is dropped so the redirect cannot be steered.
pub fn login_redirect(login_token: Option<&str>, chall: Option<&str>) -> Route {
    Route::Login {
        token: login_token.filter(|t| !t.is_empty()).map(str::to_string),
        chall: chall
            .filter(|c| is_valid_challenge_id(c))
            .map(str::to_string),
    }
}

/// Where a freshly authenticated viewer lands: the requested challenge when
/// its id validates, otherwise the profile page.
pub fn post_login_route(chall: Option<&str>) -> Route {
    match chall {
        Some(id) if is_valid_challenge_id(id) => Route::challenge(id),
        _ => Route::Profile,
    }
}
