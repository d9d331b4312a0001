//! Wire protocol for the instancer REST API
//!
//! Every endpoint answers with a JSON object carrying a `status` string and an
//! endpoint-specific payload. Responses are decoded here, once, into
//! `Result<Payload, ApiError>` so the rest of the client never inspects raw
//! status strings.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use instancer_core::{ChallengeInfo, ChallengeSummary, Deployment, Profile};

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Message used when the server rejects a form without explaining why
const DEFAULT_REJECTION: &str = "Request rejected by server";

// ─────────────────────────────────────────────────────────
// Status vocabulary
// ─────────────────────────────────────────────────────────

/// The `status` field of a server response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiStatus {
    Ok,
    /// Backend cannot provision right now; the player may retry later
    TemporarilyUnavailable,
    InvalidCaptchaToken,
    MissingAuthorization,
    InvalidToken,
    Other(String),
}

impl ApiStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "ok" => ApiStatus::Ok,
            "temporarily_unavailable" => ApiStatus::TemporarilyUnavailable,
            "invalid_captcha_token" => ApiStatus::InvalidCaptchaToken,
            "missing_authorization" => ApiStatus::MissingAuthorization,
            "invalid_token" => ApiStatus::InvalidToken,
            other => ApiStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ApiStatus::Ok => "ok",
            ApiStatus::TemporarilyUnavailable => "temporarily_unavailable",
            ApiStatus::InvalidCaptchaToken => "invalid_captcha_token",
            ApiStatus::MissingAuthorization => "missing_authorization",
            ApiStatus::InvalidToken => "invalid_token",
            ApiStatus::Other(s) => s,
        }
    }

    /// Statuses meaning the session token is missing or no longer valid
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiStatus::MissingAuthorization | ApiStatus::InvalidToken
        )
    }
}

/// Why a request was treated as an authentication failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    MissingAuthorization,
    InvalidToken,
    /// A non-ok status on an endpoint where anything but success means the
    /// session cannot be trusted
    Status(String),
    /// Non-success HTTP code without a usable status
    Http(u16),
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthFailure::MissingAuthorization => f.write_str("missing_authorization"),
            AuthFailure::InvalidToken => f.write_str("invalid_token"),
            AuthFailure::Status(s) => f.write_str(s),
            AuthFailure::Http(code) => write!(f, "HTTP {}", code),
        }
    }
}

/// Decoded failure of an API call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("challenge not found")]
    NotFound,

    #[error("authentication failed ({0})")]
    Unauthorized(AuthFailure),

    #[error("challenge deployment temporarily unavailable")]
    TemporarilyUnavailable,

    #[error("invalid CAPTCHA token")]
    InvalidCaptcha,

    /// A form submission the server refused, with its explanation
    #[error("{msg}")]
    Rejected { status: String, msg: String },

    #[error("unexpected response (HTTP {http}, status {status:?})")]
    Unexpected { http: u16, status: String },

    /// The request never produced a response
    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Failures below the status vocabulary (no usable response)
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Decode(_))
    }
}

// ─────────────────────────────────────────────────────────
// Response envelope
// ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct StatusFields {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

/// A response split into HTTP code, status and payload
#[derive(Debug)]
struct Reply {
    http: u16,
    value: Option<serde_json::Value>,
    status: Option<ApiStatus>,
    msg: Option<String>,
    parse_error: Option<String>,
}

impl Reply {
    fn parse(http: u16, body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => {
                let fields = StatusFields::deserialize(&value).unwrap_or_default();
                Self {
                    http,
                    status: fields.status.as_deref().map(ApiStatus::parse),
                    msg: fields.msg,
                    value: Some(value),
                    parse_error: None,
                }
            }
            Err(e) => Self {
                http,
                value: None,
                status: None,
                msg: None,
                parse_error: Some(e.to_string()),
            },
        }
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.http)
    }

    fn is_ok(&self) -> bool {
        self.is_success() && self.status == Some(ApiStatus::Ok)
    }

    fn status_str(&self) -> String {
        self.status
            .as_ref()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default()
    }

    /// Deserialize `field` of the body; a missing field reads as `null`
    fn field<T: DeserializeOwned>(&self, field: &str) -> ApiResult<T> {
        let value = self.value.as_ref().ok_or_else(|| self.decode_error())?;
        let raw = value.get(field).cloned().unwrap_or(serde_json::Value::Null);
        serde_json::from_value(raw).map_err(|e| ApiError::Decode(format!("{}: {}", field, e)))
    }

    fn whole<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let value = self.value.clone().ok_or_else(|| self.decode_error())?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn decode_error(&self) -> ApiError {
        ApiError::Decode(
            self.parse_error
                .clone()
                .unwrap_or_else(|| "empty response body".to_string()),
        )
    }

    fn auth_failure(&self) -> AuthFailure {
        match &self.status {
            Some(ApiStatus::MissingAuthorization) => AuthFailure::MissingAuthorization,
            Some(ApiStatus::InvalidToken) => AuthFailure::InvalidToken,
            Some(ApiStatus::Ok) | None => AuthFailure::Http(self.http),
            Some(other) => AuthFailure::Status(other.as_str().to_string()),
        }
    }

    fn is_auth_failure(&self) -> bool {
        self.http == 401 || self.status.as_ref().is_some_and(ApiStatus::is_auth_failure)
    }

    fn rejected(&self) -> ApiError {
        ApiError::Rejected {
            status: self.status_str(),
            msg: self
                .msg
                .clone()
                .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
        }
    }

    fn unexpected(&self) -> ApiError {
        ApiError::Unexpected {
            http: self.http,
            status: self.status_str(),
        }
    }
}

// ─────────────────────────────────────────────────────────
// Per-endpoint decoding (Free Functions)
// ─────────────────────────────────────────────────────────

/// `GET /api/challenges`
///
/// Anything but `ok` sends the viewer back to login.
pub fn decode_challenges(http: u16, body: &str) -> ApiResult<Vec<ChallengeSummary>> {
    let reply = Reply::parse(http, body);
    if reply.is_ok() {
        reply.field("challenges")
    } else if reply.is_success() && reply.value.is_none() {
        Err(reply.decode_error())
    } else {
        Err(ApiError::Unauthorized(reply.auth_failure()))
    }
}

/// `GET /api/challenge/{id}`
///
/// 404 is the terminal not-found state; any other failure is an
/// authentication failure.
pub fn decode_challenge(http: u16, body: &str) -> ApiResult<ChallengeInfo> {
    if http == 404 {
        return Err(ApiError::NotFound);
    }
    let reply = Reply::parse(http, body);
    if reply.is_ok() {
        reply.field("challenge_info")
    } else if reply.is_success() && reply.value.is_none() {
        Err(reply.decode_error())
    } else {
        Err(ApiError::Unauthorized(reply.auth_failure()))
    }
}

/// `GET /api/challenge/{id}/deployment`
///
/// `ok` with a null or absent deployment means nothing is running.
pub fn decode_deployment(http: u16, body: &str) -> ApiResult<Option<Deployment>> {
    let reply = Reply::parse(http, body);
    if reply.is_ok() {
        reply.field("deployment")
    } else if reply.is_success() && reply.value.is_none() {
        Err(reply.decode_error())
    } else {
        Err(ApiError::Unauthorized(reply.auth_failure()))
    }
}

/// `POST /api/challenge/{id}/deploy` (deploy and extend)
pub fn decode_deploy(http: u16, body: &str) -> ApiResult<Deployment> {
    let reply = Reply::parse(http, body);
    match &reply.status {
        Some(ApiStatus::Ok) if reply.is_success() => reply
            .field::<Option<Deployment>>("deployment")?
            .ok_or_else(|| ApiError::Decode("ok response without deployment".to_string())),
        Some(ApiStatus::TemporarilyUnavailable) => Err(ApiError::TemporarilyUnavailable),
        Some(ApiStatus::InvalidCaptchaToken) => Err(ApiError::InvalidCaptcha),
        _ if reply.is_auth_failure() => Err(ApiError::Unauthorized(reply.auth_failure())),
        None if reply.is_success() => Err(reply.decode_error()),
        _ => Err(reply.unexpected()),
    }
}

/// `DELETE /api/challenge/{id}/deployment`
pub fn decode_terminate(http: u16, body: &str) -> ApiResult<String> {
    let reply = Reply::parse(http, body);
    if reply.is_ok() {
        Ok(reply.msg.clone().unwrap_or_default())
    } else if reply.is_auth_failure() {
        Err(ApiError::Unauthorized(reply.auth_failure()))
    } else {
        Err(reply.unexpected())
    }
}

/// `POST /api/accounts/login` and `POST /api/accounts/register`
///
/// Success is a 200 carrying a `token`; failures carry a human `msg`.
pub fn decode_token(http: u16, body: &str) -> ApiResult<String> {
    let reply = Reply::parse(http, body);
    if http == 200 {
        if let Ok(Some(token)) = reply.field::<Option<String>>("token") {
            return Ok(token);
        }
        if reply.value.is_none() {
            return Err(reply.decode_error());
        }
    }
    Err(reply.rejected())
}

/// `GET /api/accounts/profile`; any non-200 invalidates the session
pub fn decode_profile(http: u16, body: &str) -> ApiResult<Profile> {
    let reply = Reply::parse(http, body);
    if http == 200 {
        reply.whole()
    } else {
        Err(ApiError::Unauthorized(reply.auth_failure()))
    }
}

/// `PATCH /api/accounts/profile`
pub fn decode_profile_update(http: u16, body: &str) -> ApiResult<String> {
    let reply = Reply::parse(http, body);
    if http == 200 {
        Ok(reply.msg.clone().unwrap_or_default())
    } else if reply.is_auth_failure() {
        Err(ApiError::Unauthorized(reply.auth_failure()))
    } else {
        Err(reply.rejected())
    }
}

/// `GET /api/accounts/preview?login_token=`; non-200 means the token is invalid
pub fn decode_preview(http: u16, body: &str) -> ApiResult<String> {
    let reply = Reply::parse(http, body);
    if http == 200 {
        if let Ok(Some(team)) = reply.field::<Option<String>>("team_name") {
            return Ok(team);
        }
    }
    Err(reply.rejected())
}
