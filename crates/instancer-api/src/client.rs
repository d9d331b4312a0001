//! Instancer REST client
//!
//! [`InstancerApi`] is the seam between the app layer and the network. The
//! HTTP implementation sends requests with reqwest and hands the raw response
//! to the decoders in [`crate::protocol`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use tracing::{debug, trace, warn};
use url::Url;

use instancer_core::prelude::*;
use instancer_core::{ChallengeInfo, ChallengeSummary, Deployment, Profile, ProfileUpdate};

use crate::protocol::{self, ApiError, ApiResult};

/// Operations the client performs against the instancer backend.
///
/// `token` is the session token, sent as `Authorization: Bearer`.
#[trait_variant::make(InstancerApi: Send)]
pub trait LocalInstancerApi {
    /// `GET /api/challenges`
    async fn challenges(&self, token: &str) -> ApiResult<Vec<ChallengeSummary>>;

    /// `GET /api/challenge/{id}`
    async fn challenge(&self, token: &str, id: &str) -> ApiResult<ChallengeInfo>;

    /// `GET /api/challenge/{id}/deployment`
    async fn deployment(&self, token: &str, id: &str) -> ApiResult<Option<Deployment>>;

    /// `POST /api/challenge/{id}/deploy`, used for both deploy and extend
    async fn deploy(
        &self,
        token: &str,
        id: &str,
        captcha_token: Option<&str>,
    ) -> ApiResult<Deployment>;

    /// `DELETE /api/challenge/{id}/deployment`
    async fn terminate(&self, token: &str, id: &str) -> ApiResult<String>;

    /// Exchange a one-time login token for a session token
    async fn login(&self, login_token: &str) -> ApiResult<String>;

    /// Create a team; returns its session token
    async fn register(&self, username: &str, email: &str) -> ApiResult<String>;

    async fn profile(&self, token: &str) -> ApiResult<Profile>;

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> ApiResult<String>;

    /// Team name a login token belongs to, without logging in
    async fn preview(&self, login_token: &str) -> ApiResult<String>;
}

#[derive(Debug, Serialize)]
struct DeployBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    captcha_token: Option<&'a str>,
}

/// reqwest-backed [`InstancerApi`]
#[derive(Debug, Clone)]
pub struct HttpInstancerClient {
    base_url: Url,
    http: Client,
}

impl HttpInstancerClient {
    /// Build a client for the server at `base_url`.
    ///
    /// `timeout` bounds every request; an elapsed timeout surfaces as
    /// [`ApiError::Network`].
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(Error::invalid_server_url(base_url.as_str()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("instancer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        debug!("API client targeting {}", base_url);
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, escaping each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn challenge_endpoint(&self, id: &str, rest: &[&str]) -> Url {
        let mut segments = vec!["api", "challenge", id];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and read the status code and body
    async fn execute(&self, request: RequestBuilder) -> ApiResult<(u16, String)> {
        let response = request.send().await.map_err(|e| {
            warn!("Request failed: {}", e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let url = response.url().path().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        trace!("{} -> HTTP {} ({} bytes)", url, status, body.len());
        Ok((status, body))
    }
}

impl InstancerApi for HttpInstancerClient {
    async fn challenges(&self, token: &str) -> ApiResult<Vec<ChallengeSummary>> {
        let url = self.endpoint(&["api", "challenges"]);
        let (http, body) = self
            .execute(self.request(Method::GET, url, Some(token)))
            .await?;
        protocol::decode_challenges(http, &body)
    }

    async fn challenge(&self, token: &str, id: &str) -> ApiResult<ChallengeInfo> {
        let url = self.challenge_endpoint(id, &[]);
        let (http, body) = self
            .execute(self.request(Method::GET, url, Some(token)))
            .await?;
        protocol::decode_challenge(http, &body)
    }

    async fn deployment(&self, token: &str, id: &str) -> ApiResult<Option<Deployment>> {
        let url = self.challenge_endpoint(id, &["deployment"]);
        let (http, body) = self
            .execute(self.request(Method::GET, url, Some(token)))
            .await?;
        protocol::decode_deployment(http, &body)
    }

    async fn deploy(
        &self,
        token: &str,
        id: &str,
        captcha_token: Option<&str>,
    ) -> ApiResult<Deployment> {
        let url = self.challenge_endpoint(id, &["deploy"]);
        let request = self
            .request(Method::POST, url, Some(token))
            .json(&DeployBody { captcha_token });
        let (http, body) = self.execute(request).await?;
        protocol::decode_deploy(http, &body)
    }

    async fn terminate(&self, token: &str, id: &str) -> ApiResult<String> {
        let url = self.challenge_endpoint(id, &["deployment"]);
        let (http, body) = self
            .execute(self.request(Method::DELETE, url, Some(token)))
            .await?;
        protocol::decode_terminate(http, &body)
    }

    async fn login(&self, login_token: &str) -> ApiResult<String> {
        let url = self.endpoint(&["api", "accounts", "login"]);
        let request = self
            .request(Method::POST, url, None)
            .form(&[("login_token", login_token)]);
        let (http, body) = self.execute(request).await?;
        protocol::decode_token(http, &body)
    }

    async fn register(&self, username: &str, email: &str) -> ApiResult<String> {
        let url = self.endpoint(&["api", "accounts", "register"]);
        let request = self
            .request(Method::POST, url, None)
            .form(&[("username", username), ("email", email)]);
        let (http, body) = self.execute(request).await?;
        protocol::decode_token(http, &body)
    }

    async fn profile(&self, token: &str) -> ApiResult<Profile> {
        let url = self.endpoint(&["api", "accounts", "profile"]);
        let (http, body) = self
            .execute(self.request(Method::GET, url, Some(token)))
            .await?;
        protocol::decode_profile(http, &body)
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> ApiResult<String> {
        let url = self.endpoint(&["api", "accounts", "profile"]);
        let request = self.request(Method::PATCH, url, Some(token)).form(update);
        let (http, body) = self.execute(request).await?;
        protocol::decode_profile_update(http, &body)
    }

    async fn preview(&self, login_token: &str) -> ApiResult<String> {
        let mut url = self.endpoint(&["api", "accounts", "preview"]);
        url.query_pairs_mut().append_pair("login_token", login_token);
        let (http, body) = self.execute(self.request(Method::GET, url, None)).await?;
        protocol::decode_preview(http, &body)
    }
}
