//! Test utilities for API consumers
//!
//! [`FakeApi`] answers from per-endpoint queues of scripted results and keeps
//! a log of the calls it received. An empty queue answers with a network
//! error so a missing script shows up as a visible failure.

use std::collections::VecDeque;
use std::sync::Mutex;

use instancer_core::{ChallengeInfo, ChallengeSummary, Deployment, PortValue, Profile, ProfileUpdate, Tag};

use crate::client::InstancerApi;
use crate::protocol::{ApiError, ApiResult};

/// Calls received by a [`FakeApi`], in order per endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    pub challenges: usize,
    /// Challenge ids requested from `challenge`
    pub challenge: Vec<String>,
    pub deployment: Vec<String>,
    /// `(challenge id, captcha token)` per deploy request
    pub deploy: Vec<(String, Option<String>)>,
    pub terminate: Vec<String>,
    pub login: Vec<String>,
    pub register: Vec<(String, String)>,
    pub profile: usize,
    pub update_profile: Vec<ProfileUpdate>,
    pub preview: Vec<String>,
    /// Session tokens seen on authenticated calls
    pub tokens: Vec<String>,
}

#[derive(Default)]
struct Script {
    challenges: VecDeque<ApiResult<Vec<ChallengeSummary>>>,
    challenge: VecDeque<ApiResult<ChallengeInfo>>,
    deployment: VecDeque<ApiResult<Option<Deployment>>>,
    deploy: VecDeque<ApiResult<Deployment>>,
    terminate: VecDeque<ApiResult<String>>,
    login: VecDeque<ApiResult<String>>,
    register: VecDeque<ApiResult<String>>,
    profile: VecDeque<ApiResult<Profile>>,
    update_profile: VecDeque<ApiResult<String>>,
    preview: VecDeque<ApiResult<String>>,
}

/// Scripted [`InstancerApi`] implementation
#[derive(Default)]
pub struct FakeApi {
    script: Mutex<Script>,
    calls: Mutex<CallLog>,
}

fn unscripted<T>(endpoint: &str) -> ApiResult<T> {
    Err(ApiError::Network(format!("no scripted response for {}", endpoint)))
}

macro_rules! scripted {
    ($($push:ident => $field:ident: $ty:ty),* $(,)?) => {
        impl FakeApi {
            $(
                pub fn $push(&self, result: ApiResult<$ty>) -> &Self {
                    self.script.lock().unwrap().$field.push_back(result);
                    self
                }
            )*
        }
    };
}

scripted! {
    push_challenges => challenges: Vec<ChallengeSummary>,
    push_challenge => challenge: ChallengeInfo,
    push_deployment => deployment: Option<Deployment>,
    push_deploy => deploy: Deployment,
    push_terminate => terminate: String,
    push_login => login: String,
    push_register => register: String,
    push_profile => profile: Profile,
    push_update_profile => update_profile: String,
    push_preview => preview: String,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the calls received so far
    pub fn calls(&self) -> CallLog {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, token: Option<&str>, f: impl FnOnce(&mut CallLog)) {
        let mut calls = self.calls.lock().unwrap();
        if let Some(token) = token {
            calls.tokens.push(token.to_string());
        }
        f(&mut calls);
    }

    fn next<T>(
        &self,
        endpoint: &str,
        queue: impl FnOnce(&mut Script) -> &mut VecDeque<ApiResult<T>>,
    ) -> ApiResult<T> {
        let mut script = self.script.lock().unwrap();
        queue(&mut script)
            .pop_front()
            .unwrap_or_else(|| unscripted(endpoint))
    }
}

impl InstancerApi for FakeApi {
    async fn challenges(&self, token: &str) -> ApiResult<Vec<ChallengeSummary>> {
        self.record(Some(token), |c| c.challenges += 1);
        self.next("challenges", |s| &mut s.challenges)
    }

    async fn challenge(&self, token: &str, id: &str) -> ApiResult<ChallengeInfo> {
        self.record(Some(token), |c| c.challenge.push(id.to_string()));
        self.next("challenge", |s| &mut s.challenge)
    }

    async fn deployment(&self, token: &str, id: &str) -> ApiResult<Option<Deployment>> {
        self.record(Some(token), |c| c.deployment.push(id.to_string()));
        self.next("deployment", |s| &mut s.deployment)
    }

    async fn deploy(
        &self,
        token: &str,
        id: &str,
        captcha_token: Option<&str>,
    ) -> ApiResult<Deployment> {
        self.record(Some(token), |c| {
            c.deploy
                .push((id.to_string(), captcha_token.map(str::to_string)))
        });
        self.next("deploy", |s| &mut s.deploy)
    }

    async fn terminate(&self, token: &str, id: &str) -> ApiResult<String> {
        self.record(Some(token), |c| c.terminate.push(id.to_string()));
        self.next("terminate", |s| &mut s.terminate)
    }

    async fn login(&self, login_token: &str) -> ApiResult<String> {
        self.record(None, |c| c.login.push(login_token.to_string()));
        self.next("login", |s| &mut s.login)
    }

    async fn register(&self, username: &str, email: &str) -> ApiResult<String> {
        self.record(None, |c| {
            c.register.push((username.to_string(), email.to_string()))
        });
        self.next("register", |s| &mut s.register)
    }

    async fn profile(&self, token: &str) -> ApiResult<Profile> {
        self.record(Some(token), |c| c.profile += 1);
        self.next("profile", |s| &mut s.profile)
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> ApiResult<String> {
        self.record(Some(token), |c| c.update_profile.push(update.clone()));
        self.next("update_profile", |s| &mut s.update_profile)
    }

    async fn preview(&self, login_token: &str) -> ApiResult<String> {
        self.record(None, |c| c.preview.push(login_token.to_string()));
        self.next("preview", |s| &mut s.preview)
    }
}

// ─────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────

/// Creates challenge metadata with one `web` category.
pub fn test_challenge(id: &str) -> ChallengeInfo {
    ChallengeInfo {
        id: id.to_string(),
        name: id.replace('-', " "),
        author: "organizers".to_string(),
        description: format!("Description of {}", id),
        is_shared: false,
        tags: vec![Tag::category("web")],
    }
}

/// Creates a shared (pooled) challenge.
pub fn test_shared_challenge(id: &str) -> ChallengeInfo {
    ChallengeInfo {
        is_shared: true,
        ..test_challenge(id)
    }
}

/// Creates a reachable deployment expiring `ttl` seconds after `now`.
///
/// # Arguments
/// * `now` - Reference epoch seconds
/// * `ttl` - Seconds until expiration
pub fn test_deployment(now: i64, ttl: i64) -> Deployment {
    Deployment {
        expiration: now + ttl,
        host: "10.0.0.1".to_string(),
        start_delay: now - 1,
        port_mappings: [
            ("web:80".to_string(), PortValue::Text("abc.instancer.example".to_string())),
            ("nc:1337".to_string(), PortValue::Number(31337)),
        ]
        .into_iter()
        .collect(),
    }
}

/// Creates a catalog entry, deployed when `deployment` is given.
pub fn test_summary(id: &str, deployment: Option<Deployment>) -> ChallengeSummary {
    ChallengeSummary {
        challenge_info: test_challenge(id),
        deployment,
    }
}
