//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::captcha::CaptchaSolver;
use crate::handler::Task;
use crate::message::Message;
use crate::timer::CountdownTimer;
use crate::token_store::TokenStore;
use crate::UpdateAction;
use instancer_api::InstancerApi;
use instancer_core::prelude::*;

/// Everything actions need beyond the message channel
pub struct Services<A, C> {
    pub api: Arc<A>,
    pub captcha: Arc<C>,
    pub timer: CountdownTimer,
    /// `None` runs without persisting the session (no data directory)
    pub token_store: Option<TokenStore>,
}

impl<A, C> Services<A, C> {
    pub fn new(api: A, captcha: C, token_store: Option<TokenStore>) -> Self {
        Self {
            api: Arc::new(api),
            captcha: Arc::new(captcha),
            timer: CountdownTimer::new(),
            token_store,
        }
    }
}

/// Execute an action, spawning a background task where it involves I/O
pub fn handle_action<A, C>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    services: &mut Services<A, C>,
) where
    A: InstancerApi + Send + Sync + 'static,
    C: CaptchaSolver + Send + Sync + 'static,
{
    match action {
        UpdateAction::SpawnTask(task) => {
            let api = services.api.clone();
            tokio::spawn(async move {
                execute_task(task, msg_tx, api).await;
            });
        }

        UpdateAction::SolveCaptcha {
            id,
            action,
            site_key,
        } => {
            let captcha = services.captcha.clone();
            tokio::spawn(async move {
                let msg = match captcha.solve(&site_key, action.as_str()).await {
                    Ok(token) => Message::CaptchaSolved { id, action, token },
                    Err(e) => Message::CaptchaFailed {
                        id,
                        action,
                        error: e.to_string(),
                    },
                };
                let _ = msg_tx.send(msg).await;
            });
        }

        UpdateAction::StartCountdown { id, generation } => {
            services.timer.start(id, generation, msg_tx);
        }

        UpdateAction::StopCountdown => {
            services.timer.stop();
        }

        UpdateAction::PersistSession { token } => {
            if let Some(store) = &services.token_store {
                let saved = store.save(&token).with_context(|| {
                    format!("Failed to persist session to {}", store.path().display())
                });
                if saved.is_ok() {
                    debug!("Session saved to {}", store.path().display());
                }
            }
        }

        UpdateAction::ForgetSession => {
            if let Some(store) = &services.token_store {
                let _ = store.clear().context("Failed to clear stored session");
            }
        }
    }
}

/// Run one background task and report its completion
pub async fn execute_task<A>(task: Task, msg_tx: mpsc::Sender<Message>, api: Arc<A>)
where
    A: InstancerApi + Send + Sync + 'static,
{
    match task {
        Task::FetchChallenges { token } => {
            let result = api.challenges(&token).await;
            let _ = msg_tx.send(Message::ChallengesLoaded { result }).await;
        }

        Task::LoadChallenge { id, token } => {
            let result = api.challenge(&token, &id).await;
            let found = result.is_ok();
            let _ = msg_tx
                .send(Message::ChallengeLoaded {
                    id: id.clone(),
                    result,
                })
                .await;

            // The deployment is only meaningful for a challenge that exists
            if found {
                let result = api.deployment(&token, &id).await;
                let _ = msg_tx.send(Message::DeploymentLoaded { id, result }).await;
            }
        }

        Task::Deploy {
            id,
            token,
            action,
            captcha_token,
        } => {
            let result = api.deploy(&token, &id, captcha_token.as_deref()).await;
            let _ = msg_tx
                .send(Message::DeployCompleted { id, action, result })
                .await;
        }

        Task::Terminate { id, token } => {
            let result = api.terminate(&token, &id).await;
            let _ = msg_tx.send(Message::TerminateCompleted { id, result }).await;
        }

        Task::ValidateSession { token } => {
            let result = api.profile(&token).await;
            let _ = msg_tx.send(Message::SessionValidated { result }).await;
        }

        Task::Preview { login_token } => {
            let result = api.preview(&login_token).await;
            let _ = msg_tx
                .send(Message::PreviewLoaded {
                    login_token,
                    result,
                })
                .await;
        }

        Task::Login { login_token } => {
            let result = api.login(&login_token).await;
            let _ = msg_tx.send(Message::LoginCompleted { result }).await;
        }

        Task::Register { username, email } => {
            let result = api.register(&username, &email).await;
            let _ = msg_tx.send(Message::RegisterCompleted { result }).await;
        }

        Task::FetchProfile { token } => {
            let result = api.profile(&token).await;
            let _ = msg_tx.send(Message::ProfileLoaded { result }).await;
        }

        Task::UpdateProfile { token, update } => {
            let result = api.update_profile(&token, &update).await;
            let _ = msg_tx
                .send(Message::ProfileUpdated { update, result })
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captcha::NoCaptcha;
    use crate::challenge_view::ControlAction;
    use instancer_api::test_utils::{test_challenge, test_deployment, FakeApi};
    use instancer_api::ApiError;
    use instancer_core::now_epoch;

    #[tokio::test]
    async fn test_loader_fetches_deployment_after_challenge() {
        let api = FakeApi::new();
        api.push_challenge(Ok(test_challenge("web-1")))
            .push_deployment(Ok(Some(test_deployment(now_epoch(), 600))));
        let api = Arc::new(api);
        let (tx, mut rx) = mpsc::channel(8);

        execute_task(
            Task::LoadChallenge {
                id: "web-1".into(),
                token: "tok".into(),
            },
            tx,
            api.clone(),
        )
        .await;

        assert!(matches!(
            rx.recv().await,
            Some(Message::ChallengeLoaded { result: Ok(_), .. })
        ));
        assert!(matches!(
            rx.recv().await,
            Some(Message::DeploymentLoaded {
                result: Ok(Some(_)),
                ..
            })
        ));
        assert_eq!(api.calls().deployment, vec!["web-1".to_string()]);
    }

    #[tokio::test]
    async fn test_loader_skips_deployment_when_not_found() {
        let api = FakeApi::new();
        api.push_challenge(Err(ApiError::NotFound));
        let api = Arc::new(api);
        let (tx, mut rx) = mpsc::channel(8);

        execute_task(
            Task::LoadChallenge {
                id: "gone".into(),
                token: "tok".into(),
            },
            tx,
            api.clone(),
        )
        .await;

        assert!(matches!(
            rx.recv().await,
            Some(Message::ChallengeLoaded {
                result: Err(ApiError::NotFound),
                ..
            })
        ));
        assert!(rx.recv().await.is_none());
        assert!(api.calls().deployment.is_empty());
    }

    #[tokio::test]
    async fn test_deploy_task_forwards_captcha_token() {
        let api = FakeApi::new();
        api.push_deploy(Err(ApiError::InvalidCaptcha));
        let api = Arc::new(api);
        let (tx, mut rx) = mpsc::channel(8);

        execute_task(
            Task::Deploy {
                id: "web-1".into(),
                token: "tok".into(),
                action: ControlAction::Extend,
                captcha_token: Some("cap".into()),
            },
            tx,
            api.clone(),
        )
        .await;

        assert!(matches!(
            rx.recv().await,
            Some(Message::DeployCompleted {
                action: ControlAction::Extend,
                result: Err(ApiError::InvalidCaptcha),
                ..
            })
        ));
        assert_eq!(
            api.calls().deploy,
            vec![("web-1".to_string(), Some("cap".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_captcha_failure_becomes_message() {
        let mut services = Services::new(FakeApi::new(), NoCaptcha, None);
        let (tx, mut rx) = mpsc::channel(8);

        handle_action(
            UpdateAction::SolveCaptcha {
                id: "web-1".into(),
                action: ControlAction::Deploy,
                site_key: "key".into(),
            },
            tx,
            &mut services,
        );

        assert!(matches!(
            rx.recv().await,
            Some(Message::CaptchaFailed {
                action: ControlAction::Deploy,
                ..
            })
        ));
        assert!(services.api.calls().deploy.is_empty());
    }

    #[tokio::test]
    async fn test_session_persist_and_forget() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("auth_token"));
        let mut services = Services::new(FakeApi::new(), NoCaptcha, Some(store.clone()));
        let (tx, _rx) = mpsc::channel(8);

        handle_action(
            UpdateAction::PersistSession {
                token: "session".into(),
            },
            tx.clone(),
            &mut services,
        );
        assert_eq!(store.load().unwrap().as_deref(), Some("session"));

        handle_action(UpdateAction::ForgetSession, tx, &mut services);
        assert_eq!(store.load().unwrap(), None);
    }
}
