//! Invite activation flow.
//!
//! Drives a one-shot state machine: redeem the activation code against the
//! backend, establish a session from the minted token, and report the
//! terminal state to subscribers. A flow runs at most once; [`ActivationFlow::run`]
//! consumes it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{error, info};

use crate::error::ClientError;
use crate::session::{AuthClient, SessionHandle};

/// How long a UI should show the success state before redirecting.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Observable state of an activation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationState {
    /// The attempt is in flight (or has not started).
    Loading,
    /// The code was redeemed and a session is installed.
    Success,
    /// The attempt failed with a user-facing message.
    Error(String),
}

/// Redeems an activation code for a session token.
#[async_trait]
pub trait ActivationEndpoint: Send + Sync {
    async fn redeem(&self, code: &str) -> Result<String, ClientError>;
}

#[derive(Serialize)]
struct ActivateBody<'a> {
    code: &'a str,
}

#[derive(Deserialize)]
struct ActivateSuccess {
    token: String,
}

#[derive(Deserialize)]
struct ActivateFailure {
    #[serde(default)]
    error: Option<String>,
}

/// Production endpoint: POST {base_url}/api/activate.
pub struct HttpActivationEndpoint {
    http: reqwest::Client,
    base_url: String,
}

impl HttpActivationEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ActivationEndpoint for HttpActivationEndpoint {
    async fn redeem(&self, code: &str) -> Result<String, ClientError> {
        let url = format!("{}/api/activate", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .json(&ActivateBody { code })
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let message = response
                .json::<ActivateFailure>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| "Activation failed".to_string());
            return Err(ClientError::Activation(message));
        }

        response
            .json::<ActivateSuccess>()
            .await
            .map(|body| body.token)
            .map_err(|e| ClientError::Network(e.to_string()))
    }
}

/// One-shot activation state machine.
pub struct ActivationFlow {
    endpoint: Arc<dyn ActivationEndpoint>,
    auth: Arc<dyn AuthClient>,
    sessions: SessionHandle,
    state: watch::Sender<ActivationState>,
}

impl ActivationFlow {
    pub fn new(
        endpoint: Arc<dyn ActivationEndpoint>,
        auth: Arc<dyn AuthClient>,
        sessions: SessionHandle,
    ) -> Self {
        let (state, _) = watch::channel(ActivationState::Loading);
        Self {
            endpoint,
            auth,
            sessions,
            state,
        }
    }

    /// Subscribe to state changes. The flow starts in `Loading` and settles
    /// into exactly one terminal state.
    pub fn subscribe(&self) -> watch::Receiver<ActivationState> {
        self.state.subscribe()
    }

    /// Run the activation attempt to completion.
    ///
    /// A missing or empty code fails immediately without touching the
    /// network. On success the minted token serves as both the access and
    /// refresh credential for the new session.
    pub async fn run(self, code: Option<&str>) -> ActivationState {
        let code = match code {
            Some(code) if !code.is_empty() => code,
            _ => return self.settle(ActivationState::Error("No activation code provided.".to_string())),
        };

        let token = match self.endpoint.redeem(code).await {
            Ok(token) => token,
            Err(err) => {
                error!(error = %err, "Activation failed");
                return self.settle(ActivationState::Error(failure_message(err)));
            }
        };

        match self.auth.set_session(&token, &token).await {
            Ok(session) => {
                self.sessions.login(session);
                info!("Activation succeeded");
                self.settle(ActivationState::Success)
            }
            Err(err) => {
                error!(error = %err, "Failed to establish session after activation");
                self.settle(ActivationState::Error(failure_message(err)))
            }
        }
    }

    fn settle(self, state: ActivationState) -> ActivationState {
        self.state.send_replace(state.clone());
        state
    }
}

/// User-facing message for a failed attempt.
fn failure_message(err: ClientError) -> String {
    match err {
        ClientError::Activation(message) | ClientError::Network(message) => message,
        _ => "Something went wrong".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockEndpoint {
        result: Result<String, ClientError>,
        calls: AtomicUsize,
    }

    impl MockEndpoint {
        fn new(result: Result<String, ClientError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ActivationEndpoint for MockEndpoint {
        async fn redeem(&self, _code: &str) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct MockAuth {
        fail: bool,
    }

    #[async_trait]
    impl AuthClient for MockAuth {
        async fn set_session(
            &self,
            access_token: &str,
            refresh_token: &str,
        ) -> Result<Session, ClientError> {
            if self.fail {
                return Err(ClientError::Session("provider unavailable".to_string()));
            }
            Ok(Session::new(access_token, refresh_token))
        }
    }

    fn flow(
        endpoint: Arc<MockEndpoint>,
        auth_fails: bool,
        sessions: SessionHandle,
    ) -> ActivationFlow {
        ActivationFlow::new(endpoint, Arc::new(MockAuth { fail: auth_fails }), sessions)
    }

    #[tokio::test]
    async fn test_successful_activation_installs_session() {
        let endpoint = MockEndpoint::new(Ok("minted-token".to_string()));
        let sessions = SessionHandle::new();
        let state = flow(endpoint.clone(), false, sessions.clone())
            .run(Some("CODE-1"))
            .await;

        assert_eq!(state, ActivationState::Success);
        assert_eq!(endpoint.calls.load(Ordering::SeqCst), 1);

        // The minted token is used for both credentials.
        let session = sessions.current().expect("session should be installed");
        assert_eq!(session.access_token, "minted-token");
        assert_eq!(session.refresh_token, "minted-token");
    }

    #[tokio::test]
    async fn test_missing_code_fails_without_network_call() {
        let endpoint = MockEndpoint::new(Ok("unused".to_string()));
        let sessions = SessionHandle::new();

        let state = flow(endpoint.clone(), false, sessions.clone())
            .run(None)
            .await;
        assert_eq!(
            state,
            ActivationState::Error("No activation code provided.".to_string())
        );

        let state = flow(endpoint.clone(), false, sessions.clone())
            .run(Some(""))
            .await;
        assert_eq!(
            state,
            ActivationState::Error("No activation code provided.".to_string())
        );

        assert_eq!(endpoint.calls.load(Ordering::SeqCst), 0);
        assert!(sessions.current().is_none());
    }

    #[tokio::test]
    async fn test_server_rejection_surfaces_its_message() {
        let endpoint = MockEndpoint::new(Err(ClientError::Activation(
            "Invite already redeemed".to_string(),
        )));
        let sessions = SessionHandle::new();
        let state = flow(endpoint, false, sessions.clone()).run(Some("USED")).await;

        assert_eq!(
            state,
            ActivationState::Error("Invite already redeemed".to_string())
        );
        assert!(sessions.current().is_none());
    }

    #[tokio::test]
    async fn test_session_failure_uses_fallback_message() {
        let endpoint = MockEndpoint::new(Ok("minted-token".to_string()));
        let sessions = SessionHandle::new();
        let state = flow(endpoint, true, sessions.clone()).run(Some("CODE-2")).await;

        assert_eq!(
            state,
            ActivationState::Error("Something went wrong".to_string())
        );
        assert!(sessions.current().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_terminal_state() {
        let endpoint = MockEndpoint::new(Ok("minted-token".to_string()));
        let sessions = SessionHandle::new();
        let flow = flow(endpoint, false, sessions);
        let mut rx = flow.subscribe();

        assert_eq!(*rx.borrow(), ActivationState::Loading);
        flow.run(Some("CODE-3")).await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), ActivationState::Success);
    }
}
