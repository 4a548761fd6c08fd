//! Explicit session state.
//!
//! A [`Session`] is a plain value passed to every data-access call. The
//! [`SessionHandle`] is the single place session lifecycle events happen;
//! consumers subscribe to it instead of reading ambient auth state.

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use crate::error::ClientError;

/// An authenticated session: the credentials for data-access calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Exchanges a token pair for an established session with the auth provider.
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<Session, ClientError>;
}

/// Owner of the current session, with change notification.
///
/// Cloning the handle shares the same underlying state.
#[derive(Clone)]
pub struct SessionHandle {
    tx: watch::Sender<Option<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Install a session. Subscribers observe the change.
    pub fn login(&self, session: Session) {
        info!("Session established");
        // send_replace never fails, even with no receivers.
        self.tx.send_replace(Some(session));
    }

    /// Clear the session. Subscribers observe the change.
    pub fn logout(&self) {
        info!("Session cleared");
        self.tx.send_replace(None);
    }

    /// Snapshot of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_starts_empty() {
        let handle = SessionHandle::new();
        assert!(handle.current().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_login_and_logout() {
        let handle = SessionHandle::new();
        let mut rx = handle.subscribe();

        handle.login(Session::new("access", "refresh"));
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow().as_ref().map(|s| s.access_token.clone()),
            Some("access".to_string())
        );

        handle.logout();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn test_cloned_handles_share_state() {
        let handle = SessionHandle::new();
        let other = handle.clone();

        handle.login(Session::new("a", "r"));
        assert_eq!(other.current(), Some(Session::new("a", "r")));

        other.logout();
        assert!(handle.current().is_none());
    }
}
