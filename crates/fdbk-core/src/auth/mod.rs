//! Authentication: session types, the auth service contract, the signed-in
//! state held by the UI, and the bridge that keeps the two in sync.

mod bridge;
pub mod firebase;
pub mod session_cache;
mod state;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub use bridge::AuthStateBridge;
pub use firebase::FirebaseAuth;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
pub use session_cache::SessionCache;
pub use state::AuthState;
use tokio::sync::watch;

use crate::error::ServiceResult;

pub(crate) fn now_millis_u64() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_millis()).ok())
        .unwrap_or(u64::MAX)
}

/// An active authenticated handle issued by the auth provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Short-lived bearer token.
    pub id_token: String,
    /// Long-lived token used to mint new id tokens.
    pub refresh_token: String,
    /// Id token expiry in milliseconds since epoch.
    pub expires_at_ms: u64,
}

impl Session {
    /// Returns true if the id token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        now_millis_u64() >= self.expires_at_ms
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("id_token", &mask_token(&self.id_token))
            .field("refresh_token", &mask_token(&self.refresh_token))
            .field("expires_at_ms", &self.expires_at_ms)
            .finish()
    }
}

/// Masks a token for display, keeping only a short prefix.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(6).collect();
    if token.chars().count() <= 6 {
        "***".to_string()
    } else {
        format!("{prefix}***")
    }
}

/// The signed-in user as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<&Session> for Identity {
    fn from(session: &Session) -> Self {
        Self {
            id: session.uid.clone(),
            name: session.display_name.clone(),
            email: session.email.clone(),
        }
    }
}

/// Receives auth state changes.
///
/// The first call to [`Subscription::next`] yields the state current at
/// subscribe time; every later call waits for the next change. Intermediate
/// states may be coalesced.
#[derive(Debug)]
pub struct Subscription {
    rx: watch::Receiver<Option<Session>>,
    primed: bool,
}

impl Subscription {
    pub fn new(rx: watch::Receiver<Option<Session>>) -> Self {
        Self { rx, primed: false }
    }

    /// Waits for the next state. Returns `None` once the service is gone.
    pub async fn next(&mut self) -> Option<Option<Session>> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// Email/password auth provider contract.
///
/// Futures are boxed so the service can be shared as `Arc<dyn AuthService>`
/// between the runtime, the bridge, and the document store.
pub trait AuthService: Send + Sync {
    /// Signs in with email and password.
    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str)
    -> BoxFuture<'a, ServiceResult<Session>>;

    /// Creates an account and signs it in.
    fn create_account<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, ServiceResult<Session>>;

    /// Sets the display name of the given session's user.
    ///
    /// Profile updates do not count as an auth state change: subscribers are
    /// not notified, but the stored session is updated.
    fn set_display_name<'a>(
        &'a self,
        session: &'a Session,
        name: &'a str,
    ) -> BoxFuture<'a, ServiceResult<Session>>;

    /// Ends the current session.
    fn sign_out(&self) -> BoxFuture<'_, ServiceResult<()>>;

    /// Subscribes to auth state changes.
    fn subscribe(&self) -> Subscription;

    /// Returns a bearer token for the current session, refreshing it when
    /// expired. `None` when signed out.
    fn id_token(&self) -> BoxFuture<'_, ServiceResult<Option<String>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            uid: "u-1".to_string(),
            email: Some("ana@x.com".to_string()),
            display_name: Some("Ana".to_string()),
            id_token: "eyJhbGciOiJSUzI1NiJ9.secret".to_string(),
            refresh_token: "AMf-refresh-secret".to_string(),
            expires_at_ms: 0,
        }
    }

    #[test]
    fn test_identity_from_session() {
        let identity = Identity::from(&session());
        assert_eq!(
            identity,
            Identity {
                id: "u-1".to_string(),
                name: Some("Ana".to_string()),
                email: Some("ana@x.com".to_string()),
            }
        );
    }

    #[test]
    fn test_session_debug_masks_tokens() {
        let rendered = format!("{:?}", session());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("eyJhbG***"));
    }

    #[test]
    fn test_expired_session() {
        assert!(session().is_expired());
        let fresh = Session {
            expires_at_ms: u64::MAX,
            ..session()
        };
        assert!(!fresh.is_expired());
    }

    #[tokio::test]
    async fn test_subscription_yields_current_then_changes() {
        let (tx, rx) = watch::channel(None);
        let mut sub = Subscription::new(rx);

        assert_eq!(sub.next().await, Some(None));

        tx.send_replace(Some(session()));
        assert_eq!(sub.next().await, Some(Some(session())));

        drop(tx);
        assert_eq!(sub.next().await, None);
    }
}
