use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{AuthService, Session};

/// Forwards auth state changes from an [`AuthService`] to a callback.
///
/// At most one subscription is active per bridge. The subscription is released
/// on [`AuthStateBridge::stop`] or when the bridge is dropped, after which no
/// further notifications reach the callback.
pub struct AuthStateBridge {
    auth: Arc<dyn AuthService>,
    cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl AuthStateBridge {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self {
            auth,
            cancel: None,
            handle: None,
        }
    }

    /// Subscribes and forwards every notification to `on_change`, starting
    /// with the current state. No-op if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, on_change: F)
    where
        F: Fn(Option<Session>) + Send + 'static,
    {
        if self.is_running() {
            return;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let mut subscription = self.auth.subscribe();

        let handle = tokio::spawn(async move {
            loop {
                let next = tokio::select! {
                    () = token.cancelled() => break,
                    next = subscription.next() => next,
                };
                let Some(session) = next else {
                    tracing::debug!("auth service closed; bridge stopping");
                    break;
                };
                if token.is_cancelled() {
                    break;
                }
                tracing::debug!(signed = session.is_some(), "auth state changed");
                on_change(session);
            }
        });

        self.cancel = Some(cancel);
        self.handle = Some(handle);
    }

    /// Releases the subscription. Safe to call when not running.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.handle = None;
    }

    pub fn is_running(&self) -> bool {
        self.cancel.as_ref().is_some_and(|c| !c.is_cancelled())
    }
}

impl Drop for AuthStateBridge {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures_util::future::BoxFuture;
    use tokio::sync::{mpsc, watch};

    use super::*;
    use crate::auth::Subscription;
    use crate::error::{ServiceError, ServiceErrorKind, ServiceResult};

    struct WatchAuth {
        tx: watch::Sender<Option<Session>>,
        subscribes: Mutex<usize>,
    }

    impl WatchAuth {
        fn new() -> Self {
            Self {
                tx: watch::channel(None).0,
                subscribes: Mutex::new(0),
            }
        }
    }

    fn unsupported<'a, T: Send + 'a>() -> BoxFuture<'a, ServiceResult<T>> {
        Box::pin(async { Err(ServiceError::new(ServiceErrorKind::Unknown, "unsupported")) })
    }

    impl AuthService for WatchAuth {
        fn sign_in<'a>(&'a self, _: &'a str, _: &'a str) -> BoxFuture<'a, ServiceResult<Session>> {
            unsupported()
        }

        fn create_account<'a>(
            &'a self,
            _: &'a str,
            _: &'a str,
        ) -> BoxFuture<'a, ServiceResult<Session>> {
            unsupported()
        }

        fn set_display_name<'a>(
            &'a self,
            _: &'a Session,
            _: &'a str,
        ) -> BoxFuture<'a, ServiceResult<Session>> {
            unsupported()
        }

        fn sign_out(&self) -> BoxFuture<'_, ServiceResult<()>> {
            unsupported()
        }

        fn subscribe(&self) -> Subscription {
            *self.subscribes.lock().unwrap() += 1;
            Subscription::new(self.tx.subscribe())
        }

        fn id_token(&self) -> BoxFuture<'_, ServiceResult<Option<String>>> {
            Box::pin(async { Ok(None) })
        }
    }

    fn session(uid: &str) -> Session {
        Session {
            uid: uid.to_string(),
            email: None,
            display_name: None,
            id_token: "t".to_string(),
            refresh_token: "r".to_string(),
            expires_at_ms: u64::MAX,
        }
    }

    #[tokio::test]
    async fn test_forwards_initial_state_and_changes() {
        let auth = Arc::new(WatchAuth::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut bridge = AuthStateBridge::new(auth.clone());
        bridge.start(move |s| {
            let _ = tx.send(s);
        });

        assert_eq!(rx.recv().await, Some(None));

        auth.tx.send_replace(Some(session("a")));
        assert_eq!(rx.recv().await, Some(Some(session("a"))));

        auth.tx.send_replace(None);
        assert_eq!(rx.recv().await, Some(None));
    }

    #[tokio::test]
    async fn test_start_twice_keeps_one_subscription() {
        let auth = Arc::new(WatchAuth::new());
        let mut bridge = AuthStateBridge::new(auth.clone());
        bridge.start(|_| {});
        bridge.start(|_| {});

        assert!(bridge.is_running());
        assert_eq!(*auth.subscribes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_stop_silences_callback() {
        let auth = Arc::new(WatchAuth::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut bridge = AuthStateBridge::new(auth.clone());
        bridge.start(move |s| {
            let _ = tx.send(s);
        });
        assert_eq!(rx.recv().await, Some(None));

        bridge.stop();
        assert!(!bridge.is_running());
        auth.tx.send_replace(Some(session("late")));

        // Sender is dropped with the task; nothing else arrives.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let auth = Arc::new(WatchAuth::new());
        let mut bridge = AuthStateBridge::new(auth.clone());
        bridge.start(|_| {});
        bridge.stop();
        bridge.start(|_| {});

        assert!(bridge.is_running());
        assert_eq!(*auth.subscribes.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_drop_releases_subscription() {
        let auth = Arc::new(WatchAuth::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut bridge = AuthStateBridge::new(auth.clone());
            bridge.start(move |s| {
                let _ = tx.send(s);
            });
            assert_eq!(rx.recv().await, Some(None));
        }
        auth.tx.send_replace(Some(session("late")));
        assert_eq!(rx.recv().await, None);
    }
}
