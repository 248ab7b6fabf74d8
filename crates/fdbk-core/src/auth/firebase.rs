//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! Email/password only. The current session lives in a watch channel so the
//! UI bridge, the document store, and the CLI all see the same state; it is
//! mirrored to the session cache after every change.

use std::time::Duration;

use anyhow::Result;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::{Mutex, watch};

use super::{AuthService, Session, SessionCache, Subscription, now_millis_u64};
use crate::config::FirebaseConfig;
use crate::error::{ServiceError, ServiceErrorKind, ServiceResult, provider_error_message};

/// Request timeout for every auth call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Id tokens are treated as expired this long before the provider says so.
const EXPIRY_MARGIN_MS: u64 = 5 * 60 * 1000;

/// Firebase email/password auth client.
pub struct FirebaseAuth {
    client: reqwest::Client,
    api_key: String,
    auth_base_url: String,
    token_base_url: String,
    cache: Option<SessionCache>,
    session: watch::Sender<Option<Session>>,
    refresh_lock: Mutex<()>,
}

impl FirebaseAuth {
    /// Builds a client from config, restoring any cached session.
    ///
    /// # Errors
    /// Returns an error if the API key is missing or a base URL is malformed.
    pub fn from_config(config: &FirebaseConfig, cache: Option<SessionCache>) -> Result<Self> {
        Ok(Self::new(
            config.effective_api_key()?,
            config.effective_auth_base_url()?,
            config.effective_token_base_url()?,
            cache,
        ))
    }

    pub fn new(
        api_key: impl Into<String>,
        auth_base_url: impl Into<String>,
        token_base_url: impl Into<String>,
        cache: Option<SessionCache>,
    ) -> Self {
        let restored = cache.as_ref().and_then(|cache| match cache.load() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!("ignoring unreadable session cache: {err:#}");
                None
            }
        });
        if restored.is_some() {
            tracing::debug!("restored cached session");
        }

        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            auth_base_url: auth_base_url.into(),
            token_base_url: token_base_url.into(),
            cache,
            session: watch::channel(restored).0,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the current session.
    pub fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn accounts_url(&self, method: &str) -> String {
        format!(
            "{}/v1/accounts:{method}?key={}",
            self.auth_base_url, self.api_key
        )
    }

    fn token_url(&self) -> String {
        format!("{}/v1/token?key={}", self.token_base_url, self.api_key)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> ServiceResult<T> {
        let response = self
            .client
            .post(url)
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::transport(&e))?;
        read_response(response).await
    }

    /// Stores the session and notifies subscribers.
    fn publish(&self, session: Session) {
        self.persist(&session);
        self.session.send_replace(Some(session));
    }

    /// Stores the session without notifying subscribers.
    fn replace_quietly(&self, session: Session) {
        self.persist(&session);
        self.session.send_if_modified(|current| {
            *current = Some(session);
            false
        });
    }

    fn persist(&self, session: &Session) {
        if let Some(cache) = &self.cache
            && let Err(err) = cache.save(session)
        {
            tracing::warn!("failed to persist session: {err:#}");
        }
    }

    fn forget(&self) -> bool {
        if let Some(cache) = &self.cache
            && let Err(err) = cache.clear()
        {
            tracing::warn!("failed to clear session cache: {err:#}");
        }
        self.session.send_if_modified(|current| current.take().is_some())
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> ServiceResult<Session> {
        let url = self.accounts_url(method);
        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let response: AccountResponse = self.post_json(&url, &body).await?;
        let session = response.into_session(None)?;
        tracing::info!(uid = %session.uid, "{method} succeeded");
        self.publish(session.clone());
        Ok(session)
    }

    async fn refresh(&self, stale: &Session) -> ServiceResult<Session> {
        let response = self
            .client
            .post(self.token_url())
            .timeout(REQUEST_TIMEOUT)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", stale.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::transport(&e))?;
        let token: TokenResponse = read_response(response).await?;

        Ok(Session {
            uid: token.user_id.unwrap_or_else(|| stale.uid.clone()),
            email: stale.email.clone(),
            display_name: stale.display_name.clone(),
            id_token: token.id_token,
            refresh_token: token.refresh_token,
            expires_at_ms: expires_at(&token.expires_in)?,
        })
    }
}

impl AuthService for FirebaseAuth {
    fn sign_in<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, ServiceResult<Session>> {
        Box::pin(self.password_call("signInWithPassword", email, password))
    }

    fn create_account<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, ServiceResult<Session>> {
        Box::pin(self.password_call("signUp", email, password))
    }

    fn set_display_name<'a>(
        &'a self,
        session: &'a Session,
        name: &'a str,
    ) -> BoxFuture<'a, ServiceResult<Session>> {
        Box::pin(async move {
            let url = self.accounts_url("update");
            let body = json!({
                "idToken": session.id_token,
                "displayName": name,
                "returnSecureToken": true,
            });
            let response: AccountResponse = self.post_json(&url, &body).await?;
            let updated = response.into_session(Some(session))?;

            let is_current = self
                .session
                .borrow()
                .as_ref()
                .is_some_and(|current| current.uid == updated.uid);
            if is_current {
                self.replace_quietly(updated.clone());
            }
            Ok(updated)
        })
    }

    fn sign_out(&self) -> BoxFuture<'_, ServiceResult<()>> {
        Box::pin(async move {
            if self.forget() {
                tracing::info!("signed out");
            }
            Ok(())
        })
    }

    fn subscribe(&self) -> Subscription {
        Subscription::new(self.session.subscribe())
    }

    fn id_token(&self) -> BoxFuture<'_, ServiceResult<Option<String>>> {
        Box::pin(async move {
            let _guard = self.refresh_lock.lock().await;
            let Some(current) = self.current_session() else {
                return Ok(None);
            };
            if !current.is_expired() {
                return Ok(Some(current.id_token));
            }

            tracing::debug!("id token expired; refreshing");
            match self.refresh(&current).await {
                Ok(fresh) => {
                    let token = fresh.id_token.clone();
                    self.replace_quietly(fresh);
                    Ok(Some(token))
                }
                Err(err) => {
                    if err.kind == ServiceErrorKind::InvalidCredential {
                        tracing::warn!("refresh token rejected; signing out");
                        self.forget();
                    }
                    Err(err)
                }
            }
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

impl AccountResponse {
    /// Builds a session, falling back to `previous` for tokens the provider
    /// did not return.
    fn into_session(self, previous: Option<&Session>) -> ServiceResult<Session> {
        let id_token = self
            .id_token
            .or_else(|| previous.map(|p| p.id_token.clone()))
            .ok_or_else(|| ServiceError::parse("response is missing idToken"))?;
        let refresh_token = self
            .refresh_token
            .or_else(|| previous.map(|p| p.refresh_token.clone()))
            .ok_or_else(|| ServiceError::parse("response is missing refreshToken"))?;
        let expires_at_ms = match (self.expires_in, previous) {
            (Some(secs), _) => expires_at(&secs)?,
            (None, Some(p)) => p.expires_at_ms,
            (None, None) => return Err(ServiceError::parse("response is missing expiresIn")),
        };

        Ok(Session {
            uid: self.local_id,
            email: self.email.or_else(|| previous.and_then(|p| p.email.clone())),
            display_name: self.display_name.filter(|n| !n.is_empty()),
            id_token,
            refresh_token,
            expires_at_ms,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    #[serde(default)]
    user_id: Option<String>,
}

/// Converts a provider `expiresIn` (seconds, as a string) to an absolute
/// deadline with a safety margin.
fn expires_at(expires_in: &str) -> ServiceResult<u64> {
    let secs: u64 = expires_in
        .trim()
        .parse()
        .map_err(|e| ServiceError::parse(format!("invalid expiresIn {expires_in:?}: {e}")))?;
    Ok(now_millis_u64()
        .saturating_add(secs.saturating_mul(1000))
        .saturating_sub(EXPIRY_MARGIN_MS))
}

async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> ServiceResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(auth_error(status.as_u16(), &body));
    }
    response
        .json()
        .await
        .map_err(|e| ServiceError::parse(format!("invalid auth response: {e}")))
}

/// Maps an Identity Toolkit error body to a service error.
///
/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be
/// at least 6 characters`.
fn auth_error(status: u16, body: &str) -> ServiceError {
    let Some(message) = provider_error_message(body) else {
        return ServiceError::http_status(status, body);
    };
    let code = message.split(" : ").next().unwrap_or_default().trim();
    let kind = match code {
        "EMAIL_NOT_FOUND"
        | "INVALID_PASSWORD"
        | "INVALID_LOGIN_CREDENTIALS"
        | "USER_DISABLED"
        | "TOKEN_EXPIRED"
        | "INVALID_REFRESH_TOKEN"
        | "INVALID_ID_TOKEN"
        | "USER_NOT_FOUND" => ServiceErrorKind::InvalidCredential,
        "EMAIL_EXISTS" | "WEAK_PASSWORD" | "INVALID_EMAIL" | "MISSING_PASSWORD" => {
            ServiceErrorKind::Rejected
        }
        _ if code.starts_with("TOO_MANY_ATTEMPTS_TRY_LATER") => ServiceErrorKind::RateLimited,
        _ => return ServiceError::http_status(status, body),
    };
    ServiceError::new(kind, code.to_string()).with_details(body)
}
