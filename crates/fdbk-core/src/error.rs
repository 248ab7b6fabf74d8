//! Structured errors returned by the remote service adapters.
//!
//! Auth and store calls never surface raw transport errors to the UI. They map
//! everything into a `ServiceError` so callers can decide what (if anything) to
//! show without matching on provider-specific strings.

use std::fmt;

use serde_json::Value;

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Unknown account, wrong password, or disabled user.
    InvalidCredential,
    /// Request refused by the provider (email taken, weak password, ...).
    Rejected,
    /// Too many attempts; the provider asked us to back off.
    RateLimited,
    /// The caller may not read the requested resource.
    Permission,
    /// Connection failure or timeout.
    Network,
    /// Failed to decode a response body.
    Parse,
    /// Anything else (unexpected HTTP status, unmapped provider code).
    Unknown,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceErrorKind::InvalidCredential => write!(f, "invalid_credential"),
            ServiceErrorKind::Rejected => write!(f, "rejected"),
            ServiceErrorKind::RateLimited => write!(f, "rate_limited"),
            ServiceErrorKind::Permission => write!(f, "permission"),
            ServiceErrorKind::Network => write!(f, "network"),
            ServiceErrorKind::Parse => write!(f, "parse"),
            ServiceErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Structured error from a remote service with kind and details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    /// Error category
    pub kind: ServiceErrorKind,
    /// One-line summary suitable for logs
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ServiceError {
    /// Creates a new service error.
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Creates an error from a failed request (connect, timeout, body read).
    pub fn transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::new(ServiceErrorKind::Network, "request timed out");
        }
        if err.is_decode() {
            return Self::new(ServiceErrorKind::Parse, format!("invalid response: {err}"));
        }
        Self::new(ServiceErrorKind::Network, format!("request failed: {err}"))
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Parse, message)
    }

    /// Creates an HTTP status error, pulling `error.message` out of a JSON body
    /// when the provider sent one.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = match status {
            401 | 403 => ServiceErrorKind::Permission,
            429 => ServiceErrorKind::RateLimited,
            _ => ServiceErrorKind::Unknown,
        };
        let message = match provider_error_message(body) {
            Some(msg) => format!("HTTP {status}: {msg}"),
            None => format!("HTTP {status}"),
        };
        let err = Self::new(kind, message);
        if body.is_empty() {
            err
        } else {
            err.with_details(body)
        }
    }
}

/// Extracts `error.message` from a Google-style JSON error body.
pub(crate) fn provider_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("error")?
        .get("message")?
        .as_str()
        .map(ToString::to_string)
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
