//! UI event types.
//!
//! All external inputs (terminal, auth notifications, async results) are
//! converted to `UiEvent` before being processed by the reducer.
//!
//! ## Task Lifecycle Events
//!
//! Network work uses a uniform lifecycle:
//! - The runtime emits `UiEvent::TaskStarted` once a task is actually spawned
//! - The runtime emits `UiEvent::TaskCompleted` with the result event when done
//! - The reducer is the only place that mutates `TaskState`, and drops
//!   completions whose id is no longer the active one

use crossterm::event::Event as CrosstermEvent;
use fdbk_core::auth::{Identity, Session};
use fdbk_core::error::ServiceError;
use fdbk_core::feedback::FeedbackRecord;

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

/// Auth results and notifications.
#[derive(Debug)]
pub enum AuthUiEvent {
    /// The auth service reported a new state (forwarded by the bridge).
    Changed(Option<Session>),

    /// Email/password sign-in finished.
    SignedIn(Result<Session, ServiceError>),

    /// Account creation plus display name update finished.
    Registered(Result<Identity, ServiceError>),

    /// Sign-out finished.
    SignedOut(Result<(), ServiceError>),
}

/// Feedback list results.
#[derive(Debug)]
pub enum FeedbackUiEvent {
    /// Full collection fetched.
    Loaded(Result<Vec<FeedbackRecord>, ServiceError>),
}

/// Unified event enum for the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (toast expiry, spinner).
    Tick,

    /// Terminal input event (key, paste, resize).
    Terminal(CrosstermEvent),

    Auth(AuthUiEvent),

    Feedback(FeedbackUiEvent),

    /// Task lifecycle: runtime started a task.
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },

    /// Task lifecycle: runtime completed a task (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
}
