//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only; the reducer never performs I/O.

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug, PartialEq, Eq)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Sign in with email and password.
    SignIn {
        task: TaskId,
        email: String,
        password: String,
    },

    /// Create an account, then set its display name.
    Register {
        task: TaskId,
        name: String,
        email: String,
        password: String,
    },

    /// End the current session.
    SignOut { task: TaskId },

    /// Fetch the whole feedback collection.
    LoadFeedback { task: TaskId },
}
