//! Core fdbk library (auth, document store, feedback list, config).

pub mod auth;
pub mod config;
pub mod error;
pub mod feedback;
pub mod logging;
pub mod store;
pub mod validation;
