//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod list;
