//! Full-screen terminal client for fdbk.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod mutations;
pub mod overlays;
pub mod render;
pub mod route;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};
use std::sync::Arc;

use anyhow::Result;
use fdbk_core::auth::{AuthService, FirebaseAuth, SessionCache};
use fdbk_core::config::Config;
use fdbk_core::store::{DocumentStore, FirestoreStore};
pub use features::{feedback, forms, toast};
pub use runtime::TuiRuntime;

/// Builds the Firebase services from `config` and runs the TUI until quit.
///
/// # Errors
/// Returns an error when stderr is not a terminal, the Firebase settings are
/// incomplete, or terminal I/O fails.
pub async fn run_app(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The interactive client requires a terminal.\n\
             Use `fdbk list` for non-interactive output."
        );
    }

    let firebase = FirebaseAuth::from_config(&config.firebase, Some(SessionCache::new()))?;
    let initial = firebase.current_session();
    let auth: Arc<dyn AuthService> = Arc::new(firebase);
    let store: Arc<dyn DocumentStore> =
        Arc::new(FirestoreStore::from_config(&config.firebase, Arc::clone(&auth))?);

    tracing::info!(signed = initial.is_some(), "starting tui");
    let mut runtime = TuiRuntime::new(
        auth,
        store,
        config.firebase.collection.clone(),
        initial.as_ref(),
    )?;
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Até logo!")?;
    Ok(())
}
