//! Effect handlers.
//!
//! Each handler is a plain async function that talks to a service and
//! returns the `UiEvent` carrying the result. Spawning and the task lifecycle
//! belong to the runtime.

use std::sync::Arc;

use fdbk_core::auth::{AuthService, Identity};
use fdbk_core::error::ServiceResult;
use fdbk_core::feedback::FeedbackRecord;
use fdbk_core::store::DocumentStore;

use crate::events::{AuthUiEvent, FeedbackUiEvent, UiEvent};

pub async fn sign_in(auth: Arc<dyn AuthService>, email: String, password: String) -> UiEvent {
    let result = auth.sign_in(&email, &password).await;
    UiEvent::Auth(AuthUiEvent::SignedIn(result))
}

/// Creates the account, then stores the display name on it.
///
/// The identity reported back carries the submitted name and email so the
/// screen can show them before the auth service notifies.
pub async fn register(
    auth: Arc<dyn AuthService>,
    name: String,
    email: String,
    password: String,
) -> UiEvent {
    let result: ServiceResult<Identity> = async {
        let session = auth.create_account(&email, &password).await?;
        let session = auth.set_display_name(&session, &name).await?;
        Ok(Identity {
            id: session.uid,
            name: Some(name),
            email: Some(email),
        })
    }
    .await;
    UiEvent::Auth(AuthUiEvent::Registered(result))
}

pub async fn sign_out(auth: Arc<dyn AuthService>) -> UiEvent {
    UiEvent::Auth(AuthUiEvent::SignedOut(auth.sign_out().await))
}

pub async fn load_feedback(store: Arc<dyn DocumentStore>, collection: String) -> UiEvent {
    let result = store.list_all(&collection).await.map(|documents| {
        documents
            .iter()
            .map(FeedbackRecord::from_document)
            .collect::<Vec<_>>()
    });
    UiEvent::Feedback(FeedbackUiEvent::Loaded(result))
}
