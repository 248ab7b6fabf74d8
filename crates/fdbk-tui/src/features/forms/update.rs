//! Credential form reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fdbk_core::auth::{AuthState, Identity, Session};
use fdbk_core::error::ServiceError;

use super::{CredentialForm, Focus, FormKind};
use crate::common::{TaskKind, TaskSeq, Tasks};
use crate::effects::UiEffect;
use crate::mutations::StateMutation;
use crate::route::Route;
use crate::toast::Toast;

pub const LOGIN_SUCCESS: &str = "Bem-vindo de volta";
pub const LOGIN_FAILED: &str = "Erro ao logar no sistema";
pub const REGISTER_SUCCESS: &str = "Bem-vindo à plataforma";
pub const REGISTER_FAILED: &str = "Erro ao cadastrar este usuário";

fn task_kind(kind: FormKind) -> TaskKind {
    match kind {
        FormKind::Login => TaskKind::SignIn,
        FormKind::Register => TaskKind::Register,
    }
}

/// Handles a key press on a credential form screen.
pub fn handle_form_key(
    form: &mut CredentialForm,
    tasks: &mut Tasks,
    seq: &mut TaskSeq,
    key: KeyEvent,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('r') if ctrl && form.kind == FormKind::Login => (
            vec![],
            vec![StateMutation::Navigate {
                route: Route::Register,
                replace: false,
            }],
        ),
        KeyCode::Esc if form.kind == FormKind::Register => (vec![], vec![StateMutation::Back]),
        KeyCode::Tab | KeyCode::Down => {
            form.focus_next();
            (vec![], vec![])
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus_prev();
            (vec![], vec![])
        }
        KeyCode::Enter => (submit(form, tasks, seq), vec![]),
        _ => {
            if let Focus::Field(id) = form.focused()
                && form.field_mut(id).handle_key(key)
            {
                form.on_edit(id);
            }
            (vec![], vec![])
        }
    }
}

/// Inserts pasted text into the focused field.
pub fn handle_form_paste(form: &mut CredentialForm, text: &str) {
    if let Focus::Field(id) = form.focused() {
        form.field_mut(id).insert_str(text);
        form.on_edit(id);
    }
}

/// Validates and, when valid, starts the submission.
///
/// Nothing is emitted while a submission of the same kind is in flight or
/// when validation fails.
fn submit(form: &mut CredentialForm, tasks: &mut Tasks, seq: &mut TaskSeq) -> Vec<UiEffect> {
    let kind = task_kind(form.kind);
    if tasks.state(kind).is_running() {
        return vec![];
    }
    if let Err(errors) = form.validate() {
        tracing::debug!(?errors, "form rejected by validation");
        return vec![];
    }
    let Some(task) = tasks.try_begin(seq, kind) else {
        return vec![];
    };

    let email = form.email.value().to_string();
    let password = form.password.value().to_string();
    match form.kind {
        FormKind::Login => vec![UiEffect::SignIn {
            task,
            email,
            password,
        }],
        FormKind::Register => vec![UiEffect::Register {
            task,
            name: form.name.value().to_string(),
            email,
            password,
        }],
    }
}

/// Applies a sign-in result.
///
/// Success adopts the session right away so the guard lets `/home` through,
/// then navigates there if the user is still on the login screen.
pub fn handle_sign_in_result(
    form: &mut CredentialForm,
    auth: &mut AuthState,
    current: Route,
    result: Result<Session, ServiceError>,
) -> Vec<StateMutation> {
    match result {
        Ok(session) => {
            tracing::info!(uid = %session.uid, "signed in");
            auth.apply_notification(Some(&session));
            *form = CredentialForm::login();
            let mut mutations = Vec::new();
            if current == Route::Login {
                mutations.push(StateMutation::Navigate {
                    route: Route::Home,
                    replace: true,
                });
            }
            mutations.push(StateMutation::Toast(Toast::success(LOGIN_SUCCESS)));
            mutations
        }
        Err(err) => {
            tracing::warn!(kind = %err.kind, "sign-in failed: {err}");
            vec![StateMutation::Toast(Toast::error(LOGIN_FAILED))]
        }
    }
}

/// Applies a registration result.
///
/// Success patches the identity with the submitted name and email before any
/// auth notification arrives.
pub fn handle_register_result(
    form: &mut CredentialForm,
    auth: &mut AuthState,
    current: Route,
    result: Result<Identity, ServiceError>,
) -> Vec<StateMutation> {
    match result {
        Ok(identity) => {
            tracing::info!(uid = %identity.id, "account created");
            auth.patch_identity(identity);
            *form = CredentialForm::register();
            let mut mutations = Vec::new();
            if current == Route::Register {
                mutations.push(StateMutation::Navigate {
                    route: Route::Home,
                    replace: true,
                });
            }
            mutations.push(StateMutation::Toast(Toast::success(REGISTER_SUCCESS)));
            mutations
        }
        Err(err) => {
            tracing::warn!(kind = %err.kind, "registration failed: {err}");
            vec![StateMutation::Toast(Toast::error(REGISTER_FAILED))]
        }
    }
}
