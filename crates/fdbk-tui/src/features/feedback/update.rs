//! Home screen reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fdbk_core::auth::AuthState;
use fdbk_core::error::ServiceError;
use fdbk_core::feedback::FeedbackRecord;

use super::HomeState;
use crate::common::{TaskKind, TaskSeq, Tasks};
use crate::effects::UiEffect;
use crate::mutations::StateMutation;
use crate::overlays::OverlayRequest;
use crate::route::Route;
use crate::toast::Toast;

pub const FEEDBACK_LOAD_FAILED: &str = "Erro ao carregar feedbacks";

/// Starts a feedback load unless one is already in flight.
pub fn start_load(tasks: &mut Tasks, seq: &mut TaskSeq) -> Vec<UiEffect> {
    match tasks.try_begin(seq, TaskKind::FeedbackLoad) {
        Some(task) => vec![UiEffect::LoadFeedback { task }],
        None => {
            tracing::debug!("feedback load already in flight");
            vec![]
        }
    }
}

/// Handles a key press on the home screen (no overlay open).
pub fn handle_home_key(
    home: &mut HomeState,
    tasks: &mut Tasks,
    seq: &mut TaskSeq,
    key: KeyEvent,
) -> (Vec<UiEffect>, Option<OverlayRequest>) {
    if home.search_focused {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => home.search_focused = false,
            _ => {
                if home.search.handle_key(key) {
                    home.sync_search();
                }
            }
        }
        return (vec![], None);
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (vec![], None);
    }

    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            home.list.prev_page();
            (vec![], None)
        }
        KeyCode::Right | KeyCode::Char('l') => {
            home.list.next_page();
            (vec![], None)
        }
        KeyCode::Char('/') => {
            home.search_focused = true;
            (vec![], None)
        }
        KeyCode::Char('o') => (vec![], Some(OverlayRequest::OrderPicker)),
        KeyCode::Char('r') | KeyCode::F(5) => (start_load(tasks, seq), None),
        KeyCode::Char('x') => match tasks.try_begin(seq, TaskKind::SignOut) {
            Some(task) => (vec![UiEffect::SignOut { task }], None),
            None => (vec![], None),
        },
        KeyCode::Char('q') => (vec![UiEffect::Quit], None),
        _ => (vec![], None),
    }
}

/// Pasted text goes to the search box when it has focus.
pub fn handle_home_paste(home: &mut HomeState, text: &str) {
    if home.search_focused {
        home.search.insert_str(text);
        home.sync_search();
    }
}

/// Applies a finished load. A failure keeps the previous collection.
pub fn handle_feedback_loaded(
    home: &mut HomeState,
    result: Result<Vec<FeedbackRecord>, ServiceError>,
) -> Vec<StateMutation> {
    home.loaded_once = true;
    match result {
        Ok(records) => {
            tracing::debug!(count = records.len(), "feedback loaded");
            home.list.replace(records);
            vec![]
        }
        Err(err) => {
            tracing::warn!(kind = %err.kind, "feedback load failed: {err}");
            vec![StateMutation::Toast(Toast::error(FEEDBACK_LOAD_FAILED))]
        }
    }
}

/// Applies a sign-out result. Failure is logged only.
pub fn handle_signed_out(
    auth: &mut AuthState,
    result: Result<(), ServiceError>,
) -> Vec<StateMutation> {
    match result {
        Ok(()) => {
            tracing::info!("signed out");
            auth.apply_notification(None);
            vec![StateMutation::Navigate {
                route: Route::Login,
                replace: true,
            }]
        }
        Err(err) => {
            tracing::warn!(kind = %err.kind, "sign-out failed: {err}");
            vec![]
        }
    }
}
