//! TUI reducer (update function).
//!
//! All state changes happen here. The runtime calls `update(app, event)` and
//! executes the returned effects; the reducer itself never performs I/O.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::common::{TaskKind, TaskState};
use crate::effects::UiEffect;
use crate::events::{AuthUiEvent, FeedbackUiEvent, UiEvent};
use crate::feedback::HomeState;
use crate::mutations::{FeedbackMutation, StateMutation};
use crate::overlays::{self, Overlay, OverlayRequest};
use crate::route::{self, Route};
use crate::state::{AppState, TuiState};
use crate::{feedback, forms};

/// The main reducer function.
///
/// After the event is applied the current route is checked against the
/// guard, and entering the home screen starts a feedback load.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    let before = app.tui.route();
    let mut effects = reduce(app, event);
    effects.extend(settle_route(app, before));
    effects
}

/// Effects to run once at startup, before any event arrives.
pub fn start(app: &mut AppState) -> Vec<UiEffect> {
    enforce_guard(&mut app.tui);
    if app.tui.route() == Route::Home {
        feedback::start_load(&mut app.tui.tasks, &mut app.tui.task_seq)
    } else {
        vec![]
    }
}

fn reduce(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            app.tui.toasts.prune(Instant::now());
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::Auth(auth_event) => {
            handle_auth_event(&mut app.tui, auth_event);
            vec![]
        }
        UiEvent::Feedback(FeedbackUiEvent::Loaded(result)) => {
            let mutations = feedback::handle_feedback_loaded(&mut app.tui.home, result);
            apply_mutations(&mut app.tui, mutations);
            vec![]
        }
        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tui.tasks.state_mut(kind).finish_if_active(completed.id) {
                reduce(app, *completed.result)
            } else {
                tracing::debug!(?kind, id = completed.id.0, "dropping stale completion");
                vec![]
            }
        }
    }
}

// ============================================================================
// Routing
// ============================================================================

/// Redirects away from a guarded route the user may not see. The redirect
/// replaces the entry so history never holds it.
fn enforce_guard(tui: &mut TuiState) {
    let current = tui.route();
    let allowed = route::guard(current, &tui.auth);
    if allowed != current {
        tracing::debug!(from = current.path(), to = allowed.path(), "route guard redirect");
        tui.navigator.replace(allowed);
    }
}

fn settle_route(app: &mut AppState, before: Route) -> Vec<UiEffect> {
    enforce_guard(&mut app.tui);
    let now = app.tui.route();
    if now == before {
        return vec![];
    }

    tracing::debug!(from = before.path(), to = now.path(), "navigated");
    app.overlay = None;
    app.tui.home.search_focused = false;
    if now == Route::Home {
        feedback::start_load(&mut app.tui.tasks, &mut app.tui.task_seq)
    } else {
        vec![]
    }
}

// ============================================================================
// StateMutation Dispatcher
// ============================================================================

fn apply_mutations(tui: &mut TuiState, mutations: Vec<StateMutation>) {
    for mutation in mutations {
        match mutation {
            StateMutation::Navigate { route, replace } => tui.navigator.navigate(route, replace),
            StateMutation::Back => {
                if !tui.navigator.back() {
                    tui.navigator.replace(Route::Login);
                }
            }
            StateMutation::Toast(toast) => tui.toasts.push(toast),
            StateMutation::Feedback(FeedbackMutation::SetOrder(order)) => {
                tui.home.list.set_order(order);
            }
        }
    }
}

// ============================================================================
// Auth Events
// ============================================================================

fn handle_auth_event(tui: &mut TuiState, event: AuthUiEvent) {
    let current = tui.route();
    let was_signed = tui.auth.signed();
    let mutations = match event {
        AuthUiEvent::Changed(session) => {
            tracing::debug!(signed = session.is_some(), "auth state changed");
            tui.auth.apply_notification(session.as_ref());
            vec![]
        }
        AuthUiEvent::SignedIn(result) => {
            forms::handle_sign_in_result(&mut tui.login_form, &mut tui.auth, current, result)
        }
        AuthUiEvent::Registered(result) => {
            forms::handle_register_result(&mut tui.register_form, &mut tui.auth, current, result)
        }
        AuthUiEvent::SignedOut(result) => feedback::handle_signed_out(&mut tui.auth, result),
    };
    if was_signed && !tui.auth.signed() {
        reset_home(tui);
    }
    apply_mutations(tui, mutations);
}

/// Drops everything the previous account loaded. An in-flight load is
/// forgotten so its completion is discarded as stale.
fn reset_home(tui: &mut TuiState) {
    tracing::debug!("session ended; clearing home state");
    tui.home = HomeState::new();
    tui.tasks.feedback_load = TaskState::default();
}

// ============================================================================
// Terminal Event Handlers
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            if app.overlay.is_none() {
                handle_paste(&mut app.tui, &text);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_paste(tui: &mut TuiState, text: &str) {
    match route::guard(tui.route(), &tui.auth) {
        Route::Login => forms::handle_form_paste(&mut tui.login_form, text),
        Route::Register => forms::handle_form_paste(&mut tui.register_form, text),
        Route::Home => feedback::handle_home_paste(&mut tui.home, text),
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return vec![UiEffect::Quit];
    }

    if let Some(overlay) = app.overlay.as_mut() {
        let update = overlay.handle_key(&app.tui, key);
        apply_mutations(&mut app.tui, update.mutations);
        if matches!(update.transition, overlays::OverlayTransition::Close) {
            app.overlay = None;
        }
        return update.effects;
    }

    let tui = &mut app.tui;
    match route::guard(tui.route(), &tui.auth) {
        Route::Login => {
            let (effects, mutations) =
                forms::handle_form_key(&mut tui.login_form, &mut tui.tasks, &mut tui.task_seq, key);
            apply_mutations(tui, mutations);
            effects
        }
        Route::Register => {
            let (effects, mutations) = forms::handle_form_key(
                &mut tui.register_form,
                &mut tui.tasks,
                &mut tui.task_seq,
                key,
            );
            apply_mutations(tui, mutations);
            effects
        }
        Route::Home => {
            let (effects, request) =
                feedback::handle_home_key(&mut tui.home, &mut tui.tasks, &mut tui.task_seq, key);
            if let Some(request) = request {
                open_overlay(app, request);
            }
            effects
        }
    }
}

fn open_overlay(app: &mut AppState, request: OverlayRequest) {
    if app.overlay.is_none() {
        app.overlay = Some(Overlay::open(request, &app.tui));
    }
}

/// True while a task of `kind` is in flight. Used by render for busy states.
pub fn is_busy(tui: &TuiState, kind: TaskKind) -> bool {
    tui.tasks.state(kind).is_running()
}
