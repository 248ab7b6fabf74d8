//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── auth: AuthState          (who is signed in, loading flag)
//! │   ├── navigator: Navigator     (route history)
//! │   ├── login_form / register_form: CredentialForm
//! │   ├── home: HomeState          (feedback list, search box)
//! │   ├── toasts: Toasts
//! │   ├── task_seq: TaskSeq
//! │   └── tasks: Tasks             (single-flight network work)
//! └── overlay: Option<Overlay>
//! ```
//!
//! Overlays live beside `TuiState` so a handler can hold `&mut Overlay` and
//! `&TuiState` at the same time.

use fdbk_core::auth::{AuthState, Session};

use crate::common::{TaskSeq, Tasks};
use crate::feedback::HomeState;
use crate::forms::CredentialForm;
use crate::overlays::Overlay;
use crate::route::{Navigator, Route};
use crate::toast::Toasts;

/// Combined application state for the TUI.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    /// Creates the state from the session the auth service holds at startup.
    ///
    /// A restored session starts on the home screen; otherwise on login.
    pub fn new(initial: Option<&Session>) -> Self {
        let mut tui = TuiState::default();
        tui.auth.apply_notification(initial);
        if tui.auth.signed() {
            tui.navigator = Navigator::new(Route::Home);
        }
        Self { tui, overlay: None }
    }
}

/// TUI application state (non-overlay).
#[derive(Debug)]
pub struct TuiState {
    pub should_quit: bool,
    pub auth: AuthState,
    pub navigator: Navigator,
    pub login_form: CredentialForm,
    pub register_form: CredentialForm,
    pub home: HomeState,
    pub toasts: Toasts,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            should_quit: false,
            auth: AuthState::new(),
            navigator: Navigator::default(),
            login_form: CredentialForm::login(),
            register_form: CredentialForm::register(),
            home: HomeState::new(),
            toasts: Toasts::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
        }
    }
}

impl TuiState {
    pub fn route(&self) -> Route {
        self.navigator.current()
    }
}
