//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! All side effects happen here. The reducer produces effects and the
//! runtime turns them into spawned tasks whose results come back through
//! the inbox, which is drained once per loop iteration.
//!
//! - `inbox.rs`: inbox channel types
//! - `handlers.rs`: async effect handlers (auth calls, feedback fetch)

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use fdbk_core::auth::{AuthService, AuthStateBridge, Session};
use fdbk_core::store::DocumentStore;
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::{AuthUiEvent, UiEvent};
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while something is animating (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick cadence when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Must be created inside a tokio runtime: effect handlers and the auth
/// bridge are spawned onto it.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    auth: Arc<dyn AuthService>,
    store: Arc<dyn DocumentStore>,
    bridge: AuthStateBridge,
    collection: String,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Sets up the terminal and subscribes to auth changes.
    ///
    /// `initial` is the session the auth service holds right now; it decides
    /// whether the first screen is login or home.
    pub fn new(
        auth: Arc<dyn AuthService>,
        store: Arc<dyn DocumentStore>,
        collection: String,
        initial: Option<&Session>,
    ) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (inbox_tx, inbox_rx) = inbox::channel();

        let mut bridge = AuthStateBridge::new(Arc::clone(&auth));
        let tx = inbox_tx.clone();
        bridge.start(move |session| {
            let _ = tx.send(UiEvent::Auth(AuthUiEvent::Changed(session)));
        });

        let now = Instant::now();
        Ok(Self {
            terminal,
            state: AppState::new(initial),
            inbox_tx,
            inbox_rx,
            auth,
            store,
            bridge,
            collection,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the event loop until the user quits.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        let effects = update::start(&mut self.state);
        self.execute_effects(effects);

        let result = self.event_loop();

        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;
            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Input is batched; only ticks and async results trigger a draw.
                if !matches!(&event, UiEvent::Terminal(_)) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let needs_fast_poll = self.state.tui.tasks.is_any_running()
            || !self.state.tui.toasts.is_empty()
            || self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let tick_interval = if needs_fast_poll {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };
        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns `f` with a TaskStarted/TaskCompleted lifecycle around it.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            started: TaskStarted { id },
        });
        tokio::spawn(async move {
            let result = f().await;
            let completed = TaskCompleted {
                id,
                result: Box::new(result),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::SignIn {
                task,
                email,
                password,
            } => {
                let auth = Arc::clone(&self.auth);
                self.spawn_task(TaskKind::SignIn, task, move || {
                    handlers::sign_in(auth, email, password)
                });
            }
            UiEffect::Register {
                task,
                name,
                email,
                password,
            } => {
                let auth = Arc::clone(&self.auth);
                self.spawn_task(TaskKind::Register, task, move || {
                    handlers::register(auth, name, email, password)
                });
            }
            UiEffect::SignOut { task } => {
                let auth = Arc::clone(&self.auth);
                self.spawn_task(TaskKind::SignOut, task, move || handlers::sign_out(auth));
            }
            UiEffect::LoadFeedback { task } => {
                let store = Arc::clone(&self.store);
                let collection = self.collection.clone();
                self.spawn_task(TaskKind::FeedbackLoad, task, move || {
                    handlers::load_feedback(store, collection)
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        self.bridge.stop();
        let _ = terminal::restore_terminal();
    }
}
