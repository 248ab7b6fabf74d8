//! Pure view functions.
//!
//! Everything here reads `&AppState` and draws; nothing mutates state.

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::common::TaskKind;
use crate::overlays::OverlayExt;
use crate::route::{self, Route};
use crate::state::AppState;
use crate::update::is_busy;
use crate::{feedback, forms, toast};

/// Renders the whole screen for the current (guarded) route.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let tui = &app.tui;
    let content = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    match route::guard(tui.route(), &tui.auth) {
        Route::Login => forms::render_form(
            frame,
            &tui.login_form,
            content,
            is_busy(tui, TaskKind::SignIn),
            tui.spinner_frame,
        ),
        Route::Register => forms::render_form(
            frame,
            &tui.register_form,
            content,
            is_busy(tui, TaskKind::Register),
            tui.spinner_frame,
        ),
        Route::Home => feedback::render_home(
            frame,
            content,
            &tui.home,
            tui.auth.identity(),
            &tui.tasks,
            tui.spinner_frame,
        ),
    }

    app.overlay.render(frame, area);
    toast::render_toasts(frame, &tui.toasts, area);
}
