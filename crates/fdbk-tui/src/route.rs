//! Screens, navigation history, and the signed-in guard.

use fdbk_core::auth::AuthState;

/// A screen, identified by its logical path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`: the entry screen.
    Login,
    /// `/register`
    Register,
    /// `/home`: requires a signed-in user.
    Home,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Register => "/register",
            Route::Home => "/home",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/home" => Some(Route::Home),
            _ => None,
        }
    }

    pub fn is_guarded(self) -> bool {
        matches!(self, Route::Home)
    }
}

/// Resolves the screen to show for `route`: guarded routes fall back to the
/// login screen when nobody is signed in.
///
/// Only `signed` is consulted; a still-loading auth state counts as signed out.
pub fn guard(route: Route, auth: &AuthState) -> Route {
    if route.is_guarded() && !auth.signed() {
        Route::Login
    } else {
        route
    }
}

/// Navigation history. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self { stack: vec![start] }
    }

    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::Login)
    }

    pub fn history(&self) -> &[Route] {
        &self.stack
    }

    pub fn push(&mut self, route: Route) {
        self.stack.push(route);
    }

    /// Replaces the current entry.
    pub fn replace(&mut self, route: Route) {
        match self.stack.last_mut() {
            Some(top) => *top = route,
            None => self.stack.push(route),
        }
    }

    pub fn navigate(&mut self, route: Route, replace: bool) {
        if replace {
            self.replace(route);
        } else {
            self.push(route);
        }
    }

    /// Goes back one entry. Returns false if already at the first entry.
    pub fn back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}
