use super::{Identity, Session};

/// Signed-in state shared by the route guard and the forms.
///
/// Starts out `loading` until the auth service reports its initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    identity: Option<Identity>,
    loading: bool,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }

    pub fn signed(&self) -> bool {
        self.identity.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Overwrites the held identity. Used right after registration, before the
    /// auth service's own notification arrives.
    pub fn patch_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Applies an auth state notification. The identity is replaced wholesale;
    /// either branch ends the initial loading phase.
    pub fn apply_notification(&mut self, session: Option<&Session>) {
        self.identity = session.map(Identity::from);
        self.loading = false;
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}
