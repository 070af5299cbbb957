use yewdux::prelude::*;

#[derive(Clone, PartialEq, Default)]
pub enum AuthState {
    /// The token store has not been read yet.
    #[default]
    Unknown,
    LoggedOut,
    LoggedIn,
}

#[derive(Default, Clone, PartialEq, Store)]
pub struct State {
    // === Authentication (mirrored from the token store by use_auth) ===
    pub auth_state: AuthState,
}

impl State {
    pub fn is_authenticated(&self) -> bool {
        matches!(self.auth_state, AuthState::LoggedIn)
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.auth_state = if authenticated {
            AuthState::LoggedIn
        } else {
            AuthState::LoggedOut
        };
    }
}
