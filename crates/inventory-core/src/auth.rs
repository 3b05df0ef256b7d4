//! # Auth State
//!
//! The client-side authentication flag.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────────────┐    login(username)    ┌──────────────────┐       │
//! │   │ unauthenticated  │ ────────────────────► │  authenticated   │       │
//! │   │ username: None   │ ◄──────────────────── │ username: Some   │       │
//! │   └──────────────────┘        logout()       └──────────────────┘       │
//! │                                                                         │
//! │   Initial state: unauthenticated. Held in memory only.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fields are private so the invariant `!is_authenticated ⇒ username is
//! None` can only be reached through [`AuthState::login`] and
//! [`AuthState::logout`].

use serde::Serialize;

/// Authentication state: `{is_authenticated, username}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    is_authenticated: bool,
    username: Option<String>,
}

impl AuthState {
    /// Returns the state after a successful login.
    pub fn login(self, username: impl Into<String>) -> Self {
        AuthState {
            is_authenticated: true,
            username: Some(username.into()),
        }
    }

    /// Returns the initial, logged-out state regardless of `self`.
    pub fn logout(self) -> Self {
        AuthState::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}
