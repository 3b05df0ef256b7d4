//! Login form.
//!
//! Credentials are checked against `POST /auth/login`; only an ok answer
//! flips the auth store. The email becomes the displayed username.

use serde::Serialize;
use tracing::{info, warn};

use inventory_core::validation::LoginForm;
use inventory_core::AuthState;

use crate::state::AppState;

/// Message shown for any failed login.
pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub email: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn { username: String },
    Failed,
}

pub async fn submit(state: &AppState, form: &LoginForm) -> LoginOutcome {
    let (email, password) = match form.validate() {
        Ok(credentials) => credentials,
        Err(err) => {
            warn!(error = %err, "Login form rejected");
            return LoginOutcome::Failed;
        }
    };

    match state.service.login(&email, &password).await {
        Ok(()) => {
            state.auth.update(|auth| auth.login(email.clone()));
            info!(username = %email, "Logged in");
            LoginOutcome::LoggedIn { username: email }
        }
        Err(err) => {
            warn!(error = %err, "Login rejected");
            LoginOutcome::Failed
        }
    }
}

/// Clears the session.
pub fn logout(state: &AppState) {
    state.auth.update(AuthState::logout);
    info!("Logged out");
}
