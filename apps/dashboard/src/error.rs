//! # App Error Type
//!
//! Unified error type for navigator actions.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Dashboard                          │
//! │                                                                         │
//! │  Navigator action                                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Route error?      ─── RouteError::NotFound ──────────┐                │
//! │         │                                             │                │
//! │         ▼                                             ▼                │
//! │  Validation error? ─── ValidationError ─────────► AppError ──► prompt  │
//! │         │                                             ▲                │
//! │         ▼                                             │                │
//! │  Remote failure?   ─── ClientError / QueryError ──────┘                │
//! │                                                                         │
//! │  Screens render their own static messages ("Error loading products").  │
//! │  AppError is for failures outside a screen: bad path, bad command,     │
//! │  unusable configuration.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use inventory_client::{ClientError, QueryError};
use inventory_core::{CoreError, RouteError, ValidationError};

/// Result type alias for dashboard operations.
pub type AppResult<T> = Result<T, AppError>;

/// Error surfaced to the terminal user.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "No route matches /settings"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown path or resource
    NotFound,

    /// Bad path parameters or form input
    ValidationError,

    /// Request never got an answer
    NetworkError,

    /// The service answered, but not with what we needed
    RemoteError,

    /// Configuration could not be used
    ConfigError,

    /// Unrecognised terminal command
    BadCommand,

    Internal,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn bad_command(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::BadCommand, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<RouteError> for AppError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NotFound(_) => AppError::new(ErrorCode::NotFound, err.to_string()),
            RouteError::InvalidQuery { .. } | RouteError::InvalidId(_) => {
                AppError::validation(err.to_string())
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Route(e) => e.into(),
            CoreError::Validation(e) => e.into(),
            CoreError::InvalidProductId(_) => AppError::validation(err.to_string()),
        }
    }
}

/// Converts client errors, keeping internal detail in the log only.
impl From<&ClientError> for AppError {
    fn from(err: &ClientError) -> Self {
        if err.is_config_error() {
            return AppError::new(ErrorCode::ConfigError, err.to_string());
        }

        tracing::error!("Remote call failed: {}", err);
        let code = if err.is_network() {
            ErrorCode::NetworkError
        } else if err.is_not_found() {
            ErrorCode::NotFound
        } else {
            ErrorCode::RemoteError
        };
        AppError::new(code, err.user_message())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::from(&err)
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err.client_error() {
            Some(client) => AppError::from(client),
            None => {
                tracing::error!("Cache read failed: {}", err);
                AppError::new(ErrorCode::RemoteError, err.user_message())
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
