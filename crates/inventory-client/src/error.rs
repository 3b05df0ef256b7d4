//! # Client Error Types
//!
//! Error types for configuration, remote calls and cached queries.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  Status (non-2xx)       │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Decode (bad shape)     │ │
//! │  │  ConfigLoad     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  QueryError: what a cache reader sees. Wraps a shared ClientError so   │
//! │  every reader of one failed fetch gets the same error.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Screens never show `Display` output of these errors directly; they show
//! [`ClientError::user_message`], a static text. The detail goes to the log.

use std::sync::Arc;

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Message shown for any non-2xx response. 4xx and 5xx are not distinguished.
pub const NOT_OK_MESSAGE: &str = "Network response was not ok";

/// Client error type covering configuration and remote call failures.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Invalid service URL.
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// The service answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else if err.is_builder() {
            ClientError::InvalidConfig(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the request failed before a response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout(_))
    }

    /// Returns true if the service answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
        )
    }

    /// Static text shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::Status { .. } => NOT_OK_MESSAGE,
            ClientError::Network(_) => "Failed to fetch",
            ClientError::Timeout(_) => "Request timed out",
            ClientError::Decode(_) => "Unexpected response from server",
            ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_) => "Client is misconfigured",
        }
    }
}

// =============================================================================
// Query Errors
// =============================================================================

/// Error seen by a reader of the query cache.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The fetch for this key failed. Shared by every reader of the entry.
    #[error(transparent)]
    Fetch(Arc<ClientError>),

    /// The cached value was stored under this key with a different type.
    #[error("Cached value for {key} has an unexpected type")]
    TypeMismatch { key: String },
}

impl QueryError {
    /// Static text shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            QueryError::Fetch(err) => err.user_message(),
            QueryError::TypeMismatch { .. } => "Unexpected response from server",
        }
    }

    /// The underlying client error, if any.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            QueryError::Fetch(err) => Some(err),
            QueryError::TypeMismatch { .. } => None,
        }
    }
}

impl From<ClientError> for QueryError {
    fn from(err: ClientError) -> Self {
        QueryError::Fetch(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_share_one_message() {
        let not_found = ClientError::Status {
            status: 404,
            url: "http://x/products/1".into(),
        };
        let server = ClientError::Status {
            status: 503,
            url: "http://x/products".into(),
        };
        assert_eq!(not_found.user_message(), NOT_OK_MESSAGE);
        assert_eq!(server.user_message(), NOT_OK_MESSAGE);
        assert!(not_found.is_not_found());
        assert!(!server.is_not_found());
    }

    #[test]
    fn test_categories() {
        assert!(ClientError::Network("refused".into()).is_network());
        assert!(ClientError::Timeout("10s".into()).is_network());
        assert!(!ClientError::Decode("eof".into()).is_network());
        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
    }

    #[test]
    fn test_json_error_is_decode() {
        let err: ClientError = serde_json::from_str::<u32>("\"nope\"").unwrap_err().into();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_query_error_is_transparent() {
        let err = QueryError::from(ClientError::Network("connection refused".into()));
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert_eq!(err.user_message(), "Failed to fetch");
        assert!(err.client_error().is_some());
    }
}
