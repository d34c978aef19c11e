//! Client error types
//!
//! Every variant produced by the request path renders as a message that can
//! be shown to the user as-is, in the locale active when the call failed.

use crate::locale::ErrorMessages;
use crate::storage::StorageError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response from the server
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The session could not be renewed; the user has to sign in again
    #[error("{0}")]
    SessionExpired(String),

    /// 500 without a server-supplied message
    #[error("{0}")]
    Server(String),

    /// 503 without a server-supplied message
    #[error("{0}")]
    ServiceUnavailable(String),

    /// 404 without a server-supplied message
    #[error("{0}")]
    NotFound(String),

    /// 403 without a server-supplied message
    #[error("{0}")]
    Forbidden(String),

    /// Any failure status that carried a `message` from the server
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Any other failure status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Token or redirect storage failed
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),

    /// OAuth callback URL was missing parameters or malformed
    #[error("Invalid OAuth callback: {0}")]
    InvalidCallback(String),
}

impl ClientError {
    /// Map a failure status to an error, preferring the server's own message
    pub fn from_status(status: u16, server_message: Option<String>, messages: &ErrorMessages) -> Self {
        if let Some(message) = server_message {
            return Self::Api { status, message };
        }

        match status {
            500 => Self::Server(messages.server.to_string()),
            503 => Self::ServiceUnavailable(messages.service_unavailable.to_string()),
            404 => Self::NotFound(messages.not_found.to_string()),
            403 => Self::Forbidden(messages.forbidden.to_string()),
            _ => Self::Http {
                status,
                message: messages.generic(status),
            },
        }
    }

    /// HTTP status behind this error, when there was a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server(_) => Some(500),
            Self::ServiceUnavailable(_) => Some(503),
            Self::NotFound(_) => Some(404),
            Self::Forbidden(_) => Some(403),
            Self::Api { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller should send the user back to the login screen
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
