//! Error types for forge API operations.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when talking to a forge's REST API.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The request never produced a response (connection failure, timeout).
    #[error("network error: {message}")]
    Network { message: String },

    /// The remote rejected the credentials (HTTP 401/403).
    #[error("authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// The repository or branch does not exist (HTTP 404).
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Any other non-success status.
    #[error("unexpected response ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// A success response whose body could not be understood.
    #[error("malformed response: {message}")]
    Decode { message: String },

    /// The client could not be constructed.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ForgeError {
    /// Classify a non-success response.
    ///
    /// `resource` names what was requested and ends up in `NotFound`.
    pub fn from_status(status: u16, body: String, resource: impl Into<String>) -> Self {
        match status {
            401 | 403 => ForgeError::Auth {
                status,
                message: body,
            },
            404 => ForgeError::NotFound {
                resource: resource.into(),
            },
            _ => ForgeError::Upstream {
                status,
                message: body,
            },
        }
    }

    /// HTTP status carried by the error, if the remote answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ForgeError::Auth { status, .. } | ForgeError::Upstream { status, .. } => Some(*status),
            ForgeError::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl From<HttpError> for ForgeError {
    fn from(err: HttpError) -> Self {
        ForgeError::Network {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ForgeError {
    fn from(err: serde_json::Error) -> Self {
        ForgeError::Decode {
            message: err.to_string(),
        }
    }
}

/// Get a short error message suitable for progress output.
pub fn short_error_message(err: &ForgeError) -> String {
    match err {
        ForgeError::Network { .. } => "Network error".to_string(),
        ForgeError::Auth { status, .. } => format!("HTTP {status}: authentication failed"),
        ForgeError::NotFound { resource } => format!("Not found: {resource}"),
        ForgeError::Upstream { status, message } => {
            if message.is_empty() {
                format!("HTTP {status}")
            } else if message.chars().count() > 50 {
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {status}: {truncated}...")
            } else {
                format!("HTTP {status}: {message}")
            }
        }
        ForgeError::Decode { .. } => "Malformed response".to_string(),
        ForgeError::Config(msg) => format!("Config: {msg}"),
    }
}
