//! Error types for backend communication

use thiserror::Error;

/// Result type alias for backend operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the organization backend
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout,
    /// interrupted body)
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint path that was requested
        endpoint: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status
    #[error("{endpoint} returned HTTP {status}{}", message_suffix(.message.as_deref()))]
    Status {
        /// Endpoint path that was requested
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// `error` field of the response body, when the backend sent one
        message: Option<String>,
    },

    /// The response body was not the expected JSON
    #[error("unexpected response body from {endpoint}: {source}")]
    Decode {
        /// Endpoint path that was requested
        endpoint: String,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// Input rejected before it was sent
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong
        message: String,
    },
}

fn message_suffix(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ApiError {
    /// Whether the failure happened below HTTP (no status was received)
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// HTTP status code, if the backend answered
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Error message supplied by the backend, if any
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<orgdesk_core::Error> for ApiError {
    fn from(err: orgdesk_core::Error) -> Self {
        match err {
            orgdesk_core::Error::Validation { message, .. } => Self::Validation { message },
            other => Self::Validation {
                message: other.to_string(),
            },
        }
    }
}
