//! Error types for the orgdesk core crate

use std::{error::Error as StdError, fmt};

/// Main error type for configuration and local validation
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Invalid backend address
    InvalidUrl {
        /// The rejected address
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    #[must_use]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new validation error
    #[must_use]
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::InvalidUrl { url, reason } => write!(f, "Invalid backend URL '{url}': {reason}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
        }
    }
}

impl StdError for Error {}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}
