//! User-visible notices produced when an operation finishes

use crate::error::ApiError;
use serde::Serialize;
use std::fmt;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// The operation succeeded
    Success,
    /// The operation failed
    Error,
}

/// A message for the person operating the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text to show
    pub message: String,
}

impl Notice {
    /// A success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// An error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Notice for a collection that could not be listed
    ///
    /// A backend that answered with an error status gets the short form; any
    /// other failure (no response, unreadable body) gets the generic one.
    #[must_use]
    pub fn fetch_failed(collection: &str, err: &ApiError) -> Self {
        match err {
            ApiError::Status { .. } => Self::error(format!("Failed to fetch {collection}")),
            _ => Self::error(format!("An error occurred while fetching {collection}")),
        }
    }

    /// Notice for a record that could not be deleted
    #[must_use]
    pub fn delete_failed(record: &str, err: &ApiError) -> Self {
        match err {
            ApiError::Status { .. } => Self::error(format!("Failed to delete {record}")),
            _ => Self::error(format!("An error occurred while deleting the {record}")),
        }
    }

    /// Whether this notice reports a failure
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
