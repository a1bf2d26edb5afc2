// src/error.rs

use std::fmt;

/// Global Application Error Enum.
/// Every operation on the form ends in one of these; none are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    // Badge unknown or rejected by the gateway
    AuthError(String),

    // No schedule for the (exam, proctor) pair
    AssignmentNotFound(String),

    // Gateway refused a scanned code (duplicate, unknown, wrong exam)
    ScanRejected(String),

    // Missing signature, missing required field, bad input
    ValidationError(String),

    // Network failure, 5xx, or an unreadable response body
    TransportError(String),

    // Operation not permitted in the current session state
    InvalidState(String),

    // Bad or missing configuration
    Config(String),

    // Local I/O failure, e.g. the kiosk screen went away
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// The text shown to the proctor.
    ///
    /// Uses the server-provided message when there is one, otherwise a
    /// generic message for the error kind.
    pub fn user_message(&self) -> String {
        let (msg, fallback) = match self {
            AppError::AuthError(msg) => (msg, "Login failed"),
            AppError::AssignmentNotFound(msg) => (msg, "No assignment found for this exam"),
            AppError::ScanRejected(msg) => (msg, "Failed to record the scan"),
            AppError::ValidationError(msg) => (msg, "Invalid input"),
            AppError::TransportError(msg) => (msg, "Could not reach the server"),
            AppError::InvalidState(msg) => (msg, "Action not available right now"),
            AppError::Config(msg) => (msg, "Invalid configuration"),
            AppError::Io(msg) => (msg, "Local I/O failure"),
        };

        if msg.trim().is_empty() {
            fallback.to_string()
        } else {
            msg.clone()
        }
    }
}

/// Converts `reqwest::Error` into `AppError::TransportError`.
/// Allows using `?` on gateway requests.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::TransportError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::TransportError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(err.to_string())
    }
}
