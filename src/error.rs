use crate::recognizer::RecognizerError;
use thiserror::Error;

/// Unified error type for the access ledger.
///
/// Variants line up with how a failure is surfaced to callers: `NotFound` and
/// `Conflict` are client-visible, the recognizer and persistence variants are
/// server-side failures whose detail must stay in the logs.
///
/// "No match" and "not authorized" are never errors. They are successfully
/// recorded outcomes.
#[derive(Error, Debug)]
pub enum AccessLedgerError {
    /// A referenced employee, area, grant, model or event does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The grant already exists for this (employee, area) pair
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The recognizer could not be reached or did not answer in time
    #[error("Recognizer unavailable: {0}")]
    RecognizerUnavailable(String),

    /// The recognizer answered with an error payload or an unreadable body
    #[error("Recognizer error: {0}")]
    RecognizerError(String),

    /// The storage layer failed
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Caller supplied malformed input (bad id, bad base64, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Errors related to configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AccessLedgerError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for failures that originate on our side of the boundary and must
    /// be reported with a generic message.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::RecognizerUnavailable(_)
                | Self::RecognizerError(_)
                | Self::Persistence(_)
                | Self::Config(_)
        )
    }
}

impl From<sled::Error> for AccessLedgerError {
    fn from(error: sled::Error) -> Self {
        AccessLedgerError::Persistence(error.to_string())
    }
}

impl From<serde_json::Error> for AccessLedgerError {
    fn from(error: serde_json::Error) -> Self {
        AccessLedgerError::Persistence(format!("Serialization error: {}", error))
    }
}

impl From<RecognizerError> for AccessLedgerError {
    fn from(error: RecognizerError) -> Self {
        match error {
            RecognizerError::Transport(_) | RecognizerError::Timeout(_) => {
                AccessLedgerError::RecognizerUnavailable(error.to_string())
            }
            RecognizerError::Remote(_) | RecognizerError::InvalidResponse(_) => {
                AccessLedgerError::RecognizerError(error.to_string())
            }
        }
    }
}

/// Result type alias for operations that can result in an AccessLedgerError
pub type AccessLedgerResult<T> = Result<T, AccessLedgerError>;
