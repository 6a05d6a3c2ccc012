//! Error types for the recognizer client

use std::time::Duration;
use thiserror::Error;

/// Failures talking to the external recognizer.
///
/// `Transport` and `Timeout` mean the recognizer could not be asked at all.
/// `Remote` means it answered with an explicit error payload, and
/// `InvalidResponse` means it answered with something unreadable.
#[derive(Error, Debug, Clone)]
pub enum RecognizerError {
    /// Connection or protocol failure before a response was read
    #[error("transport failure: {0}")]
    Transport(String),

    /// No answer within the configured bound
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The recognizer returned an `error` payload
    #[error("recognizer reported: {0}")]
    Remote(String),

    /// The response body could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for RecognizerError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RecognizerError::InvalidResponse(error.to_string())
        } else {
            RecognizerError::Transport(error.to_string())
        }
    }
}
