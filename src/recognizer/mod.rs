//! The external biometric recognizer and the models it can load.

pub mod client;
pub mod error;
pub mod models;

pub use client::{HttpRecognizerClient, RecognizerClient};
pub use error::RecognizerError;
pub use models::ModelRegistry;
