//! Error handling utilities for database operations
//!
//! Keeps error messages from the persistence layer consistent so the HTTP
//! layer and the logs see the same wording for the same failure.

use crate::error::AccessLedgerError;

/// Utility functions for common error handling patterns in database operations
pub struct ErrorUtils;

impl ErrorUtils {
    /// Creates a serialization error with consistent formatting
    pub fn serialization_error(context: &str, error: serde_json::Error) -> AccessLedgerError {
        AccessLedgerError::Persistence(format!("Serialization failed for {}: {}", context, error))
    }

    /// Creates a deserialization error with consistent formatting
    pub fn deserialization_error(context: &str, error: serde_json::Error) -> AccessLedgerError {
        AccessLedgerError::Persistence(format!(
            "Deserialization failed for {}: {}",
            context, error
        ))
    }

    /// Creates a database operation error with consistent formatting
    pub fn database_error(operation: &str, error: sled::Error) -> AccessLedgerError {
        AccessLedgerError::Persistence(format!("Database {} failed: {}", operation, error))
    }

    /// Creates a not found error with consistent formatting
    pub fn not_found_error(resource_type: &str, identifier: &str) -> AccessLedgerError {
        AccessLedgerError::NotFound(format!("{} '{}' not found", resource_type, identifier))
    }

    /// Helper for converting sled errors in database operations
    pub fn from_sled_error(operation: &str) -> impl Fn(sled::Error) -> AccessLedgerError + '_ {
        move |e| Self::database_error(operation, e)
    }

    /// Helper for converting serialization errors
    pub fn from_serialization_error(
        context: &str,
    ) -> impl Fn(serde_json::Error) -> AccessLedgerError + '_ {
        move |e| Self::serialization_error(context, e)
    }

    /// Helper for converting deserialization errors
    pub fn from_deserialization_error(
        context: &str,
    ) -> impl Fn(serde_json::Error) -> AccessLedgerError + '_ {
        move |e| Self::deserialization_error(context, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting() {
        let sled_err = sled::Error::Unsupported("test".to_string());
        let db_error = ErrorUtils::database_error("insert", sled_err);
        assert!(matches!(db_error, AccessLedgerError::Persistence(_)));
        assert!(db_error.to_string().contains("Database insert failed"));

        if let Err(json_err) = serde_json::from_str::<serde_json::Value>("invalid json") {
            let ser_error = ErrorUtils::deserialization_error("grant", json_err);
            assert!(matches!(ser_error, AccessLedgerError::Persistence(_)));
        }
    }

    #[test]
    fn test_not_found_error() {
        let error = ErrorUtils::not_found_error("Area", "vault");
        assert!(matches!(error, AccessLedgerError::NotFound(_)));
        assert_eq!(error.to_string(), "Not found: Area 'vault' not found");
    }
}
