// Core database operations
pub mod core;
pub mod error_utils;
mod grant_operations;
mod ledger_operations;
mod model_operations;
mod reference_operations;

// Re-export the main DbOperations struct and error utilities
pub use self::core::DbOperations;
pub use self::error_utils::ErrorUtils;
