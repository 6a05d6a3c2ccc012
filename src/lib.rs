//! # Access Ledger
//!
//! Access decisions and an append-only audit ledger for biometric physical
//! access control. A reader submits a biometric sample for an area; an
//! external recognizer identifies the employee; the ledger decides whether
//! that employee holds a grant for the area and records the attempt.
//!
//! ## Core Components
//!
//! * `permissions` - Grant store and the access decision engine
//! * `ledger` - Append-only access events with best-effort recognition evidence
//! * `recognition` - The end-to-end workflow for one access attempt
//! * `recognizer` - Client for the external biometric recognizer and its model registry
//! * `reference` - Employee and area lookups
//! * `db_operations` - sled-backed storage
//! * `node` - `AccessNode`, which ties the above together
//! * `http` - REST API over `AccessNode`
//!
//! ## Recording guarantees
//!
//! Every attempt that reaches a decision leaves exactly one access event.
//! The evidence record written after it is diagnostic: losing it is logged
//! but never fails the attempt. Attempts that fail before a decision (unknown
//! area or model, recognizer unavailable) leave nothing behind.

pub mod config;
pub mod db_operations;
pub mod error;
pub mod http;
pub mod ledger;
pub mod logging;
pub mod node;
pub mod permissions;
pub mod recognition;
pub mod recognizer;
pub mod reference;
pub mod testing_utils;
pub mod types;

// Re-export main types for convenience
pub use config::{load_node_config, NodeConfig, RecognizerConfig};
pub use error::{AccessLedgerError, AccessLedgerResult};
pub use http::AccessLedgerHttpServer;
pub use node::AccessNode;
pub use recognition::{RecognitionOutcome, RecognitionRequest};
pub use recognizer::{RecognizerClient, RecognizerError};
