//! The access attempt workflow.

pub mod orchestrator;

pub use orchestrator::{RecognitionOrchestrator, RecognitionOutcome, RecognitionRequest};
