//! Domain types shared by the store, the ledger and the orchestrator.
//!
//! Relationships are plain id references resolved through lookups; no type
//! here owns another entity.

pub mod ids;
pub mod ledger;
pub mod recognition;
pub mod reference;

pub use ids::{AccessEventId, AreaId, EmployeeId, EvidenceId, GrantId, ModelId};
pub use ledger::{
    AccessEvent, AccessType, EmployeeStatistics, EvidenceInput, Grant, ModelUse,
    RecognitionEvidence,
};
pub use recognition::{
    AuthorizationResult, BiometricSample, MatchVerdict, ModelKind, RecognizerModel,
};
pub use reference::{Area, Employee};
