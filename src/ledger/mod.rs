//! The audit trail: write side ([`AuditLedger`]) and read side ([`AuditQueries`]).

pub mod audit_ledger;
pub mod queries;

pub use audit_ledger::{AccessRecord, AuditLedger, AuditStore};
pub use queries::{AccessLogFilter, AuditQueries};
