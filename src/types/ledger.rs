use super::ids::{AccessEventId, AreaId, EmployeeId, EvidenceId, GrantId, ModelId};
use crate::error::AccessLedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A standing permission allowing one employee into one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: GrantId,
    pub employee_id: EmployeeId,
    pub area_id: AreaId,
    pub granted_at: DateTime<Utc>,
}

impl Grant {
    pub fn new(employee_id: EmployeeId, area_id: AreaId) -> Self {
        Self {
            id: GrantId::generate(),
            employee_id,
            area_id,
            granted_at: Utc::now(),
        }
    }
}

/// Direction of a physical access attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessType {
    #[default]
    Entry,
    Exit,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Entry => "ENTRY",
            AccessType::Exit => "EXIT",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = AccessLedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ENTRY" => Ok(AccessType::Entry),
            "EXIT" => Ok(AccessType::Exit),
            other => Err(AccessLedgerError::invalid_input(format!(
                "Unknown access type '{}'",
                other
            ))),
        }
    }
}

/// The immutable audit record of one physical access attempt.
///
/// `employee_id` is absent when no identity was resolved. Once written it is
/// never rewritten, even if the employee is later deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    pub id: AccessEventId,
    pub area_id: AreaId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    pub timestamp: DateTime<Utc>,
    pub access_type: AccessType,
    pub authorized: bool,
}

/// Which model was used, frozen at the time of the recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUse {
    pub model_id: ModelId,
    pub path_name: String,
}

/// Best-effort diagnostic record of the biometric match behind an AccessEvent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionEvidence {
    pub id: EvidenceId,
    pub access_event_id: AccessEventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    pub segmentation_model: ModelUse,
    pub recognition_model: ModelUse,
    pub timestamp: DateTime<Utc>,
    /// Always within [0, 1]
    pub confidence: f64,
    /// Recognizer-internal identifier of the matched sample, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognizer_evidence_id: Option<String>,
    /// SHA-256 hex digest of the submitted sample bytes
    pub sample_digest: String,
}

/// Evidence payload handed to the ledger; ids and timestamps are assigned there.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceInput {
    pub employee_id: Option<EmployeeId>,
    pub segmentation_model: ModelUse,
    pub recognition_model: ModelUse,
    pub confidence: f64,
    pub recognizer_evidence_id: Option<String>,
    pub sample_digest: String,
}

/// Per-employee summary of recorded access attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeStatistics {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub total_attempts: u64,
    pub authorized_attempts: u64,
    pub denied_attempts: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_access: Option<DateTime<Utc>>,
}
