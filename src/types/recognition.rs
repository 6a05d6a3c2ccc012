use super::ids::ModelId;
use super::reference::Employee;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AccessLedgerError;

/// Transient result returned by the external recognizer. Never persisted as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchVerdict {
    pub matched: bool,
    /// Raw candidate id as reported by the recognizer; may not resolve
    pub candidate_employee_id: Option<String>,
    pub confidence: f64,
    pub recognizer_evidence_id: Option<String>,
}

impl MatchVerdict {
    pub fn no_match(confidence: f64) -> Self {
        Self {
            matched: false,
            candidate_employee_id: None,
            confidence,
            recognizer_evidence_id: None,
        }
    }

    pub fn matched(employee_id: impl Into<String>, confidence: f64) -> Self {
        Self {
            matched: true,
            candidate_employee_id: Some(employee_id.into()),
            confidence,
            recognizer_evidence_id: None,
        }
    }

    pub fn with_recognizer_evidence_id(mut self, id: impl Into<String>) -> Self {
        self.recognizer_evidence_id = Some(id.into());
        self
    }
}

/// Output of the access decision. `employee` is set only when the candidate resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationResult {
    pub authorized: bool,
    pub employee: Option<Employee>,
    pub matched: bool,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Segmentation,
    Recognition,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Segmentation => "segmentation",
            ModelKind::Recognition => "recognition",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = AccessLedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "segmentation" => Ok(ModelKind::Segmentation),
            "recognition" => Ok(ModelKind::Recognition),
            other => Err(AccessLedgerError::invalid_input(format!(
                "Unknown model kind '{}'",
                other
            ))),
        }
    }
}

/// A trained model the recognizer can load, addressed by its path on the recognizer host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerModel {
    pub id: ModelId,
    pub kind: ModelKind,
    pub name: String,
    pub path_name: String,
    pub created_at: DateTime<Utc>,
}

/// A biometric sample as submitted by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiometricSample {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl BiometricSample {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
        }
    }

    /// SHA-256 of the raw sample, hex encoded.
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        hex::encode(Sha256::digest(&self.bytes))
    }
}
