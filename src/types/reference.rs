use super::ids::{AreaId, EmployeeId};
use serde::{Deserialize, Serialize};

fn default_max_samples() -> u32 {
    5
}

/// An enrolled employee. Owned by identity management; the ledger only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Maximum number of enrolled biometric samples
    #[serde(default = "default_max_samples")]
    pub max_samples: u32,
}

impl Employee {
    pub fn new(id: EmployeeId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            phone_number: None,
            address: None,
            email: None,
            max_samples: default_max_samples(),
        }
    }
}

/// A physical area guarded by the access system. Flat identifiers only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub security_level: i32,
}

impl Area {
    pub fn new(id: AreaId, name: impl Into<String>, security_level: i32) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            security_level,
        }
    }
}
