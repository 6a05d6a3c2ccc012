use crate::error::{AccessLedgerError, AccessLedgerResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest identifier accepted anywhere in the ledger.
pub const MAX_ID_LEN: usize = 64;

/// Separator used inside composite storage keys. Identifiers may not contain it.
pub const KEY_SEPARATOR: char = ':';

fn validate_id(kind: &str, id: &str) -> AccessLedgerResult<()> {
    if id.trim().is_empty() {
        return Err(AccessLedgerError::invalid_input(format!(
            "{} must not be empty",
            kind
        )));
    }
    if id.len() > MAX_ID_LEN {
        return Err(AccessLedgerError::invalid_input(format!(
            "{} exceeds {} characters",
            kind, MAX_ID_LEN
        )));
    }
    if id.contains(KEY_SEPARATOR) || id.chars().any(char::is_control) {
        return Err(AccessLedgerError::invalid_input(format!(
            "{} '{}' contains a reserved character",
            kind, id
        )));
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> AccessLedgerResult<Self> {
                let id = id.into();
                validate_id($kind, &id)?;
                Ok(Self(id))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = AccessLedgerError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of an enrolled employee.
    EmployeeId,
    "employee id"
);
string_id!(
    /// Identifier of an access-controlled area.
    AreaId,
    "area id"
);
string_id!(GrantId, "grant id");
string_id!(AccessEventId, "access event id");
string_id!(EvidenceId, "evidence id");
string_id!(ModelId, "model id");

impl GrantId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl AccessEventId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl EvidenceId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl ModelId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
