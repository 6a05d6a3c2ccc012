use super::permission_store::PermissionStore;
use crate::error::AccessLedgerResult;
use crate::reference::ReferenceDirectory;
use crate::types::{Area, AuthorizationResult, EmployeeId, MatchVerdict};
use std::sync::Arc;

/// Turns a recognizer verdict into an authorization verdict for one area.
///
/// The engine applies no confidence threshold; whether a sample matched is
/// the recognizer's call. A candidate that does not resolve to an enrolled
/// employee is treated exactly like no match.
#[derive(Clone)]
pub struct AccessDecisionEngine {
    directory: Arc<dyn ReferenceDirectory>,
    permissions: PermissionStore,
}

impl AccessDecisionEngine {
    pub fn new(directory: Arc<dyn ReferenceDirectory>, permissions: PermissionStore) -> Self {
        Self {
            directory,
            permissions,
        }
    }

    /// Decides whether the verdict's candidate may enter `area`.
    ///
    /// Only a lookup that could not be answered is an error; unmatched and
    /// unknown identities come back as `authorized: false, employee: None`.
    pub fn decide(
        &self,
        verdict: &MatchVerdict,
        area: &Area,
    ) -> AccessLedgerResult<AuthorizationResult> {
        let denied = AuthorizationResult {
            authorized: false,
            employee: None,
            matched: verdict.matched,
            confidence: verdict.confidence,
        };

        if !verdict.matched {
            return Ok(denied);
        }
        let Some(candidate) = verdict.candidate_employee_id.as_deref() else {
            return Ok(denied);
        };

        // Ids the ledger could never have issued cannot resolve either.
        let Ok(employee_id) = EmployeeId::new(candidate) else {
            log::debug!("Recognizer returned malformed employee id '{}'", candidate);
            return Ok(denied);
        };

        let Some(employee) = self.directory.find_employee(&employee_id)? else {
            log::info!(
                "Matched employee {} is not enrolled; treating as no match",
                employee_id
            );
            return Ok(denied);
        };

        let authorized = self.permissions.exists(&employee.id, &area.id)?;

        Ok(AuthorizationResult {
            authorized,
            employee: Some(employee),
            matched: verdict.matched,
            confidence: verdict.confidence,
        })
    }
}
