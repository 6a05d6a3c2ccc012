use crate::db_operations::{DbOperations, ErrorUtils};
use crate::error::{AccessLedgerError, AccessLedgerResult};
use crate::types::{Area, AreaId, Employee, EmployeeId, Grant, GrantId};
use std::sync::Arc;

/// Holds the set of (employee, area) grants.
///
/// At most one grant exists per pair. Uniqueness is enforced by the storage
/// layer's compare-and-swap on the pair index, so concurrent callers granting
/// the same pair need no coordination here: exactly one wins and the others
/// see `Conflict`.
#[derive(Clone)]
pub struct PermissionStore {
    db_ops: Arc<DbOperations>,
}

impl PermissionStore {
    pub fn new(db_ops: Arc<DbOperations>) -> Self {
        Self { db_ops }
    }

    /// Grants `employee` access to `area`.
    ///
    /// # Errors
    ///
    /// * `Conflict` if an active grant for the pair already exists
    /// * `NotFound` if the employee was deleted before the grant landed
    /// * `Persistence` if the grant could not be stored
    pub fn grant(&self, employee: &Employee, area: &Area) -> AccessLedgerResult<Grant> {
        let grant = Grant::new(employee.id.clone(), area.id.clone());
        if !self.db_ops.insert_grant_if_absent(&grant)? {
            log::info!(
                "Grant refused: employee {} already has access to area {}",
                employee.id,
                area.id
            );
            return Err(AccessLedgerError::conflict(format!(
                "Employee {} already has access to area {}",
                employee.id, area.id
            )));
        }
        self.withdraw_if_employee_deleted(employee, std::slice::from_ref(&grant))?;

        log::info!(
            "Granted employee {} access to area {} (grant {})",
            employee.id,
            area.id,
            grant.id
        );
        Ok(grant)
    }

    /// Grants every area in `areas` that the employee does not hold yet.
    ///
    /// Pairs that are already granted, including ones granted concurrently
    /// while this runs, are skipped rather than reported as conflicts.
    /// Returns the number of grants created.
    pub fn grant_all(&self, employee: &Employee, areas: &[Area]) -> AccessLedgerResult<usize> {
        let mut created = Vec::new();
        for area in areas {
            let grant = Grant::new(employee.id.clone(), area.id.clone());
            if self.db_ops.insert_grant_if_absent(&grant)? {
                created.push(grant);
            }
        }
        self.withdraw_if_employee_deleted(employee, &created)?;
        let granted = created.len();

        log::info!(
            "Granted employee {} access to {} of {} areas",
            employee.id,
            granted,
            areas.len()
        );
        Ok(granted)
    }

    /// Undoes `created` if the employee was deleted while they were being
    /// inserted.
    ///
    /// Employee deletion removes the record before sweeping its grants, so
    /// either this check sees the record gone or the sweep sees these grants.
    fn withdraw_if_employee_deleted(
        &self,
        employee: &Employee,
        created: &[Grant],
    ) -> AccessLedgerResult<()> {
        if created.is_empty() || self.db_ops.get_employee(&employee.id)?.is_some() {
            return Ok(());
        }

        for grant in created {
            self.db_ops.remove_grant(&grant.id)?;
        }
        log::info!(
            "Withdrew {} grant(s) for employee {} deleted during the grant",
            created.len(),
            employee.id
        );
        Err(ErrorUtils::not_found_error("Employee", employee.id.as_str()))
    }

    /// Deletes a grant immediately. No history is kept.
    pub fn revoke(&self, grant_id: &GrantId) -> AccessLedgerResult<()> {
        match self.db_ops.remove_grant(grant_id)? {
            Some(grant) => {
                log::info!(
                    "Revoked grant {} (employee {}, area {})",
                    grant.id,
                    grant.employee_id,
                    grant.area_id
                );
                Ok(())
            }
            None => Err(AccessLedgerError::not_found(format!(
                "Access permission not found with id: {}",
                grant_id
            ))),
        }
    }

    pub fn list_by_employee(&self, employee_id: &EmployeeId) -> AccessLedgerResult<Vec<Grant>> {
        self.db_ops.grants_for_employee(employee_id)
    }

    pub fn exists(&self, employee_id: &EmployeeId, area_id: &AreaId) -> AccessLedgerResult<bool> {
        self.db_ops.grant_pair_exists(employee_id, area_id)
    }
}
