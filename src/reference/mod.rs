//! Reference data: employees and areas.
//!
//! The ledger never owns these records. It reads them through
//! [`ReferenceDirectory`], whose lookups report a missing record as
//! `Ok(None)` and keep `Err` for lookups that could not be answered.

use crate::db_operations::DbOperations;
use crate::error::AccessLedgerResult;
use crate::types::{Area, AreaId, Employee, EmployeeId};

/// Read-only lookups of reference data.
pub trait ReferenceDirectory: Send + Sync {
    fn find_employee(&self, id: &EmployeeId) -> AccessLedgerResult<Option<Employee>>;

    fn find_area(&self, id: &AreaId) -> AccessLedgerResult<Option<Area>>;

    fn all_areas(&self) -> AccessLedgerResult<Vec<Area>>;
}

impl ReferenceDirectory for DbOperations {
    fn find_employee(&self, id: &EmployeeId) -> AccessLedgerResult<Option<Employee>> {
        self.get_employee(id)
    }

    fn find_area(&self, id: &AreaId) -> AccessLedgerResult<Option<Area>> {
        self.get_area(id)
    }

    fn all_areas(&self) -> AccessLedgerResult<Vec<Area>> {
        self.list_areas()
    }
}
