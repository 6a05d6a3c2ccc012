use super::core::DbOperations;
use crate::error::AccessLedgerResult;
use crate::types::{Area, AreaId, Employee, EmployeeId, Grant};

impl DbOperations {
    pub fn put_employee(&self, employee: &Employee) -> AccessLedgerResult<()> {
        self.store_in_tree(&self.employees_tree, employee.id.as_str(), employee)
    }

    pub fn get_employee(&self, employee_id: &EmployeeId) -> AccessLedgerResult<Option<Employee>> {
        self.get_from_tree(&self.employees_tree, employee_id.as_str())
    }

    pub fn list_employees(&self) -> AccessLedgerResult<Vec<Employee>> {
        self.list_items_in_tree(&self.employees_tree)
    }

    /// Removes the employee and its grants. Ledger records are left untouched
    /// and keep the bare id.
    pub fn delete_employee(&self, employee_id: &EmployeeId) -> AccessLedgerResult<Option<Employee>> {
        let removed = self.take_from_tree::<Employee>(&self.employees_tree, employee_id.as_str())?;
        if removed.is_some() {
            let grants: Vec<Grant> = self.grants_for_employee(employee_id)?;
            for grant in grants {
                self.remove_grant(&grant.id)?;
            }
        }
        Ok(removed)
    }

    pub fn put_area(&self, area: &Area) -> AccessLedgerResult<()> {
        self.store_in_tree(&self.areas_tree, area.id.as_str(), area)
    }

    pub fn get_area(&self, area_id: &AreaId) -> AccessLedgerResult<Option<Area>> {
        self.get_from_tree(&self.areas_tree, area_id.as_str())
    }

    pub fn list_areas(&self) -> AccessLedgerResult<Vec<Area>> {
        self.list_items_in_tree(&self.areas_tree)
    }
}
