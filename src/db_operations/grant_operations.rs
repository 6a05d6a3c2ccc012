use super::core::DbOperations;
use super::error_utils::ErrorUtils;
use crate::error::AccessLedgerResult;
use crate::types::ids::KEY_SEPARATOR;
use crate::types::{AreaId, EmployeeId, Grant, GrantId};

fn pair_key(employee_id: &EmployeeId, area_id: &AreaId) -> String {
    format!("{}{}{}", employee_id, KEY_SEPARATOR, area_id)
}

fn employee_prefix(employee_id: &EmployeeId) -> String {
    format!("{}{}", employee_id, KEY_SEPARATOR)
}

impl DbOperations {
    /// Inserts `grant` unless its (employee, area) pair is already granted.
    ///
    /// The pair index is claimed with a compare-and-swap before the grant row
    /// is written; losing the swap means another grant owns the pair and
    /// `Ok(false)` is returned.
    pub fn insert_grant_if_absent(&self, grant: &Grant) -> AccessLedgerResult<bool> {
        let key = pair_key(&grant.employee_id, &grant.area_id);
        let claimed = self
            .grant_pairs_tree
            .compare_and_swap(
                key.as_bytes(),
                None as Option<&[u8]>,
                Some(grant.id.as_str().as_bytes()),
            )
            .map_err(ErrorUtils::from_sled_error("claim grant pair"))?;

        if claimed.is_err() {
            return Ok(false);
        }

        if let Err(e) = self.store_in_tree(&self.grants_tree, grant.id.as_str(), grant) {
            // Release the pair so the failed grant does not block future grants.
            if let Err(release_err) = self.grant_pairs_tree.compare_and_swap(
                key.as_bytes(),
                Some(grant.id.as_str().as_bytes()),
                None as Option<&[u8]>,
            ) {
                log::error!(
                    "Failed to release grant pair {} after write failure: {}",
                    key,
                    release_err
                );
            }
            return Err(e);
        }

        self.grant_pairs_tree
            .flush()
            .map_err(ErrorUtils::from_sled_error("flush"))?;
        Ok(true)
    }

    /// Removes a grant by id. Returns the removed grant, or `None` if it did not exist.
    ///
    /// The pair index is released before the grant row is deleted. A failure
    /// between the two steps leaves a row that no pair points at, which is
    /// invisible to lookups and is cleaned up by the next revoke of the same id.
    pub fn remove_grant(&self, grant_id: &GrantId) -> AccessLedgerResult<Option<Grant>> {
        let Some(grant) = self.get_from_tree::<Grant>(&self.grants_tree, grant_id.as_str())? else {
            return Ok(None);
        };

        let key = pair_key(&grant.employee_id, &grant.area_id);
        let released = self
            .grant_pairs_tree
            .compare_and_swap(
                key.as_bytes(),
                Some(grant_id.as_str().as_bytes()),
                None as Option<&[u8]>,
            )
            .map_err(ErrorUtils::from_sled_error("release grant pair"))?;

        if released.is_err() {
            log::warn!(
                "Grant pair {} no longer pointed at revoked grant {}",
                key,
                grant_id
            );
        }

        self.grant_pairs_tree
            .flush()
            .map_err(ErrorUtils::from_sled_error("flush"))?;

        // A concurrent revoke of the same id may have taken the row already.
        self.take_from_tree::<Grant>(&self.grants_tree, grant_id.as_str())
    }

    /// Whether an active grant exists for the pair
    pub fn grant_pair_exists(
        &self,
        employee_id: &EmployeeId,
        area_id: &AreaId,
    ) -> AccessLedgerResult<bool> {
        self.exists_in_tree(&self.grant_pairs_tree, &pair_key(employee_id, area_id))
    }

    /// All active grants for one employee, oldest first
    pub fn grants_for_employee(&self, employee_id: &EmployeeId) -> AccessLedgerResult<Vec<Grant>> {
        let grant_ids =
            self.list_values_with_prefix(&self.grant_pairs_tree, &employee_prefix(employee_id))?;

        let mut grants = Vec::with_capacity(grant_ids.len());
        for grant_id in grant_ids {
            // A pair claimed by a grant still being written has no row yet.
            if let Some(grant) = self.get_from_tree::<Grant>(&self.grants_tree, &grant_id)? {
                grants.push(grant);
            }
        }
        grants.sort_by(|a, b| a.granted_at.cmp(&b.granted_at));
        Ok(grants)
    }
}
