use super::error_utils::ErrorUtils;
use crate::error::AccessLedgerResult;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Tree names, one per logical table.
pub(crate) const EMPLOYEES_TREE: &str = "employees";
pub(crate) const AREAS_TREE: &str = "areas";
pub(crate) const GRANTS_TREE: &str = "grants";
pub(crate) const GRANT_PAIRS_TREE: &str = "grant_pairs";
pub(crate) const ACCESS_EVENTS_TREE: &str = "access_events";
pub(crate) const RECOGNITION_EVIDENCE_TREE: &str = "recognition_evidence";
pub(crate) const SEGMENTATION_MODELS_TREE: &str = "segmentation_models";
pub(crate) const RECOGNITION_MODELS_TREE: &str = "recognition_models";

/// Database operations over a single sled instance.
///
/// Every logical table lives in its own tree. Cross-table relationships are
/// plain id strings; there are no foreign-key cascades at this layer.
#[derive(Clone)]
pub struct DbOperations {
    /// The underlying sled database instance
    db: sled::Db,
    pub(crate) employees_tree: sled::Tree,
    pub(crate) areas_tree: sled::Tree,
    /// Grant records keyed by grant id
    pub(crate) grants_tree: sled::Tree,
    /// Unique index `employee_id:area_id` -> grant id
    pub(crate) grant_pairs_tree: sled::Tree,
    pub(crate) access_events_tree: sled::Tree,
    /// Evidence keyed by the access event it belongs to
    pub(crate) evidence_tree: sled::Tree,
    pub(crate) segmentation_models_tree: sled::Tree,
    pub(crate) recognition_models_tree: sled::Tree,
}

impl DbOperations {
    /// Creates a new DbOperations instance with all required trees
    pub fn new(db: sled::Db) -> Result<Self, sled::Error> {
        let employees_tree = db.open_tree(EMPLOYEES_TREE)?;
        let areas_tree = db.open_tree(AREAS_TREE)?;
        let grants_tree = db.open_tree(GRANTS_TREE)?;
        let grant_pairs_tree = db.open_tree(GRANT_PAIRS_TREE)?;
        let access_events_tree = db.open_tree(ACCESS_EVENTS_TREE)?;
        let evidence_tree = db.open_tree(RECOGNITION_EVIDENCE_TREE)?;
        let segmentation_models_tree = db.open_tree(SEGMENTATION_MODELS_TREE)?;
        let recognition_models_tree = db.open_tree(RECOGNITION_MODELS_TREE)?;

        Ok(Self {
            db,
            employees_tree,
            areas_tree,
            grants_tree,
            grant_pairs_tree,
            access_events_tree,
            evidence_tree,
            segmentation_models_tree,
            recognition_models_tree,
        })
    }

    /// Opens (or creates) the database at `path`
    pub fn open(path: &Path) -> AccessLedgerResult<Self> {
        let db = sled::open(path).map_err(ErrorUtils::from_sled_error("open"))?;
        Self::new(db).map_err(ErrorUtils::from_sled_error("open trees"))
    }

    pub fn close(&self) {
        if let Err(e) = self.db.flush() {
            log::error!("Failed to flush database: {}", e);
        }
    }

    // ========== GENERIC TREE OPERATIONS ==========

    /// Store any serializable item in a specific tree, overwriting what is there
    pub fn store_in_tree<T: Serialize>(
        &self,
        tree: &sled::Tree,
        key: &str,
        item: &T,
    ) -> AccessLedgerResult<()> {
        let bytes = serde_json::to_vec(item).map_err(ErrorUtils::from_serialization_error(key))?;

        tree.insert(key.as_bytes(), bytes)
            .map_err(ErrorUtils::from_sled_error("insert"))?;

        tree.flush().map_err(ErrorUtils::from_sled_error("flush"))?;

        Ok(())
    }

    /// Store an item only if `key` is absent. Returns `false` when the key was taken.
    ///
    /// The check and the write are a single compare-and-swap, so two callers
    /// racing on the same key cannot both win.
    pub fn create_in_tree<T: Serialize>(
        &self,
        tree: &sled::Tree,
        key: &str,
        item: &T,
    ) -> AccessLedgerResult<bool> {
        let bytes = serde_json::to_vec(item).map_err(ErrorUtils::from_serialization_error(key))?;

        let swapped = tree
            .compare_and_swap(key.as_bytes(), None as Option<&[u8]>, Some(bytes))
            .map_err(ErrorUtils::from_sled_error("create"))?;

        if swapped.is_err() {
            return Ok(false);
        }

        tree.flush().map_err(ErrorUtils::from_sled_error("flush"))?;
        Ok(true)
    }

    /// Retrieve any deserializable item from a specific tree
    pub fn get_from_tree<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
        key: &str,
    ) -> AccessLedgerResult<Option<T>> {
        match tree.get(key.as_bytes()) {
            Ok(Some(bytes)) => {
                let item = serde_json::from_slice(&bytes)
                    .map_err(ErrorUtils::from_deserialization_error(key))?;
                Ok(Some(item))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(ErrorUtils::database_error("retrieve", e)),
        }
    }

    /// List all values in a tree
    pub fn list_items_in_tree<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
    ) -> AccessLedgerResult<Vec<T>> {
        let mut items = Vec::new();
        for result in tree.iter() {
            let (key, value) = result.map_err(ErrorUtils::from_sled_error("iterate"))?;
            let key_str = String::from_utf8_lossy(&key).to_string();
            let item = serde_json::from_slice(&value)
                .map_err(ErrorUtils::from_deserialization_error(&key_str))?;
            items.push(item);
        }
        Ok(items)
    }

    /// List raw string values stored under a key prefix
    pub fn list_values_with_prefix(
        &self,
        tree: &sled::Tree,
        prefix: &str,
    ) -> AccessLedgerResult<Vec<String>> {
        let mut values = Vec::new();
        for result in tree.scan_prefix(prefix.as_bytes()) {
            let (_, value) = result.map_err(ErrorUtils::from_sled_error("scan prefix"))?;
            values.push(String::from_utf8_lossy(&value).to_string());
        }
        Ok(values)
    }

    /// Delete an item from a specific tree, returning what was removed
    pub fn take_from_tree<T: DeserializeOwned>(
        &self,
        tree: &sled::Tree,
        key: &str,
    ) -> AccessLedgerResult<Option<T>> {
        let removed = tree
            .remove(key.as_bytes())
            .map_err(ErrorUtils::from_sled_error("delete"))?;

        tree.flush().map_err(ErrorUtils::from_sled_error("flush"))?;

        match removed {
            Some(bytes) => Ok(Some(
                serde_json::from_slice(&bytes)
                    .map_err(ErrorUtils::from_deserialization_error(key))?,
            )),
            None => Ok(None),
        }
    }

    /// Check if a key exists in a specific tree
    pub fn exists_in_tree(&self, tree: &sled::Tree, key: &str) -> AccessLedgerResult<bool> {
        tree.contains_key(key.as_bytes())
            .map_err(ErrorUtils::from_sled_error("existence check"))
    }
}
