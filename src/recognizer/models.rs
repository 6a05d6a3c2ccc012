use crate::db_operations::{DbOperations, ErrorUtils};
use crate::error::{AccessLedgerError, AccessLedgerResult};
use crate::types::{ModelId, ModelKind, RecognizerModel};
use chrono::Utc;
use std::sync::Arc;

/// Registry of trained models the recognizer can be asked to load.
#[derive(Clone)]
pub struct ModelRegistry {
    db_ops: Arc<DbOperations>,
}

impl ModelRegistry {
    pub fn new(db_ops: Arc<DbOperations>) -> Self {
        Self { db_ops }
    }

    pub fn register_model(
        &self,
        kind: ModelKind,
        name: impl Into<String>,
        path_name: impl Into<String>,
    ) -> AccessLedgerResult<RecognizerModel> {
        let path_name = path_name.into();
        if path_name.trim().is_empty() {
            return Err(AccessLedgerError::invalid_input(
                "Model path name must not be empty",
            ));
        }

        let model = RecognizerModel {
            id: ModelId::generate(),
            kind,
            name: name.into(),
            path_name,
            created_at: Utc::now(),
        };
        self.db_ops.put_model(&model)?;
        log::info!("Registered {} model {} ({})", kind, model.id, model.path_name);
        Ok(model)
    }

    pub fn list_models(&self, kind: ModelKind) -> AccessLedgerResult<Vec<RecognizerModel>> {
        self.db_ops.list_models(kind)
    }

    pub fn get_model(&self, kind: ModelKind, id: &ModelId) -> AccessLedgerResult<RecognizerModel> {
        self.db_ops
            .get_model(kind, id)?
            .ok_or_else(|| ErrorUtils::not_found_error(&format!("{} model", kind), id.as_str()))
    }

    /// Most recently registered model of `kind`.
    pub fn latest_model(&self, kind: ModelKind) -> AccessLedgerResult<RecognizerModel> {
        self.db_ops
            .list_models(kind)?
            .into_iter()
            .max_by_key(|m| m.created_at)
            .ok_or_else(|| AccessLedgerError::not_found(format!("No {} model registered", kind)))
    }

    /// Looks `id` up, or falls back to the latest model when no id is given.
    pub fn resolve(
        &self,
        kind: ModelKind,
        id: Option<&ModelId>,
    ) -> AccessLedgerResult<RecognizerModel> {
        match id {
            Some(id) => self.get_model(kind, id),
            None => self.latest_model(kind),
        }
    }
}
