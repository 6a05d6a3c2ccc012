use super::core::DbOperations;
use crate::error::AccessLedgerResult;
use crate::types::{ModelId, ModelKind, RecognizerModel};

impl DbOperations {
    fn models_tree(&self, kind: ModelKind) -> &sled::Tree {
        match kind {
            ModelKind::Segmentation => &self.segmentation_models_tree,
            ModelKind::Recognition => &self.recognition_models_tree,
        }
    }

    pub fn put_model(&self, model: &RecognizerModel) -> AccessLedgerResult<()> {
        self.store_in_tree(self.models_tree(model.kind), model.id.as_str(), model)
    }

    pub fn get_model(
        &self,
        kind: ModelKind,
        id: &ModelId,
    ) -> AccessLedgerResult<Option<RecognizerModel>> {
        self.get_from_tree(self.models_tree(kind), id.as_str())
    }

    /// All models of a kind, oldest first
    pub fn list_models(&self, kind: ModelKind) -> AccessLedgerResult<Vec<RecognizerModel>> {
        let mut models: Vec<RecognizerModel> = self.list_items_in_tree(self.models_tree(kind))?;
        models.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(models)
    }
}
