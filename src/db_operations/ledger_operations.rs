use super::core::DbOperations;
use crate::error::{AccessLedgerError, AccessLedgerResult};
use crate::types::{AccessEvent, AccessEventId, RecognitionEvidence};

impl DbOperations {
    /// Appends an access event. Event ids are write-once; a second write
    /// under the same id is rejected rather than overwriting the record.
    pub fn append_access_event(&self, event: &AccessEvent) -> AccessLedgerResult<()> {
        if !self.create_in_tree(&self.access_events_tree, event.id.as_str(), event)? {
            return Err(AccessLedgerError::persistence(format!(
                "Access event {} already recorded",
                event.id
            )));
        }
        Ok(())
    }

    /// Appends evidence for an access event. At most one evidence row per event.
    pub fn append_recognition_evidence(
        &self,
        evidence: &RecognitionEvidence,
    ) -> AccessLedgerResult<()> {
        if !self.create_in_tree(
            &self.evidence_tree,
            evidence.access_event_id.as_str(),
            evidence,
        )? {
            return Err(AccessLedgerError::persistence(format!(
                "Evidence for access event {} already recorded",
                evidence.access_event_id
            )));
        }
        Ok(())
    }

    pub fn get_access_event(&self, id: &AccessEventId) -> AccessLedgerResult<Option<AccessEvent>> {
        self.get_from_tree(&self.access_events_tree, id.as_str())
    }

    pub fn list_access_events(&self) -> AccessLedgerResult<Vec<AccessEvent>> {
        self.list_items_in_tree(&self.access_events_tree)
    }

    pub fn get_evidence_for_event(
        &self,
        access_event_id: &AccessEventId,
    ) -> AccessLedgerResult<Option<RecognitionEvidence>> {
        self.get_from_tree(&self.evidence_tree, access_event_id.as_str())
    }

    pub fn list_recognition_evidence(&self) -> AccessLedgerResult<Vec<RecognitionEvidence>> {
        self.list_items_in_tree(&self.evidence_tree)
    }
}
