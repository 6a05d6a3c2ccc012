use crate::db_operations::DbOperations;
use crate::error::AccessLedgerResult;
use crate::types::{
    AccessEvent, AccessEventId, AccessType, AreaId, EmployeeId, EvidenceId, EvidenceInput,
    RecognitionEvidence,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Append-only sink for audit records.
pub trait AuditStore: Send + Sync {
    fn append_access_event(&self, event: &AccessEvent) -> AccessLedgerResult<()>;

    fn append_recognition_evidence(&self, evidence: &RecognitionEvidence)
        -> AccessLedgerResult<()>;
}

impl AuditStore for DbOperations {
    fn append_access_event(&self, event: &AccessEvent) -> AccessLedgerResult<()> {
        DbOperations::append_access_event(self, event)
    }

    fn append_recognition_evidence(
        &self,
        evidence: &RecognitionEvidence,
    ) -> AccessLedgerResult<()> {
        DbOperations::append_recognition_evidence(self, evidence)
    }
}

/// Everything the ledger needs to record one access attempt.
#[derive(Debug, Clone)]
pub struct AccessRecord {
    pub area_id: AreaId,
    pub employee_id: Option<EmployeeId>,
    pub timestamp: DateTime<Utc>,
    pub access_type: AccessType,
    pub authorized: bool,
    pub evidence: Option<EvidenceInput>,
}

/// Persists the audit trail of access attempts.
///
/// Recording happens in two steps. The access event is mandatory: if it
/// cannot be written the attempt fails. Evidence is written second and only
/// on a best-effort basis: a failure is logged and swallowed, and the caller
/// still gets the already-persisted access event back. The two writes do not
/// share a transaction.
#[derive(Clone)]
pub struct AuditLedger {
    store: Arc<dyn AuditStore>,
}

impl AuditLedger {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    pub fn record(&self, record: AccessRecord) -> AccessLedgerResult<AccessEvent> {
        let event = AccessEvent {
            id: AccessEventId::generate(),
            area_id: record.area_id,
            employee_id: record.employee_id,
            timestamp: record.timestamp,
            access_type: record.access_type,
            authorized: record.authorized,
        };

        self.store.append_access_event(&event)?;
        log::info!(
            "Recorded access event {} (area {}, employee {}, {}, authorized={})",
            event.id,
            event.area_id,
            event
                .employee_id
                .as_ref()
                .map(|id| id.as_str())
                .unwrap_or("<unresolved>"),
            event.access_type,
            event.authorized
        );

        if let Some(input) = record.evidence {
            let evidence = RecognitionEvidence {
                id: EvidenceId::generate(),
                access_event_id: event.id.clone(),
                employee_id: input.employee_id,
                segmentation_model: input.segmentation_model,
                recognition_model: input.recognition_model,
                timestamp: event.timestamp,
                confidence: input.confidence.clamp(0.0, 1.0),
                recognizer_evidence_id: input.recognizer_evidence_id,
                sample_digest: input.sample_digest,
            };

            if let Err(e) = self.store.append_recognition_evidence(&evidence) {
                log::warn!(
                    "Failed to record recognition evidence for access event {}: {}",
                    event.id,
                    e
                );
            }
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessLedgerError;
    use crate::testing_utils::{FailingAuditStore, TestDatabaseFactory};
    use crate::types::{ModelId, ModelUse};

    fn evidence_input(confidence: f64) -> EvidenceInput {
        EvidenceInput {
            employee_id: Some(EmployeeId::new("EMP001").unwrap()),
            segmentation_model: ModelUse {
                model_id: ModelId::new("seg-1").unwrap(),
                path_name: "models/seg.h5".to_string(),
            },
            recognition_model: ModelUse {
                model_id: ModelId::new("rec-1").unwrap(),
                path_name: "models/rec.h5".to_string(),
            },
            confidence,
            recognizer_evidence_id: Some("fp-17".to_string()),
            sample_digest: "00".repeat(32),
        }
    }

    fn record(evidence: Option<EvidenceInput>) -> AccessRecord {
        AccessRecord {
            area_id: AreaId::new("lab").unwrap(),
            employee_id: Some(EmployeeId::new("EMP001").unwrap()),
            timestamp: Utc::now(),
            access_type: AccessType::Entry,
            authorized: true,
            evidence,
        }
    }

    #[test]
    fn test_records_event_and_linked_evidence() {
        let db_ops = Arc::new(TestDatabaseFactory::create_temp_db_ops().unwrap());
        let ledger = AuditLedger::new(db_ops.clone());

        let event = ledger.record(record(Some(evidence_input(0.93)))).unwrap();

        let stored = db_ops.get_access_event(&event.id).unwrap().unwrap();
        assert_eq!(stored, event);
        let evidence = db_ops.get_evidence_for_event(&event.id).unwrap().unwrap();
        assert_eq!(evidence.access_event_id, event.id);
        assert_eq!(evidence.confidence, 0.93);
        assert_eq!(evidence.timestamp, event.timestamp);
    }

    #[test]
    fn test_no_evidence_requested_writes_only_event() {
        let db_ops = Arc::new(TestDatabaseFactory::create_temp_db_ops().unwrap());
        let ledger = AuditLedger::new(db_ops.clone());

        let event = ledger.record(record(None)).unwrap();
        assert!(db_ops.get_evidence_for_event(&event.id).unwrap().is_none());
    }

    #[test]
    fn test_evidence_failure_keeps_event() {
        let db_ops = Arc::new(TestDatabaseFactory::create_temp_db_ops().unwrap());
        let ledger = AuditLedger::new(Arc::new(FailingAuditStore::failing_evidence(
            db_ops.clone(),
        )));

        let event = ledger.record(record(Some(evidence_input(0.5)))).unwrap();
        assert!(db_ops.get_access_event(&event.id).unwrap().is_some());
        assert!(db_ops.get_evidence_for_event(&event.id).unwrap().is_none());
    }

    #[test]
    fn test_event_failure_is_fatal() {
        let db_ops = Arc::new(TestDatabaseFactory::create_temp_db_ops().unwrap());
        let ledger = AuditLedger::new(Arc::new(FailingAuditStore::failing_events(
            db_ops.clone(),
        )));

        let err = ledger.record(record(Some(evidence_input(0.5)))).unwrap_err();
        assert!(matches!(err, AccessLedgerError::Persistence(_)));
        assert!(db_ops.list_recognition_evidence().unwrap().is_empty());
    }

    #[test]
    fn test_confidence_is_clamped() {
        let db_ops = Arc::new(TestDatabaseFactory::create_temp_db_ops().unwrap());
        let ledger = AuditLedger::new(db_ops.clone());

        let event = ledger.record(record(Some(evidence_input(1.0000002)))).unwrap();
        let evidence = db_ops.get_evidence_for_event(&event.id).unwrap().unwrap();
        assert_eq!(evidence.confidence, 1.0);
    }
}
