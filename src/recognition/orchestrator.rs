use crate::db_operations::ErrorUtils;
use crate::error::AccessLedgerResult;
use crate::ledger::{AccessRecord, AuditLedger};
use crate::permissions::AccessDecisionEngine;
use crate::recognizer::{ModelRegistry, RecognizerClient, RecognizerError};
use crate::reference::ReferenceDirectory;
use crate::types::{
    AccessEvent, AccessType, AreaId, BiometricSample, Employee, EmployeeId, EvidenceInput,
    ModelId, ModelKind, ModelUse,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// One biometric access attempt to evaluate.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    pub sample: BiometricSample,
    /// Falls back to the latest registered segmentation model when absent
    pub segmentation_model_id: Option<ModelId>,
    /// Falls back to the latest registered recognition model when absent
    pub recognition_model_id: Option<ModelId>,
    pub area_id: AreaId,
    pub access_type: AccessType,
}

/// What the caller gets back for a recorded attempt.
///
/// The employee fields are present only when the recognizer matched and the
/// candidate resolved to an enrolled employee. They are omitted, not nulled,
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionOutcome {
    pub matched: bool,
    pub confidence: f64,
    pub authorized: bool,
    pub access_event: AccessEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    /// Same value as `authorized`, only reported alongside a resolved employee
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessible: Option<bool>,
}

/// Runs one access attempt end to end.
///
/// The steps are strictly linear: resolve area and models, ask the
/// recognizer, decide, record, respond. Anything failing before the record
/// step leaves no trace in the ledger.
#[derive(Clone)]
pub struct RecognitionOrchestrator {
    directory: Arc<dyn ReferenceDirectory>,
    models: ModelRegistry,
    recognizer: Arc<dyn RecognizerClient>,
    engine: AccessDecisionEngine,
    ledger: AuditLedger,
    recognizer_timeout: Duration,
}

impl RecognitionOrchestrator {
    pub fn new(
        directory: Arc<dyn ReferenceDirectory>,
        models: ModelRegistry,
        recognizer: Arc<dyn RecognizerClient>,
        engine: AccessDecisionEngine,
        ledger: AuditLedger,
        recognizer_timeout: Duration,
    ) -> Self {
        Self {
            directory,
            models,
            recognizer,
            engine,
            ledger,
            recognizer_timeout,
        }
    }

    pub async fn process(
        &self,
        request: RecognitionRequest,
    ) -> AccessLedgerResult<RecognitionOutcome> {
        let area = self
            .directory
            .find_area(&request.area_id)?
            .ok_or_else(|| ErrorUtils::not_found_error("Area", request.area_id.as_str()))?;
        let segmentation = self
            .models
            .resolve(ModelKind::Segmentation, request.segmentation_model_id.as_ref())?;
        let recognition = self
            .models
            .resolve(ModelKind::Recognition, request.recognition_model_id.as_ref())?;

        let verdict = match tokio::time::timeout(
            self.recognizer_timeout,
            self.recognizer.recognize(
                &request.sample,
                &segmentation.path_name,
                &recognition.path_name,
            ),
        )
        .await
        {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => {
                log::error!(
                    "Recognition failed for area {}, nothing recorded: {}",
                    area.id,
                    e
                );
                return Err(e.into());
            }
            Err(_) => {
                let e = RecognizerError::Timeout(self.recognizer_timeout);
                log::error!(
                    "Recognition failed for area {}, nothing recorded: {}",
                    area.id,
                    e
                );
                return Err(e.into());
            }
        };

        let decision = self.engine.decide(&verdict, &area)?;
        let employee_id = decision.employee.as_ref().map(|e| e.id.clone());

        let evidence = EvidenceInput {
            employee_id: employee_id.clone(),
            segmentation_model: ModelUse {
                model_id: segmentation.id,
                path_name: segmentation.path_name,
            },
            recognition_model: ModelUse {
                model_id: recognition.id,
                path_name: recognition.path_name,
            },
            confidence: verdict.confidence,
            recognizer_evidence_id: verdict.recognizer_evidence_id.clone(),
            sample_digest: request.sample.digest(),
        };

        let access_event = self.ledger.record(AccessRecord {
            area_id: area.id.clone(),
            employee_id: employee_id.clone(),
            timestamp: Utc::now(),
            access_type: request.access_type,
            authorized: decision.authorized,
            evidence: Some(evidence),
        })?;

        let accessible = decision.employee.as_ref().map(|_| decision.authorized);
        Ok(RecognitionOutcome {
            matched: decision.matched,
            confidence: decision.confidence,
            authorized: decision.authorized,
            access_event,
            employee_id,
            employee: decision.employee,
            accessible,
        })
    }
}
