//! Shared fixtures for unit and integration tests.
//!
//! Databases are temporary sled instances that vanish when dropped.

use crate::db_operations::DbOperations;
use crate::error::{AccessLedgerError, AccessLedgerResult};
use crate::ledger::AuditStore;
use crate::node::AccessNode;
use crate::recognizer::{RecognizerClient, RecognizerError};
use crate::types::{
    AccessEvent, Area, AreaId, BiometricSample, Employee, EmployeeId, MatchVerdict, ModelKind,
    RecognitionEvidence, RecognizerModel,
};
use async_trait::async_trait;
use sled::Db;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct TestDatabaseFactory;

impl TestDatabaseFactory {
    /// Create a temporary sled database for testing
    pub fn create_temp_sled_db() -> Result<Db, sled::Error> {
        sled::Config::new().temporary(true).open()
    }

    pub fn create_temp_db_ops() -> Result<DbOperations, Box<dyn std::error::Error>> {
        let db = Self::create_temp_sled_db()?;
        Ok(DbOperations::new(db)?)
    }

    /// Builds an employee record. Panics on an invalid id, tests only.
    pub fn employee(id: &str, full_name: &str) -> Employee {
        let id = EmployeeId::new(id).unwrap_or_else(|e| panic!("bad test employee id: {}", e));
        Employee::new(id, full_name)
    }

    /// Builds an area named after its id.
    pub fn area(id: &str, security_level: i32) -> Area {
        let area_id = AreaId::new(id).unwrap_or_else(|e| panic!("bad test area id: {}", e));
        Area::new(area_id, id.to_uppercase(), security_level)
    }
}

/// One call received by a [`StubRecognizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerCall {
    pub filename: String,
    pub segmentation_model_path: String,
    pub recognition_model_path: String,
}

/// Recognizer that answers every request with the same scripted result.
pub struct StubRecognizer {
    response: Result<MatchVerdict, RecognizerError>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecognizerCall>>,
}

impl StubRecognizer {
    pub fn answering(response: Result<MatchVerdict, RecognizerError>) -> Self {
        Self {
            response,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn matching(employee_id: &str, confidence: f64) -> Self {
        Self::answering(Ok(MatchVerdict::matched(employee_id, confidence)))
    }

    pub fn no_match(confidence: f64) -> Self {
        Self::answering(Ok(MatchVerdict::no_match(confidence)))
    }

    pub fn failing(error: RecognizerError) -> Self {
        Self::answering(Err(error))
    }

    /// Sleeps before answering, to exercise the caller's timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecognizerCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecognizerClient for StubRecognizer {
    async fn recognize(
        &self,
        sample: &BiometricSample,
        segmentation_model_path: &str,
        recognition_model_path: &str,
    ) -> Result<MatchVerdict, RecognizerError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecognizerCall {
                filename: sample.filename.clone(),
                segmentation_model_path: segmentation_model_path.to_string(),
                recognition_model_path: recognition_model_path.to_string(),
            });
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}

/// Audit store that delegates to a real database but can be told to fail
/// either of the two writes.
pub struct FailingAuditStore {
    inner: Arc<DbOperations>,
    fail_events: bool,
    fail_evidence: bool,
}

impl FailingAuditStore {
    pub fn failing_evidence(inner: Arc<DbOperations>) -> Self {
        Self {
            inner,
            fail_events: false,
            fail_evidence: true,
        }
    }

    pub fn failing_events(inner: Arc<DbOperations>) -> Self {
        Self {
            inner,
            fail_events: true,
            fail_evidence: false,
        }
    }
}

impl AuditStore for FailingAuditStore {
    fn append_access_event(&self, event: &AccessEvent) -> AccessLedgerResult<()> {
        if self.fail_events {
            return Err(AccessLedgerError::persistence("simulated access event failure"));
        }
        self.inner.append_access_event(event)
    }

    fn append_recognition_evidence(
        &self,
        evidence: &RecognitionEvidence,
    ) -> AccessLedgerResult<()> {
        if self.fail_evidence {
            return Err(AccessLedgerError::persistence("simulated evidence failure"));
        }
        self.inner.append_recognition_evidence(evidence)
    }
}

/// A node over a temporary database seeded with two employees
/// (`EMP001`, `EMP002`), three areas (`lobby`, `lab`, `vault`) and one model
/// of each kind. No grants exist yet.
pub struct TestEnvironment {
    pub node: AccessNode,
    pub db_ops: Arc<DbOperations>,
    pub segmentation_model: RecognizerModel,
    pub recognition_model: RecognizerModel,
}

impl TestEnvironment {
    pub const RECOGNIZER_TIMEOUT: Duration = Duration::from_millis(500);

    pub fn new(recognizer: Arc<dyn RecognizerClient>) -> Result<Self, Box<dyn std::error::Error>> {
        let db_ops = Arc::new(TestDatabaseFactory::create_temp_db_ops()?);
        let store: Arc<dyn AuditStore> = db_ops.clone();
        Self::build(db_ops, store, recognizer)
    }

    /// Same as [`TestEnvironment::new`] but every evidence write fails.
    pub fn with_failing_evidence(
        recognizer: Arc<dyn RecognizerClient>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db_ops = Arc::new(TestDatabaseFactory::create_temp_db_ops()?);
        let store = Arc::new(FailingAuditStore::failing_evidence(db_ops.clone()));
        Self::build(db_ops, store, recognizer)
    }

    /// Same as [`TestEnvironment::new`] but every access event write fails.
    pub fn with_failing_events(
        recognizer: Arc<dyn RecognizerClient>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db_ops = Arc::new(TestDatabaseFactory::create_temp_db_ops()?);
        let store = Arc::new(FailingAuditStore::failing_events(db_ops.clone()));
        Self::build(db_ops, store, recognizer)
    }

    fn build(
        db_ops: Arc<DbOperations>,
        audit_store: Arc<dyn AuditStore>,
        recognizer: Arc<dyn RecognizerClient>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let node = AccessNode::with_components(
            db_ops.clone(),
            audit_store,
            recognizer,
            Self::RECOGNIZER_TIMEOUT,
        );

        node.upsert_employee(TestDatabaseFactory::employee("EMP001", "Ada Byron"))?;
        node.upsert_employee(TestDatabaseFactory::employee("EMP002", "Alan Turing"))?;
        node.upsert_area(TestDatabaseFactory::area("lobby", 1))?;
        node.upsert_area(TestDatabaseFactory::area("lab", 3))?;
        node.upsert_area(TestDatabaseFactory::area("vault", 5))?;
        let segmentation_model =
            node.register_model(ModelKind::Segmentation, "unet", "models/unet.h5")?;
        let recognition_model =
            node.register_model(ModelKind::Recognition, "resnet", "models/resnet.h5")?;

        Ok(Self {
            node,
            db_ops,
            segmentation_model,
            recognition_model,
        })
    }
}
