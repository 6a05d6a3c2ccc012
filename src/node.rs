use crate::config::NodeConfig;
use crate::db_operations::{DbOperations, ErrorUtils};
use crate::error::{AccessLedgerError, AccessLedgerResult};
use crate::ledger::{AccessLogFilter, AuditLedger, AuditQueries, AuditStore};
use crate::permissions::{AccessDecisionEngine, PermissionStore};
use crate::recognition::{RecognitionOrchestrator, RecognitionOutcome, RecognitionRequest};
use crate::recognizer::{HttpRecognizerClient, ModelRegistry, RecognizerClient};
use crate::reference::ReferenceDirectory;
use crate::types::{
    AccessEvent, AccessEventId, Area, AreaId, Employee, EmployeeId, EmployeeStatistics, Grant,
    GrantId, ModelId, ModelKind, RecognitionEvidence, RecognizerModel,
};
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// A running access ledger.
///
/// `AccessNode` wires the permission store, decision engine, audit ledger
/// and recognition workflow onto one database and exposes the operations
/// callers need: processing a recognition, managing grants, administering
/// reference data and models, and reading the audit trail.
///
/// Cloning is cheap; all clones share the same database and recognizer.
///
/// # Examples
///
/// ```rust,no_run
/// use access_ledger::config::NodeConfig;
/// use access_ledger::node::AccessNode;
/// use access_ledger::types::{Area, AreaId, Employee, EmployeeId};
/// use std::path::PathBuf;
///
/// fn main() -> access_ledger::AccessLedgerResult<()> {
///     let node = AccessNode::new(&NodeConfig::new(PathBuf::from("data")))?;
///
///     let employee = node.upsert_employee(Employee::new(EmployeeId::new("EMP001")?, "Ada Byron"))?;
///     let area = node.upsert_area(Area::new(AreaId::new("lab")?, "Lab", 3))?;
///     node.grant_access(&employee.id, &area.id)?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct AccessNode {
    db_ops: Arc<DbOperations>,
    permissions: PermissionStore,
    queries: AuditQueries,
    models: ModelRegistry,
    orchestrator: RecognitionOrchestrator,
}

impl AccessNode {
    /// Opens the database at `config.storage_path` and connects to the
    /// recognizer over HTTP.
    pub fn new(config: &NodeConfig) -> AccessLedgerResult<Self> {
        config.validate()?;

        let db_ops = Arc::new(DbOperations::open(&config.storage_path)?);
        let recognizer = HttpRecognizerClient::new(&config.recognizer)?;
        info!(
            "Opened access ledger at {} (recognizer {})",
            config.storage_path.display(),
            recognizer.endpoint()
        );

        let audit_store: Arc<dyn AuditStore> = db_ops.clone();
        Ok(Self::with_components(
            db_ops,
            audit_store,
            Arc::new(recognizer),
            Duration::from_secs(config.recognizer.timeout_seconds),
        ))
    }

    /// Builds a node with every seam supplied by the caller.
    pub fn with_components(
        db_ops: Arc<DbOperations>,
        audit_store: Arc<dyn AuditStore>,
        recognizer: Arc<dyn RecognizerClient>,
        recognizer_timeout: Duration,
    ) -> Self {
        let directory: Arc<dyn ReferenceDirectory> = db_ops.clone();
        let permissions = PermissionStore::new(db_ops.clone());
        let models = ModelRegistry::new(db_ops.clone());
        let engine = AccessDecisionEngine::new(directory.clone(), permissions.clone());
        let orchestrator = RecognitionOrchestrator::new(
            directory,
            models.clone(),
            recognizer,
            engine,
            AuditLedger::new(audit_store),
            recognizer_timeout,
        );

        Self {
            queries: AuditQueries::new(db_ops.clone()),
            db_ops,
            permissions,
            models,
            orchestrator,
        }
    }

    pub fn db_ops(&self) -> &Arc<DbOperations> {
        &self.db_ops
    }

    /// Flushes the database.
    pub fn close(&self) {
        self.db_ops.close();
    }

    // ========== RECOGNITION ==========

    pub async fn process_recognition(
        &self,
        request: RecognitionRequest,
    ) -> AccessLedgerResult<RecognitionOutcome> {
        self.orchestrator.process(request).await
    }

    // ========== GRANTS ==========

    pub fn grant_access(
        &self,
        employee_id: &EmployeeId,
        area_id: &AreaId,
    ) -> AccessLedgerResult<Grant> {
        let employee = self.get_employee(employee_id)?;
        let area = self.get_area(area_id)?;
        self.permissions.grant(&employee, &area)
    }

    /// Grants the employee every area, skipping ones already granted.
    pub fn grant_all_areas(&self, employee_id: &EmployeeId) -> AccessLedgerResult<usize> {
        let employee = self.get_employee(employee_id)?;
        let areas = self.db_ops.list_areas()?;
        self.permissions.grant_all(&employee, &areas)
    }

    pub fn revoke_access(&self, grant_id: &GrantId) -> AccessLedgerResult<()> {
        self.permissions.revoke(grant_id)
    }

    pub fn list_grants(&self, employee_id: &EmployeeId) -> AccessLedgerResult<Vec<Grant>> {
        self.permissions.list_by_employee(employee_id)
    }

    // ========== REFERENCE DATA ==========

    pub fn upsert_employee(&self, employee: Employee) -> AccessLedgerResult<Employee> {
        if employee.full_name.trim().is_empty() {
            return Err(AccessLedgerError::invalid_input(
                "Employee full name must not be empty",
            ));
        }
        self.db_ops.put_employee(&employee)?;
        Ok(employee)
    }

    pub fn get_employee(&self, employee_id: &EmployeeId) -> AccessLedgerResult<Employee> {
        self.db_ops
            .get_employee(employee_id)?
            .ok_or_else(|| ErrorUtils::not_found_error("Employee", employee_id.as_str()))
    }

    pub fn list_employees(&self) -> AccessLedgerResult<Vec<Employee>> {
        self.db_ops.list_employees()
    }

    /// Removes the employee and their grants. Ledger rows keep the bare id.
    pub fn delete_employee(&self, employee_id: &EmployeeId) -> AccessLedgerResult<()> {
        match self.db_ops.delete_employee(employee_id)? {
            Some(_) => {
                info!("Deleted employee {}", employee_id);
                Ok(())
            }
            None => Err(ErrorUtils::not_found_error("Employee", employee_id.as_str())),
        }
    }

    pub fn upsert_area(&self, area: Area) -> AccessLedgerResult<Area> {
        if area.name.trim().is_empty() {
            return Err(AccessLedgerError::invalid_input("Area name must not be empty"));
        }
        self.db_ops.put_area(&area)?;
        Ok(area)
    }

    pub fn get_area(&self, area_id: &AreaId) -> AccessLedgerResult<Area> {
        self.db_ops
            .get_area(area_id)?
            .ok_or_else(|| ErrorUtils::not_found_error("Area", area_id.as_str()))
    }

    pub fn list_areas(&self) -> AccessLedgerResult<Vec<Area>> {
        self.db_ops.list_areas()
    }

    // ========== MODELS ==========

    pub fn register_model(
        &self,
        kind: ModelKind,
        name: &str,
        path_name: &str,
    ) -> AccessLedgerResult<RecognizerModel> {
        self.models.register_model(kind, name, path_name)
    }

    pub fn list_models(&self, kind: ModelKind) -> AccessLedgerResult<Vec<RecognizerModel>> {
        self.models.list_models(kind)
    }

    pub fn get_model(&self, kind: ModelKind, id: &ModelId) -> AccessLedgerResult<RecognizerModel> {
        self.models.get_model(kind, id)
    }

    pub fn latest_model(&self, kind: ModelKind) -> AccessLedgerResult<RecognizerModel> {
        self.models.latest_model(kind)
    }

    // ========== AUDIT QUERIES ==========

    pub fn access_log(
        &self,
        employee_id: &EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &AccessLogFilter,
    ) -> AccessLedgerResult<Vec<AccessEvent>> {
        if start > end {
            return Err(AccessLedgerError::invalid_input(
                "startDate must not be after endDate",
            ));
        }
        self.queries
            .access_events_for_employee(employee_id, start, end, filter)
    }

    pub fn access_event(&self, id: &AccessEventId) -> AccessLedgerResult<AccessEvent> {
        self.queries.access_event(id)
    }

    pub fn evidence_for_access_event(
        &self,
        id: &AccessEventId,
    ) -> AccessLedgerResult<Option<RecognitionEvidence>> {
        self.queries.evidence_for_access_event(id)
    }

    pub fn evidence_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> AccessLedgerResult<Vec<RecognitionEvidence>> {
        self.queries.evidence_for_employee(employee_id)
    }

    pub fn employee_statistics(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> AccessLedgerResult<Vec<EmployeeStatistics>> {
        self.queries.employee_statistics(start, end)
    }
}
