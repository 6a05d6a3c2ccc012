use crate::db_operations::{DbOperations, ErrorUtils};
use crate::error::AccessLedgerResult;
use crate::types::{
    AccessEvent, AccessEventId, AccessType, AreaId, EmployeeId, EmployeeStatistics,
    RecognitionEvidence,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Optional filters for an employee's access log.
#[derive(Debug, Clone, Default)]
pub struct AccessLogFilter {
    pub access_type: Option<AccessType>,
    pub area_id: Option<AreaId>,
}

impl AccessLogFilter {
    fn matches(&self, event: &AccessEvent) -> bool {
        self.access_type.map_or(true, |t| event.access_type == t)
            && self.area_id.as_ref().map_or(true, |a| &event.area_id == a)
    }
}

/// Read side of the ledger. Nothing here writes.
#[derive(Clone)]
pub struct AuditQueries {
    db_ops: Arc<DbOperations>,
}

impl AuditQueries {
    pub fn new(db_ops: Arc<DbOperations>) -> Self {
        Self { db_ops }
    }

    /// Access events for one employee within `[start, end]`, oldest first.
    pub fn access_events_for_employee(
        &self,
        employee_id: &EmployeeId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &AccessLogFilter,
    ) -> AccessLedgerResult<Vec<AccessEvent>> {
        self.require_employee(employee_id)?;

        let mut events: Vec<AccessEvent> = self
            .db_ops
            .list_access_events()?
            .into_iter()
            .filter(|e| e.employee_id.as_ref() == Some(employee_id))
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .filter(|e| filter.matches(e))
            .collect();
        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }

    pub fn access_event(&self, id: &AccessEventId) -> AccessLedgerResult<AccessEvent> {
        self.db_ops
            .get_access_event(id)?
            .ok_or_else(|| ErrorUtils::not_found_error("Access event", id.as_str()))
    }

    pub fn evidence_for_access_event(
        &self,
        access_event_id: &AccessEventId,
    ) -> AccessLedgerResult<Option<RecognitionEvidence>> {
        self.db_ops.get_evidence_for_event(access_event_id)
    }

    /// Evidence rows naming the employee, oldest first.
    pub fn evidence_for_employee(
        &self,
        employee_id: &EmployeeId,
    ) -> AccessLedgerResult<Vec<RecognitionEvidence>> {
        self.require_employee(employee_id)?;

        let mut evidence: Vec<RecognitionEvidence> = self
            .db_ops
            .list_recognition_evidence()?
            .into_iter()
            .filter(|e| e.employee_id.as_ref() == Some(employee_id))
            .collect();
        evidence.sort_by_key(|e| e.timestamp);
        Ok(evidence)
    }

    /// One row per enrolled employee, ordered by id.
    ///
    /// Events whose employee no longer exists are not attributed to anyone.
    pub fn employee_statistics(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> AccessLedgerResult<Vec<EmployeeStatistics>> {
        let mut by_employee: HashMap<EmployeeId, EmployeeStatistics> = self
            .db_ops
            .list_employees()?
            .into_iter()
            .map(|employee| {
                let row = EmployeeStatistics {
                    employee_id: employee.id.clone(),
                    full_name: employee.full_name,
                    total_attempts: 0,
                    authorized_attempts: 0,
                    denied_attempts: 0,
                    last_access: None,
                };
                (employee.id, row)
            })
            .collect();

        let in_range = |ts: &DateTime<Utc>| {
            start.map_or(true, |s| *ts >= s) && end.map_or(true, |e| *ts <= e)
        };

        for event in self.db_ops.list_access_events()? {
            if !in_range(&event.timestamp) {
                continue;
            }
            let Some(row) = event
                .employee_id
                .as_ref()
                .and_then(|id| by_employee.get_mut(id))
            else {
                continue;
            };

            row.total_attempts += 1;
            if event.authorized {
                row.authorized_attempts += 1;
            } else {
                row.denied_attempts += 1;
            }
            if row.last_access.map_or(true, |last| event.timestamp > last) {
                row.last_access = Some(event.timestamp);
            }
        }

        let mut rows: Vec<EmployeeStatistics> = by_employee.into_values().collect();
        rows.sort_by(|a, b| a.employee_id.as_str().cmp(b.employee_id.as_str()));
        Ok(rows)
    }

    fn require_employee(&self, employee_id: &EmployeeId) -> AccessLedgerResult<()> {
        if self.db_ops.get_employee(employee_id)?.is_none() {
            return Err(ErrorUtils::not_found_error("Employee", employee_id.as_str()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessLedgerError;
    use crate::testing_utils::TestDatabaseFactory;
    use chrono::Duration;

    fn event(
        employee: Option<&str>,
        area: &str,
        at: DateTime<Utc>,
        access_type: AccessType,
        authorized: bool,
    ) -> AccessEvent {
        AccessEvent {
            id: AccessEventId::generate(),
            area_id: AreaId::new(area).unwrap(),
            employee_id: employee.map(|id| EmployeeId::new(id).unwrap()),
            timestamp: at,
            access_type,
            authorized,
        }
    }

    fn seeded() -> (AuditQueries, Arc<DbOperations>, DateTime<Utc>) {
        let db_ops = Arc::new(TestDatabaseFactory::create_temp_db_ops().unwrap());
        db_ops
            .put_employee(&TestDatabaseFactory::employee("EMP001", "Ada Byron"))
            .unwrap();
        db_ops
            .put_employee(&TestDatabaseFactory::employee("EMP002", "Alan Turing"))
            .unwrap();

        let t0 = Utc::now() - Duration::hours(10);
        let rows = [
            event(Some("EMP001"), "lab", t0, AccessType::Entry, true),
            event(Some("EMP001"), "lab", t0 + Duration::hours(1), AccessType::Exit, true),
            event(Some("EMP001"), "vault", t0 + Duration::hours(2), AccessType::Entry, false),
            event(Some("EMP404"), "lab", t0 + Duration::hours(3), AccessType::Entry, false),
            event(None, "lab", t0 + Duration::hours(4), AccessType::Entry, false),
        ];
        for row in &rows {
            db_ops.append_access_event(row).unwrap();
        }
        (AuditQueries::new(db_ops.clone()), db_ops, t0)
    }

    #[test]
    fn test_access_log_range_is_inclusive_and_filtered() {
        let (queries, _, t0) = seeded();
        let emp = EmployeeId::new("EMP001").unwrap();

        let all = queries
            .access_events_for_employee(&emp, t0, t0 + Duration::hours(2), &AccessLogFilter::default())
            .unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        let entries_in_lab = queries
            .access_events_for_employee(
                &emp,
                t0,
                t0 + Duration::hours(2),
                &AccessLogFilter {
                    access_type: Some(AccessType::Entry),
                    area_id: Some(AreaId::new("lab").unwrap()),
                },
            )
            .unwrap();
        assert_eq!(entries_in_lab.len(), 1);
    }

    #[test]
    fn test_access_log_for_unknown_employee_is_not_found() {
        let (queries, _, t0) = seeded();
        let err = queries
            .access_events_for_employee(
                &EmployeeId::new("EMP404").unwrap(),
                t0,
                Utc::now(),
                &AccessLogFilter::default(),
            )
            .unwrap_err();
        assert!(matches!(err, AccessLedgerError::NotFound(_)));
    }

    #[test]
    fn test_statistics_skip_detached_events() {
        let (queries, _, t0) = seeded();
        let stats = queries.employee_statistics(None, None).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].employee_id.as_str(), "EMP001");
        assert_eq!(stats[0].total_attempts, 3);
        assert_eq!(stats[0].authorized_attempts, 2);
        assert_eq!(stats[0].denied_attempts, 1);
        assert_eq!(stats[0].last_access, Some(t0 + Duration::hours(2)));

        assert_eq!(stats[1].total_attempts, 0);
        assert_eq!(stats[1].last_access, None);
    }

    #[test]
    fn test_statistics_respect_range() {
        let (queries, _, t0) = seeded();
        let stats = queries
            .employee_statistics(Some(t0 + Duration::minutes(30)), None)
            .unwrap();
        assert_eq!(stats[0].total_attempts, 2);
    }

    #[test]
    fn test_missing_access_event_is_not_found() {
        let (queries, _, _) = seeded();
        let err = queries.access_event(&AccessEventId::generate()).unwrap_err();
        assert!(matches!(err, AccessLedgerError::NotFound(_)));
    }
}
