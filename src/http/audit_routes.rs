use super::http_server::AppState;
use super::responses::{error_response, parse_bound, with_node};
use crate::error::AccessLedgerResult;
use crate::ledger::AccessLogFilter;
use crate::types::{AccessEventId, AccessType, AreaId, EmployeeId};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogQuery {
    pub start_date: String,
    pub end_date: String,
    pub access_type: Option<String>,
    pub area_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn access_log_filter(query: &AccessLogQuery) -> AccessLedgerResult<AccessLogFilter> {
    Ok(AccessLogFilter {
        access_type: query
            .access_type
            .as_deref()
            .map(str::parse::<AccessType>)
            .transpose()?,
        area_id: query.area_id.clone().map(AreaId::new).transpose()?,
    })
}

/// GET /api/access-log/by-employee/{employeeId}?startDate&endDate[&accessType][&areaId]
pub async fn access_log_by_employee(
    path: web::Path<String>,
    query: web::Query<AccessLogQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let parsed = EmployeeId::new(path.into_inner()).and_then(|employee_id| {
        let start = parse_bound(&query.start_date, false)?;
        let end = parse_bound(&query.end_date, true)?;
        Ok((employee_id, start, end, access_log_filter(&query)?))
    });
    let (employee_id, start, end, filter) = match parsed {
        Ok(parsed) => parsed,
        Err(e) => return error_response(&e),
    };

    with_node(&state, StatusCode::OK, |node| {
        node.access_log(&employee_id, start, end, &filter)
    })
}

/// GET /api/access-log/{accessEventId}
///
/// The event together with its evidence, which may be absent.
pub async fn access_event(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let id = match AccessEventId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    with_node(&state, StatusCode::OK, |node| {
        let event = node.access_event(&id)?;
        let evidence = node.evidence_for_access_event(&id)?;
        Ok(json!({ "access_event": event, "evidence": evidence }))
    })
}

/// GET /api/employee/statistics[?startDate][&endDate]
pub async fn employee_statistics(
    query: web::Query<StatisticsQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let bounds = (|| -> AccessLedgerResult<_> {
        let start = query
            .start_date
            .as_deref()
            .map(|raw| parse_bound(raw, false))
            .transpose()?;
        let end = query
            .end_date
            .as_deref()
            .map(|raw| parse_bound(raw, true))
            .transpose()?;
        Ok((start, end))
    })();
    let (start, end) = match bounds {
        Ok(bounds) => bounds,
        Err(e) => return error_response(&e),
    };

    with_node(&state, StatusCode::OK, |node| {
        node.employee_statistics(start, end)
    })
}
