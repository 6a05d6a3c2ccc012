use super::http_server::AppState;
use super::responses::{error_response, with_node};
use crate::types::{AreaId, EmployeeId, GrantId};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantQuery {
    pub employee_id: String,
    pub area_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAllQuery {
    pub employee_id: String,
}

/// POST /api/access/grant?employeeId=..&areaId=..
pub async fn grant_access(
    query: web::Query<GrantQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let GrantQuery {
        employee_id,
        area_id,
    } = query.into_inner();
    let (employee_id, area_id) = match (EmployeeId::new(employee_id), AreaId::new(area_id)) {
        (Ok(e), Ok(a)) => (e, a),
        (Err(e), _) | (_, Err(e)) => return error_response(&e),
    };

    with_node(&state, StatusCode::CREATED, |node| {
        node.grant_access(&employee_id, &area_id)
    })
}

/// POST /api/access/grantAllAreas?employeeId=..
pub async fn grant_all_areas(
    query: web::Query<GrantAllQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let employee_id = match EmployeeId::new(query.into_inner().employee_id) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    with_node(&state, StatusCode::OK, |node| {
        let granted = node.grant_all_areas(&employee_id)?;
        Ok(json!({ "granted": granted }))
    })
}

/// DELETE /api/access/revoke/{grantId}
pub async fn revoke_access(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let grant_id = match GrantId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    with_node(&state, StatusCode::OK, |node| {
        node.revoke_access(&grant_id)?;
        Ok(json!({ "revoked": grant_id }))
    })
}

/// GET /api/access/by-employee/{employeeId}
pub async fn list_grants(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let employee_id = match EmployeeId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    with_node(&state, StatusCode::OK, |node| node.list_grants(&employee_id))
}
