use super::http_server::AppState;
use super::responses::{error_response, with_node};
use crate::error::AccessLedgerResult;
use crate::node::AccessNode;
use crate::types::{Area, AreaId, Employee, EmployeeId, ModelKind};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Shared shape of the single-record GET handlers: parse the path id, look
/// it up, render.
fn lookup_by_id<I, T, F>(raw_id: String, state: &web::Data<AppState>, find: F) -> HttpResponse
where
    I: TryFrom<String, Error = crate::error::AccessLedgerError>,
    T: Serialize,
    F: FnOnce(&AccessNode, &I) -> AccessLedgerResult<T>,
{
    match I::try_from(raw_id) {
        Ok(id) => with_node(state, StatusCode::OK, |node| find(node, &id)),
        Err(e) => error_response(&e),
    }
}

pub async fn list_employees(state: web::Data<AppState>) -> HttpResponse {
    with_node(&state, StatusCode::OK, |node| node.list_employees())
}

pub async fn get_employee(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    lookup_by_id(path.into_inner(), &state, |node, id: &EmployeeId| {
        node.get_employee(id)
    })
}

pub async fn upsert_employee(
    body: web::Json<Employee>,
    state: web::Data<AppState>,
) -> HttpResponse {
    with_node(&state, StatusCode::OK, |node| {
        node.upsert_employee(body.into_inner())
    })
}

pub async fn delete_employee(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    lookup_by_id(path.into_inner(), &state, |node, id: &EmployeeId| {
        node.delete_employee(id)?;
        Ok(json!({ "deleted": id }))
    })
}

pub async fn list_areas(state: web::Data<AppState>) -> HttpResponse {
    with_node(&state, StatusCode::OK, |node| node.list_areas())
}

pub async fn get_area(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    lookup_by_id(path.into_inner(), &state, |node, id: &AreaId| node.get_area(id))
}

pub async fn upsert_area(body: web::Json<Area>, state: web::Data<AppState>) -> HttpResponse {
    with_node(&state, StatusCode::OK, |node| node.upsert_area(body.into_inner()))
}

#[derive(Debug, Deserialize)]
pub struct RegisterModelBody {
    pub name: String,
    pub path_name: String,
}

pub async fn list_models(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    match path.into_inner().parse::<ModelKind>() {
        Ok(kind) => with_node(&state, StatusCode::OK, |node| node.list_models(kind)),
        Err(e) => error_response(&e),
    }
}

pub async fn register_model(
    path: web::Path<String>,
    body: web::Json<RegisterModelBody>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let kind = match path.into_inner().parse::<ModelKind>() {
        Ok(kind) => kind,
        Err(e) => return error_response(&e),
    };
    let RegisterModelBody { name, path_name } = body.into_inner();

    with_node(&state, StatusCode::CREATED, |node| {
        node.register_model(kind, &name, &path_name)
    })
}
