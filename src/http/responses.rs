use super::http_server::AppState;
use crate::error::{AccessLedgerError, AccessLedgerResult};
use crate::node::AccessNode;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::json;

pub fn success<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": true,
        "data": data
    }))
}

pub fn status_for(error: &AccessLedgerError) -> StatusCode {
    match error {
        AccessLedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        AccessLedgerError::Conflict(_) => StatusCode::CONFLICT,
        AccessLedgerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AccessLedgerError::RecognizerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AccessLedgerError::RecognizerError(_)
        | AccessLedgerError::Persistence(_)
        | AccessLedgerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client errors carry their message; server errors get a fixed message and
/// the detail goes to the log only.
pub fn error_response(error: &AccessLedgerError) -> HttpResponse {
    let message = match error {
        AccessLedgerError::RecognizerUnavailable(_) => "Recognition service unavailable".to_string(),
        AccessLedgerError::RecognizerError(_) => "Recognition service failed".to_string(),
        AccessLedgerError::Persistence(_) | AccessLedgerError::Config(_) => {
            "Internal server error".to_string()
        }
        other => other.to_string(),
    };
    if error.is_server_error() {
        log::error!("Request failed: {}", error);
    }

    HttpResponse::build(status_for(error)).json(json!({
        "success": false,
        "error": message
    }))
}

/// Runs `func` against the node and renders its result.
pub fn with_node<T, F>(state: &web::Data<AppState>, status: StatusCode, func: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&AccessNode) -> AccessLedgerResult<T>,
{
    match func(&state.node) {
        Ok(data) => success(status, data),
        Err(e) => error_response(&e),
    }
}

/// Parses a timestamp query parameter.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC, or a
/// bare date, which covers the whole day: midnight for a start bound, the
/// last instant of the day for an end bound.
pub fn parse_bound(raw: &str, end_of_day: bool) -> AccessLedgerResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let time = if end_of_day {
            date.and_hms_milli_opt(23, 59, 59, 999)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        if let Some(naive) = time {
            return Ok(naive.and_utc());
        }
    }
    Err(AccessLedgerError::invalid_input(format!(
        "Invalid date '{}'",
        raw
    )))
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    let detail = err.to_string();
    log::warn!(
        "JSON payload error: \"{}\" for {} request to {}",
        detail,
        req.method(),
        req.path()
    );

    let response = match &err {
        JsonPayloadError::Deserialize(serde_err) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "Invalid JSON format",
            "detail": serde_err.to_string()
        })),
        _ => HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": "Invalid request payload",
            "detail": detail
        })),
    };

    actix_web::error::InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Query string error: \"{}\" for {}", err, req.path());
    let response = HttpResponse::BadRequest().json(json!({
        "success": false,
        "error": format!("Invalid query parameters: {}", err)
    }));
    actix_web::error::InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&AccessLedgerError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&AccessLedgerError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&AccessLedgerError::RecognizerUnavailable("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&AccessLedgerError::persistence("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bound_formats() {
        let rfc = parse_bound("2024-03-01T10:00:00+02:00", false).unwrap();
        assert_eq!(rfc.hour(), 8);

        let naive = parse_bound("2024-03-01T10:00:00", false).unwrap();
        assert_eq!(naive.hour(), 10);

        let start = parse_bound("2024-03-01", false).unwrap();
        let end = parse_bound("2024-03-01", true).unwrap();
        assert_eq!(start.day(), 1);
        assert_eq!((start.hour(), end.hour()), (0, 23));

        assert!(parse_bound("yesterday", false).is_err());
    }
}
