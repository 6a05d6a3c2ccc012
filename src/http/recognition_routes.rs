use super::http_server::AppState;
use super::responses::{error_response, success, with_node};
use crate::error::{AccessLedgerError, AccessLedgerResult};
use crate::recognition::RecognitionRequest;
use crate::types::{AccessType, AreaId, BiometricSample, EmployeeId, ModelId};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

/// Body of POST /api/recognition/process.
#[derive(Debug, Deserialize)]
pub struct ProcessRecognitionBody {
    pub sample_base64: String,
    pub sample_filename: String,
    #[serde(default)]
    pub segmentation_model_id: Option<String>,
    #[serde(default)]
    pub recognition_model_id: Option<String>,
    pub area_id: String,
    #[serde(default)]
    pub access_type: Option<String>,
}

impl ProcessRecognitionBody {
    fn into_request(self) -> AccessLedgerResult<RecognitionRequest> {
        let bytes = STANDARD
            .decode(self.sample_base64.trim())
            .map_err(|e| AccessLedgerError::invalid_input(format!("Invalid sample_base64: {}", e)))?;
        if bytes.is_empty() {
            return Err(AccessLedgerError::invalid_input("Sample must not be empty"));
        }
        if self.sample_filename.trim().is_empty() {
            return Err(AccessLedgerError::invalid_input(
                "sample_filename must not be empty",
            ));
        }

        Ok(RecognitionRequest {
            sample: BiometricSample::new(bytes, self.sample_filename),
            segmentation_model_id: self.segmentation_model_id.map(ModelId::new).transpose()?,
            recognition_model_id: self.recognition_model_id.map(ModelId::new).transpose()?,
            area_id: AreaId::new(self.area_id)?,
            access_type: match self.access_type {
                Some(raw) => raw.parse()?,
                None => AccessType::default(),
            },
        })
    }
}

/// POST /api/recognition/process
pub async fn process_recognition(
    body: web::Json<ProcessRecognitionBody>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let request = match body.into_inner().into_request() {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };

    match state.node.process_recognition(request).await {
        Ok(outcome) => success(StatusCode::OK, outcome),
        Err(e) => error_response(&e),
    }
}

/// GET /api/recognition/employee/{employeeId}
pub async fn evidence_for_employee(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let employee_id = match EmployeeId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    with_node(&state, StatusCode::OK, |node| {
        node.evidence_for_employee(&employee_id)
    })
}
