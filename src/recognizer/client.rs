use super::error::RecognizerError;
use crate::config::RecognizerConfig;
use crate::types::{BiometricSample, MatchVerdict};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Path of the recognition endpoint relative to the recognizer base url.
pub const RECOGNIZE_PATH: &str = "/api/recognize";

/// The external biometric recognizer.
///
/// A verdict with `matched == false` is a normal answer. `Err` is reserved
/// for the cases where no verdict could be obtained.
#[async_trait]
pub trait RecognizerClient: Send + Sync {
    async fn recognize(
        &self,
        sample: &BiometricSample,
        segmentation_model_path: &str,
        recognition_model_path: &str,
    ) -> Result<MatchVerdict, RecognizerError>;
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    similarity: Option<SimilarityPayload>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SimilarityPayload {
    employee_id: Option<String>,
    confidence: f64,
    #[serde(rename = "match", default)]
    matched: bool,
    fingerprint_id: Option<String>,
}

/// Recognizer reached over HTTP with a multipart upload.
pub struct HttpRecognizerClient {
    client: Client,
    endpoint: String,
}

impl HttpRecognizerClient {
    pub fn new(config: &RecognizerConfig) -> Result<Self, RecognizerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                RecognizerError::Transport(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), RECOGNIZE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecognizerClient for HttpRecognizerClient {
    async fn recognize(
        &self,
        sample: &BiometricSample,
        segmentation_model_path: &str,
        recognition_model_path: &str,
    ) -> Result<MatchVerdict, RecognizerError> {
        let file = Part::bytes(sample.bytes.clone()).file_name(sample.filename.clone());
        let form = Form::new()
            .part("file", file)
            .text("segmentation_model_path", segmentation_model_path.to_string())
            .text("recognition_model_path", recognition_model_path.to_string());

        log::debug!(
            "Sending {} ({} bytes) to {}",
            sample.filename,
            sample.bytes.len(),
            self.endpoint
        );

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        parse_recognize_response(status, &body)
    }
}

/// Interprets a recognizer response body.
///
/// An `error` field wins regardless of status code. A successful reply
/// without a `similarity` object is a no-match with zero confidence, and
/// a missing `match` flag reads as false. Confidence is the recognizer's
/// cosine similarity, which is clamped into `[0, 1]`.
pub fn parse_recognize_response(
    status: StatusCode,
    body: &[u8],
) -> Result<MatchVerdict, RecognizerError> {
    let parsed: RecognizeResponse = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(e) if status.is_success() => {
            return Err(RecognizerError::InvalidResponse(e.to_string()));
        }
        Err(_) => {
            return Err(RecognizerError::Remote(format!("HTTP {}", status)));
        }
    };

    if let Some(message) = parsed.error {
        return Err(RecognizerError::Remote(message));
    }
    if !status.is_success() {
        return Err(RecognizerError::Remote(format!("HTTP {}", status)));
    }

    let Some(similarity) = parsed.similarity else {
        return Ok(MatchVerdict::no_match(0.0));
    };

    if !similarity.confidence.is_finite() {
        return Err(RecognizerError::InvalidResponse(format!(
            "non-finite confidence {}",
            similarity.confidence
        )));
    }

    Ok(MatchVerdict {
        matched: similarity.matched,
        candidate_employee_id: similarity.employee_id,
        confidence: similarity.confidence.clamp(0.0, 1.0),
        recognizer_evidence_id: similarity.fingerprint_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_match() {
        let body = br#"{"similarity": {"employee_id": "EMP001", "confidence": 0.93, "match": true, "fingerprint_id": "fp-3"}}"#;
        let verdict = parse_recognize_response(StatusCode::OK, body).unwrap();
        assert!(verdict.matched);
        assert_eq!(verdict.candidate_employee_id.as_deref(), Some("EMP001"));
        assert_eq!(verdict.confidence, 0.93);
        assert_eq!(verdict.recognizer_evidence_id.as_deref(), Some("fp-3"));
    }

    #[test]
    fn test_parses_no_match_with_null_employee() {
        let body = br#"{"similarity": {"employee_id": null, "confidence": 0.41, "match": false}}"#;
        let verdict = parse_recognize_response(StatusCode::OK, body).unwrap();
        assert!(!verdict.matched);
        assert!(verdict.candidate_employee_id.is_none());
    }

    #[test]
    fn test_error_payload_is_remote_even_on_ok() {
        let body = br#"{"error": "Embeddings database is empty"}"#;
        let err = parse_recognize_response(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, RecognizerError::Remote(m) if m.contains("Embeddings")));

        let body = br#"{"error": "Failed to load models"}"#;
        let err = parse_recognize_response(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert!(matches!(err, RecognizerError::Remote(_)));
    }

    #[test]
    fn test_unreadable_bodies() {
        let err = parse_recognize_response(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidResponse(_)));

        let body = br#"{"similarity": {"employee_id": "EMP001", "match": true}}"#;
        let err = parse_recognize_response(StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, RecognizerError::InvalidResponse(_)));

        let err = parse_recognize_response(StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
        assert!(matches!(err, RecognizerError::Remote(_)));
    }

    #[test]
    fn test_missing_similarity_is_no_match() {
        for body in [&b"{}"[..], &br#"{"status": "ok"}"#[..]] {
            let verdict = parse_recognize_response(StatusCode::OK, body).unwrap();
            assert_eq!(verdict, MatchVerdict::no_match(0.0));
        }
    }

    #[test]
    fn test_missing_match_flag_reads_as_false() {
        let body = br#"{"similarity": {"employee_id": null, "confidence": 0.12}}"#;
        let verdict = parse_recognize_response(StatusCode::OK, body).unwrap();
        assert!(!verdict.matched);
        assert!(verdict.candidate_employee_id.is_none());
        assert_eq!(verdict.confidence, 0.12);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let body = br#"{"similarity": {"employee_id": null, "confidence": -0.2, "match": false}}"#;
        let verdict = parse_recognize_response(StatusCode::OK, body).unwrap();
        assert_eq!(verdict.confidence, 0.0);

        let body = br#"{"similarity": {"employee_id": "EMP001", "confidence": 1.0000001, "match": true}}"#;
        let verdict = parse_recognize_response(StatusCode::OK, body).unwrap();
        assert_eq!(verdict.confidence, 1.0);
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let config = RecognizerConfig {
            base_url: "http://recognizer:5000/".to_string(),
            timeout_seconds: 5,
        };
        let client = HttpRecognizerClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://recognizer:5000/api/recognize");
    }
}
