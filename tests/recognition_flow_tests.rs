use access_ledger::ledger::AccessLogFilter;
use access_ledger::testing_utils::{StubRecognizer, TestEnvironment};
use access_ledger::types::{
    AccessType, AreaId, BiometricSample, EmployeeId, MatchVerdict, ModelId,
};
use access_ledger::{AccessLedgerError, RecognitionRequest, RecognizerError};
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

const SAMPLE: &[u8] = b"\x42\x4d fingerprint ridge bytes";

fn request(area: &str) -> RecognitionRequest {
    RecognitionRequest {
        sample: BiometricSample::new(SAMPLE.to_vec(), "thumb.bmp"),
        segmentation_model_id: None,
        recognition_model_id: None,
        area_id: AreaId::new(area).unwrap(),
        access_type: AccessType::Entry,
    }
}

fn emp(id: &str) -> EmployeeId {
    EmployeeId::new(id).unwrap()
}

#[tokio::test]
async fn test_no_match_records_unauthorized_anonymous_event() {
    let env = TestEnvironment::new(Arc::new(StubRecognizer::no_match(0.42))).unwrap();

    let outcome = env.node.process_recognition(request("lobby")).await.unwrap();
    assert!(!outcome.matched);
    assert!(!outcome.authorized);
    assert!(outcome.employee.is_none());
    assert!(outcome.access_event.employee_id.is_none());

    let json = serde_json::to_value(&outcome).unwrap();
    for field in ["employee", "employee_id", "accessible"] {
        assert!(json.get(field).is_none(), "unexpected field {}", field);
    }

    let stored = env.node.access_event(&outcome.access_event.id).unwrap();
    assert!(!stored.authorized);
    let evidence = env
        .node
        .evidence_for_access_event(&stored.id)
        .unwrap()
        .unwrap();
    assert!(evidence.employee_id.is_none());
    assert_eq!(evidence.confidence, 0.42);
}

#[tokio::test]
async fn test_match_without_grant_is_denied_but_identified() {
    let env = TestEnvironment::new(Arc::new(StubRecognizer::matching("EMP001", 0.91))).unwrap();

    let outcome = env.node.process_recognition(request("vault")).await.unwrap();
    assert!(outcome.matched);
    assert!(!outcome.authorized);
    assert!(!outcome.access_event.authorized);
    assert_eq!(outcome.employee_id, Some(emp("EMP001")));
    assert_eq!(outcome.accessible, Some(false));
    assert_eq!(outcome.employee.unwrap().full_name, "Ada Byron");
}

#[tokio::test]
async fn test_granted_match_is_authorized_with_linked_evidence() {
    let stub = Arc::new(StubRecognizer::answering(Ok(
        MatchVerdict::matched("EMP002", 0.97).with_recognizer_evidence_id("fp-88")
    )));
    let env = TestEnvironment::new(stub.clone()).unwrap();
    env.node
        .grant_access(&emp("EMP002"), &AreaId::new("lab").unwrap())
        .unwrap();

    let outcome = env.node.process_recognition(request("lab")).await.unwrap();
    assert!(outcome.authorized);
    assert_eq!(outcome.accessible, Some(true));
    assert!(outcome.access_event.authorized);
    assert_eq!(outcome.access_event.employee_id, Some(emp("EMP002")));

    let evidence = env
        .node
        .evidence_for_access_event(&outcome.access_event.id)
        .unwrap()
        .expect("evidence should be recorded");
    assert_eq!(evidence.access_event_id, outcome.access_event.id);
    assert_eq!(evidence.confidence, outcome.confidence);
    assert_eq!(evidence.employee_id, Some(emp("EMP002")));
    assert_eq!(evidence.recognizer_evidence_id.as_deref(), Some("fp-88"));
    assert_eq!(
        evidence.sample_digest,
        BiometricSample::new(SAMPLE.to_vec(), "x").digest()
    );
    assert_eq!(evidence.segmentation_model.model_id, env.segmentation_model.id);
    assert_eq!(evidence.recognition_model.path_name, "models/resnet.h5");

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].filename, "thumb.bmp");
    assert_eq!(calls[0].segmentation_model_path, "models/unet.h5");
    assert_eq!(calls[0].recognition_model_path, "models/resnet.h5");
}

#[tokio::test]
async fn test_unknown_candidate_is_treated_as_no_match() {
    let env = TestEnvironment::new(Arc::new(StubRecognizer::matching("EMP999", 0.99))).unwrap();

    let outcome = env.node.process_recognition(request("lobby")).await.unwrap();
    assert!(outcome.matched);
    assert!(!outcome.authorized);
    assert!(outcome.employee_id.is_none());
    assert!(outcome.access_event.employee_id.is_none());
}

#[tokio::test]
async fn test_evidence_failure_still_succeeds() {
    let env = TestEnvironment::with_failing_evidence(Arc::new(StubRecognizer::matching(
        "EMP001", 0.88,
    )))
    .unwrap();
    env.node
        .grant_access(&emp("EMP001"), &AreaId::new("lobby").unwrap())
        .unwrap();

    let outcome = env.node.process_recognition(request("lobby")).await.unwrap();
    assert!(outcome.authorized);

    let stored = env.node.access_event(&outcome.access_event.id).unwrap();
    assert_eq!(stored, outcome.access_event);
    assert!(env
        .node
        .evidence_for_access_event(&stored.id)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_access_event_write_failure_fails_the_attempt() {
    let env = TestEnvironment::with_failing_events(Arc::new(StubRecognizer::matching(
        "EMP001", 0.88,
    )))
    .unwrap();
    env.node
        .grant_access(&emp("EMP001"), &AreaId::new("lobby").unwrap())
        .unwrap();

    let err = env.node.process_recognition(request("lobby")).await.unwrap_err();
    assert!(matches!(err, AccessLedgerError::Persistence(_)), "{:?}", err);
    assert!(env.db_ops.list_access_events().unwrap().is_empty());
    assert!(env.db_ops.list_recognition_evidence().unwrap().is_empty());
}

#[tokio::test]
async fn test_recognizer_failures_record_nothing() {
    let cases = [
        (
            StubRecognizer::failing(RecognizerError::Remote("Failed to load models".into())),
            "error",
        ),
        (
            StubRecognizer::failing(RecognizerError::Transport("connection refused".into())),
            "unavailable",
        ),
        (
            StubRecognizer::no_match(0.1).with_delay(Duration::from_secs(3)),
            "unavailable",
        ),
    ];

    for (stub, expected) in cases {
        let env = TestEnvironment::new(Arc::new(stub)).unwrap();
        let err = env.node.process_recognition(request("lab")).await.unwrap_err();
        match expected {
            "error" => assert!(matches!(err, AccessLedgerError::RecognizerError(_)), "{:?}", err),
            _ => assert!(
                matches!(err, AccessLedgerError::RecognizerUnavailable(_)),
                "{:?}",
                err
            ),
        }
        assert!(env.db_ops.list_access_events().unwrap().is_empty());
        assert!(env.db_ops.list_recognition_evidence().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_unknown_area_or_model_fails_before_recognition() {
    let stub = Arc::new(StubRecognizer::matching("EMP001", 0.9));
    let env = TestEnvironment::new(stub.clone()).unwrap();

    let err = env.node.process_recognition(request("attic")).await.unwrap_err();
    assert!(matches!(err, AccessLedgerError::NotFound(_)));

    let mut bad_model = request("lab");
    bad_model.recognition_model_id = Some(ModelId::new("missing").unwrap());
    let err = env.node.process_recognition(bad_model).await.unwrap_err();
    assert!(matches!(err, AccessLedgerError::NotFound(_)));

    // A segmentation model id is not a recognition model id
    let mut wrong_kind = request("lab");
    wrong_kind.recognition_model_id = Some(env.segmentation_model.id.clone());
    assert!(env.node.process_recognition(wrong_kind).await.is_err());

    assert!(stub.calls().is_empty());
    assert!(env.db_ops.list_access_events().unwrap().is_empty());
}

#[tokio::test]
async fn test_audit_queries_after_traffic() {
    let env = TestEnvironment::new(Arc::new(StubRecognizer::matching("EMP001", 0.9))).unwrap();
    env.node
        .grant_access(&emp("EMP001"), &AreaId::new("lobby").unwrap())
        .unwrap();

    env.node.process_recognition(request("lobby")).await.unwrap();
    env.node.process_recognition(request("vault")).await.unwrap();
    let mut exit = request("lobby");
    exit.access_type = AccessType::Exit;
    env.node.process_recognition(exit).await.unwrap();

    let start = Utc::now() - ChronoDuration::minutes(5);
    let end = Utc::now() + ChronoDuration::minutes(5);
    let log = env
        .node
        .access_log(&emp("EMP001"), start, end, &AccessLogFilter::default())
        .unwrap();
    assert_eq!(log.len(), 3);

    let exits = env
        .node
        .access_log(
            &emp("EMP001"),
            start,
            end,
            &AccessLogFilter {
                access_type: Some(AccessType::Exit),
                area_id: None,
            },
        )
        .unwrap();
    assert_eq!(exits.len(), 1);

    assert_eq!(env.node.evidence_for_employee(&emp("EMP001")).unwrap().len(), 3);

    let stats = env.node.employee_statistics(None, None).unwrap();
    let ada = stats.iter().find(|s| s.employee_id == emp("EMP001")).unwrap();
    assert_eq!(
        (ada.total_attempts, ada.authorized_attempts, ada.denied_attempts),
        (3, 2, 1)
    );
}

#[tokio::test]
async fn test_deleted_employee_leaves_history_detached() {
    let env = TestEnvironment::new(Arc::new(StubRecognizer::matching("EMP002", 0.9))).unwrap();
    env.node.grant_all_areas(&emp("EMP002")).unwrap();
    let outcome = env.node.process_recognition(request("lab")).await.unwrap();

    env.node.delete_employee(&emp("EMP002")).unwrap();

    let event = env.node.access_event(&outcome.access_event.id).unwrap();
    assert_eq!(event.employee_id, Some(emp("EMP002")));
    assert!(env
        .node
        .employee_statistics(None, None)
        .unwrap()
        .iter()
        .all(|s| s.employee_id != emp("EMP002")));

    // The same recognizer verdict no longer resolves
    let after = env.node.process_recognition(request("lab")).await.unwrap();
    assert!(!after.authorized);
    assert!(after.employee_id.is_none());
}
