//! End-to-end tests of the SMS webhook: signature check, lookup, reply.

mod helpers;

use axum::body::{Body, to_bytes};
use axum::http::{HeaderValue, Request, StatusCode};
use helpers::{
    COMPSCI_PAGE, FailingCatalog, FakeCatalog, RecordingSender, SENDER, encode_form,
    signed_request, test_router, webhook_params,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn replies_with_seat_count() {
    let catalog = Arc::new(FakeCatalog::new(COMPSCI_PAGE));
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(catalog.clone(), sender.clone());

    let response = app
        .oneshot(signed_request(&webhook_params(SENDER, "compsci 122a")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(json_body(response).await, Value::from("Success!"));
    assert_eq!(catalog.calls(), 1);
    assert_eq!(
        sender.sent(),
        vec![(
            SENDER.to_owned(),
            "Number of seats available in CompSci 122A: 5".to_owned()
        )]
    );
}

#[tokio::test]
async fn full_lectures_count_as_zero() {
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(Arc::new(FakeCatalog::new(COMPSCI_PAGE)), sender.clone());

    let response = app
        .oneshot(signed_request(&webhook_params(SENDER, "CS 122B")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        sender.sent()[0].1,
        "Number of seats available in CompSci 122B: 0"
    );
}

#[tokio::test]
async fn missing_course_gets_not_available_reply() {
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(Arc::new(FakeCatalog::new(COMPSCI_PAGE)), sender.clone());

    let response = app
        .oneshot(signed_request(&webhook_params(SENDER, "COMPSCI 161")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        sender.sent()[0].1,
        "I'm sorry, CompSci 161 is not available this quarter. Try another course number."
    );
}

#[tokio::test]
async fn unknown_department_skips_catalog() {
    let catalog = Arc::new(FakeCatalog::new(COMPSCI_PAGE));
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(catalog.clone(), sender.clone());

    let response = app
        .oneshot(signed_request(&webhook_params(SENDER, "BASKETRY 101")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(catalog.calls(), 0);
    assert_eq!(
        sender.sent()[0].1,
        "Sorry, I don't recognize the department \"BASKETRY\". Try something like \"COMPSCI 122A\"."
    );
}

#[tokio::test]
async fn malformed_body_gets_usage_reply() {
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(Arc::new(FakeCatalog::new(COMPSCI_PAGE)), sender.clone());

    let response = app
        .oneshot(signed_request(&webhook_params(SENDER, "hello")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        sender.sent()[0].1,
        "Text a department and course number, like \"COMPSCI 122A\"."
    );
}

#[tokio::test]
async fn tampered_body_is_rejected() {
    let catalog = Arc::new(FakeCatalog::new(COMPSCI_PAGE));
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(catalog.clone(), sender.clone());

    // Signed for one course, delivered asking about another.
    let signed = signed_request(&webhook_params(SENDER, "COMPSCI 122A"));
    let signature = signed.headers()["x-twilio-signature"].clone();
    let tampered = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-twilio-signature", signature)
        .body(Body::from(encode_form(&webhook_params(SENDER, "COMPSCI 122B"))))
        .unwrap();

    let response = app.oneshot(tampered).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["code"], "FORBIDDEN");
    assert_eq!(catalog.calls(), 0);
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn unsigned_request_is_rejected() {
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(Arc::new(FakeCatalog::new(COMPSCI_PAGE)), sender.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(encode_form(&webhook_params(SENDER, "COMPSCI 122A"))))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn catalog_failure_sends_nothing() {
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(Arc::new(FailingCatalog), sender.clone());

    let response = app
        .oneshot(signed_request(&webhook_params(SENDER, "COMPSCI 122A")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["code"], "LOOKUP_FAILED");
    assert!(sender.sent().is_empty());
}

#[tokio::test]
async fn delivery_failure_still_acknowledges() {
    let sender = Arc::new(RecordingSender::failing());
    let app = test_router(Arc::new(FakeCatalog::new(COMPSCI_PAGE)), sender.clone());

    let response = app
        .oneshot(signed_request(&webhook_params(SENDER, "COMPSCI 122A")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sender.sent().len(), 1);
}

#[tokio::test]
async fn rapid_sender_is_throttled() {
    let catalog = Arc::new(FakeCatalog::new(COMPSCI_PAGE));
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(catalog.clone(), sender.clone());

    for _ in 0..4 {
        let response = app
            .clone()
            .oneshot(signed_request(&webhook_params(SENDER, "COMPSCI 122A")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let sent = sender.sent();
    assert_eq!(sent.len(), 4);
    assert_eq!(catalog.calls(), 3);
    assert_eq!(
        sent[3].1,
        "You're sending requests too quickly. Please wait a minute and try again."
    );
}

#[tokio::test]
async fn health_reports_version() {
    let app = test_router(
        Arc::new(FakeCatalog::new(COMPSCI_PAGE)),
        Arc::new(RecordingSender::default()),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn twilio_delivery_token_is_request_id() {
    let app = test_router(
        Arc::new(FakeCatalog::new(COMPSCI_PAGE)),
        Arc::new(RecordingSender::default()),
    );

    let mut request = signed_request(&webhook_params(SENDER, "COMPSCI 122A"));
    request.headers_mut().insert(
        "i-twilio-idempotency-token",
        HeaderValue::from_static("0f2b6c1e-delivery-1"),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "0f2b6c1e-delivery-1");
}

#[tokio::test]
async fn empty_delivery_token_gets_generated_request_id() {
    let app = test_router(
        Arc::new(FakeCatalog::new(COMPSCI_PAGE)),
        Arc::new(RecordingSender::default()),
    );

    let mut request = signed_request(&webhook_params(SENDER, "COMPSCI 122A"));
    request
        .headers_mut()
        .insert("i-twilio-idempotency-token", HeaderValue::from_static(""));
    let response = app.oneshot(request).await.unwrap();

    let request_id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(ulid::Ulid::from_string(request_id).is_ok());
}

#[tokio::test]
async fn signed_webhook_without_sender_is_acknowledged() {
    let catalog = Arc::new(FakeCatalog::new(COMPSCI_PAGE));
    let sender = Arc::new(RecordingSender::default());
    let app = test_router(catalog.clone(), sender.clone());

    let params: Vec<(String, String)> = webhook_params(SENDER, "COMPSCI 122A")
        .into_iter()
        .filter(|(name, _)| name != "From")
        .collect();
    let response = app.oneshot(signed_request(&params)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, Value::from("Success!"));
    assert_eq!(catalog.calls(), 0);
    assert!(sender.sent().is_empty());
}
