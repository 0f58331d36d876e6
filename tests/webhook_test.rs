//! Integration tests for the webhook relay endpoint.
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot` and records
//! every notification handed to the messaging backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use clap::Parser;
use hub_relay::api::webhook::MAX_BODY_BYTES;
use hub_relay::error::{RelayError, Result};
use hub_relay::messaging::{Color, MessageFormat, Notification, Notifier};
use hub_relay::{AppState, RelayConfig, router};
use tower::ServiceExt;

const TOKEN: &str = "z";
const VALID_BODY: &str =
    r#"{"repository":{"repo_name":"acme/widget","repo_url":"https://hub.example/acme/widget"}}"#;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _notification: &Notification) -> Result<()> {
        Err(RelayError::ApiError {
            status: 401,
            message: "Unauthorized: Auth token not found".to_string(),
        })
    }
}

fn test_config(notify: bool) -> RelayConfig {
    let mut args = vec!["hub_relay", "-k", "x", "-r", "builds", "-a", TOKEN];
    if notify {
        args.push("-n");
    }
    RelayConfig::try_parse_from(args).expect("config parse")
}

fn app_with(notifier: Arc<dyn Notifier>, notify: bool) -> Router {
    router(Arc::new(AppState::new(test_config(notify), notifier)))
}

fn recording_app() -> (Router, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    (app_with(notifier.clone(), false), notifier)
}

fn webhook_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request build")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body extraction");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[tokio::test]
async fn valid_post_forwards_exactly_one_notification() {
    let (app, notifier) = recording_app();

    let response = app
        .oneshot(webhook_request("POST", "/hhh?token=z", VALID_BODY))
        .await
        .expect("request execution");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.is_empty());

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    let notification = &sent[0];
    assert!(notification.message.contains("acme/widget"));
    assert!(notification.message.contains("https://hub.example/acme/widget"));
    assert_eq!(notification.room_id, "builds");
    assert_eq!(notification.from, "Docker Build");
    assert_eq!(notification.color, Color::Purple);
    assert_eq!(notification.message_format, MessageFormat::Text);
    assert!(!notification.notify);
}

#[tokio::test]
async fn notify_flag_is_carried_to_the_notification() {
    let notifier = Arc::new(RecordingNotifier::default());
    let app = app_with(notifier.clone(), true);

    let response = app
        .oneshot(webhook_request("POST", "/hhh?token=z", VALID_BODY))
        .await
        .expect("request execution");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(notifier.sent()[0].notify);
}

#[tokio::test]
async fn non_post_methods_are_rejected_without_forwarding() {
    let (app, notifier) = recording_app();

    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let response = app
            .clone()
            .oneshot(webhook_request(method, "/hhh?token=z", VALID_BODY))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(body_text(response).await, "Only POST methods supported");
    }

    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn missing_or_wrong_token_is_unauthorized() {
    let (app, notifier) = recording_app();

    let cases = [
        ("/hhh", VALID_BODY),
        ("/hhh?other=1", VALID_BODY),
        ("/hhh?token=", VALID_BODY),
        ("/hhh?token=wrong", VALID_BODY),
        ("/hhh", "{not json"),
        ("/hhh?token=wrong", "{not json"),
    ];

    for (uri, body) in cases {
        let response = app
            .clone()
            .oneshot(webhook_request("POST", uri, body))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body_text(response).await, "Auth info incorrect");
    }

    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn method_is_checked_before_token() {
    let (app, _notifier) = recording_app();

    let response = app
        .oneshot(webhook_request("GET", "/hhh", ""))
        .await
        .expect("request execution");

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn repeated_token_uses_the_first_value() {
    let (app, notifier) = recording_app();

    let response = app
        .clone()
        .oneshot(webhook_request("POST", "/hhh?token=z&token=other", VALID_BODY))
        .await
        .expect("request execution");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(webhook_request("POST", "/hhh?token=other&token=z", VALID_BODY))
        .await
        .expect("request execution");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn oversized_body_is_only_read_after_validation() {
    let (app, notifier) = recording_app();
    let oversized = "x".repeat(MAX_BODY_BYTES + 1);

    let cases = [
        ("GET", "/hhh?token=z", StatusCode::METHOD_NOT_ALLOWED),
        ("POST", "/hhh", StatusCode::UNAUTHORIZED),
        ("POST", "/hhh?token=wrong", StatusCode::UNAUTHORIZED),
        ("POST", "/hhh?token=z", StatusCode::PAYLOAD_TOO_LARGE),
    ];

    for (method, uri, expected) in cases {
        let response = app
            .clone()
            .oneshot(webhook_request(method, uri, &oversized))
            .await
            .expect("request execution");
        assert_eq!(response.status(), expected, "{method} {uri}");
    }

    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn invalid_json_is_bad_request_without_forwarding() {
    let (app, notifier) = recording_app();

    for body in ["", "{not json", "[1, 2", r#"{"repository": 5}"#] {
        let response = app
            .clone()
            .oneshot(webhook_request("POST", "/hhh?token=z", body))
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert!(body_text(response).await.starts_with("error parsing json body: "));
    }

    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn identical_requests_are_not_deduplicated() {
    let (app, notifier) = recording_app();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(webhook_request("POST", "/hhh?token=z", VALID_BODY))
            .await
            .expect("request execution");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[tokio::test]
async fn delivery_failure_is_not_surfaced_to_the_caller() {
    let app = app_with(Arc::new(FailingNotifier), false);

    let response = app
        .oneshot(webhook_request("POST", "/hhh?token=z", VALID_BODY))
        .await
        .expect("request execution");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn concurrent_requests_each_forward_once() {
    let (app, notifier) = recording_app();

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let app = app.clone();
            let body = format!(
                r#"{{"repository":{{"repo_name":"acme/widget-{i}","repo_url":"https://hub.example/acme/widget-{i}"}}}}"#
            );
            tokio::spawn(async move {
                app.oneshot(webhook_request("POST", "/hhh?token=z", &body))
                    .await
                    .expect("request execution")
                    .status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.expect("task join"), StatusCode::OK);
    }

    let sent = notifier.sent();
    assert_eq!(sent.len(), 50);
    for i in 0..50 {
        let repo = format!("acme/widget-{i} ");
        assert_eq!(
            sent.iter().filter(|n| n.message.contains(&repo)).count(),
            1,
            "{repo}"
        );
    }
}

#[tokio::test]
async fn health_endpoint_reports_status() {
    let (app, _notifier) = recording_app();

    let response = app
        .clone()
        .oneshot(webhook_request("GET", "/", ""))
        .await
        .expect("request execution");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "hub_relay - healthy");

    let response = app
        .oneshot(webhook_request("GET", "/?format=json", ""))
        .await
        .expect("request execution");
    let json: serde_json::Value =
        serde_json::from_str(&body_text(response).await).expect("json body");
    assert_eq!(json["name"], "hub_relay");
    assert_eq!(json["status"], "healthy");
    assert!(json.get("room").is_none());
    assert!(!json.to_string().contains("builds"));
}
