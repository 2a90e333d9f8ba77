//! Relay endpoint tests.
//!
//! End-to-end coverage of the submission pipeline: tenant resolution,
//! policy enforcement, sanitization, message construction, and the
//! per-IP rate limit.

mod common;

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use serde_json::{json, Value};

use common::{setup_tenant, spawn_app, spawn_app_with_rate_limit};

#[tokio::test]
async fn test_relay_json_submission() {
    let app = spawn_app().await;
    setup_tenant(
        &app,
        "owner@x.com",
        "my-form",
        &["dest@x.com", "backup@x.com"],
        &[],
    )
    .await;
    let before = app.mailer.sent_count();

    let response = app
        .server
        .post("/my-form")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("https://site.example"),
        )
        .json(&json!({ "name": "<b>Bob</b>", "message": "hi", "email": "bob@x.com" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["message"], "Email sent successfully");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), before + 1);
    let mail = sent.last().unwrap();

    assert_eq!(mail.to, vec!["dest@x.com", "backup@x.com"]);
    assert_eq!(mail.subject, "New Submission from https://site.example");
    assert_eq!(mail.from_name.as_deref(), Some("Bob"));
    assert_eq!(mail.reply_to.as_deref(), Some("bob@x.com"));

    let text = mail.text_body.as_deref().unwrap();
    assert!(text.contains("Website Origin: https://site.example"));
    assert!(text.contains("Name: Bob"));
    assert!(text.contains("Message: hi"));
    assert!(!text.contains("<b>"));
}

#[tokio::test]
async fn test_relay_form_submission() {
    let app = spawn_app().await;
    setup_tenant(&app, "owner@x.com", "my-form", &["dest@x.com"], &[]).await;
    let before = app.mailer.sent_count();

    let response = app
        .server
        .post("/my-form")
        .form(&[("name", "Alice"), ("subject", "hello there")])
        .await;

    response.assert_status_ok();

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), before + 1);
    let text = sent.last().unwrap().text_body.clone().unwrap();
    assert!(text.contains("Name: Alice"));
    assert!(text.contains("Subject: hello there"));
}

#[tokio::test]
async fn test_relay_invalid_client_id() {
    let app = spawn_app().await;

    let response = app
        .server
        .post("/no-such-form")
        .json(&json!({ "message": "hi" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "invalid client id");
    assert_eq!(app.mailer.sent_count(), 0);
}

#[tokio::test]
async fn test_relay_not_accepting() {
    let app = spawn_app().await;
    let session = setup_tenant(&app, "owner@x.com", "my-form", &["dest@x.com"], &[]).await;

    app.server
        .put("/auth/profile")
        .authorization_bearer(&session)
        .json(&json!({
            "clientId": "my-form",
            "targetEmails": ["dest@x.com"],
            "isAcceptingEmails": false,
        }))
        .await
        .assert_status_ok();
    let before = app.mailer.sent_count();

    let response = app
        .server
        .post("/my-form")
        .json(&json!({ "message": "hi" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    // Rejected before any transport invocation.
    assert_eq!(app.mailer.sent_count(), before);
}

#[tokio::test]
async fn test_relay_origin_policy() {
    let app = spawn_app().await;
    setup_tenant(
        &app,
        "owner@x.com",
        "my-form",
        &["dest@x.com"],
        &["https://a.com"],
    )
    .await;
    let before = app.mailer.sent_count();

    // Listed origin, trailing slash tolerated.
    app.server
        .post("/my-form")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://a.com/"))
        .json(&json!({ "message": "hi" }))
        .await
        .assert_status_ok();

    // Unlisted origin rejected.
    let denied = app
        .server
        .post("/my-form")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://b.com"))
        .json(&json!({ "message": "hi" }))
        .await;
    denied.assert_status(StatusCode::FORBIDDEN);
    let body: Value = denied.json();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("https://b.com"));

    // No declared origin: treated as a non-browser caller, allowed.
    app.server
        .post("/my-form")
        .json(&json!({ "message": "hi" }))
        .await
        .assert_status_ok();

    assert_eq!(app.mailer.sent_count(), before + 2);
}

#[tokio::test]
async fn test_relay_no_targets_configured() {
    let app = spawn_app().await;
    setup_tenant(&app, "owner@x.com", "my-form", &["dest@x.com"], &[]).await;

    // A tenant that lost its destination list is a misconfiguration, not
    // a silent no-op. The profile API refuses empty lists, so seed the
    // state directly.
    sqlx::query("UPDATE accounts SET target_emails = '[]' WHERE client_id = 'my-form'")
        .execute(app.db.pool())
        .await
        .unwrap();
    let before = app.mailer.sent_count();

    let response = app
        .server
        .post("/my-form")
        .json(&json!({ "message": "hi" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "no target emails configured");
    assert_eq!(app.mailer.sent_count(), before);
}

#[tokio::test]
async fn test_relay_transport_failure() {
    let app = spawn_app().await;
    setup_tenant(&app, "owner@x.com", "my-form", &["dest@x.com"], &[]).await;

    app.mailer.set_failing(true);
    let response = app
        .server
        .post("/my-form")
        .json(&json!({ "message": "hi" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Failed to send email");
}

#[tokio::test]
async fn test_relay_get_is_method_not_allowed() {
    let app = spawn_app().await;
    setup_tenant(&app, "owner@x.com", "my-form", &["dest@x.com"], &[]).await;

    let response = app.server.get("/my-form").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert!(response.text().contains("Method Not Allowed"));
}

#[tokio::test]
async fn test_relay_rate_limit() {
    let app = spawn_app_with_rate_limit(3, 3600).await;
    setup_tenant(&app, "owner@x.com", "my-form", &["dest@x.com"], &[]).await;
    let before = app.mailer.sent_count();

    // All requests share one client IP in tests; the configured window
    // allows exactly three submissions.
    for _ in 0..3 {
        app.server
            .post("/my-form")
            .add_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static("1.2.3.4"),
            )
            .json(&json!({ "message": "hi" }))
            .await
            .assert_status_ok();
    }

    let fourth = app
        .server
        .post("/my-form")
        .add_header(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("1.2.3.4"),
        )
        .json(&json!({ "message": "hi" }))
        .await;

    fourth.assert_status(StatusCode::TOO_MANY_REQUESTS);
    // The throttled request never reached the dispatcher.
    assert_eq!(app.mailer.sent_count(), before + 3);

    // Another source IP is unaffected.
    app.server
        .post("/my-form")
        .add_header(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("5.6.7.8"),
        )
        .json(&json!({ "message": "hi" }))
        .await
        .assert_status_ok();

    // The GET explainer page is outside the limited path.
    app.server
        .get("/my-form")
        .add_header(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("1.2.3.4"),
        )
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_relay_structured_values() {
    let app = spawn_app().await;
    setup_tenant(&app, "owner@x.com", "my-form", &["dest@x.com"], &[]).await;

    app.server
        .post("/my-form")
        .json(&json!({ "tags": ["a", "b"], "count": 3 }))
        .await
        .assert_status_ok();

    let text = app
        .mailer
        .sent()
        .last()
        .unwrap()
        .text_body
        .clone()
        .unwrap();
    assert!(text.contains(r#"Tags: ["a","b"]"#));
    assert!(text.contains("Count: 3"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = spawn_app().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}
