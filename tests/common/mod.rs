//! Test helpers for API integration tests.
//!
//! Builds a TestServer over an in-memory database and a recording mail
//! transport, plus helpers for the multi-step account flows.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use formbridge::web::handlers::AppState;
use formbridge::web::router::create_router;
use formbridge::{
    Database, FixedWindowLimiter, Mailer, MemoryMailer, RateLimitConfig, SessionManager,
};

/// JWT secret used by every test server.
pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// A running test application.
pub struct TestApp {
    /// HTTP test server.
    pub server: TestServer,
    /// Database handle, for seeding and direct assertions.
    pub db: Database,
    /// Recording mail transport.
    pub mailer: MemoryMailer,
}

/// Spawn a test app with an effectively unlimited relay rate limit.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_rate_limit(1000, 3600).await
}

/// Spawn a test app with a specific relay rate limit.
pub async fn spawn_app_with_rate_limit(max_requests: u32, window_secs: u64) -> TestApp {
    let db = Database::open_in_memory().await.expect("test database");
    let sessions = SessionManager::new(TEST_SECRET, 30);
    let (mailer, memory) = Mailer::memory();

    let state = Arc::new(AppState::new(
        db.clone(),
        sessions,
        mailer,
        "http://localhost:5173",
        false,
    ));
    let limiter = Arc::new(FixedWindowLimiter::new(RateLimitConfig::new(
        max_requests,
        window_secs,
    )));

    let router = create_router(state, limiter, &[]);
    let server = TestServer::new(router).expect("test server");

    TestApp { server, db, mailer: memory }
}

/// Register an account and return the session token from the body.
pub async fn register(app: &TestApp, email: &str, password: &str) -> String {
    let response = app
        .server
        .post("/auth/register")
        .json(&json!({ "email": email, "password": password }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["token"]
        .as_str()
        .expect("session token in register response")
        .to_string()
}

/// Read an account's pending verification token straight from the store.
pub async fn verification_token(db: &Database, email: &str) -> String {
    let token: Option<String> =
        sqlx::query_scalar("SELECT verification_token FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_one(db.pool())
            .await
            .expect("account row");
    token.expect("pending verification token")
}

/// Read an account's pending reset token straight from the store.
pub async fn reset_token(db: &Database, email: &str) -> String {
    let token: Option<String> =
        sqlx::query_scalar("SELECT reset_password_token FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_one(db.pool())
            .await
            .expect("account row");
    token.expect("pending reset token")
}

/// Register an account and configure it as a relay tenant.
///
/// Returns the session token. Registration itself sends one verification
/// mail, so callers counting relay messages should snapshot the recorder
/// afterwards.
pub async fn setup_tenant(
    app: &TestApp,
    email: &str,
    client_id: &str,
    targets: &[&str],
    origins: &[&str],
) -> String {
    let token = register(app, email, "secret1").await;

    let response = app
        .server
        .put("/auth/profile")
        .authorization_bearer(&token)
        .json(&json!({
            "clientId": client_id,
            "targetEmails": targets,
            "allowedOrigins": origins,
        }))
        .await;
    response.assert_status_ok();

    token
}
