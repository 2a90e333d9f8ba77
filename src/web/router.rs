//! Router configuration for the HTTP API.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::relay::FixedWindowLimiter;

use super::handlers::{
    change_password, delete_me, forgot_password, login, logout, me, register,
    relay_method_not_allowed, relay_submit, resend_verification, reset_password,
    update_profile, verify_email, AppState,
};
use super::middleware::{create_cors_layer, relay_rate_limit};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    limiter: Arc<FixedWindowLimiter>,
    cors_origins: &[String],
) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me).delete(delete_me))
        .route("/profile", put(update_profile))
        .route("/verify-email/:token", get(verify_email))
        .route("/resend-verification", post(resend_verification))
        .route("/change-password", put(change_password))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/:token", post(reset_password));

    // The rate limit layer wraps only the POST handler; GET still gets
    // its 405 page when an IP is throttled.
    let relay_endpoint = post(relay_submit)
        .layer(middleware::from_fn(move |req, next| {
            let limiter = limiter.clone();
            relay_rate_limit(limiter, req, next)
        }))
        .get(relay_method_not_allowed);

    Router::new()
        .nest("/auth", auth_routes)
        .route("/health", get(health_check))
        .route("/:client_id", relay_endpoint)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
