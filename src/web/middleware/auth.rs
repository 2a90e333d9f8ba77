//! Session authentication extractor.
//!
//! Resolves a session token into the current account. The token is taken
//! from the session cookie first, then from a `Authorization: Bearer`
//! header; the fixed order removes any ambiguity when both are present.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;

use crate::db::{Account, AccountRepository};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Extractor for authenticated accounts.
///
/// Verifies signature and expiry, then loads the current account row; a
/// token whose account no longer exists is rejected the same way as a
/// bad token. Never fails open.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

/// Pull a session token out of the request, cookie first.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

impl FromRequestParts<Arc<AppState>> for CurrentAccount {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = extract_token(&parts.headers)
                .ok_or_else(|| ApiError::unauthorized("Not authorized, no token"))?;

            let claims = state.sessions.verify(&token).map_err(|e| {
                tracing::debug!("session rejected: {}", e);
                ApiError::unauthorized("Not authorized, token failed")
            })?;

            let account = AccountRepository::new(state.db.pool())
                .get_by_id(claims.sub)
                .await
                .map_err(|e| {
                    tracing::error!("account lookup failed: {}", e);
                    ApiError::internal("An internal error occurred")
                })?
                .ok_or_else(|| ApiError::unauthorized("Not authorized, token failed"))?;

            Ok(CurrentAccount(account))
        })
    }
}
