//! Relay rate limiting middleware.
//!
//! Applies the fixed-window per-IP limiter before a submission reaches
//! the dispatcher.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::relay::{FixedWindowLimiter, RateLimitResult};
use crate::web::error::ApiError;

/// Extract the client IP from a request.
fn get_client_ip(req: &Request<Body>) -> String {
    // X-Forwarded-For first (reverse proxy), first hop in the chain.
    if let Some(forwarded) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = req
        .headers()
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Rate limiting middleware for the relay endpoint.
pub async fn relay_rate_limit(
    limiter: Arc<FixedWindowLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = get_client_ip(&req);

    match limiter.check_and_record(&ip) {
        RateLimitResult::Allowed => next.run(req).await,
        RateLimitResult::Denied { retry_after } => {
            tracing::warn!(ip = %ip, retry_after_secs = retry_after.as_secs(),
                "relay rate limit exceeded");
            ApiError::too_many_requests(
                "Too many requests from this IP, please try again after an hour",
            )
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn request_with_headers(headers: &[(&str, &str)]) -> Request<Body> {
        let mut req = Request::new(Body::empty());
        for (name, value) in headers {
            req.headers_mut().insert(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        req
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let req = request_with_headers(&[("X-Forwarded-For", "1.2.3.4, 10.0.0.1")]);
        assert_eq!(get_client_ip(&req), "1.2.3.4");
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = request_with_headers(&[("X-Real-IP", "5.6.7.8")]);
        assert_eq!(get_client_ip(&req), "5.6.7.8");
    }

    #[test]
    fn test_unknown_without_connect_info() {
        let req = Request::new(Body::empty());
        assert_eq!(get_client_ip(&req), "unknown");
    }
}
