//! API error handling for the formbridge HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::relay::RelayError;

/// API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bad request (400) - malformed input, bad token, bad routing key.
    BadRequest,
    /// Unauthorized (401).
    Unauthorized,
    /// Forbidden (403) - origin rejected or tenant not accepting.
    Forbidden,
    /// Not found (404).
    NotFound,
    /// Conflict (409) - duplicate email or client id.
    Conflict,
    /// Too many requests (429).
    TooManyRequests,
    /// Internal server error (500) - includes upstream mail failures.
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Create a too-many-requests error.
    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TooManyRequests, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status_code();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::Validation(msg) => ApiError::bad_request(msg.clone()),
            AuthError::EmailTaken | AuthError::ClientIdTaken => {
                ApiError::conflict(err.to_string())
            }
            AuthError::InvalidCredentials | AuthError::WrongPassword => {
                ApiError::unauthorized(err.to_string())
            }
            AuthError::InvalidOrExpiredToken | AuthError::AlreadyVerified => {
                ApiError::bad_request(err.to_string())
            }
            AuthError::AccountNotFound => ApiError::not_found(err.to_string()),
            AuthError::MailDelivery(_) => {
                tracing::error!("notification delivery failed: {}", err);
                ApiError::internal("Email could not be sent")
            }
            AuthError::Session(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                tracing::error!("internal error: {}", err);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match &err {
            RelayError::InvalidClientId | RelayError::NoTargets => {
                ApiError::bad_request(err.to_string())
            }
            RelayError::NotAccepting | RelayError::OriginNotAllowed(_) => {
                ApiError::forbidden(err.to_string())
            }
            RelayError::Transport(_) => {
                tracing::error!("relay transport failed: {}", err);
                ApiError::internal("Failed to send email")
            }
            RelayError::Database(_) => {
                tracing::error!("internal error: {}", err);
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::TooManyRequests.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        let err: ApiError = AuthError::EmailTaken.into();
        assert_eq!(err.code, ErrorCode::Conflict);

        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "invalid email or password");

        let err: ApiError = AuthError::InvalidOrExpiredToken.into();
        assert_eq!(err.code, ErrorCode::BadRequest);
        assert_eq!(err.message, "invalid or expired token");

        let err: ApiError = AuthError::AccountNotFound.into();
        assert_eq!(err.code, ErrorCode::NotFound);

        // Internal details never reach the wire.
        let err: ApiError = AuthError::Database("secret detail".to_string()).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("secret detail"));
    }

    #[test]
    fn test_relay_error_mapping() {
        let err: ApiError = RelayError::InvalidClientId.into();
        assert_eq!(err.code, ErrorCode::BadRequest);

        let err: ApiError = RelayError::NotAccepting.into();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err: ApiError = RelayError::OriginNotAllowed("https://b.com".to_string()).into();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.message.contains("https://b.com"));

        let err: ApiError = RelayError::NoTargets.into();
        assert_eq!(err.code, ErrorCode::BadRequest);

        let err: ApiError = RelayError::Transport("smtp down".to_string()).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("smtp down"));
    }
}
