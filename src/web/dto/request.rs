//! Request DTOs for the HTTP API.
//!
//! Wire field names are camelCase to match the dashboard client.

use serde::Deserialize;

/// Account registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Owner profile update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// Public routing key.
    pub client_id: String,
    /// Replacement destination list.
    pub target_emails: Vec<String>,
    /// Replacement origin allow-list (omitted = unchanged).
    #[serde(default)]
    pub allowed_origins: Option<Vec<String>>,
    /// Accept-switch value (omitted = unchanged).
    #[serde(default)]
    pub is_accepting_emails: Option<bool>,
}

/// Password change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password.
    pub current_password: String,
    /// New password.
    pub new_password: String,
}

/// Forgot-password request.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Login email.
    pub email: String,
}

/// Reset-password request (token travels in the path).
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// New password.
    pub password: String,
}
