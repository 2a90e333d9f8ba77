//! Response DTOs for the HTTP API.

use serde::Serialize;

use crate::db::Account;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Public account fields.
///
/// The password hash and pending tokens never appear here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Account ID.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Public routing key.
    pub client_id: Option<String>,
    /// Destination addresses.
    pub target_emails: Vec<String>,
    /// Origin allow-list.
    pub allowed_origins: Vec<String>,
    /// Whether the login email has been verified.
    pub is_verified: bool,
    /// Relay accept switch.
    pub is_accepting_emails: bool,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            client_id: account.client_id.clone(),
            target_emails: account.target_emails(),
            allowed_origins: account.allowed_origins(),
            is_verified: account.is_verified,
            is_accepting_emails: account.is_accepting_emails,
        }
    }
}

/// Session issuance response (register and login).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Session token. Also set as an HTTP-only cookie; returned in the
    /// body for bearer-header clients.
    pub token: String,
    /// Token validity in seconds.
    pub expires_in: u64,
    /// Account profile.
    pub account: AccountInfo,
}
