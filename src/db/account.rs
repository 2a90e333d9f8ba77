//! Account entity for formbridge.
//!
//! An account is a tenant: the owner of one relay endpoint and its
//! delivery destinations and security policy.

/// Account entity representing a registered tenant.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID.
    pub id: i64,
    /// Login email (unique, stored case-sensitively).
    pub email: String,
    /// Password hash (Argon2). Never serialized outward.
    pub password: String,
    /// Public routing key embedded in relay URLs. Sparse-unique:
    /// many accounts may have none, at most one holds a given value.
    pub client_id: Option<String>,
    /// JSON array of destination addresses.
    target_emails: String,
    /// JSON array of permitted submission origins; empty means any.
    allowed_origins: String,
    /// Whether the login email has been verified.
    pub is_verified: bool,
    /// Relay accept switch; when false all submissions are rejected.
    pub is_accepting_emails: bool,
    /// Pending email-verification token (single use).
    pub verification_token: Option<String>,
    /// Verification token expiry timestamp.
    pub verification_token_expire: Option<String>,
    /// Pending password-reset token (single use).
    pub reset_password_token: Option<String>,
    /// Reset token expiry timestamp.
    pub reset_password_expire: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last-modified timestamp.
    pub updated_at: String,
}

impl Account {
    /// Destination addresses, in configured order.
    pub fn target_emails(&self) -> Vec<String> {
        serde_json::from_str(&self.target_emails).unwrap_or_default()
    }

    /// Permitted submission origins; empty means any origin is allowed.
    pub fn allowed_origins(&self) -> Vec<String> {
        serde_json::from_str(&self.allowed_origins).unwrap_or_default()
    }
}

/// New account for creation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Login email.
    pub email: String,
    /// Password hash. The caller hashes; the store never does.
    pub password: String,
    /// Initial verification token.
    pub verification_token: String,
    /// Verification token expiry timestamp.
    pub verification_token_expire: String,
}

/// Profile update applied by the account owner.
///
/// Lists are replaced wholesale; there is no item-level removal, which is
/// what keeps a configured relay from losing its last destination.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    /// New public routing key.
    pub client_id: String,
    /// Replacement destination list (validated non-empty upstream).
    pub target_emails: Vec<String>,
    /// Replacement origin allow-list, if provided.
    pub allowed_origins: Option<Vec<String>>,
    /// New accept-switch value, if provided.
    pub is_accepting_emails: Option<bool>,
}
