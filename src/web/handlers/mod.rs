//! API handlers for the HTTP surface.

pub mod auth;
pub mod relay;

pub use auth::*;
pub use relay::*;

use crate::auth::{CredentialService, SessionManager};
use crate::db::Database;
use crate::mail::Mailer;

/// Application state shared across handlers.
pub struct AppState {
    /// Database handle (pool-backed, cheap to share).
    pub db: Database,
    /// Session token issuer/verifier.
    pub sessions: SessionManager,
    /// Outbound mail transport.
    pub mailer: Mailer,
    /// Dashboard base URL for verification and reset links.
    pub frontend_url: String,
    /// Whether session cookies are marked Secure / SameSite=None.
    pub secure_cookies: bool,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Database,
        sessions: SessionManager,
        mailer: Mailer,
        frontend_url: impl Into<String>,
        secure_cookies: bool,
    ) -> Self {
        Self {
            db,
            sessions,
            mailer,
            frontend_url: frontend_url.into(),
            secure_cookies,
        }
    }

    /// Credential service bound to this state.
    pub fn credentials(&self) -> CredentialService<'_> {
        CredentialService::new(&self.db, &self.sessions, &self.mailer, &self.frontend_url)
    }
}
