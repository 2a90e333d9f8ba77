//! formbridge - tenant-scoped form-to-email relay service.
//!
//! Account owners expose a stable public endpoint that forwards form
//! submissions from static sites to their configured mailboxes, guarded
//! by per-account origin allow-lists, accept switches, and a per-IP rate
//! limit.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod relay;
pub mod web;

pub use auth::{
    hash_password, verify_password, AuthError, CredentialService, PasswordError, SessionClaims,
    SessionError, SessionManager,
};
pub use config::Config;
pub use db::{Account, AccountRepository, Database, NewAccount, ProfileUpdate};
pub use error::{BridgeError, Result};
pub use mail::{MailError, Mailer, MemoryMailer, OutboundMessage};
pub use relay::{
    origin_allowed, FixedWindowLimiter, RateLimitConfig, RelayDispatcher, RelayError, Submission,
};
pub use web::WebServer;
