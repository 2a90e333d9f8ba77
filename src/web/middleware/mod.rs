//! Middleware for the HTTP surface.

pub mod auth;
pub mod cors;
pub mod rate_limit;

pub use auth::{CurrentAccount, SESSION_COOKIE};
pub use cors::create_cors_layer;
pub use rate_limit::relay_rate_limit;
