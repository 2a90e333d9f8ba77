//! HTTP surface for formbridge.
//!
//! Account-management endpoints under /auth and the public relay
//! endpoint at /:clientId.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
