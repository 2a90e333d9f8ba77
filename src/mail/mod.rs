//! Outbound mail for formbridge.
//!
//! Message types, transports, and system notification builders.

mod message;
pub mod system;
mod transport;

pub use message::OutboundMessage;
pub use transport::{MailError, Mailer, MemoryMailer, SmtpMailer};
