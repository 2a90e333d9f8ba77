//! Mail transports for formbridge.
//!
//! Delivery is synchronous and at-most-once: a message is either handed
//! to the SMTP server or the send fails. There is no retry or outbox.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use mail_send::mail_builder::MessageBuilder;
use mail_send::SmtpClientBuilder;
use thiserror::Error;

use super::message::OutboundMessage;

/// Mail transport errors.
#[derive(Error, Debug)]
pub enum MailError {
    /// The SMTP conversation failed.
    #[error("mail transport error: {0}")]
    Transport(String),

    /// The message could not be constructed.
    #[error("invalid outbound message: {0}")]
    InvalidMessage(String),
}

/// Outbound mail transport.
pub enum Mailer {
    /// Real SMTP delivery.
    Smtp(SmtpMailer),
    /// In-memory recorder for tests and local development.
    Memory(MemoryMailer),
}

impl Mailer {
    /// Create an SMTP transport.
    pub fn smtp(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        from_address: impl Into<String>,
    ) -> Self {
        Mailer::Smtp(SmtpMailer {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            from_address: from_address.into(),
        })
    }

    /// Create an in-memory transport.
    pub fn memory() -> (Self, MemoryMailer) {
        let memory = MemoryMailer::new();
        (Mailer::Memory(memory.clone()), memory)
    }

    /// Hand a message to the transport.
    pub async fn send(&self, message: OutboundMessage) -> Result<(), MailError> {
        match self {
            Mailer::Smtp(smtp) => smtp.send(message).await,
            Mailer::Memory(memory) => memory.send(message),
        }
    }
}

/// SMTP transport over STARTTLS.
pub struct SmtpMailer {
    host: String,
    port: u16,
    username: String,
    password: String,
    from_address: String,
}

impl SmtpMailer {
    async fn send(&self, message: OutboundMessage) -> Result<(), MailError> {
        if message.to.is_empty() {
            return Err(MailError::InvalidMessage("no recipients".to_string()));
        }

        let from_name = message.from_name.clone().unwrap_or_default();
        let recipients: Vec<String> = message.to.clone();

        let mut builder = MessageBuilder::new()
            .from((from_name, self.from_address.clone()))
            .to(recipients)
            .subject(message.subject.clone());

        if let Some(reply_to) = &message.reply_to {
            builder = builder.reply_to(reply_to.clone());
        }
        if let Some(text) = &message.text_body {
            builder = builder.text_body(text.clone());
        }
        if let Some(html) = &message.html_body {
            builder = builder.html_body(html.clone());
        }

        let mut client = SmtpClientBuilder::new(self.host.clone(), self.port)
            .implicit_tls(false)
            .credentials((self.username.clone(), self.password.clone()))
            .connect()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        client
            .send(builder)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// In-memory transport recording every sent message.
///
/// Clones share the same buffer, so a handle kept by a test observes
/// everything the application sends. `set_failing` makes subsequent sends
/// error, which is how delivery-failure paths are exercised.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryMailer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn send(&self, message: OutboundMessage) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Transport("simulated delivery failure".to_string()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    /// Snapshot of every message sent so far.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of messages sent so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Make subsequent sends fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}
