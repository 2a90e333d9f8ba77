//! Outbound message types for formbridge.

/// An outbound mail message handed to the transport.
///
/// The envelope sender address belongs to the transport configuration;
/// the message only carries the display name shown next to it.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Display name for the From header.
    pub from_name: Option<String>,
    /// Reply-To address, when the submission supplied a usable one.
    pub reply_to: Option<String>,
    /// Recipient addresses.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text_body: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
}

impl OutboundMessage {
    /// Create a new message with the given recipients and subject.
    pub fn new(to: Vec<String>, subject: impl Into<String>) -> Self {
        Self {
            from_name: None,
            reply_to: None,
            to,
            subject: subject.into(),
            text_body: None,
            html_body: None,
        }
    }

    /// Set the From display name.
    pub fn with_from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = Some(name.into());
        self
    }

    /// Set the Reply-To address.
    pub fn with_reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    /// Set the plain-text body.
    pub fn with_text_body(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn with_html_body(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }
}
