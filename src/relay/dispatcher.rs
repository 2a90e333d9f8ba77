//! Relay dispatch pipeline.
//!
//! Resolves the tenant behind a public routing key, enforces the
//! account's policy, sanitizes the submission, and hands the formatted
//! notification to the mail transport. A submission either fully
//! succeeds or fully fails; nothing is persisted along the way.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::validation::validate_email;
use crate::db::{AccountRepository, Database};
use crate::mail::{Mailer, OutboundMessage};
use crate::relay::origin::origin_allowed;
use crate::relay::sanitize::{capitalize_key, render_value, strip_html};

/// Display name used when the payload carries no usable `name` field.
const FALLBACK_SENDER_NAME: &str = "Form Submission";

/// Relay pipeline errors.
#[derive(Error, Debug)]
pub enum RelayError {
    /// No account holds this routing key.
    #[error("invalid client id")]
    InvalidClientId,

    /// The tenant has switched submissions off.
    #[error("this endpoint is currently not accepting submissions")]
    NotAccepting,

    /// The declared origin is not on the tenant's allow-list.
    #[error("origin {0} is not allowed")]
    OriginNotAllowed(String),

    /// The tenant has no destination addresses configured.
    #[error("no target emails configured")]
    NoTargets,

    /// The mail transport failed.
    #[error("failed to send email: {0}")]
    Transport(String),

    /// Storage failure while resolving the tenant.
    #[error("database error: {0}")]
    Database(String),
}

/// An inbound submission, already rate-limited by the caller.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Public routing key from the URL.
    pub client_id: String,
    /// Declared Origin header, if any.
    pub origin: Option<String>,
    /// Form fields. Arbitrary; passed through opaquely apart from
    /// sanitization and the `name`/`email` conventions.
    pub fields: Map<String, Value>,
}

/// The relay dispatcher.
pub struct RelayDispatcher<'a> {
    db: &'a Database,
    mailer: &'a Mailer,
}

impl<'a> RelayDispatcher<'a> {
    /// Create a new dispatcher.
    pub fn new(db: &'a Database, mailer: &'a Mailer) -> Self {
        Self { db, mailer }
    }

    /// Run the pipeline for one submission.
    pub async fn dispatch(&self, submission: &Submission) -> Result<(), RelayError> {
        let repo = AccountRepository::new(self.db.pool());

        let account = repo
            .get_by_client_id(&submission.client_id)
            .await
            .map_err(|e| RelayError::Database(e.to_string()))?
            .ok_or(RelayError::InvalidClientId)?;

        if !account.is_accepting_emails {
            return Err(RelayError::NotAccepting);
        }

        // A request without a declared Origin is a non-browser caller and
        // passes regardless of the list.
        let allowed = account.allowed_origins();
        if !allowed.is_empty() {
            if let Some(origin) = &submission.origin {
                if !origin_allowed(&allowed, origin) {
                    debug!(client_id = %submission.client_id, origin = %origin,
                        "relay origin rejected");
                    return Err(RelayError::OriginNotAllowed(origin.clone()));
                }
            }
        }

        let targets = account.target_emails();
        if targets.is_empty() {
            return Err(RelayError::NoTargets);
        }

        let message = build_message(submission, targets);
        self.mailer
            .send(message)
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        info!(client_id = %submission.client_id, account_id = account.id,
            "submission relayed");
        Ok(())
    }
}

/// Construct the outbound notification for a submission.
fn build_message(submission: &Submission, targets: Vec<String>) -> OutboundMessage {
    let origin_label = submission.origin.as_deref().unwrap_or("Unknown");

    let mut body = String::from("You have received a new submission:\n\n");
    body.push_str(&format!("Website Origin: {origin_label}\n"));
    body.push_str(&format!(
        "Timestamp: {}\n\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    body.push_str("--- Submission Data ---\n");

    for (key, value) in &submission.fields {
        body.push_str(&format!("{}: {}\n", capitalize_key(key), render_value(value)));
    }

    let sender_name = match submission.fields.get("name") {
        Some(Value::String(name)) => {
            let stripped = strip_html(name);
            if stripped.is_empty() {
                FALLBACK_SENDER_NAME.to_string()
            } else {
                stripped
            }
        }
        _ => FALLBACK_SENDER_NAME.to_string(),
    };

    let reply_to = match submission.fields.get("email") {
        Some(Value::String(email)) if validate_email(email).is_ok() => Some(email.clone()),
        _ => None,
    };

    let subject = format!(
        "New Submission from {}",
        submission.origin.as_deref().unwrap_or("Unknown Origin")
    );

    let mut message = OutboundMessage::new(targets, subject)
        .with_from_name(sender_name)
        .with_text_body(body);
    if let Some(reply_to) = reply_to {
        message = message.with_reply_to(reply_to);
    }
    message
}
