//! Input validation for account operations.
//!
//! Explicit validator functions per operation, returning typed error
//! lists. Handlers join the messages into a single human-readable string
//! for the wire.

use thiserror::Error;
use validator::ValidateEmail;

use crate::auth::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::db::ProfileUpdate;

/// Minimum client-id length.
pub const MIN_CLIENT_ID_LENGTH: usize = 3;

/// Maximum client-id length.
pub const MAX_CLIENT_ID_LENGTH: usize = 64;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Email is missing or malformed.
    #[error("invalid email address")]
    EmailInvalid,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// Client id is too short.
    #[error("client id must be at least {MIN_CLIENT_ID_LENGTH} characters")]
    ClientIdTooShort,

    /// Client id is too long.
    #[error("client id must be at most {MAX_CLIENT_ID_LENGTH} characters")]
    ClientIdTooLong,

    /// Client id contains characters unsuitable for a URL path segment.
    #[error("client id can only contain alphanumeric characters, hyphens and underscores")]
    ClientIdInvalidChars,

    /// Destination list is empty.
    #[error("at least one target email is required")]
    TargetEmailsEmpty,

    /// A destination address is malformed.
    #[error("invalid target email: {0}")]
    TargetEmailInvalid(String),

    /// An allow-list entry is not a valid origin URL.
    #[error("invalid origin: {0}")]
    OriginInvalid(String),
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if !email.validate_email() {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// Validate a password against the length policy.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

/// Validate a public routing key.
pub fn validate_client_id(client_id: &str) -> Result<(), ValidationError> {
    if client_id.len() < MIN_CLIENT_ID_LENGTH {
        return Err(ValidationError::ClientIdTooShort);
    }
    if client_id.len() > MAX_CLIENT_ID_LENGTH {
        return Err(ValidationError::ClientIdTooLong);
    }
    if !client_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::ClientIdInvalidChars);
    }
    Ok(())
}

/// Validate a registration request.
pub fn validate_registration(email: &str, password: &str) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_email(email) {
        errors.push(e);
    }
    if let Err(e) = validate_password(password) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an owner profile update.
///
/// The non-empty destination check is what prevents removing the sole
/// remaining target of an active relay.
pub fn validate_profile_update(update: &ProfileUpdate) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_client_id(&update.client_id) {
        errors.push(e);
    }

    if update.target_emails.is_empty() {
        errors.push(ValidationError::TargetEmailsEmpty);
    }
    for target in &update.target_emails {
        if validate_email(target).is_err() {
            errors.push(ValidationError::TargetEmailInvalid(target.clone()));
        }
    }

    if let Some(origins) = &update.allowed_origins {
        for origin in origins {
            if url::Url::parse(origin).is_err() {
                errors.push(ValidationError::OriginInvalid(origin.clone()));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Join validation errors into one wire message.
pub fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(client_id: &str, targets: &[&str], origins: Option<&[&str]>) -> ProfileUpdate {
        ProfileUpdate {
            client_id: client_id.to_string(),
            target_emails: targets.iter().map(|s| s.to_string()).collect(),
            allowed_origins: origins.map(|o| o.iter().map(|s| s.to_string()).collect()),
            is_accepting_emails: None,
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("u@x.com").is_ok());
        assert_eq!(validate_email("not-an-email"), Err(ValidationError::EmailInvalid));
        assert_eq!(validate_email(""), Err(ValidationError::EmailInvalid));

        let long = format!("{}@x.com", "a".repeat(MAX_EMAIL_LENGTH));
        assert_eq!(validate_email(&long), Err(ValidationError::EmailTooLong));
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password("secret1").is_ok());
        assert_eq!(
            validate_password("12345"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_password(&"a".repeat(129)),
            Err(ValidationError::PasswordTooLong)
        );
    }

    #[test]
    fn test_validate_client_id() {
        assert!(validate_client_id("my-form_1").is_ok());
        assert_eq!(
            validate_client_id("ab"),
            Err(ValidationError::ClientIdTooShort)
        );
        assert_eq!(
            validate_client_id("has space"),
            Err(ValidationError::ClientIdInvalidChars)
        );
        assert_eq!(
            validate_client_id(&"a".repeat(65)),
            Err(ValidationError::ClientIdTooLong)
        );
    }

    #[test]
    fn test_validate_registration_collects_all() {
        let errors = validate_registration("bad", "12345").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::EmailInvalid));
        assert!(errors.contains(&ValidationError::PasswordTooShort));

        assert!(validate_registration("u@x.com", "secret1").is_ok());
    }

    #[test]
    fn test_validate_profile_update() {
        assert!(validate_profile_update(&profile(
            "my-form",
            &["dest@x.com"],
            Some(&["https://a.com"])
        ))
        .is_ok());

        let errors =
            validate_profile_update(&profile("my-form", &[], None)).unwrap_err();
        assert!(errors.contains(&ValidationError::TargetEmailsEmpty));

        let errors =
            validate_profile_update(&profile("my-form", &["nope"], None)).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::TargetEmailInvalid(_)
        ));

        let errors = validate_profile_update(&profile(
            "my-form",
            &["dest@x.com"],
            Some(&["not a url"]),
        ))
        .unwrap_err();
        assert!(matches!(errors[0], ValidationError::OriginInvalid(_)));
    }

    #[test]
    fn test_join_errors() {
        let joined = join_errors(&[
            ValidationError::EmailInvalid,
            ValidationError::PasswordTooShort,
        ]);
        assert_eq!(
            joined,
            "invalid email address, password must be at least 6 characters"
        );
    }
}
