//! Credential and account lifecycle operations.
//!
//! Registration, login, email verification, password reset, and owner
//! profile updates. Every operation validates its input before touching
//! the store, and argon2 work is pushed off the I/O path onto the
//! blocking pool.

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password, PasswordError};
use crate::auth::session::{SessionError, SessionManager};
use crate::auth::token::{generate_token, reset_expiry, verification_expiry};
use crate::auth::validation::{
    join_errors, validate_password, validate_profile_update, validate_registration,
};
use crate::db::{Account, AccountRepository, Database, NewAccount, ProfileUpdate};
use crate::mail::{system, Mailer};
use crate::BridgeError;

/// Credential operation errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Input validation failed; the message joins every field error.
    #[error("{0}")]
    Validation(String),

    /// The email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// The client id belongs to another account.
    #[error("client id already taken")]
    ClientIdTaken,

    /// Unknown email or wrong password. Deliberately indistinct.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Token redemption failed. Deliberately indistinct.
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    /// The account is already verified.
    #[error("email already verified")]
    AlreadyVerified,

    /// No account matches the request.
    #[error("account not found")]
    AccountNotFound,

    /// The supplied current password does not match.
    #[error("invalid current password")]
    WrongPassword,

    /// A required notification could not be delivered.
    #[error("email could not be sent")]
    MailDelivery(String),

    /// Session token issuance failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Storage failure.
    #[error("database error: {0}")]
    Database(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BridgeError> for AuthError {
    fn from(e: BridgeError) -> Self {
        AuthError::Database(e.to_string())
    }
}

/// Service for credential and account lifecycle operations.
pub struct CredentialService<'a> {
    db: &'a Database,
    sessions: &'a SessionManager,
    mailer: &'a Mailer,
    frontend_url: &'a str,
}

impl<'a> CredentialService<'a> {
    /// Create a new credential service.
    pub fn new(
        db: &'a Database,
        sessions: &'a SessionManager,
        mailer: &'a Mailer,
        frontend_url: &'a str,
    ) -> Self {
        Self {
            db,
            sessions,
            mailer,
            frontend_url,
        }
    }

    fn repo(&self) -> AccountRepository<'_> {
        AccountRepository::new(self.db.pool())
    }

    /// Register a new account.
    ///
    /// Stores the account unverified with a fresh 24-hour verification
    /// token, attempts the verification mail best-effort, and issues a
    /// session token. A failed mail send never rolls back the account.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Account, String), AuthError> {
        validate_registration(email, password)
            .map_err(|errors| AuthError::Validation(join_errors(&errors)))?;

        let repo = self.repo();
        if repo.get_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_blocking(password.to_string()).await?;
        let token = generate_token();

        let account = repo
            .create(&NewAccount {
                email: email.to_string(),
                password: password_hash,
                verification_token: token.clone(),
                verification_token_expire: verification_expiry(),
            })
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE") {
                    AuthError::EmailTaken
                } else {
                    AuthError::from(e)
                }
            })?;

        let mail = system::verification_mail(self.frontend_url, &account.email, &token);
        if let Err(e) = self.mailer.send(mail).await {
            warn!(account_id = account.id, error = %e,
                "verification mail failed during registration");
        }

        let session = self.sessions.issue(account.id, &account.email)?;
        info!(account_id = account.id, "account registered");

        Ok((account, session))
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Account, String), AuthError> {
        let account = self
            .repo()
            .get_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_blocking(password.to_string(), account.password.clone())
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        let session = self.sessions.issue(account.id, &account.email)?;
        Ok((account, session))
    }

    /// Redeem an email verification token.
    pub async fn verify_email(&self, token: &str) -> Result<Account, AuthError> {
        let account = self
            .repo()
            .consume_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        info!(account_id = account.id, "email verified");
        Ok(account)
    }

    /// Reissue a verification token for an unverified account.
    pub async fn resend_verification(&self, account_id: i64) -> Result<(), AuthError> {
        let repo = self.repo();
        let account = repo
            .get_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if account.is_verified {
            return Err(AuthError::AlreadyVerified);
        }

        let token = generate_token();
        repo.set_verification_token(account.id, &token, &verification_expiry())
            .await?;

        let mail = system::verification_mail(self.frontend_url, &account.email, &token);
        self.mailer
            .send(mail)
            .await
            .map_err(|e| AuthError::MailDelivery(e.to_string()))?;

        Ok(())
    }

    /// Change the password after verifying the current one.
    pub async fn change_password(
        &self,
        account_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let repo = self.repo();
        let account = repo
            .get_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        verify_blocking(current_password.to_string(), account.password.clone())
            .await
            .map_err(|_| AuthError::WrongPassword)?;

        validate_password(new_password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let password_hash = hash_blocking(new_password.to_string()).await?;
        repo.set_password(account.id, &password_hash).await?;

        info!(account_id = account.id, "password changed");
        Ok(())
    }

    /// Issue a password-reset token and send the reset mail.
    ///
    /// If delivery fails the token pair is cleared before the error is
    /// surfaced, so no unreachable token stays redeemable.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let repo = self.repo();
        let account = repo
            .get_by_email(email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let token = generate_token();
        repo.set_reset_token(account.id, &token, &reset_expiry())
            .await?;

        let mail = system::password_reset_mail(self.frontend_url, &account.email, &token);
        if let Err(e) = self.mailer.send(mail).await {
            repo.clear_reset_token(account.id).await?;
            warn!(account_id = account.id, error = %e, "reset mail delivery failed");
            return Err(AuthError::MailDelivery(e.to_string()));
        }

        info!(account_id = account.id, "password reset requested");
        Ok(())
    }

    /// Redeem a reset token and store the new password.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let password_hash = hash_blocking(new_password.to_string()).await?;
        let account = self
            .repo()
            .consume_reset_token(token, &password_hash)
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        info!(account_id = account.id, "password reset");
        Ok(())
    }

    /// Load the current profile.
    pub async fn profile(&self, account_id: i64) -> Result<Account, AuthError> {
        self.repo()
            .get_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }

    /// Apply an owner profile update.
    pub async fn update_profile(
        &self,
        account_id: i64,
        update: &ProfileUpdate,
    ) -> Result<Account, AuthError> {
        validate_profile_update(update)
            .map_err(|errors| AuthError::Validation(join_errors(&errors)))?;

        let repo = self.repo();
        if let Some(existing) = repo.get_by_client_id(&update.client_id).await? {
            if existing.id != account_id {
                return Err(AuthError::ClientIdTaken);
            }
        }

        repo.update_profile(account_id, update).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                AuthError::ClientIdTaken
            } else {
                AuthError::from(e)
            }
        })
    }

    /// Delete the account.
    pub async fn delete_account(&self, account_id: i64) -> Result<(), AuthError> {
        if !self.repo().delete(account_id).await? {
            return Err(AuthError::AccountNotFound);
        }
        info!(account_id, "account deleted");
        Ok(())
    }
}

/// Run argon2 hashing on the blocking pool.
async fn hash_blocking(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(|e| match e {
            PasswordError::TooShort | PasswordError::TooLong => {
                AuthError::Validation(e.to_string())
            }
            other => AuthError::Internal(other.to_string()),
        })
}

/// Run argon2 verification on the blocking pool.
async fn verify_blocking(password: String, hash: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(|e| AuthError::Internal(e.to_string()))
}
