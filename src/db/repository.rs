//! Account repository for formbridge.
//!
//! CRUD operations for tenant accounts, including the atomic token
//! redemption queries that make verification and reset tokens single-use.

use sqlx::{QueryBuilder, SqlitePool};

use super::account::{Account, NewAccount, ProfileUpdate};
use crate::{BridgeError, Result};

/// Column list shared by every query that returns a full account row.
const ACCOUNT_COLUMNS: &str = "id, email, password, client_id, target_emails, allowed_origins, \
     is_verified, is_accepting_emails, verification_token, verification_token_expire, \
     reset_password_token, reset_password_expire, created_at, updated_at";

/// Repository for account CRUD operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new AccountRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// Returns the created account with the assigned ID. The password in
    /// `new_account` must already be hashed.
    pub async fn create(&self, new_account: &NewAccount) -> Result<Account> {
        let result = sqlx::query(
            "INSERT INTO accounts (email, password, verification_token, verification_token_expire)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&new_account.email)
        .bind(&new_account.password)
        .bind(&new_account.verification_token)
        .bind(&new_account.verification_token_expire)
        .execute(self.pool)
        .await
        .map_err(|e| BridgeError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| BridgeError::NotFound("account".to_string()))
    }

    /// Get an account by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BridgeError::Database(e.to_string()))?;

        Ok(account)
    }

    /// Get an account by login email (case-sensitive).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BridgeError::Database(e.to_string()))?;

        Ok(account)
    }

    /// Get an account by its public routing key.
    pub async fn get_by_client_id(&self, client_id: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE client_id = ?"
        ))
        .bind(client_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BridgeError::Database(e.to_string()))?;

        Ok(account)
    }

    /// Apply an owner profile update and return the updated account.
    pub async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<Account> {
        let target_emails = serde_json::to_string(&update.target_emails)
            .map_err(|e| BridgeError::Validation(e.to_string()))?;

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE accounts SET ");
        query.push("client_id = ").push_bind(&update.client_id);
        query.push(", target_emails = ").push_bind(target_emails);

        if let Some(origins) = &update.allowed_origins {
            let origins = serde_json::to_string(origins)
                .map_err(|e| BridgeError::Validation(e.to_string()))?;
            query.push(", allowed_origins = ").push_bind(origins);
        }
        if let Some(accepting) = update.is_accepting_emails {
            query.push(", is_accepting_emails = ").push_bind(accepting);
        }

        query.push(", updated_at = datetime('now') WHERE id = ").push_bind(id);

        query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| BridgeError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| BridgeError::NotFound("account".to_string()))
    }

    /// Store a new password hash.
    pub async fn set_password(&self, id: i64, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE accounts SET password = ?, updated_at = datetime('now') WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BridgeError::Database(e.to_string()))?;
        Ok(())
    }

    /// Store a fresh verification token pair.
    pub async fn set_verification_token(&self, id: i64, token: &str, expire: &str) -> Result<()> {
        sqlx::query(
            "UPDATE accounts
             SET verification_token = ?, verification_token_expire = ?,
                 updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(token)
        .bind(expire)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| BridgeError::Database(e.to_string()))?;
        Ok(())
    }

    /// Redeem a verification token atomically.
    ///
    /// Marks the account verified and clears the token pair in a single
    /// UPDATE guarded by the expiry comparison, so the token is usable at
    /// most once even with concurrent redemption attempts. Returns the
    /// account if the token was valid.
    pub async fn consume_verification_token(&self, token: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "UPDATE accounts
             SET is_verified = 1, verification_token = NULL,
                 verification_token_expire = NULL, updated_at = datetime('now')
             WHERE verification_token = ?
               AND verification_token_expire > datetime('now')
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(token)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BridgeError::Database(e.to_string()))?;

        Ok(account)
    }

    /// Store a fresh password-reset token pair.
    pub async fn set_reset_token(&self, id: i64, token: &str, expire: &str) -> Result<()> {
        sqlx::query(
            "UPDATE accounts
             SET reset_password_token = ?, reset_password_expire = ?,
                 updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(token)
        .bind(expire)
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| BridgeError::Database(e.to_string()))?;
        Ok(())
    }

    /// Clear a pending reset token pair.
    ///
    /// Invoked when the reset notification could not be delivered, so no
    /// stale token survives a failed send.
    pub async fn clear_reset_token(&self, id: i64) -> Result<()> {
        sqlx::query(
            "UPDATE accounts
             SET reset_password_token = NULL, reset_password_expire = NULL,
                 updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| BridgeError::Database(e.to_string()))?;
        Ok(())
    }

    /// Redeem a reset token atomically, storing the new password hash.
    ///
    /// Same single-UPDATE guard as verification redemption. Returns the
    /// account if the token was valid and not expired.
    pub async fn consume_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "UPDATE accounts
             SET password = ?, reset_password_token = NULL,
                 reset_password_expire = NULL, updated_at = datetime('now')
             WHERE reset_password_token = ?
               AND reset_password_expire > datetime('now')
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(password_hash)
        .bind(token)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| BridgeError::Database(e.to_string()))?;

        Ok(account)
    }

    /// Delete an account. Returns true if a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| BridgeError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
