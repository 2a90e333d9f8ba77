//! Database schema and migrations for formbridge.
//!
//! Migrations are applied sequentially when the database is opened.

/// Database migrations.
///
/// Each migration is a SQL script executed in order; the schema_version
/// table tracks which have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - accounts table
    r#"
-- Tenant accounts. The two list columns hold JSON arrays of strings.
CREATE TABLE accounts (
    id                         INTEGER PRIMARY KEY AUTOINCREMENT,
    email                      TEXT NOT NULL UNIQUE,
    password                   TEXT NOT NULL,           -- Argon2 hash
    client_id                  TEXT UNIQUE,             -- sparse: NULLs don't collide
    target_emails              TEXT NOT NULL DEFAULT '[]',
    allowed_origins            TEXT NOT NULL DEFAULT '[]',
    is_verified                INTEGER NOT NULL DEFAULT 0,
    is_accepting_emails        INTEGER NOT NULL DEFAULT 1,
    verification_token         TEXT,
    verification_token_expire  TEXT,
    reset_password_token       TEXT,
    reset_password_expire      TEXT,
    created_at                 TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at                 TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_accounts_verification_token ON accounts(verification_token);
CREATE INDEX idx_accounts_reset_password_token ON accounts(reset_password_token);
"#,
];
