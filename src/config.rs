//! Configuration module for formbridge.

use serde::Deserialize;
use std::path::Path;

use crate::{BridgeError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins for the account-management API.
    ///
    /// Empty means permissive dev mode. This is independent of the
    /// per-account origin allow-lists enforced on the relay path.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/formbridge.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Outbound mail (SMTP) configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// SMTP server hostname.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP server port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: String,
    /// SMTP password (prefer the FORMBRIDGE_SMTP_PASSWORD env variable).
    #[serde(default)]
    pub password: String,
    /// Address used as the envelope sender of every outbound message.
    #[serde(default)]
    pub from_address: String,
    /// Base URL of the dashboard, used in verification and reset links.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            frontend_url: default_frontend_url(),
        }
    }
}

/// Relay endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Maximum submissions per source IP within one window.
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max_requests: u32,
    /// Rate limit window length in seconds.
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
}

fn default_rate_limit_max() -> u32 {
    10
}

fn default_rate_limit_window() -> u64 {
    3600
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            rate_limit_max_requests: default_rate_limit_max(),
            rate_limit_window_secs: default_rate_limit_window(),
        }
    }
}

/// Session and credential configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret (prefer the FORMBRIDGE_JWT_SECRET env variable).
    #[serde(default)]
    pub jwt_secret: String,
    /// Session token validity in days.
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,
    /// Mark the session cookie Secure / SameSite=None (production mode).
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_session_ttl_days() -> i64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            session_ttl_days: default_session_ttl_days(),
            secure_cookies: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional path to a log file; console-only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Outbound mail configuration.
    #[serde(default)]
    pub mail: MailConfig,
    /// Relay endpoint configuration.
    #[serde(default)]
    pub relay: RelayConfig,
    /// Session and credential configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BridgeError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BridgeError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FORMBRIDGE_JWT_SECRET`: session signing secret
    /// - `FORMBRIDGE_SMTP_PASSWORD`: SMTP password
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var("FORMBRIDGE_JWT_SECRET") {
            if !secret.is_empty() {
                self.auth.jwt_secret = secret;
            }
        }
        if let Ok(password) = std::env::var("FORMBRIDGE_SMTP_PASSWORD") {
            if !password.is_empty() {
                self.mail.password = password;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// The credential and relay paths are not operable without a signing
    /// secret and a mail sender, so startup refuses both.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(BridgeError::Config(
                "jwt_secret is not set. Set it in config.toml or via \
                 FORMBRIDGE_JWT_SECRET."
                    .to_string(),
            ));
        }
        if self.mail.username.is_empty() || self.mail.from_address.is_empty() {
            return Err(BridgeError::Config(
                "mail.username and mail.from_address must be set before the \
                 relay can deliver submissions."
                    .to_string(),
            ));
        }
        Ok(())
    }
}
