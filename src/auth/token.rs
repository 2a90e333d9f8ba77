//! One-time token generation for email verification and password reset.
//!
//! Tokens are random bytes from the OS CSPRNG, hex-encoded. They are not
//! checked for uniqueness against the store; at 160 bits the collision
//! probability is negligible.

use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};

/// Number of random bytes per token (hex-encodes to twice as many chars).
pub const TOKEN_BYTES: usize = 20;

/// Verification token lifetime.
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Password-reset token lifetime.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Generate a fresh single-use token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Expiry timestamp for a verification token, as stored in the database.
pub fn verification_expiry() -> String {
    expiry_after(Duration::hours(VERIFICATION_TOKEN_TTL_HOURS))
}

/// Expiry timestamp for a reset token, as stored in the database.
pub fn reset_expiry() -> String {
    expiry_after(Duration::minutes(RESET_TOKEN_TTL_MINUTES))
}

/// Format `now + ttl` the way SQLite's datetime('now') renders, so the
/// store can compare expiry lexicographically.
fn expiry_after(ttl: Duration) -> String {
    (Utc::now() + ttl).format("%Y-%m-%d %H:%M:%S").to_string()
}
