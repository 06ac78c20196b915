//! Session token signing
//!
//! The annotator identity is a free-text username carried in a cookie. The
//! cookie value is `base64url(username) "." sha256hex(username || secret)`,
//! so a client cannot forge another annotator's name without the secret.
//!
//! # Shared Secret
//!
//! - Stored in the `settings` table under key `session_secret`
//! - Crypto-random non-zero i64, generated on first start
//! - Survives restarts, so existing cookies stay valid
//!
//! This module contains ONLY pure functions and database operations.
//! No HTTP framework dependencies - cookie handling lives in the web crate.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use tracing::info;

use crate::{Error, Result};

const SECRET_KEY: &str = "session_secret";

/// Load the session secret, generating and storing one if absent
pub async fn load_session_secret(db: &SqlitePool) -> Result<i64> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(SECRET_KEY)
            .fetch_optional(db)
            .await?;

    match result {
        Some((value,)) => value
            .parse::<i64>()
            .map_err(|e| Error::Config(format!("Invalid session secret: {}", e))),
        None => initialize_session_secret(db).await,
    }
}

/// Generate a crypto-random non-zero secret and store it
async fn initialize_session_secret(db: &SqlitePool) -> Result<i64> {
    use rand::Rng;

    let secret: i64 = {
        let mut rng = rand::thread_rng();
        loop {
            let val = rng.gen::<i64>();
            if val != 0 {
                break val;
            }
        }
    };

    // INSERT OR IGNORE: a concurrently started process may have won the race
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(SECRET_KEY)
        .bind(secret.to_string())
        .execute(db)
        .await?;

    info!("Generated new session secret");

    let (stored,): (String,) = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(SECRET_KEY)
        .fetch_one(db)
        .await?;
    stored
        .parse::<i64>()
        .map_err(|e| Error::Config(format!("Invalid session secret: {}", e)))
}

/// Signature of `username` under `secret`, as 64 hex characters
pub fn signature(username: &str, secret: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(secret.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Build a session token for `username`
///
/// # Examples
///
/// ```
/// use tsa_common::session::{sign, verify};
///
/// let token = sign("alice", 42);
/// assert_eq!(verify(&token, 42).as_deref(), Some("alice"));
/// assert_eq!(verify(&token, 43), None);
/// ```
pub fn sign(username: &str, secret: i64) -> String {
    format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(username.as_bytes()),
        signature(username, secret)
    )
}

/// Recover the username from a token, or `None` if malformed or tampered
pub fn verify(token: &str, secret: i64) -> Option<String> {
    let (encoded, provided) = token.split_once('.')?;
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    let username = String::from_utf8(bytes).ok()?;

    if username.is_empty() || provided != signature(&username, secret) {
        return None;
    }

    Some(username)
}

/// Reject usernames that cannot identify an annotator
pub fn validate_username(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("username must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
