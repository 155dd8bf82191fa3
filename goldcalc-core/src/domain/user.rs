//! User domain model

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Account classification given to every self-registered user
pub const DEMO_ACCOUNT_TYPE: &str = "demo";

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique user ID based on timestamp + counter
///
/// Lower 16 bits hold the counter, the rest is the unix timestamp in
/// milliseconds.
pub fn generate_user_id(now: DateTime<Utc>) -> u64 {
    let timestamp = now.timestamp_millis().max(0) as u64;
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Check the registration fields before any directory lookup
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("name must not be empty"));
    }
    if !email_pattern().is_match(email) {
        return Err(Error::validation(format!("'{}' is not a valid email", email)));
    }
    if password.is_empty() {
        return Err(Error::validation("password must not be empty"));
    }
    Ok(())
}

/// A registered user as stored in the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub account_type: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: generate_user_id(now),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            account_type: DEMO_ACCOUNT_TYPE.to_string(),
            created_at: now,
        }
    }

    /// Strip the credential for use as the session record
    pub fn to_session(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            account_type: self.account_type.clone(),
            created_at: self.created_at,
        }
    }
}

/// The currently authenticated user, without any credential material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub account_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        user.to_session()
    }
}
