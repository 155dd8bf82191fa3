//! User directory service - local registration, login and session
//!
//! The directory and the current session are loaded from the key-value store
//! once at construction and rewritten on every mutation.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::domain::credential::{hash_password, verify_password};
use crate::domain::result::{Error, Result};
use crate::domain::{validate_registration, Argon2Params, SessionUser, User};
use crate::ports::KeyValueStore;

/// Store key holding the JSON array of registered users
pub const USERS_KEY: &str = "users";

/// Store key holding the JSON session user
pub const SESSION_KEY: &str = "session";

/// Read and decode a stored value; absent or undecodable values read as `None`
fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unparseable stored value");
            None
        }
    }
}

/// User directory with a single active session
pub struct UserDirectoryService {
    store: Arc<dyn KeyValueStore>,
    users: Vec<User>,
    session: Option<SessionUser>,
    hashing: Argon2Params,
}

impl UserDirectoryService {
    pub fn new(store: Arc<dyn KeyValueStore>, hashing: Argon2Params) -> Self {
        let users = load_json(store.as_ref(), USERS_KEY).unwrap_or_default();
        let session = load_json(store.as_ref(), SESSION_KEY);

        Self {
            store,
            users,
            session,
            hashing,
        }
    }

    /// Register a new user and sign them in
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<SessionUser> {
        validate_registration(name, email, password)?;

        if self.users.iter().any(|u| u.email == email) {
            return Err(Error::DuplicateEmail);
        }

        let password_hash = hash_password(password, &self.hashing)?;
        let user = User::new(name.trim(), email, password_hash);
        let session = user.to_session();

        self.users.push(user);
        if let Err(e) = self.save_users() {
            self.users.pop();
            return Err(e);
        }

        self.start_session(session)
    }

    /// Sign in with an exact email and a password matching its stored hash
    pub fn login(&mut self, email: &str, password: &str) -> Result<SessionUser> {
        let session = self
            .users
            .iter()
            .find(|u| u.email == email && verify_password(password, &u.password_hash))
            .map(User::to_session)
            .ok_or(Error::InvalidCredentials)?;

        self.start_session(session)
    }

    /// End the current session
    pub fn logout(&mut self) -> Result<()> {
        self.session = None;
        self.store.remove(SESSION_KEY)
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// The in-memory session changes only once the store has accepted it
    fn start_session(&mut self, session: SessionUser) -> Result<SessionUser> {
        let json = serde_json::to_string(&session)?;
        self.store.set(SESSION_KEY, &json)?;
        self.session = Some(session.clone());
        Ok(session)
    }

    fn save_users(&self) -> Result<()> {
        let json = serde_json::to_string(&self.users)?;
        self.store.set(USERS_KEY, &json)
    }
}
