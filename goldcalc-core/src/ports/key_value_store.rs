//! Local key-value storage port
//!
//! Persisted state is a handful of string values under well-known keys.
//! Values are serialized JSON; the store itself does not interpret them.

use crate::domain::result::Result;

/// Best-effort local key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key has never been written or was removed
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}
