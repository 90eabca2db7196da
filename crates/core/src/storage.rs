//! Key/value persistence capability for the storefront stores.
//!
//! Stores write their whole collection as one JSON array under a fixed key
//! ([`CART_KEY`], [`WISHLIST_KEY`]) on every mutation and read it back once at
//! construction. There are no partial updates and no versioning.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage key holding the serialized cart lines.
pub const CART_KEY: &str = "cart";

/// Storage key holding the serialized wishlist entries.
pub const WISHLIST_KEY: &str = "wishlist";

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string-valued key/value store.
///
/// Implementations decide where values live (memory, files, ...). Each key
/// holds one complete serialized value; `set` overwrites it wholesale.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Non-persistent storage backed by a `HashMap`.
///
/// Used for tests and for visitors whose data should not outlive the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read a JSON array stored under `key`.
///
/// Missing keys, unreadable storage and corrupt values all yield an empty
/// collection; failures are logged.
pub(crate) fn load_collection<T, S>(storage: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KeyValueStorage + ?Sized,
{
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::error!(key, error = %e, "Failed to read collection from storage");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::error!(key, error = %e, "Discarding unreadable stored collection");
        Vec::new()
    })
}

/// Overwrite `key` with the JSON serialization of `items`.
///
/// Failures are logged and swallowed: the caller's in-memory collection
/// remains authoritative for the session.
pub(crate) fn persist_collection<T, S>(storage: &mut S, key: &str, items: &[T])
where
    T: Serialize,
    S: KeyValueStorage + ?Sized,
{
    let result = serde_json::to_string(items)
        .map_err(StorageError::from)
        .and_then(|json| storage.set(key, &json));

    if let Err(e) = result {
        tracing::error!(key, error = %e, "Failed to persist collection to storage");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Storage whose every operation fails.
    #[derive(Debug, Default)]
    pub struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_memory_storage_set_get() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("cart").unwrap().is_none());

        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));
        assert!(storage.get("wishlist").unwrap().is_none());
    }

    #[test]
    fn test_load_collection_tolerates_corrupt_value() {
        let mut storage = MemoryStorage::new();
        storage.set("cart", "{not json").unwrap();
        let items: Vec<u32> = load_collection(&storage, "cart");
        assert!(items.is_empty());
    }

    #[test]
    fn test_load_collection_tolerates_failing_backend() {
        let items: Vec<u32> = load_collection(&FailingStorage, "cart");
        assert!(items.is_empty());
    }

    #[test]
    fn test_persist_collection_overwrites() {
        let mut storage = MemoryStorage::new();
        persist_collection(&mut storage, "cart", &[1_u32, 2]);
        persist_collection(&mut storage, "cart", &[3_u32]);
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[3]"));
    }
}
