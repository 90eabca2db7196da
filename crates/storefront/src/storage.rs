//! File-backed key/value storage for visitor carts and wishlists.
//!
//! Each visitor gets a directory under the data root; each key is one JSON
//! file inside it:
//!
//! ```text
//! {data_dir}/{visitor_id}/cart.json
//! {data_dir}/{visitor_id}/wishlist.json
//! ```
//!
//! Writes go to a temporary file that is then renamed over the target, so a
//! crash mid-write leaves the previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use stride_core::{KeyValueStorage, StorageError};

/// Storage rooted at one namespace directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage for `namespace` under `root`. Nothing is created until the
    /// first write.
    #[must_use]
    pub fn new(root: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            dir: root.as_ref().join(namespace),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Unavailable(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("stride-storage-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_write_then_read() {
        let root = temp_root();
        let mut storage = FileStorage::new(&root, "visitor-1");

        assert!(storage.get("cart").unwrap().is_none());
        storage.set("cart", "[1,2]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[1,2]"));
        assert!(storage.dir().join("cart.json").exists());
        assert!(!storage.dir().join("cart.json.tmp").exists());

        storage.set("cart", "[]").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("[]"));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let root = temp_root();
        let mut alice = FileStorage::new(&root, "alice");
        let bob = FileStorage::new(&root, "bob");

        alice.set("wishlist", "[]").unwrap();
        assert!(bob.get("wishlist").unwrap().is_none());

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let mut storage = FileStorage::new(temp_root(), "visitor");
        assert!(storage.set("../escape", "x").is_err());
        assert!(storage.get("").is_err());
    }
}
