//! Key-value storage capability and the stores shipped with the wallet.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// Storage key for the encrypted mnemonic blob.
pub const KEY_ENCRYPTED_MNEMONIC: &str = "encryptedMnemonic";
/// Storage key for the JSON-encoded chain registry.
pub const KEY_SUPPORTED_CHAINS: &str = "supportedChains";
/// Storage key for the current chain id (decimal string).
pub const KEY_CURRENT_CHAIN_ID: &str = "currentChainId";
/// Storage key for the BIP-44 derivation path.
pub const KEY_BIP44_PATH: &str = "bip44Path";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage read failed: {0}")]
    Read(String),

    #[error("storage write failed: {0}")]
    Write(String),
}

/// Durable string-keyed storage.
///
/// Writes to distinct keys are independent; the wallet performs one write per
/// key during `initialize`/`wipe` and does not roll back on partial failure.
/// An empty string value counts as an absent key throughout the wallet
/// (wiping writes empty strings rather than requiring a delete operation).
pub trait KeyValueStore: Send + Sync {
    fn get_value(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_value(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Reads a key, mapping the empty-string "wiped" sentinel to `None`.
pub fn read_present(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<String>, StorageError> {
    Ok(store.get_value(key)?.filter(|v| !v.is_empty()))
}

/// Volatile in-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Read("store mutex poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Write("store mutex poisoned".into()))?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Durable store backed by a single JSON file.
///
/// Every write re-reads, updates and rewrites the whole file synchronously,
/// so the file always reflects the last completed `set_value`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Opens a store at `path`. The file is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::Read(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(StorageError::Read(format!("{}: {e}", self.path.display()))),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.load()?;
        values.insert(key.to_owned(), value.to_owned());
        let encoded = serde_json::to_string_pretty(&values)
            .map_err(|e| StorageError::Write(e.to_string()))?;
        std::fs::write(&self.path, encoded)
            .map_err(|e| StorageError::Write(format!("{}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_value("missing").unwrap(), None);

        store.set_value("key", "value").unwrap();
        assert_eq!(store.get_value("key").unwrap().as_deref(), Some("value"));

        store.set_value("key", "other").unwrap();
        assert_eq!(store.get_value("key").unwrap().as_deref(), Some("other"));
    }

    #[test]
    fn read_present_treats_empty_as_absent() {
        let store = MemoryStore::new();
        store.set_value("key", "").unwrap();

        assert_eq!(store.get_value("key").unwrap().as_deref(), Some(""));
        assert_eq!(read_present(&store, "key").unwrap(), None);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        let store = FileStore::open(&path);
        assert_eq!(store.get_value("key").unwrap(), None);

        store.set_value("key", "value").unwrap();
        store.set_value("other", "data").unwrap();

        // A second handle over the same file observes the writes.
        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_value("key").unwrap().as_deref(), Some("value"));
        assert_eq!(reopened.get_value("other").unwrap().as_deref(), Some("data"));
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path);
        assert!(matches!(
            store.get_value("key"),
            Err(StorageError::Read(_))
        ));
    }

    #[test]
    fn file_store_tolerates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        std::fs::write(&path, "").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get_value("key").unwrap(), None);
    }
}
