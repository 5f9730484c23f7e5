//! Persisted registry of configured chains plus the current-chain pointer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::storage::{self, KeyValueStore, KEY_CURRENT_CHAIN_ID, KEY_SUPPORTED_CHAINS};

/// Metadata for one configured blockchain endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Chain identifier, unique within the registry.
    pub id: u64,
    pub rpc_url: String,
    /// Native currency ticker, e.g. "ETH".
    pub symbol: String,
    /// Human-readable network name.
    pub label: String,
}

/// The single source of truth for chain metadata.
///
/// Every read decodes the backing store afresh and every mutation writes
/// through synchronously, so registry state always matches storage across
/// process restarts. Nothing is cached.
pub struct ChainRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl ChainRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The full ordered chain list.
    pub fn list(&self) -> Result<Vec<ChainInfo>, WalletError> {
        match storage::read_present(self.store.as_ref(), KEY_SUPPORTED_CHAINS)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| WalletError::CorruptState(format!("chain registry: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Inserts `chain`, or replaces the entry with the same id in place,
    /// preserving its position. Ids stay unique.
    pub fn upsert(&self, chain: ChainInfo) -> Result<(), WalletError> {
        let mut chains = self.list()?;
        match chains.iter_mut().find(|c| c.id == chain.id) {
            Some(slot) => *slot = chain,
            None => chains.push(chain),
        }
        self.persist(&chains)
    }

    /// Selects the current chain. The id must already be registered;
    /// otherwise the selection is left unchanged.
    pub fn set_current(&self, id: u64) -> Result<(), WalletError> {
        if !self.list()?.iter().any(|c| c.id == id) {
            return Err(WalletError::UnsupportedChain(id));
        }
        self.store.set_value(KEY_CURRENT_CHAIN_ID, &id.to_string())?;
        Ok(())
    }

    /// Resolves the persisted current chain id to its metadata.
    pub fn current(&self) -> Result<ChainInfo, WalletError> {
        let raw = storage::read_present(self.store.as_ref(), KEY_CURRENT_CHAIN_ID)?
            .ok_or(WalletError::NoCurrentChain)?;
        let id: u64 = raw.parse().map_err(|_| {
            WalletError::CorruptState(format!("current chain id {raw:?} is not a number"))
        })?;
        self.list()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(WalletError::MissingChain(id))
    }

    /// Overwrites the whole list. Used when seeding a fresh wallet.
    pub(crate) fn persist(&self, chains: &[ChainInfo]) -> Result<(), WalletError> {
        let encoded = serde_json::to_string(chains)
            .map_err(|e| WalletError::CorruptState(format!("chain registry encode: {e}")))?;
        self.store.set_value(KEY_SUPPORTED_CHAINS, &encoded)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn chain(id: u64, rpc_url: &str) -> ChainInfo {
        ChainInfo {
            id,
            rpc_url: rpc_url.into(),
            symbol: "ETH".into(),
            label: format!("chain-{id}"),
        }
    }

    fn registry() -> ChainRegistry {
        ChainRegistry::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn empty_registry_lists_nothing() {
        assert!(registry().list().unwrap().is_empty());
    }

    #[test]
    fn upsert_appends_new_ids() {
        let reg = registry();
        reg.upsert(chain(1, "https://one")).unwrap();
        reg.upsert(chain(5, "https://five")).unwrap();

        let chains = reg.list().unwrap();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].id, 1);
        assert_eq!(chains[1].id, 5);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let reg = registry();
        reg.upsert(chain(1, "https://one")).unwrap();
        reg.upsert(chain(5, "https://five")).unwrap();
        reg.upsert(chain(1, "https://one-updated")).unwrap();

        let chains = reg.list().unwrap();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].id, 1, "replaced entry keeps its position");
        assert_eq!(chains[0].rpc_url, "https://one-updated");
    }

    #[test]
    fn upsert_identical_is_idempotent() {
        let reg = registry();
        reg.upsert(chain(1, "https://one")).unwrap();
        let before = reg.list().unwrap();

        reg.upsert(chain(1, "https://one")).unwrap();
        assert_eq!(reg.list().unwrap(), before);
    }

    #[test]
    fn set_current_requires_registered_id() {
        let reg = registry();
        reg.upsert(chain(1, "https://one")).unwrap();
        reg.set_current(1).unwrap();

        let err = reg.set_current(999).unwrap_err();
        assert!(matches!(err, WalletError::UnsupportedChain(999)));
        // The failed switch leaves the selection unchanged.
        assert_eq!(reg.current().unwrap().id, 1);
    }

    #[test]
    fn current_without_selection_errors() {
        let reg = registry();
        reg.upsert(chain(1, "https://one")).unwrap();
        assert!(matches!(
            reg.current(),
            Err(WalletError::NoCurrentChain)
        ));
    }

    #[test]
    fn current_detects_vanished_chain() {
        let store = Arc::new(MemoryStore::new());
        let reg = ChainRegistry::new(store.clone());
        reg.upsert(chain(1, "https://one")).unwrap();
        reg.set_current(1).unwrap();

        // Simulate an inconsistent mutation of the backing store.
        store.set_value(KEY_SUPPORTED_CHAINS, "[]").unwrap();
        assert!(matches!(reg.current(), Err(WalletError::MissingChain(1))));
    }

    #[test]
    fn corrupt_registry_surfaces_typed_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_value(KEY_SUPPORTED_CHAINS, "{ not a list").unwrap();

        let reg = ChainRegistry::new(store);
        assert!(matches!(reg.list(), Err(WalletError::CorruptState(_))));
    }

    #[test]
    fn reads_are_uncached_across_handles() {
        let store = Arc::new(MemoryStore::new());
        let reg_a = ChainRegistry::new(store.clone());
        let reg_b = ChainRegistry::new(store);

        reg_a.upsert(chain(1, "https://one")).unwrap();
        assert_eq!(reg_b.list().unwrap().len(), 1);
    }
}
