//! Wallet lifecycle: the Uninitialized / Locked / Unlocked state machine.

use std::sync::Arc;

use tracing::{debug, info};
use zeroize::Zeroizing;

use wallet_crypto::cipher;

use crate::error::WalletError;
use crate::mnemonic;
use crate::registry::{ChainInfo, ChainRegistry};
use crate::secret::SecretSlot;
use crate::signer::{PhraseSigner, Signer};
use crate::storage::{
    self, KeyValueStore, KEY_BIP44_PATH, KEY_CURRENT_CHAIN_ID, KEY_ENCRYPTED_MNEMONIC,
    KEY_SUPPORTED_CHAINS,
};

/// Derivation path used when none has been configured.
pub const DEFAULT_BIP44_PATH: &str = "m/44'/60'/0'/0/0";

/// Lifecycle status of a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletStatus {
    /// No encrypted mnemonic exists in storage.
    Uninitialized,
    /// An encrypted mnemonic exists but is not loaded in memory.
    Locked,
    /// The decrypted mnemonic is held in memory.
    Unlocked,
}

/// A password-protected signing wallet over an injected key-value store.
///
/// One logical caller at a time: state transitions take `&mut self`, so a
/// single instance cannot be driven concurrently without external
/// synchronization (a `Mutex<Wallet>` in the embedding application). The
/// in-memory mnemonic is the one resource that needs that exclusion.
pub struct Wallet {
    store: Arc<dyn KeyValueStore>,
    registry: ChainRegistry,
    secret: SecretSlot,
    signer: Box<dyn Signer>,
}

impl Wallet {
    /// Opens a wallet over `store` with the default phrase signer.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_signer(store, Box::new(PhraseSigner))
    }

    /// Opens a wallet with a caller-provided signer capability.
    pub fn with_signer(store: Arc<dyn KeyValueStore>, signer: Box<dyn Signer>) -> Self {
        let registry = ChainRegistry::new(store.clone());
        Self {
            store,
            registry,
            secret: SecretSlot::new(),
            signer,
        }
    }

    /// The chain registry backed by the same store.
    pub fn chains(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Current lifecycle status.
    pub fn status(&self) -> Result<WalletStatus, WalletError> {
        if self.secret.is_loaded() {
            return Ok(WalletStatus::Unlocked);
        }
        if self.is_initialized()? {
            Ok(WalletStatus::Locked)
        } else {
            Ok(WalletStatus::Uninitialized)
        }
    }

    /// Whether an encrypted mnemonic exists in storage.
    pub fn is_initialized(&self) -> Result<bool, WalletError> {
        Ok(storage::read_present(self.store.as_ref(), KEY_ENCRYPTED_MNEMONIC)?.is_some())
    }

    /// Whether the mnemonic is currently loaded in memory.
    pub fn is_started(&self) -> bool {
        self.secret.is_loaded()
    }

    /// Creates the wallet: encrypts and persists the mnemonic (generating a
    /// fresh one when `mnemonic` is `None`), seeds the chain registry with
    /// `chains` (the first entry becomes current), persists the default
    /// derivation path, then unlocks.
    ///
    /// The per-key writes are independent; a failure partway through leaves
    /// whatever was already written (the store is not transactional).
    pub fn initialize(
        &mut self,
        chains: &[ChainInfo],
        password: &str,
        mnemonic: Option<&str>,
    ) -> Result<(), WalletError> {
        if self.is_initialized()? {
            return Err(WalletError::AlreadyInitialized);
        }

        let phrase = match mnemonic {
            Some(supplied) => {
                if !mnemonic::is_valid(supplied) {
                    return Err(WalletError::InvalidMnemonic(
                        "supplied phrase failed BIP-39 validation".into(),
                    ));
                }
                Zeroizing::new(supplied.to_owned())
            }
            None => mnemonic::generate()?,
        };

        let blob = cipher::encrypt(phrase.as_bytes(), password);
        let encoded = cipher::encode_blob(&blob)?;
        self.store.set_value(KEY_ENCRYPTED_MNEMONIC, &encoded)?;

        self.registry.persist(chains)?;
        if let Some(first) = chains.first() {
            self.registry.set_current(first.id)?;
        }
        if storage::read_present(self.store.as_ref(), KEY_BIP44_PATH)?.is_none() {
            self.store.set_value(KEY_BIP44_PATH, DEFAULT_BIP44_PATH)?;
        }

        info!(chains = chains.len(), "wallet initialized");
        self.start(password)
    }

    /// Unlocks: decrypts the stored blob and loads the mnemonic into memory.
    pub fn start(&mut self, password: &str) -> Result<(), WalletError> {
        if self.secret.is_loaded() {
            return Err(WalletError::AlreadyStarted);
        }

        let encoded = storage::read_present(self.store.as_ref(), KEY_ENCRYPTED_MNEMONIC)?
            .ok_or(WalletError::NotInitialized)?;
        let blob = cipher::decode_blob(&encoded)?;
        let plaintext = cipher::decrypt(&blob, password)?;

        // CTR mode does not authenticate: a wrong password yields garbage
        // bytes here, caught by the UTF-8 and BIP-39 checks.
        let phrase = String::from_utf8(plaintext.to_vec())
            .map_err(|_| WalletError::IncorrectPassword)?;
        if !mnemonic::is_valid(&phrase) {
            return Err(WalletError::IncorrectPassword);
        }

        self.secret.load(phrase);
        debug!("wallet unlocked");
        Ok(())
    }

    /// Locks: clears the in-memory mnemonic, leaving storage untouched.
    pub fn lock(&mut self) {
        self.secret.clear();
        debug!("wallet locked");
    }

    /// Destroys the wallet: erases the encrypted mnemonic, the chain
    /// registry, the current-chain pointer and the derivation path, and
    /// zeroes the in-memory secret. The wallet returns to `Uninitialized`
    /// and can be initialized again.
    pub fn wipe(&mut self) -> Result<(), WalletError> {
        for key in [
            KEY_ENCRYPTED_MNEMONIC,
            KEY_SUPPORTED_CHAINS,
            KEY_CURRENT_CHAIN_ID,
            KEY_BIP44_PATH,
        ] {
            self.store.set_value(key, "")?;
        }
        self.secret.clear();
        info!("wallet wiped");
        Ok(())
    }

    /// The account address at the current derivation path. Requires
    /// `Unlocked`.
    pub fn address(&self) -> Result<String, WalletError> {
        let phrase = self.secret.read().ok_or(WalletError::NotStarted)?;
        self.signer.derive_address(phrase, &self.bip44_path()?)
    }

    /// The explicit mnemonic read path. Requires `Unlocked`; no other API
    /// exposes the secret.
    pub fn reveal_mnemonic(&self) -> Result<&str, WalletError> {
        self.secret.read().ok_or(WalletError::NotStarted)
    }

    /// The persisted derivation path, or [`DEFAULT_BIP44_PATH`] when unset.
    /// Readable in any state.
    pub fn bip44_path(&self) -> Result<String, WalletError> {
        Ok(
            storage::read_present(self.store.as_ref(), KEY_BIP44_PATH)?
                .unwrap_or_else(|| DEFAULT_BIP44_PATH.to_owned()),
        )
    }

    /// Persists a new derivation path. Allowed in any state; it survives
    /// locking and process restarts.
    pub fn set_bip44_path(&self, path: &str) -> Result<(), WalletError> {
        self.store.set_value(KEY_BIP44_PATH, path)?;
        Ok(())
    }

    pub(crate) fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}
