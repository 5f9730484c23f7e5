//! Signer capability: address derivation and raw transaction signing.

use crate::error::WalletError;
use crate::types::UnsignedTransaction;

/// Stateless signing oracle over a (mnemonic, derivation path) pair.
///
/// Implementations must not retain the mnemonic between calls; the wallet's
/// secret slot is its only home.
pub trait Signer: Send + Sync {
    /// Derives the account address at `path`.
    fn derive_address(&self, mnemonic: &str, path: &str) -> Result<String, WalletError>;

    /// Signs `tx`, returning the raw broadcastable bytes.
    fn sign_transaction(
        &self,
        tx: &UnsignedTransaction,
        mnemonic: &str,
        path: &str,
    ) -> Result<Vec<u8>, WalletError>;
}

/// Default signer: BIP-32 derivation and EIP-155 legacy signing via
/// `chain-eth`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhraseSigner;

impl Signer for PhraseSigner {
    fn derive_address(&self, mnemonic: &str, path: &str) -> Result<String, WalletError> {
        chain_eth::hd::derive_address(mnemonic, path)
            .map_err(|e| WalletError::Signing(e.to_string()))
    }

    fn sign_transaction(
        &self,
        tx: &UnsignedTransaction,
        mnemonic: &str,
        path: &str,
    ) -> Result<Vec<u8>, WalletError> {
        let key = chain_eth::hd::derive_key(mnemonic, path)
            .map_err(|e| WalletError::Signing(e.to_string()))?;

        let legacy = chain_eth::transaction::LegacyTransaction {
            nonce: tx.nonce,
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            to: tx.to.clone(),
            value: tx.value,
            data: tx.data.clone(),
            chain_id: tx.chain_id,
        };

        let signed = chain_eth::transaction::sign_transaction(&legacy, &key.private_key)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(signed.raw_tx)
    }
}
