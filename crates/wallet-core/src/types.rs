use crate::error::WalletError;
use crate::rpc::{Confirmation, TxStatus};

/// A fully parameterized, not-yet-signed transaction.
///
/// Built by [`crate::builder::TransactionBuilder`] against the chain that was
/// current at build time, and consumed exactly once by
/// [`crate::broadcast::sign_and_broadcast`]: its nonce is only valid for a
/// single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Recipient (or token contract) as a 0x-prefixed hex string.
    pub to: String,
    /// Value in wei. Zero for token transfers, where the amount travels in
    /// `data`.
    pub value: u128,
    /// Calldata; empty for plain native transfers.
    pub data: Vec<u8>,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    pub chain_id: u64,
}

/// Outcome of a broadcast: the transaction id plus a deferred confirmation.
pub struct BroadcastResult {
    /// Keccak-256 hash of the signed payload, 0x-prefixed hex.
    pub txid: String,
    /// Resolves when the node reports the transaction confirmed or failed.
    pub confirmation: Confirmation,
}

impl BroadcastResult {
    /// Awaits the confirmation. An unsuccessful on-chain status surfaces as
    /// [`WalletError::TransactionFailed`]; success yields the txid back.
    pub async fn wait(self) -> Result<String, WalletError> {
        match self.confirmation.await? {
            TxStatus::Confirmed => Ok(self.txid),
            TxStatus::Failed => Err(WalletError::TransactionFailed(self.txid)),
        }
    }
}

impl std::fmt::Debug for BroadcastResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastResult")
            .field("txid", &self.txid)
            .finish_non_exhaustive()
    }
}
