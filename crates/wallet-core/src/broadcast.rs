//! Signing and submission of built transactions.

use sha3::{Digest, Keccak256};
use tracing::info;

use crate::error::WalletError;
use crate::rpc::ChainRpc;
use crate::types::{BroadcastResult, UnsignedTransaction};
use crate::wallet::Wallet;

/// Signs `tx` with the wallet's mnemonic and submits it to the current
/// chain's endpoint.
///
/// Requires `Unlocked`. The transaction must have been built against the
/// chain that is still current; a mismatch (the caller switched chains
/// between build and broadcast) is rejected rather than sent to the wrong
/// endpoint. The transaction is consumed: its nonce is valid once.
pub async fn sign_and_broadcast(
    wallet: &Wallet,
    rpc: &dyn ChainRpc,
    tx: UnsignedTransaction,
) -> Result<BroadcastResult, WalletError> {
    let phrase = wallet.reveal_mnemonic()?;
    let path = wallet.bip44_path()?;
    let chain = wallet.chains().current()?;

    if tx.chain_id != chain.id {
        return Err(WalletError::UnsupportedChain(tx.chain_id));
    }

    let raw = wallet.signer().sign_transaction(&tx, phrase, &path)?;
    if raw.is_empty() {
        return Err(WalletError::NoTxId);
    }

    let txid = format!("0x{}", hex::encode(Keccak256::digest(&raw)));
    let confirmation = rpc.send_raw_transaction(&chain.rpc_url, &raw).await?;

    info!(%txid, chain = chain.id, "transaction broadcast");
    Ok(BroadcastResult { txid, confirmation })
}
