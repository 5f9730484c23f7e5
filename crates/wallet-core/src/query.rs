//! Read-only chain queries for the unlocked account.

use crate::error::WalletError;
use crate::rpc::ChainRpc;
use crate::wallet::Wallet;

/// Native balance of the wallet's account on the current chain, in wei.
pub async fn native_balance(wallet: &Wallet, rpc: &dyn ChainRpc) -> Result<u128, WalletError> {
    let address = wallet.address()?;
    let chain = wallet.chains().current()?;
    Ok(rpc.balance(&chain.rpc_url, &address).await?)
}

/// ERC-20 balance of the wallet's account at `token_contract` on the current
/// chain, in token base units.
pub async fn token_balance(
    wallet: &Wallet,
    rpc: &dyn ChainRpc,
    token_contract: &str,
) -> Result<u128, WalletError> {
    let address = wallet.address()?;
    let chain = wallet.chains().current()?;
    Ok(rpc
        .token_balance(&chain.rpc_url, token_contract, &address)
        .await?)
}
