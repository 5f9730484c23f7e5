//! Chain-scoped construction of unsigned transactions.

use tracing::debug;

use chain_eth::{address, erc20};

use crate::error::WalletError;
use crate::registry::ChainInfo;
use crate::rpc::{CallParams, ChainRpc};
use crate::types::UnsignedTransaction;
use crate::wallet::Wallet;

/// Gas limit for a plain native transfer.
pub const NATIVE_TRANSFER_GAS: u64 = 50_000;
/// Gas limit for an ERC-20 transfer. Contract calls cost more than plain
/// transfers, so this is never below [`NATIVE_TRANSFER_GAS`].
pub const TOKEN_TRANSFER_GAS: u64 = 80_000;

/// Builds unsigned transactions against the registry's current chain.
///
/// Every build requires the wallet to be unlocked and re-reads the current
/// chain, the sender's transaction count and the gas price from scratch;
/// nothing is cached across calls. In particular the nonce is the on-chain
/// count at build time: two transactions built before either is broadcast
/// carry the same nonce, and serializing build/broadcast pairs is the
/// caller's responsibility.
pub struct TransactionBuilder<'a> {
    wallet: &'a Wallet,
    rpc: &'a dyn ChainRpc,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(wallet: &'a Wallet, rpc: &'a dyn ChainRpc) -> Self {
        Self { wallet, rpc }
    }

    /// A native currency transfer of `value_wei` to `to`.
    ///
    /// Uses the fixed conservative gas limit [`NATIVE_TRANSFER_GAS`] rather
    /// than an on-chain estimate.
    pub async fn native_transfer(
        &self,
        to: &str,
        value_wei: u128,
    ) -> Result<UnsignedTransaction, WalletError> {
        address::validate(to).map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        let (chain, sender) = self.context()?;

        let nonce = self.rpc.transaction_count(&chain.rpc_url, &sender).await?;
        let gas_price = self.rpc.gas_price(&chain.rpc_url).await?;

        let tx = UnsignedTransaction {
            to: to.to_owned(),
            value: value_wei,
            data: Vec::new(),
            nonce,
            gas_limit: NATIVE_TRANSFER_GAS,
            gas_price,
            chain_id: chain.id,
        };
        debug!(chain = chain.id, nonce, "built native transfer");
        Ok(tx)
    }

    /// An ERC-20 `transfer` of `amount` base units to `to` through
    /// `token_contract`.
    ///
    /// The amount travels in calldata; the transaction's own value is zero
    /// and its recipient is the token contract.
    pub async fn token_transfer(
        &self,
        to: &str,
        amount: u128,
        token_contract: &str,
    ) -> Result<UnsignedTransaction, WalletError> {
        address::validate(to).map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        address::validate(token_contract)
            .map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        let (chain, sender) = self.context()?;

        let data = erc20::encode_transfer(to, erc20::uint256(amount))
            .map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        let nonce = self.rpc.transaction_count(&chain.rpc_url, &sender).await?;
        let gas_price = self.rpc.gas_price(&chain.rpc_url).await?;

        let tx = UnsignedTransaction {
            to: token_contract.to_owned(),
            value: 0,
            data,
            nonce,
            gas_limit: TOKEN_TRANSFER_GAS,
            gas_price,
            chain_id: chain.id,
        };
        debug!(chain = chain.id, nonce, "built token transfer");
        Ok(tx)
    }

    /// A generic call with caller-supplied calldata. Gas is estimated from
    /// the literal (to, value, data) triple.
    pub async fn data_call(
        &self,
        to: &str,
        value_wei: u128,
        data: Vec<u8>,
    ) -> Result<UnsignedTransaction, WalletError> {
        address::validate(to).map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
        let (chain, sender) = self.context()?;

        let call = CallParams {
            from: Some(sender.clone()),
            to: Some(to.to_owned()),
            value: value_wei,
            data: data.clone(),
        };
        let gas_limit = self.rpc.estimate_gas(&chain.rpc_url, &call).await?;
        let nonce = self.rpc.transaction_count(&chain.rpc_url, &sender).await?;
        let gas_price = self.rpc.gas_price(&chain.rpc_url).await?;

        let tx = UnsignedTransaction {
            to: to.to_owned(),
            value: value_wei,
            data,
            nonce,
            gas_limit,
            gas_price,
            chain_id: chain.id,
        };
        debug!(chain = chain.id, nonce, gas_limit, "built data call");
        Ok(tx)
    }

    /// Resolves the current chain and sender address, enforcing the
    /// unlocked-wallet guard before any network traffic.
    fn context(&self) -> Result<(ChainInfo, String), WalletError> {
        let sender = self.wallet.address()?;
        let chain = self.wallet.chains().current()?;
        Ok((chain, sender))
    }
}
