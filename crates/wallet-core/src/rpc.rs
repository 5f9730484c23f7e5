//! Chain RPC capability: read and submit access to a blockchain node.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the RPC collaborator, passed through unchanged.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc node error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("malformed rpc response: {0}")]
    Response(String),

    #[error("timed out waiting for confirmation of {0}")]
    ConfirmationTimeout(String),
}

/// Parameters for a gas estimate over an arbitrary call.
#[derive(Debug, Clone, Default)]
pub struct CallParams {
    pub from: Option<String>,
    pub to: Option<String>,
    /// Value in wei.
    pub value: u128,
    pub data: Vec<u8>,
}

/// Final on-chain outcome of a broadcast transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Confirmed,
    Failed,
}

/// One-shot deferred confirmation outcome for a broadcast transaction.
pub type Confirmation = Pin<Box<dyn Future<Output = Result<TxStatus, RpcError>> + Send>>;

/// Node access scoped per call to an endpoint URL.
///
/// The endpoint is the RPC URL of the chain selected in the registry at call
/// time; implementations hold no per-chain state, so one instance serves
/// every configured chain.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// The account's on-chain transaction count, used as the next nonce.
    async fn transaction_count(&self, endpoint: &str, address: &str) -> Result<u64, RpcError>;

    /// Current gas price in wei.
    async fn gas_price(&self, endpoint: &str) -> Result<u128, RpcError>;

    /// Gas estimate for `call`.
    async fn estimate_gas(&self, endpoint: &str, call: &CallParams) -> Result<u64, RpcError>;

    /// Native balance in wei.
    async fn balance(&self, endpoint: &str, address: &str) -> Result<u128, RpcError>;

    /// ERC-20 balance of `address` at `contract`, in token base units.
    async fn token_balance(
        &self,
        endpoint: &str,
        contract: &str,
        address: &str,
    ) -> Result<u128, RpcError>;

    /// Submits raw signed bytes. The returned future resolves once the
    /// transaction is confirmed or known to have failed; it is not
    /// cancellable through this interface.
    async fn send_raw_transaction(
        &self,
        endpoint: &str,
        raw: &[u8],
    ) -> Result<Confirmation, RpcError>;
}
