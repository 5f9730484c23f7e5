use thiserror::Error;

use crate::rpc::RpcError;
use crate::storage::StorageError;
use wallet_crypto::CryptoError;

/// Wallet operation errors.
///
/// Every failure mode is a distinct, inspectable variant; the core performs
/// no silent recovery.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet is not initialized")]
    NotInitialized,

    #[error("wallet is already initialized")]
    AlreadyInitialized,

    #[error("wallet is already started")]
    AlreadyStarted,

    #[error("wallet is not started")]
    NotStarted,

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error(transparent)]
    Cipher(#[from] CryptoError),

    #[error("unsupported chain id: {0}")]
    UnsupportedChain(u64),

    #[error("chain id {0} is missing from the registry")]
    MissingChain(u64),

    #[error("no current chain selected")]
    NoCurrentChain,

    #[error("corrupt wallet state: {0}")]
    CorruptState(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("signed transaction produced no txid")]
    NoTxId,

    #[error("transaction {0} failed on chain")]
    TransactionFailed(String),

    #[error(transparent)]
    Broadcast(#[from] RpcError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_state_errors() {
        assert_eq!(
            WalletError::NotInitialized.to_string(),
            "wallet is not initialized"
        );
        assert_eq!(
            WalletError::AlreadyStarted.to_string(),
            "wallet is already started"
        );
        assert_eq!(
            WalletError::IncorrectPassword.to_string(),
            "incorrect password"
        );
    }

    #[test]
    fn display_chain_errors() {
        assert_eq!(
            WalletError::UnsupportedChain(5).to_string(),
            "unsupported chain id: 5"
        );
        assert_eq!(
            WalletError::MissingChain(100).to_string(),
            "chain id 100 is missing from the registry"
        );
    }

    #[test]
    fn cipher_errors_pass_through() {
        let err = WalletError::from(CryptoError::MalformedBlob("no iv".into()));
        assert_eq!(err.to_string(), "malformed encrypted blob: no iv");
    }

    #[test]
    fn rpc_errors_pass_through() {
        let err = WalletError::from(RpcError::Transport("connection refused".into()));
        assert!(err.to_string().contains("connection refused"));
    }
}
