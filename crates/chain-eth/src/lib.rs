//! EVM chain support for the wallet.
//!
//! This crate provides:
//! - secp256k1 key derivation from a BIP-39 mnemonic at an arbitrary BIP-44 path
//! - Ethereum address derivation with EIP-55 checksums
//! - legacy (type 0) transaction encoding and EIP-155 signing
//! - ERC-20 calldata encoding (transfer, balanceOf)

pub mod address;
pub mod erc20;
pub mod error;
pub mod hd;
pub mod transaction;

pub use error::EthError;
