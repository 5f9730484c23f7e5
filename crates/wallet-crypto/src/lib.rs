//! # wallet-crypto
//!
//! Password-based key derivation and mnemonic encryption for the wallet.
//!
//! The storage format is fixed for the lifetime of existing wallets:
//! PBKDF2-HMAC-SHA512 under a hard-coded salt, AES-256-CTR with a fresh
//! random 16-byte IV per encryption, and a JSON blob of hex fields.

pub mod cipher;
pub mod error;
pub mod kdf;

pub use cipher::EncryptedBlob;
pub use error::CryptoError;
