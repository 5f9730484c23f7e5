//! Core wallet: the secret lifecycle state machine, the persisted chain
//! registry, and chain-scoped transaction construction and broadcast.
//!
//! Storage, signing and node access are injected capabilities
//! ([`storage::KeyValueStore`], [`signer::Signer`], [`rpc::ChainRpc`]); the
//! core owns no I/O of its own beyond what those traits provide.

pub mod broadcast;
pub mod builder;
pub mod error;
pub mod mnemonic;
pub mod query;
pub mod registry;
pub mod rpc;
pub mod secret;
pub mod signer;
pub mod storage;
pub mod types;
pub mod wallet;

pub use error::WalletError;
pub use registry::{ChainInfo, ChainRegistry};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{BroadcastResult, UnsignedTransaction};
pub use wallet::{Wallet, WalletStatus, DEFAULT_BIP44_PATH};
