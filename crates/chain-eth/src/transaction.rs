use alloy_rlp::{Encodable, RlpEncodable};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use crate::address::parse_address;
use crate::error::EthError;

/// An unsigned legacy (type 0) Ethereum transaction with EIP-155 replay
/// protection.
#[derive(Debug, Clone)]
pub struct LegacyTransaction {
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    pub gas_limit: u64,
    /// Recipient address as a 0x-prefixed hex string.
    pub to: String,
    /// Transfer value in wei.
    pub value: u128,
    /// Calldata (empty for plain transfers).
    pub data: Vec<u8>,
    pub chain_id: u64,
}

/// A signed legacy transaction ready for broadcast.
pub struct SignedTransaction {
    /// RLP-encoded signed transaction bytes.
    pub raw_tx: Vec<u8>,
    /// Transaction hash as a 0x-prefixed hex string.
    pub tx_hash: String,
}

/// Signs a legacy transaction with the given secp256k1 private key.
///
/// EIP-155 signing:
/// 1. RLP-encode `[nonce, gas_price, gas_limit, to, value, data, chain_id, 0, 0]`.
/// 2. Keccak-256 hash the encoding and sign the hash.
/// 3. Compute `v = chain_id * 2 + 35 + y_parity`.
/// 4. RLP-encode `[nonce, gas_price, gas_limit, to, value, data, v, r, s]`.
pub fn sign_transaction(
    tx: &LegacyTransaction,
    private_key: &[u8; 32],
) -> Result<SignedTransaction, EthError> {
    let unsigned_payload = encode_unsigned_tx(tx)?;
    let msg_hash = Keccak256::digest(&unsigned_payload);

    let mut key_bytes = *private_key;
    let signing_key = SigningKey::from_bytes((&key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()))?;
    key_bytes.zeroize();

    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash(msg_hash.as_slice())
        .map_err(|e| EthError::SigningError(e.to_string()))?;

    let v = tx.chain_id * 2 + 35 + recovery_id.is_y_odd() as u64;

    let r_generic = signature.r().to_bytes();
    let s_generic = signature.s().to_bytes();
    let mut r_bytes = [0u8; 32];
    let mut s_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&r_generic);
    s_bytes.copy_from_slice(&s_generic);

    let signed_fields = SignedTxFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: RlpAddress(parse_address(&tx.to)?),
        value: tx.value,
        data: tx.data.clone(),
        v,
        r: r_bytes.into(),
        s: s_bytes.into(),
    };

    let mut raw_tx = Vec::new();
    signed_fields.encode(&mut raw_tx);

    let tx_hash = format!("0x{}", hex::encode(Keccak256::digest(&raw_tx)));

    Ok(SignedTransaction { raw_tx, tx_hash })
}

/// Encodes the EIP-155 signing payload:
/// `rlp([nonce, gas_price, gas_limit, to, value, data, chain_id, 0, 0])`.
pub fn encode_unsigned_tx(tx: &LegacyTransaction) -> Result<Vec<u8>, EthError> {
    let unsigned_fields = UnsignedTxFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: RlpAddress(parse_address(&tx.to)?),
        value: tx.value,
        data: tx.data.clone(),
        chain_id: tx.chain_id,
        zero_r: 0,
        zero_s: 0,
    };

    let mut payload = Vec::new();
    unsigned_fields.encode(&mut payload);
    Ok(payload)
}

// ---------------------------------------------------------------------------
// RLP-encodable structures
// ---------------------------------------------------------------------------

#[derive(RlpEncodable)]
struct UnsignedTxFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: Vec<u8>,
    chain_id: u64,
    zero_r: u8,
    zero_s: u8,
}

#[derive(RlpEncodable)]
struct SignedTxFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpAddress,
    value: u128,
    data: Vec<u8>,
    v: u64,
    r: RlpU256,
    s: RlpU256,
}

/// Wrapper for a 20-byte address that encodes as a 20-byte RLP string.
#[derive(Debug, Clone)]
struct RlpAddress([u8; 20]);

impl Encodable for RlpAddress {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// Wrapper for a 256-bit integer that encodes as minimal big-endian bytes
/// with leading zeros stripped (standard RLP integer encoding).
#[derive(Debug, Clone)]
struct RlpU256([u8; 32]);

impl From<[u8; 32]> for RlpU256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        self.0[start..].encode(out);
    }

    fn length(&self) -> usize {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        self.0[start..].length()
    }
}
