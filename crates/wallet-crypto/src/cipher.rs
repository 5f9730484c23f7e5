use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use rand::RngCore;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::kdf;

/// AES-256 in CTR mode with a big-endian 128-bit counter.
type Aes256Ctr = Ctr128BE<Aes256>;

/// IV size in bytes.
const IV_SIZE: usize = 16;

/// Blob format version written by [`encrypt`].
pub const BLOB_VERSION: u32 = 1;

/// Key-derivation salt, shared by every wallet.
///
/// Two wallets encrypted under the same password derive the same key. Kept
/// as-is for compatibility with existing stored blobs; see DESIGN.md before
/// changing.
const KDF_SALT: &[u8] = b"23sdfwa34vaerrtaertvsrde43tqsdgf";

/// An encrypted secret at rest: a random IV plus unauthenticated ciphertext,
/// both hex-encoded for JSON storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedBlob {
    /// Format version. Absent in blobs written before versioning; those
    /// decode as version 1.
    #[serde(default = "default_version")]
    pub version: u32,
    /// 16-byte initialization vector, hex-encoded.
    pub iv: String,
    /// AES-256-CTR ciphertext, hex-encoded.
    pub content: String,
}

fn default_version() -> u32 {
    BLOB_VERSION
}

/// Encrypts `plaintext` under a key derived from `password`.
///
/// A fresh random 16-byte IV is drawn from OS randomness on every call, so
/// no IV is ever reused across encryptions. The derived key is zeroed after
/// use.
pub fn encrypt(plaintext: &[u8], password: &str) -> EncryptedBlob {
    let key = kdf::derive_key(password.as_bytes(), KDF_SALT);

    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);

    let mut buf = plaintext.to_vec();
    let mut cipher = Aes256Ctr::new(&(*key).into(), &iv.into());
    cipher.apply_keystream(&mut buf);

    EncryptedBlob {
        version: BLOB_VERSION,
        iv: hex::encode(iv),
        content: hex::encode(&buf),
    }
}

/// Decrypts a blob previously produced by [`encrypt`].
///
/// Fails only when the blob itself is malformed. The output is NOT validated
/// here: under a wrong password this returns garbage bytes, and it is the
/// caller's job to reject them (the wallet checks BIP-39 validity).
pub fn decrypt(blob: &EncryptedBlob, password: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if blob.version != BLOB_VERSION {
        return Err(CryptoError::UnsupportedVersion(blob.version));
    }

    let iv_bytes = hex::decode(&blob.iv)
        .map_err(|e| CryptoError::MalformedBlob(format!("invalid iv hex: {e}")))?;
    let iv: [u8; IV_SIZE] = iv_bytes.as_slice().try_into().map_err(|_| {
        CryptoError::MalformedBlob(format!(
            "expected {IV_SIZE}-byte iv, got {}",
            iv_bytes.len()
        ))
    })?;

    let mut buf = Zeroizing::new(
        hex::decode(&blob.content)
            .map_err(|e| CryptoError::MalformedBlob(format!("invalid content hex: {e}")))?,
    );

    let key = kdf::derive_key(password.as_bytes(), KDF_SALT);
    let mut cipher = Aes256Ctr::new(&(*key).into(), &iv.into());
    cipher.apply_keystream(buf.as_mut_slice());

    Ok(buf)
}

/// Serializes a blob to its JSON storage form.
pub fn encode_blob(blob: &EncryptedBlob) -> Result<String, CryptoError> {
    serde_json::to_string(blob).map_err(|e| CryptoError::Serialization(e.to_string()))
}

/// Parses a blob from its JSON storage form, validating required fields.
pub fn decode_blob(json: &str) -> Result<EncryptedBlob, CryptoError> {
    serde_json::from_str(json).map_err(|e| CryptoError::MalformedBlob(e.to_string()))
}
