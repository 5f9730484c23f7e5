use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use crate::address;
use crate::error::EthError;

/// A secp256k1 key derived from a mnemonic. The private key is zeroed on
/// drop.
pub struct DerivedKey {
    pub private_key: [u8; 32],
    pub public_key_uncompressed: [u8; 65],
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

/// Derives the secp256k1 key at `path` from a BIP-39 mnemonic phrase.
///
/// The mnemonic is converted to its 64-byte seed (empty passphrase) and the
/// seed is walked down the BIP-32 path, e.g. `m/44'/60'/0'/0/0`.
pub fn derive_key(mnemonic: &str, path: &str) -> Result<DerivedKey, EthError> {
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, mnemonic)
        .map_err(|e| EthError::InvalidMnemonic(e.to_string()))?;
    let mut seed = mnemonic.to_seed("");

    let parsed: DerivationPath = path
        .parse()
        .map_err(|e: bip32::Error| EthError::DerivationFailed(format!("{path}: {e}")))?;

    let derived = XPrv::derive_from_path(&seed, &parsed)
        .map_err(|e| EthError::DerivationFailed(e.to_string()));
    seed.zeroize();
    let xprv = derived?;

    let private_key: [u8; 32] = xprv.to_bytes().into();
    let signing_key = SigningKey::from_bytes((&private_key).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()))?;

    let public_key_uncompressed: [u8; 65] = signing_key
        .verifying_key()
        .to_encoded_point(false)
        .as_bytes()
        .try_into()
        .map_err(|_| EthError::DerivationFailed("invalid uncompressed public key".into()))?;

    Ok(DerivedKey {
        private_key,
        public_key_uncompressed,
    })
}

/// Derives the EIP-55 checksummed address at `path` for a mnemonic.
pub fn derive_address(mnemonic: &str, path: &str) -> Result<String, EthError> {
    let key = derive_key(mnemonic, path)?;
    address::pubkey_to_address(&key.public_key_uncompressed)
}
