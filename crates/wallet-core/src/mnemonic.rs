use bip39::{Language, Mnemonic};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::error::WalletError;

/// Generates a fresh 12-word English mnemonic (128 bits of entropy).
pub fn generate() -> Result<Zeroizing<String>, WalletError> {
    let mut entropy = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    entropy.zeroize();
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Checks BIP-39 validity: word list membership and checksum.
pub fn is_valid(phrase: &str) -> bool {
    Mnemonic::parse_in_normalized(Language::English, phrase).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_12_words() {
        let phrase = generate().unwrap();
        assert_eq!(phrase.split_whitespace().count(), 12);
    }

    #[test]
    fn generated_phrases_are_valid() {
        let phrase = generate().unwrap();
        assert!(is_valid(&phrase));
    }

    #[test]
    fn generated_phrases_differ() {
        let a = generate().unwrap();
        let b = generate().unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn known_test_vector_is_valid() {
        assert!(is_valid(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(!is_valid("definitely not a mnemonic"));
        assert!(!is_valid(""));
        // Right words, wrong checksum.
        assert!(!is_valid(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon"
        ));
    }
}
