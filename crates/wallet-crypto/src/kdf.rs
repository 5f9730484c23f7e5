use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::Zeroizing;

/// PBKDF2 iteration count.
///
/// Fixed for the lifetime of stored blobs: raising it would change every
/// derived key and silently invalidate existing wallets.
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Derives a 32-byte AES key from `password` and `salt` using
/// PBKDF2-HMAC-SHA512.
///
/// The returned key is zeroed when dropped.
pub fn derive_key(password: &[u8], salt: &[u8]) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    pbkdf2_hmac::<Sha512>(password, salt, PBKDF2_ROUNDS, &mut *key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_deterministic() {
        let key1 = derive_key(b"my-strong-password", b"salt");
        let key2 = derive_key(b"my-strong-password", b"salt");
        assert_eq!(*key1, *key2, "same password + salt must produce same key");
    }

    #[test]
    fn derive_key_different_passwords_differ() {
        let key1 = derive_key(b"password-a", b"salt");
        let key2 = derive_key(b"password-b", b"salt");
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn derive_key_different_salts_differ() {
        let key1 = derive_key(b"same-password", b"salt-1");
        let key2 = derive_key(b"same-password", b"salt-2");
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn derive_key_empty_password() {
        let key = derive_key(b"", b"salt");
        assert!(key.iter().any(|&b| b != 0));
    }

    #[test]
    fn derive_key_unicode_password() {
        let key = derive_key("p@$$w0rd-ünïcode".as_bytes(), b"salt");
        assert_eq!(key.len(), 32);
    }
}
