use thiserror::Error;

/// Secret cipher errors.
///
/// Decryption only fails on a malformed blob. A wrong password is not
/// detectable here: counter-mode ciphertext carries no authentication tag,
/// so the keystream is applied either way and the caller must validate the
/// resulting plaintext.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed encrypted blob: {0}")]
    MalformedBlob(String),

    #[error("unsupported blob version: {0}")]
    UnsupportedVersion(u32),

    #[error("blob serialization failed: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_malformed_blob() {
        let err = CryptoError::MalformedBlob("missing iv".into());
        assert_eq!(err.to_string(), "malformed encrypted blob: missing iv");
    }

    #[test]
    fn display_unsupported_version() {
        let err = CryptoError::UnsupportedVersion(7);
        assert_eq!(err.to_string(), "unsupported blob version: 7");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> =
            Box::new(CryptoError::MalformedBlob("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
