use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// Derives an EIP-55 checksummed Ethereum address from an uncompressed
/// secp256k1 public key (65 bytes, 0x04 prefix).
///
/// The address is the last 20 bytes of the Keccak-256 hash of the 64-byte
/// key material.
pub fn pubkey_to_address(uncompressed_pubkey: &[u8; 65]) -> Result<String, EthError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(EthError::InvalidPublicKey(
            "uncompressed key must start with 0x04".into(),
        ));
    }

    let hash = Keccak256::digest(&uncompressed_pubkey[1..]);
    let mut addr_bytes = [0u8; 20];
    addr_bytes.copy_from_slice(&hash[12..]);

    checksum_address(&format!("0x{}", hex::encode(addr_bytes)))
}

/// Validates an Ethereum address: `0x` prefix, 40 hex characters, and, when
/// the address is mixed-case, a correct EIP-55 checksum.
pub fn validate(address: &str) -> Result<(), EthError> {
    let hex_part = strip_prefix(address)?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }
    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    // Single-case addresses carry no checksum to verify.
    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(());
    }

    let checksummed = checksum_address(&format!("0x{}", hex_part.to_lowercase()))?;
    if checksummed == address {
        Ok(())
    } else {
        Err(EthError::InvalidAddress("EIP-55 checksum mismatch".into()))
    }
}

/// Applies EIP-55 mixed-case checksum encoding to an address.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    let hex_part = strip_prefix(address)?.to_lowercase();

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }
    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    let hash_hex = hex::encode(Keccak256::digest(hex_part.as_bytes()));

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (c, h) in hex_part.chars().zip(hash_hex.chars()) {
        if c.is_ascii_digit() {
            checksummed.push(c);
        } else if h.to_digit(16).unwrap_or(0) >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    Ok(checksummed)
}

/// Parses a 0x-prefixed address into its 20 raw bytes.
pub(crate) fn parse_address(address: &str) -> Result<[u8; 20], EthError> {
    let hex_part = strip_prefix(address)?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    let bytes = hex::decode(hex_part)
        .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

fn strip_prefix(address: &str) -> Result<&str, EthError> {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eip55_checksum_known_addresses() {
        // Test vectors from EIP-55.
        let cases = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in &cases {
            let lower = format!("0x{}", expected[2..].to_lowercase());
            assert_eq!(&checksum_address(&lower).unwrap(), expected);
        }
    }

    #[test]
    fn validate_accepts_checksummed_and_single_case() {
        validate("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        validate("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        validate("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap();
    }

    #[test]
    fn validate_rejects_bad_checksum() {
        let err = validate("0x5AAEB6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap_err();
        assert!(err.to_string().contains("checksum"));
    }

    #[test]
    fn validate_rejects_malformed() {
        assert!(validate("0x5aAeb6053F").is_err());
        assert!(validate("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
        assert!(validate("0xGGGGb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }

    #[test]
    fn pubkey_to_address_known_vector() {
        // Private key 0x...01 derives 0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf.
        use k256::elliptic_curve::sec1::ToEncodedPoint;
        use k256::SecretKey;

        let mut privkey = [0u8; 32];
        privkey[31] = 1;

        let secret = SecretKey::from_bytes((&privkey).into()).expect("valid private key");
        let uncompressed = secret.public_key().to_encoded_point(false);

        let mut key_65 = [0u8; 65];
        key_65.copy_from_slice(uncompressed.as_bytes());

        let address = pubkey_to_address(&key_65).unwrap();
        assert_eq!(address, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }

    #[test]
    fn pubkey_wrong_prefix_errors() {
        let mut key = [0u8; 65];
        key[0] = 0x03;
        assert!(pubkey_to_address(&key).is_err());
    }

    #[test]
    fn parse_address_roundtrip() {
        let addr = parse_address("0x000000000000000000000000000000000000dEaD").unwrap();
        assert_eq!(addr[18], 0xde);
        assert_eq!(addr[19], 0xad);
    }

    #[test]
    fn parse_address_rejects_short() {
        assert!(parse_address("0xdead").is_err());
    }
}
