//! ERC-20 calldata encoding.
//!
//! Just enough ABI encoding for the token operations the wallet performs,
//! without a full ABI parser: each parameter is one 32-byte word after the
//! 4-byte selector.

use crate::address::parse_address;
use crate::error::EthError;

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Function selector for `balanceOf(address)`: `0x70a08231`.
const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// Widens a u128 amount into a big-endian 32-byte uint256 word.
pub fn uint256(amount: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&amount.to_be_bytes());
    word
}

/// Encodes an ERC-20 `transfer(address,uint256)` call.
///
/// Returns the complete calldata: 4-byte selector, the recipient left-padded
/// to 32 bytes, and the amount as a 32-byte big-endian word.
pub fn encode_transfer(to: &str, amount: [u8; 32]) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(to)?;

    let mut data = Vec::with_capacity(68);
    data.extend_from_slice(&TRANSFER_SELECTOR);
    data.extend_from_slice(&address_word(&addr));
    data.extend_from_slice(&amount);
    Ok(data)
}

/// Encodes an ERC-20 `balanceOf(address)` call.
pub fn encode_balance_of(owner: &str) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(owner)?;

    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&BALANCE_OF_SELECTOR);
    data.extend_from_slice(&address_word(&addr));
    Ok(data)
}

/// Left-pads a 20-byte address into a 32-byte ABI word.
fn address_word(addr: &[u8; 20]) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr);
    word
}
