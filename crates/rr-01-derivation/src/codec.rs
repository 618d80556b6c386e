//! # Fixed-Width Codec
//!
//! Human identifiers (names, urls) and raw chain addresses are stored in
//! fixed-width, zero-padded buffers. An all-zero buffer is the absent
//! sentinel returned by lookups of unoccupied locations.
//!
//! | Field | Width |
//! |-------|-------|
//! | Network / reporter / case name | 32 |
//! | Reporter / case url | 200 |
//! | Address, asset mint | 64 |
//! | Asset id | 32 |

use crate::errors::DerivationError;
use uuid::Uuid;

/// Width of a name field.
pub const NAME_WIDTH: usize = 32;

/// Width of a url field.
pub const URL_WIDTH: usize = 200;

/// Width of a raw address or mint field.
pub const ADDRESS_WIDTH: usize = 64;

/// Width of an asset id field.
pub const ASSET_ID_WIDTH: usize = 32;

/// Right-pad `bytes` with zeros to exactly `width` bytes.
///
/// Fails with [`DerivationError::Encoding`] when the input is longer than
/// `width`.
pub fn encode_fixed(bytes: &[u8], width: usize) -> Result<Vec<u8>, DerivationError> {
    if bytes.len() > width {
        return Err(DerivationError::Encoding {
            len: bytes.len(),
            width,
        });
    }
    let mut out = vec![0u8; width];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

/// Strip trailing zero bytes from a fixed-width buffer.
#[must_use]
pub fn decode_fixed(buffer: &[u8]) -> Vec<u8> {
    let end = buffer.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    buffer[..end].to_vec()
}

/// Decode a fixed-width text field.
pub fn decode_text(buffer: &[u8]) -> Result<String, DerivationError> {
    String::from_utf8(decode_fixed(buffer)).map_err(|_| DerivationError::InvalidUtf8)
}

/// Encode a name into its 32-byte field.
pub fn encode_name(name: &str) -> Result<Vec<u8>, DerivationError> {
    encode_fixed(name.as_bytes(), NAME_WIDTH)
}

/// Encode a url into its 200-byte field.
pub fn encode_url(url: &str) -> Result<Vec<u8>, DerivationError> {
    encode_fixed(url.as_bytes(), URL_WIDTH)
}

/// Encode raw address bytes into the 64-byte field.
///
/// Empty input is rejected: its encoding is indistinguishable from an
/// unoccupied record.
pub fn encode_address(address: &[u8]) -> Result<Vec<u8>, DerivationError> {
    if address.is_empty() {
        return Err(DerivationError::EmptyIdentifier);
    }
    encode_fixed(address, ADDRESS_WIDTH)
}

/// Encode an asset id into the 32-byte field.
pub fn encode_asset_id(asset_id: &[u8]) -> Result<Vec<u8>, DerivationError> {
    encode_fixed(asset_id, ASSET_ID_WIDTH)
}

/// Map a UUID to the integer used as derivation seed.
#[must_use]
pub fn id_to_integer(id: Uuid) -> u128 {
    id.as_u128()
}

/// Inverse of [`id_to_integer`].
#[must_use]
pub fn integer_to_id(value: u128) -> Uuid {
    Uuid::from_u128(value)
}

/// Parse a hex-encoded address, with or without a `0x` prefix.
pub fn parse_hex_address(text: &str) -> Result<Vec<u8>, DerivationError> {
    let trimmed = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let bytes = hex::decode(trimmed).map_err(|e| DerivationError::InvalidHex(e.to_string()))?;
    if bytes.len() > ADDRESS_WIDTH {
        return Err(DerivationError::Encoding {
            len: bytes.len(),
            width: ADDRESS_WIDTH,
        });
    }
    Ok(bytes)
}

/// Format raw address bytes as `0x`-prefixed lowercase hex.
#[must_use]
pub fn format_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
