//! Hex text helpers

use crate::error::{Error, Result};

/// Lowercase hex, no prefix
pub fn to_hex(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

/// Parse hex text
///
/// A leading `0x` is skipped. With an odd number of digits the first digit
/// stands alone as the high byte, so `"abc"` parses as `[0x0a, 0xbc]`.
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let decoded = if digits.len() % 2 == 1 {
        ::hex::decode(format!("0{}", digits))
    } else {
        ::hex::decode(digits)
    };
    decoded.map_err(|e| Error::InvalidHex(format!("{}: {}", text, e)))
}
