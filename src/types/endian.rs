//! Big-endian integer helpers
//!
//! Used where a value needs its canonical, network-order form rather than the
//! little-endian codec layout: fixed hashes built from integers and compact
//! integer keys.

/// Minimal number of bytes needed to hold `value` (zero for zero)
pub fn bytes_required(value: u128) -> usize {
    ((128 - value.leading_zeros()) as usize).div_ceil(8)
}

/// Fill `out` with the low `out.len()` bytes of `value`, most significant first
///
/// Higher bytes that do not fit are dropped.
pub fn to_big_endian(mut value: u128, out: &mut [u8]) {
    for byte in out.iter_mut().rev() {
        *byte = (value & 0xff) as u8;
        value = value.checked_shr(8).unwrap_or(0);
    }
}

/// Read a big-endian integer; bytes beyond the low 16 shift out
pub fn from_big_endian(bytes: &[u8]) -> u128 {
    bytes
        .iter()
        .fold(0u128, |acc, &b| acc.checked_shl(8).unwrap_or(0) | u128::from(b))
}

/// Shortest big-endian form of `value`
pub fn to_compact_big_endian(value: u128) -> Vec<u8> {
    let mut out = vec![0u8; bytes_required(value)];
    to_big_endian(value, &mut out);
    out
}
