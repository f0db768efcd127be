//! Identity Hasher
//!
//! Deterministic string hash used to mint transport-safe side-channel keys.
//! Not collision resistant and never used as a uniqueness guarantee.

/// Hashes a candidate id into the key used by the side-table and the
/// `protocolTag/<hash>` transport marker.
pub trait IdentityHasher {
    fn hash(&self, s: &str) -> i32;
}

/// `h = h * 31 + code_unit`, wrapping at 32 bits, over UTF-16 code units.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolynomialHasher;

impl IdentityHasher for PolynomialHasher {
    fn hash(&self, s: &str) -> i32 {
        hash(s)
    }
}

pub fn hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}
