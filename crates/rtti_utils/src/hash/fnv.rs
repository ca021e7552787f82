//! 64-bit FNV-1a.
//!
//! Not cryptographic. Used where a hash must be reproducible from a
//! string alone, e.g. deriving a type identity from its registered name.

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 14695981039346656037;

/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 1099511628211;

/// Hash `bytes` with 64-bit FNV-1a (xor, then multiply, per byte).
///
/// Usable in `const` contexts.
///
/// # Examples
///
/// ```
/// use rtti_utils::hash::{FNV_OFFSET_BASIS, fnv1a_64};
///
/// assert_eq!(fnv1a_64(b""), FNV_OFFSET_BASIS);
/// assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
///
/// const FOOBAR: u64 = fnv1a_64(b"foobar");
/// assert_eq!(FOOBAR, 0x85944171f73967e8);
/// ```
#[inline]
pub const fn fnv1a_64(bytes: &[u8]) -> u64 {
    fnv1a_64_extend(FNV_OFFSET_BASIS, bytes)
}

/// Continue an FNV-1a `hash` over more `bytes`.
///
/// `fnv1a_64_extend(fnv1a_64(a), b)` equals the hash of `a` followed by `b`.
pub const fn fnv1a_64_extend(mut hash: u64, bytes: &[u8]) -> u64 {
    let mut index = 0;
    while index < bytes.len() {
        hash ^= bytes[index] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        index += 1;
    }
    hash
}
