//! Hash builders for the crate's maps.
//!
//! [`FixedHashState`] seeds `foldhash` with a constant, so a map hashes the
//! same way in every process. [`PassThroughState`] is for keys that already
//! are well-mixed 64-bit hashes, such as type identities.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

use super::fnv::{FNV_OFFSET_BASIS, fnv1a_64_extend};

// -----------------------------------------------------------------------------
// FixedHashState

const SEED: FixedState = FixedState::with_seed(0x3C6E_F372_FE94_F82B);

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// A `foldhash` state with a constant seed.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use rtti_utils::hash::FixedHashState;
///
/// let a = FixedHashState.hash_one("Actor");
/// let b = FixedHashState.hash_one("Actor");
/// assert_eq!(a, b);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        SEED.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// PassThroughState

/// Uses a key written as a single `u64` as its own hash.
///
/// Other input is mixed with FNV-1a, so keys that are not a bare `u64`
/// still hash deterministically.
#[derive(Copy, Clone, Debug)]
pub struct PassThroughHasher {
    hash: u64,
}

impl Default for PassThroughHasher {
    #[inline]
    fn default() -> Self {
        Self {
            hash: FNV_OFFSET_BASIS,
        }
    }
}

impl Hasher for PassThroughHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.hash = fnv1a_64_extend(self.hash, bytes);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Builds [`PassThroughHasher`]s.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use rtti_utils::hash::PassThroughState;
///
/// assert_eq!(PassThroughState.hash_one(0xDEAD_BEEF_u64), 0xDEAD_BEEF);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct PassThroughState;

impl BuildHasher for PassThroughState {
    type Hasher = PassThroughHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        PassThroughHasher::default()
    }
}

#[cfg(test)]
mod tests {
    use core::hash::{BuildHasher, Hasher};

    use super::{PassThroughHasher, PassThroughState};
    use crate::hash::fnv1a_64;

    #[test]
    fn u64_keys_pass_through() {
        assert_eq!(PassThroughState.hash_one(7_u64), 7);
        assert_eq!(PassThroughState.hash_one(u64::MAX), u64::MAX);
    }

    #[test]
    fn bytes_are_mixed_with_fnv() {
        let mut hasher = PassThroughHasher::default();
        hasher.write(b"Actor");
        assert_eq!(hasher.finish(), fnv1a_64(b"Actor"));
        assert_ne!(PassThroughState.hash_one("Actor"), PassThroughState.hash_one("Actors"));
    }
}
