//! Provide hash containers, re-exports *hashbrown* and *foldhash*.

// -----------------------------------------------------------------------------
// Modules

mod fnv;
mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use fnv::{FNV_OFFSET_BASIS, FNV_PRIME, fnv1a_64, fnv1a_64_extend};
pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{PassThroughHasher, PassThroughState};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
///
/// # Examples
///
/// ```
/// use rtti_utils::hash::HashMap;
///
/// let mut map: HashMap<&str, i32> = HashMap::default();
/// map.insert("health", 100);
/// assert_eq!(map.get("health"), Some(&100));
/// ```
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
