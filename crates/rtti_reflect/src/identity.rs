use core::fmt;

use rtti_utils::hash::hashbrown::HashMap;
use rtti_utils::hash::hashbrown::hash_map::Entry;
use rtti_utils::hash::{PassThroughState, fnv1a_64};

// -----------------------------------------------------------------------------
// Identity

/// A 64-bit identifier derived from a type name.
///
/// Computed with FNV-1a over the UTF-8 bytes of the name, so the same name
/// always yields the same identity, across registrations and across runs.
/// Collisions are not defended against.
///
/// # Examples
///
/// ```
/// use rtti_reflect::Identity;
///
/// const ACTOR: Identity = Identity::of("Actor");
///
/// assert_eq!(ACTOR, Identity::of("Actor"));
/// assert_ne!(ACTOR, Identity::of("actor"));
/// assert_eq!(Identity::of("a").as_u64(), 0xaf63dc4c8601ec8c);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Identity(u64);

impl Identity {
    /// The sentinel reported by an empty [`Value`](crate::Value).
    pub const NONE: Self = Self(0);

    /// Compute the identity of `name`.
    #[inline]
    pub const fn of(name: &str) -> Self {
        Self(fnv1a_64(name.as_bytes()))
    }

    #[inline(always)]
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns `true` for [`Identity::NONE`].
    #[inline(always)]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<&str> for Identity {
    #[inline]
    fn from(name: &str) -> Self {
        Self::of(name)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({:#018x})", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// -----------------------------------------------------------------------------
// IdentityMap

/// A map keyed by [`Identity`].
///
/// Identities are hashes already, so the key is passed through a no-op hasher.
pub struct IdentityMap<V>(HashMap<Identity, V, PassThroughState>);

impl<V> IdentityMap<V> {
    /// Creates an empty `IdentityMap`.
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(PassThroughState))
    }

    /// Creates an empty `IdentityMap` with the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(HashMap::with_capacity_and_hasher(capacity, PassThroughState))
    }

    /// Gets a reference to the value associated with the given key,
    /// inserting the result of `f` if the key is not present.
    ///
    /// The closure `f` is only called if the key is not present.
    #[inline]
    pub fn get_or_insert_with(&mut self, identity: Identity, f: impl FnOnce() -> V) -> &mut V {
        match self.0.entry(identity) {
            Entry::Vacant(entry) => entry.insert(f()),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    /// Returns a reference to the value corresponding to the identity.
    #[inline]
    pub fn get(&self, identity: Identity) -> Option<&V> {
        self.0.get(&identity)
    }

    /// Inserts a key-value pair, returning the replaced value if any.
    #[inline]
    pub fn insert(&mut self, identity: Identity, value: V) -> Option<V> {
        self.0.insert(identity, value)
    }

    /// Removes a key from the map, returning its value if it was present.
    #[inline]
    pub fn remove(&mut self, identity: Identity) -> Option<V> {
        self.0.remove(&identity)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[inline]
    pub fn contains(&self, identity: Identity) -> bool {
        self.0.contains_key(&identity)
    }

    /// Returns the number of elements in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator visiting all key-value pairs in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Identity, &V)> {
        self.0.iter().map(|(identity, value)| (*identity, value))
    }

    /// An iterator visiting all values in arbitrary order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.0.values()
    }
}

impl<V> Default for IdentityMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for IdentityMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Identity, IdentityMap};
    use rtti_utils::hash::FNV_OFFSET_BASIS;

    #[test]
    fn deterministic() {
        assert_eq!(Identity::of("GameObject"), Identity::of("GameObject"));
        assert_eq!(Identity::of(""), Identity::from_u64(FNV_OFFSET_BASIS));
        assert_eq!(Identity::of("foobar").as_u64(), 0x85944171f73967e8);
        assert_eq!(Identity::from("Base"), Identity::of("Base"));
    }

    #[test]
    fn none_sentinel() {
        assert!(Identity::NONE.is_none());
        assert!(Identity::default().is_none());
        assert!(!Identity::of("").is_none());
    }

    #[test]
    fn formatting() {
        let id = Identity::of("a");
        assert_eq!(alloc::format!("{id}"), "af63dc4c8601ec8c");
        assert_eq!(alloc::format!("{id:?}"), "Identity(0xaf63dc4c8601ec8c)");
    }

    #[test]
    fn map() {
        let mut map = IdentityMap::with_capacity(2);
        assert!(map.is_empty());
        assert_eq!(map.insert(Identity::of("a"), 1), None);
        assert_eq!(map.insert(Identity::of("a"), 2), Some(1));
        *map.get_or_insert_with(Identity::of("b"), || 10) += 1;
        assert_eq!(map.get(Identity::of("b")), Some(&11));
        assert_eq!(map.len(), 2);
        assert_eq!(map.remove(Identity::of("a")), Some(2));
        assert!(!map.contains(Identity::of("a")));
        assert_eq!(map.values().sum::<i32>(), 11);
    }
}
