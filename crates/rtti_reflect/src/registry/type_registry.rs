use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use rtti_utils::hash::HashMap;

use crate::info::Type;
use crate::registry::{Describe, TypeBuilder};
use crate::{Identity, IdentityMap, ReflectError, Reflected};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A store of [`Type`]s, indexed by name and by [`Identity`].
///
/// Both indices always agree: a type is either in both or in neither.
/// Registering a type under a name that is already taken replaces the
/// earlier type.
///
/// This is the unsynchronized core; share it through a [`TypeRegistryArc`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rtti_reflect::Identity;
/// use rtti_reflect::info::Type;
/// use rtti_reflect::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register_type(Arc::new(Type::new("Player", 16)));
///
/// let by_name = registry.find_type_by_name("Player").unwrap();
/// let by_id = registry.find_type_by_id(Identity::of("Player")).unwrap();
/// assert!(Arc::ptr_eq(by_name, by_id));
///
/// assert!(registry.find_type_by_name("Ghost").is_none());
/// assert_eq!(registry.type_count(), 1);
/// ```
pub struct TypeRegistry {
    types_by_name: HashMap<&'static str, Arc<Type>>,
    types_by_id: IdentityMap<Arc<Type>>,
}

impl Default for TypeRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            types_by_name: HashMap::default(),
            types_by_id: IdentityMap::new(),
        }
    }

    /// Insert or **overwrite** a type.
    ///
    /// Returns the type previously registered under the same name, if any.
    pub fn register_type(&mut self, ty: Arc<Type>) -> Option<Arc<Type>> {
        let name = ty.name();
        let previous = self.types_by_name.insert(name, ty.clone());
        if previous.is_some() {
            log::warn!("type `{name}` registered twice, replacing the earlier one");
        }

        if let Some(collided) = self.types_by_id.insert(ty.identity(), ty)
            && collided.name() != name
        {
            log::warn!(
                "types `{}` and `{name}` share identity {}, dropping `{}`",
                collided.name(),
                collided.identity(),
                collided.name(),
            );
            self.types_by_name.remove(collided.name());
        }

        log::debug!("registered type `{name}`");
        previous
    }

    /// Insert a type unless its name is already taken.
    ///
    /// Returns the type registered under that name afterwards.
    pub fn try_register_type(&mut self, ty: Arc<Type>) -> Arc<Type> {
        if let Some(existing) = self.types_by_name.get(ty.name()) {
            return existing.clone();
        }
        self.register_type(ty.clone());
        ty
    }

    #[inline]
    pub fn find_type_by_name(&self, name: &str) -> Option<&Arc<Type>> {
        self.types_by_name.get(name)
    }

    #[inline]
    pub fn find_type_by_id(&self, identity: Identity) -> Option<&Arc<Type>> {
        self.types_by_id.get(identity)
    }

    /// The registered type of `instance`'s concrete class.
    #[inline]
    pub fn type_of(&self, instance: &dyn Reflected) -> Option<&Arc<Type>> {
        self.find_type_by_id(instance.reflect_identity())
    }

    /// Returns `true` if a type is registered under `name`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.types_by_name.contains_key(name)
    }

    /// Number of registered type names.
    #[inline]
    pub fn type_count(&self) -> usize {
        self.types_by_name.len()
    }

    /// A snapshot of every registered type, in no particular order.
    pub fn all_types(&self) -> Vec<Arc<Type>> {
        self.types_by_name.values().cloned().collect()
    }

    /// Iterate over the registered types, in no particular order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<Type>> {
        self.types_by_name.values()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.types_by_name.keys()).finish()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

use core::cell::RefCell;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

std::thread_local! {
    /// Types whose `describe` is running on this thread, per registry address.
    static DESCRIBING: RefCell<Vec<(usize, Identity)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a type as being described until dropped.
struct DescribeGuard {
    key: (usize, Identity),
}

impl DescribeGuard {
    fn enter(key: (usize, Identity)) -> Self {
        DESCRIBING.with_borrow_mut(|stack| stack.push(key));
        Self { key }
    }
}

impl Drop for DescribeGuard {
    fn drop(&mut self) {
        DESCRIBING.with_borrow_mut(|stack| {
            if let Some(index) = stack.iter().rposition(|key| *key == self.key) {
                stack.remove(index);
            }
        });
    }
}

/// A shared, thread-safe [`TypeRegistry`].
///
/// Cloning yields another handle to the same registry. Every operation takes
/// the lock internally and hands out `Arc<Type>` clones, so no lock is held
/// once it returns. A poisoned lock is recovered, since registration never
/// leaves the registry half-updated.
///
/// # Examples
///
/// ```
/// use rtti_reflect::registry::{Describe, TypeBuilder, TypeRegistryArc};
/// use rtti_reflect::impl_reflected;
///
/// #[derive(Default)]
/// struct Door {
///     open: bool,
/// }
///
/// impl_reflected!(Door);
///
/// impl Describe for Door {
///     fn describe(builder: &mut TypeBuilder<'_, Self>) {
///         builder
///             .property("open", |d| &d.open, |d| &mut d.open)
///             .default_factory();
///     }
/// }
///
/// let registry = TypeRegistryArc::new();
/// let ty = registry.register::<Door>();
///
/// assert!(registry.contains("Door"));
/// let door = registry.create_instance_as::<Door>("Door").unwrap();
/// assert!(!door.open);
/// assert_eq!(ty.properties().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Create a handle to a new, empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or **overwrite** a type, see [`TypeRegistry::register_type`].
    pub fn register_type(&self, ty: impl Into<Arc<Type>>) -> Arc<Type> {
        let ty = ty.into();
        self.write().register_type(ty.clone());
        ty
    }

    /// Register `T` if no type is registered under its name yet.
    ///
    /// [`Describe::describe`] runs without the lock held, so it may register
    /// the parent class first. When several threads register `T`
    /// concurrently, all of them get the same `Arc<Type>`.
    pub fn register<T: Describe>(&self) -> Arc<Type> {
        let existing = self.find_type_by_name(T::type_name());
        if let Some(ty) = existing {
            return ty;
        }

        let ty = {
            let _guard = DescribeGuard::enter(self.describing_key(T::identity()));
            let mut builder = TypeBuilder::<T>::new(self);
            T::describe(&mut builder);
            Arc::new(builder.build())
        };

        self.write().try_register_type(ty)
    }

    /// Returns `true` while the [`Describe::describe`] of the type `identity`
    /// is running on this thread for this registry.
    pub fn is_describing(&self, identity: Identity) -> bool {
        let key = self.describing_key(identity);
        DESCRIBING.with_borrow(|stack| stack.contains(&key))
    }

    fn describing_key(&self, identity: Identity) -> (usize, Identity) {
        (Arc::as_ptr(&self.internal).addr(), identity)
    }

    /// Register every type submitted with [`auto_register!`](crate::auto_register).
    ///
    /// Repeated calls are cheap and never replace a registered type.
    /// Returns the number of submitted types, `0` when the `auto_register`
    /// feature is disabled.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&self) -> usize {
        #[cfg(feature = "auto_register")]
        let count = crate::registry::auto::register_all(self);
        #[cfg(not(feature = "auto_register"))]
        let count = 0;
        count
    }

    pub fn find_type_by_name(&self, name: &str) -> Option<Arc<Type>> {
        self.read().find_type_by_name(name).cloned()
    }

    pub fn find_type_by_id(&self, identity: Identity) -> Option<Arc<Type>> {
        self.read().find_type_by_id(identity).cloned()
    }

    /// The registered type of `instance`'s concrete class.
    pub fn type_of(&self, instance: &dyn Reflected) -> Option<Arc<Type>> {
        self.read().type_of(instance).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains(name)
    }

    pub fn type_count(&self) -> usize {
        self.read().type_count()
    }

    /// A snapshot of every registered type, in no particular order.
    pub fn all_types(&self) -> Vec<Arc<Type>> {
        self.read().all_types()
    }

    /// Create a default instance of the type registered under `name`.
    pub fn try_create_instance(&self, name: &str) -> Result<Box<dyn Reflected>, ReflectError> {
        self.find_type_by_name(name)
            .ok_or_else(|| ReflectError::UnknownType(name.to_string()))?
            .try_create_instance()
    }

    /// Create a default instance of the type registered under `name`.
    ///
    /// Returns `None` if the type is unknown or has no factory.
    pub fn create_instance(&self, name: &str) -> Option<Box<dyn Reflected>> {
        self.try_create_instance(name)
            .inspect_err(|err| log::debug!("create_instance: {err}"))
            .ok()
    }

    /// Create a default instance of the type registered under `name`, as a `T`.
    pub fn create_instance_as<T: Reflected>(&self, name: &str) -> Option<Box<T>> {
        self.create_instance(name)?.downcast::<T>().ok()
    }
}

impl fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{TypeRegistry, TypeRegistryArc};
    use crate::info::Type;
    use crate::{Identity, Reflected, TypeName};

    struct Lamp;

    crate::impl_reflected!(Lamp);

    #[test]
    fn both_indices_agree() {
        let mut registry = TypeRegistry::new();
        registry.register_type(Arc::new(Type::new("A", 1)));
        registry.register_type(Arc::new(Type::new("B", 2)));

        for ty in registry.iter() {
            let by_id = registry.find_type_by_id(ty.identity()).unwrap();
            assert!(Arc::ptr_eq(ty, by_id));
            assert_eq!(registry.find_type_by_name(ty.name()).unwrap().identity(), ty.identity());
        }
        assert_eq!(registry.iter().len(), 2);
        assert!(registry.find_type_by_id(Identity::of("C")).is_none());
    }

    #[test]
    fn last_write_wins() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register_type(Arc::new(Type::new("A", 1))).is_none());
        let replaced = registry.register_type(Arc::new(Type::new("A", 8)));

        assert_eq!(replaced.map(|ty| ty.size()), Some(1));
        assert_eq!(registry.type_count(), 1);
        assert_eq!(registry.find_type_by_name("A").unwrap().size(), 8);
        assert_eq!(registry.find_type_by_id(Identity::of("A")).unwrap().size(), 8);
    }

    #[test]
    fn try_register_keeps_first() {
        let mut registry = TypeRegistry::new();
        let first = registry.try_register_type(Arc::new(Type::new("A", 1)));
        let second = registry.try_register_type(Arc::new(Type::new("A", 2)));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.type_count(), 1);
    }

    #[test]
    fn type_of_instance() {
        let registry = TypeRegistryArc::new();
        assert!(registry.type_of(&Lamp).is_none());

        registry.register_type(Type::of::<Lamp>());
        let ty = registry.type_of(&Lamp).unwrap();
        assert_eq!(ty.identity(), Lamp::identity());
        assert_eq!(Lamp.reflect_type_name(), ty.name());
    }

    #[test]
    fn shared_handles() {
        let registry = TypeRegistryArc::new();
        let clone = registry.clone();
        clone.register_type(Type::new("Shared", 0));

        assert!(registry.contains("Shared"));
        assert_eq!(registry.all_types().len(), 1);
        assert_eq!(alloc::format!("{registry:?}"), "{\"Shared\"}");
        assert!(registry.create_instance("Shared").is_none());
        assert!(registry.create_instance("Missing").is_none());
    }
}
