use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::Identity;

// -----------------------------------------------------------------------------
// Reflected

/// An instance of a reflected class, seen through its type-erased handle.
///
/// Every instance carries the name of its concrete type (its tag) and can
/// project itself onto the part it inherits from its parent class. Property
/// and method descriptors of an ancestor use that projection to work on a
/// derived instance, see [`resolve`].
///
/// Implement it with [`impl_reflected!`](crate::impl_reflected), which also
/// implements [`TypeName`](crate::TypeName) with the same name.
///
/// # Examples
///
/// ```
/// use rtti_reflect::{Reflected, impl_reflected};
///
/// struct Light {
///     lumen: u32,
/// }
///
/// impl_reflected!(Light as "scene::Light");
///
/// let mut light = Light { lumen: 800 };
/// let instance: &mut dyn Reflected = &mut light;
///
/// assert_eq!(instance.reflect_type_name(), "scene::Light");
/// assert!(instance.is::<Light>());
/// instance.downcast_mut::<Light>().unwrap().lumen = 1200;
/// assert_eq!(light.lumen, 1200);
/// ```
pub trait Reflected: Any + Send + Sync + 'static {
    /// The registered name of the concrete type.
    fn reflect_type_name(&self) -> &'static str;

    /// The [`Identity`] of the concrete type.
    #[inline]
    fn reflect_identity(&self) -> Identity {
        Identity::of(self.reflect_type_name())
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// The embedded instance of the parent class, if any.
    #[inline]
    fn reflect_parent(&self) -> Option<&dyn Reflected> {
        None
    }

    /// The embedded instance of the parent class, if any.
    #[inline]
    fn reflect_parent_mut(&mut self) -> Option<&mut dyn Reflected> {
        None
    }
}

impl dyn Reflected {
    /// Returns `true` if the concrete type is exactly `T`.
    #[inline]
    pub fn is<T: Reflected>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcasts to the concrete type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Reflected>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Downcasts to the concrete type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Reflected>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Downcasts to the concrete type `T`, consuming the box.
    ///
    /// Returns the box unchanged if the concrete type is not `T`.
    pub fn downcast<T: Reflected>(self: Box<Self>) -> Result<Box<T>, Box<Self>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("`is` and `downcast` disagree"),
        }
    }

    /// The chain of embedded parents, starting with the parent of `self`.
    pub fn parents(&self) -> impl Iterator<Item = &dyn Reflected> {
        core::iter::successors(self.reflect_parent(), |current| current.reflect_parent())
    }
}

impl fmt::Debug for dyn Reflected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflected({})", self.reflect_type_name())
    }
}

// -----------------------------------------------------------------------------
// resolve

/// Find the `T` part of `instance`.
///
/// Returns `instance` itself if it is a `T`, otherwise walks the embedded
/// parents upward. Returns `None` if `T` is not an ancestor of the instance's
/// class.
///
/// # Examples
///
/// ```
/// use rtti_reflect::{Reflected, impl_reflected, resolve};
///
/// struct Base {
///     id: i32,
/// }
///
/// struct Derived {
///     base: Base,
/// }
///
/// struct Other;
///
/// impl_reflected!(Base);
/// impl_reflected!(Derived, parent = base);
/// impl_reflected!(Other);
///
/// let derived = Derived { base: Base { id: 3 } };
///
/// assert_eq!(resolve::<Base>(&derived).unwrap().id, 3);
/// assert!(resolve::<Derived>(&derived).is_some());
/// assert!(resolve::<Other>(&derived).is_none());
/// ```
pub fn resolve<T: Reflected>(instance: &dyn Reflected) -> Option<&T> {
    let mut current = instance;
    loop {
        if let Some(found) = current.downcast_ref::<T>() {
            return Some(found);
        }
        current = current.reflect_parent()?;
    }
}

/// Find the `T` part of `instance` by mutable reference.
///
/// See [`resolve`].
pub fn resolve_mut<T: Reflected>(instance: &mut dyn Reflected) -> Option<&mut T> {
    let mut current = instance;
    loop {
        if current.is::<T>() {
            return current.downcast_mut::<T>();
        }
        current = current.reflect_parent_mut()?;
    }
}

// -----------------------------------------------------------------------------
// Tests
