use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::{Identity, TypeName};

/// The name reported for an empty [`Value`] in errors and debug output.
pub(crate) const EMPTY_NAME: &str = "<empty>";

// -----------------------------------------------------------------------------
// Value

/// An owned, type-erased value tagged with the [`Identity`] of its type.
///
/// This is how data crosses the reflection boundary: property getters return
/// one, property setters and method invokers take them, and method results
/// come back in one.
///
/// A value only hands its content back to a caller asking for the type it
/// was created from. There is no conversion between related types, asking
/// an `f32` value for an `f64` yields `None`.
///
/// # Examples
///
/// ```
/// use rtti_reflect::{TypeName, Value};
///
/// let value = Value::new(30.0_f32);
///
/// assert!(value.is_valid());
/// assert_eq!(value.identity(), f32::identity());
/// assert_eq!(value.downcast_ref::<f32>(), Some(&30.0));
/// assert_eq!(value.downcast_ref::<f64>(), None);
///
/// let empty = Value::empty();
/// assert!(!empty.is_valid());
/// assert_eq!(empty.downcast_ref::<f32>(), None);
/// ```
///
/// A populated value cannot be copied, `Value` does not implement `Clone`:
///
/// ```compile_fail
/// use rtti_reflect::Value;
///
/// let value = Value::new(1_i32);
/// let copy = value.clone();
/// ```
///
/// Moving out with [`take_value`](Value::take_value) leaves the donor empty:
///
/// ```
/// use rtti_reflect::Value;
///
/// let mut donor = Value::new(1_i32);
/// let moved = donor.take_value();
///
/// assert!(!donor.is_valid());
/// assert_eq!(moved.downcast_ref::<i32>(), Some(&1));
/// ```
#[derive(Default)]
pub struct Value(Option<Erased>);

struct Erased {
    // Dropping the box runs the drop glue of the original type.
    data: Box<dyn Any + Send + Sync>,
    identity: Identity,
    type_name: &'static str,
}

impl Value {
    /// Create a value holding nothing.
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Move `value` into new owned storage.
    pub fn new<T: TypeName + Send + Sync>(value: T) -> Self {
        Self(Some(Erased {
            data: Box::new(value),
            identity: T::identity(),
            type_name: T::type_name(),
        }))
    }

    /// Wrap a method result, `()` becomes an empty value.
    pub(crate) fn from_return<R: TypeName + Send + Sync>(value: R) -> Self {
        if TypeId::of::<R>() == TypeId::of::<()>() {
            Self::empty()
        } else {
            Self::new(value)
        }
    }

    /// Returns `true` if the value holds something.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the identity of the held type, or [`Identity::NONE`].
    #[inline]
    pub fn identity(&self) -> Identity {
        match &self.0 {
            Some(erased) => erased.identity,
            None => Identity::NONE,
        }
    }

    /// Returns the name of the held type, or `None` if empty.
    #[inline]
    pub fn type_name(&self) -> Option<&'static str> {
        self.0.as_ref().map(|erased| erased.type_name)
    }

    /// Type name for diagnostics, `"<empty>"` when empty.
    #[inline]
    pub(crate) fn describe(&self) -> &'static str {
        self.type_name().unwrap_or(EMPTY_NAME)
    }

    /// Returns `true` if the value holds a `T`.
    #[inline]
    pub fn is<T: TypeName>(&self) -> bool {
        match &self.0 {
            Some(erased) => erased.identity == T::identity() && erased.data.is::<T>(),
            None => false,
        }
    }

    /// Returns a reference to the content if it is a `T`.
    pub fn downcast_ref<T: TypeName>(&self) -> Option<&T> {
        let erased = self.0.as_ref()?;
        if erased.identity != T::identity() {
            return None;
        }
        erased.data.downcast_ref::<T>()
    }

    /// Returns a mutable reference to the content if it is a `T`.
    pub fn downcast_mut<T: TypeName>(&mut self) -> Option<&mut T> {
        let erased = self.0.as_mut()?;
        if erased.identity != T::identity() {
            return None;
        }
        erased.data.downcast_mut::<T>()
    }

    /// Take the content out if it is a `T`, otherwise give the value back.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtti_reflect::Value;
    ///
    /// let value = Value::new(String::from("Hero"));
    /// let value = value.take::<i32>().unwrap_err();
    /// assert_eq!(value.take::<String>().unwrap(), "Hero");
    /// ```
    pub fn take<T: TypeName>(self) -> Result<T, Self> {
        match self.0 {
            Some(erased) if erased.identity == T::identity() => {
                let Erased {
                    data,
                    identity,
                    type_name,
                } = erased;
                match data.downcast::<T>() {
                    Ok(boxed) => Ok(*boxed),
                    Err(data) => Err(Self(Some(Erased {
                        data,
                        identity,
                        type_name,
                    }))),
                }
            }
            other => Err(Self(other)),
        }
    }

    /// Move the content into a new value, leaving this one empty.
    #[inline]
    pub fn take_value(&mut self) -> Value {
        core::mem::take(self)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.describe())
    }
}

// -----------------------------------------------------------------------------
// Tests
