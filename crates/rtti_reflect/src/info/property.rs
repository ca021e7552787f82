use alloc::boxed::Box;
use core::fmt;

use bitflags::bitflags;

use crate::{Identity, ReflectError, Reflected, TypeName, Value};
use crate::{resolve, resolve_mut};

// -----------------------------------------------------------------------------
// PropertyFlags

bitflags! {
    /// Access capabilities of a [`Property`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// The property has a getter.
        const READABLE = 1 << 0;
        /// The property has a setter.
        const WRITABLE = 1 << 1;
    }
}

/// Reads a property from an instance, see [`Property::getter`].
pub type Getter = Box<dyn Fn(&dyn Reflected) -> Result<Value, ReflectError> + Send + Sync>;

/// Writes a property of an instance, see [`Property::setter`].
pub type Setter =
    Box<dyn Fn(&mut dyn Reflected, Value) -> Result<(), ReflectError> + Send + Sync>;

// -----------------------------------------------------------------------------
// Property

/// A named data member of a reflected class.
///
/// The getter returns a copy of the member wrapped in a [`Value`], the setter
/// moves a [`Value`] of the member's exact type into it. Both accept an
/// instance of the owning class or of any class derived from it.
///
/// # Examples
///
/// ```
/// use rtti_reflect::info::Property;
/// use rtti_reflect::{Value, impl_reflected};
///
/// struct Lamp {
///     power: u32,
/// }
///
/// impl_reflected!(Lamp);
///
/// let power = Property::of::<Lamp, u32>("power", |l| &l.power, |l| &mut l.power);
/// let mut lamp = Lamp { power: 40 };
///
/// assert_eq!(power.get(&lamp).downcast_ref::<u32>(), Some(&40));
///
/// power.set(&mut lamp, Value::new(60_u32));
/// assert_eq!(lamp.power, 60);
///
/// // Wrong value type: nothing is written.
/// power.set(&mut lamp, Value::new(75_i64));
/// assert_eq!(lamp.power, 60);
/// ```
pub struct Property {
    name: &'static str,
    owner: &'static str,
    owner_identity: Identity,
    value_type: &'static str,
    value_identity: Identity,
    offset: Option<usize>,
    flags: PropertyFlags,
    getter: Option<Getter>,
    setter: Option<Setter>,
}

impl Property {
    /// Create a property of class `T` holding a `V`.
    ///
    /// The flags follow from the accessors that are given.
    pub fn new<T: TypeName, V: TypeName>(
        name: &'static str,
        getter: Option<Getter>,
        setter: Option<Setter>,
    ) -> Self {
        let mut flags = PropertyFlags::empty();
        flags.set(PropertyFlags::READABLE, getter.is_some());
        flags.set(PropertyFlags::WRITABLE, setter.is_some());

        Self {
            name,
            owner: T::type_name(),
            owner_identity: T::identity(),
            value_type: V::type_name(),
            value_identity: V::identity(),
            offset: None,
            flags,
            getter,
            setter,
        }
    }

    /// Create a read/write property from a pair of field projections.
    pub fn of<T, V>(name: &'static str, get: fn(&T) -> &V, get_mut: fn(&mut T) -> &mut V) -> Self
    where
        T: Reflected + TypeName,
        V: TypeName + Clone + Send + Sync,
    {
        Self::new::<T, V>(name, Some(Self::getter(get)), Some(Self::setter(get_mut)))
    }

    /// Create a read-only property from a field projection.
    pub fn readonly<T, V>(name: &'static str, get: fn(&T) -> &V) -> Self
    where
        T: Reflected + TypeName,
        V: TypeName + Clone + Send + Sync,
    {
        Self::new::<T, V>(name, Some(Self::getter(get)), None)
    }

    /// Record the byte offset of the member inside its class.
    #[inline]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build a getter that copies the projected member out of a `T`.
    pub fn getter<T, V>(get: fn(&T) -> &V) -> Getter
    where
        T: Reflected + TypeName,
        V: TypeName + Clone + Send + Sync,
    {
        Box::new(move |instance: &dyn Reflected| {
            let actual = instance.reflect_type_name();
            let this = resolve::<T>(instance).ok_or(ReflectError::InstanceMismatch {
                expected: T::type_name(),
                actual,
            })?;
            Ok(Value::new(get(this).clone()))
        })
    }

    /// Build a setter that moves a `V` into the projected member of a `T`.
    ///
    /// Both the instance and the value are checked before anything is
    /// written.
    pub fn setter<T, V>(get_mut: fn(&mut T) -> &mut V) -> Setter
    where
        T: Reflected + TypeName,
        V: TypeName + Send + Sync,
    {
        Box::new(move |instance: &mut dyn Reflected, value: Value| {
            if !value.is::<V>() {
                return Err(ReflectError::ValueMismatch {
                    expected: V::type_name(),
                    found: value.describe(),
                });
            }
            let actual = instance.reflect_type_name();
            let this = resolve_mut::<T>(instance).ok_or(ReflectError::InstanceMismatch {
                expected: T::type_name(),
                actual,
            })?;
            match value.take::<V>() {
                Ok(value) => {
                    *get_mut(this) = value;
                    Ok(())
                }
                Err(value) => Err(ReflectError::ValueMismatch {
                    expected: V::type_name(),
                    found: value.describe(),
                }),
            }
        })
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The name of the class declaring this property.
    #[inline]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    #[inline]
    pub const fn owner_identity(&self) -> Identity {
        self.owner_identity
    }

    /// The name of the member's type.
    #[inline]
    pub const fn value_type(&self) -> &'static str {
        self.value_type
    }

    #[inline]
    pub const fn value_identity(&self) -> Identity {
        self.value_identity
    }

    /// Byte offset inside the owning class, if it was recorded.
    #[inline]
    pub const fn offset(&self) -> Option<usize> {
        self.offset
    }

    #[inline]
    pub const fn flags(&self) -> PropertyFlags {
        self.flags
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.flags.contains(PropertyFlags::READABLE)
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.flags.contains(PropertyFlags::WRITABLE)
    }

    /// Read the property from `instance`.
    pub fn try_get(&self, instance: &dyn Reflected) -> Result<Value, ReflectError> {
        match &self.getter {
            Some(getter) => getter(instance),
            None => Err(ReflectError::NotReadable(self.name)),
        }
    }

    /// Read the property from `instance`.
    ///
    /// Returns an empty [`Value`] if the property has no getter or the
    /// instance is not of the owning class.
    pub fn get(&self, instance: &dyn Reflected) -> Value {
        self.try_get(instance).unwrap_or_else(|err| {
            log::debug!("get `{}::{}`: {err}", self.owner, self.name);
            Value::empty()
        })
    }

    /// Write `value` into the property of `instance`.
    pub fn try_set(&self, instance: &mut dyn Reflected, value: Value) -> Result<(), ReflectError> {
        match &self.setter {
            Some(setter) => setter(instance, value),
            None => Err(ReflectError::NotWritable(self.name)),
        }
    }

    /// Write `value` into the property of `instance`.
    ///
    /// Does nothing if the property has no setter, the instance is not of
    /// the owning class, or `value` does not hold the member's type.
    pub fn set(&self, instance: &mut dyn Reflected, value: Value) {
        if let Err(err) = self.try_set(instance, value) {
            log::debug!("set `{}::{}`: {err}", self.owner, self.name);
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("value_type", &self.value_type)
            .field("offset", &self.offset)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{Property, PropertyFlags};
    use crate::{ReflectError, TypeName, Value};

    #[derive(Default)]
    struct Unit {
        hp: i32,
        tag: String,
    }

    #[derive(Default)]
    struct Hero {
        unit: Unit,
        level: u8,
    }

    struct Crate;

    crate::impl_reflected!(Unit);
    crate::impl_reflected!(Hero, parent = unit);
    crate::impl_reflected!(Crate);

    fn hp() -> Property {
        Property::of::<Unit, i32>("hp", |u| &u.hp, |u| &mut u.hp)
    }

    #[test]
    fn descriptor() {
        let hp = hp().with_offset(core::mem::offset_of!(Unit, hp));
        assert_eq!(hp.name(), "hp");
        assert_eq!(hp.owner(), "Unit");
        assert_eq!(hp.owner_identity(), Unit::identity());
        assert_eq!(hp.value_type(), "i32");
        assert_eq!(hp.value_identity(), i32::identity());
        assert_eq!(hp.offset(), Some(core::mem::offset_of!(Unit, hp)));
        assert_eq!(hp.flags(), PropertyFlags::READABLE | PropertyFlags::WRITABLE);
    }

    #[test]
    fn get_and_set() {
        let hp = hp();
        let tag = Property::of::<Unit, String>("tag", |u| &u.tag, |u| &mut u.tag);
        let mut unit = Unit::default();

        hp.set(&mut unit, Value::new(100_i32));
        tag.set(&mut unit, Value::new(String::from("Warrior")));

        assert_eq!(unit.hp, 100);
        assert_eq!(unit.tag, "Warrior");
        assert_eq!(hp.get(&unit).downcast_ref::<i32>(), Some(&100));
        assert_eq!(
            tag.get(&unit).downcast_ref::<String>().map(String::as_str),
            Some("Warrior")
        );
    }

    #[test]
    fn value_mismatch_writes_nothing() {
        let hp = hp();
        let mut unit = Unit { hp: 5, ..Unit::default() };

        hp.set(&mut unit, Value::new(7_i64));
        hp.set(&mut unit, Value::empty());
        assert_eq!(unit.hp, 5);

        assert_eq!(
            hp.try_set(&mut unit, Value::new(1.0_f32)),
            Err(ReflectError::ValueMismatch {
                expected: "i32",
                found: "f32",
            })
        );
        assert_eq!(
            hp.try_set(&mut unit, Value::empty()),
            Err(ReflectError::ValueMismatch {
                expected: "i32",
                found: "<empty>",
            })
        );
    }

    #[test]
    fn inherited_on_derived_instance() {
        let hp = hp();
        let mut hero = Hero::default();

        hp.set(&mut hero, Value::new(42_i32));
        assert_eq!(hero.unit.hp, 42);
        assert_eq!(hp.get(&hero).downcast_ref::<i32>(), Some(&42));
        assert_eq!(hero.level, 0);
    }

    #[test]
    fn instance_mismatch() {
        let hp = hp();
        let mut other = Crate;

        assert!(!hp.get(&other).is_valid());
        assert_eq!(
            hp.try_set(&mut other, Value::new(1_i32)),
            Err(ReflectError::InstanceMismatch {
                expected: "Unit",
                actual: "Crate",
            })
        );
    }

    #[test]
    fn readonly() {
        let level = Property::readonly::<Hero, u8>("level", |h| &h.level);
        let mut hero = Hero { level: 3, ..Hero::default() };

        assert!(level.is_readable());
        assert!(!level.is_writable());
        assert_eq!(
            level.try_set(&mut hero, Value::new(9_u8)),
            Err(ReflectError::NotWritable("level"))
        );
        assert_eq!(hero.level, 3);
        assert_eq!(level.get(&hero).downcast_ref::<u8>(), Some(&3));

        let hidden = Property::new::<Hero, u8>("hidden", None, None);
        assert!(hidden.flags().is_empty());
        assert_eq!(hidden.try_get(&hero).unwrap_err(), ReflectError::NotReadable("hidden"));
    }
}
