// -----------------------------------------------------------------------------
// impl_type_name

/// Implement [`TypeName`](crate::TypeName) for one or more types.
///
/// A bare identifier uses itself as the name, `Type => "name"` picks one.
///
/// See [`TypeName`](crate::TypeName) for examples.
#[macro_export]
macro_rules! impl_type_name {
    ($($ty:ident),+ $(,)?) => {
        $( $crate::impl_type_name!($ty => ::core::stringify!($ty)); )+
    };
    ($($ty:ty => $name:expr),+ $(,)?) => {
        $(
            impl $crate::TypeName for $ty {
                #[inline(always)]
                fn type_name() -> &'static str {
                    $name
                }
            }
        )+
    };
}

// -----------------------------------------------------------------------------
// impl_reflected

/// Implement [`TypeName`](crate::TypeName) and [`Reflected`](crate::Reflected)
/// for a class.
///
/// - `impl_reflected!(Foo)`: a root type named `"Foo"`.
/// - `impl_reflected!(Foo as "game::Foo")`: a root type with an explicit name.
/// - `impl_reflected!(Bar, parent = base)`: `Bar` embeds its parent in the
///   field `base`, so descriptors of the parent type accept a `Bar`.
/// - `impl_reflected!(Bar as "game::Bar", parent = base)`.
///
/// # Examples
///
/// ```
/// use rtti_reflect::{Reflected, TypeName, impl_reflected};
///
/// struct Base {
///     id: i32,
/// }
///
/// struct Derived {
///     base: Base,
///     score: f32,
/// }
///
/// impl_reflected!(Base);
/// impl_reflected!(Derived, parent = base);
///
/// let derived = Derived { base: Base { id: 7 }, score: 0.0 };
/// let instance: &dyn Reflected = &derived;
///
/// assert_eq!(instance.reflect_type_name(), "Derived");
/// assert_eq!(instance.reflect_identity(), Derived::identity());
///
/// let base = instance.reflect_parent().unwrap();
/// assert_eq!(base.downcast_ref::<Base>().unwrap().id, 7);
/// ```
#[macro_export]
macro_rules! impl_reflected {
    (@impl $ty:ident, $name:expr $(, $parent:ident)?) => {
        impl $crate::TypeName for $ty {
            #[inline(always)]
            fn type_name() -> &'static str {
                $name
            }
        }

        impl $crate::Reflected for $ty {
            #[inline]
            fn reflect_type_name(&self) -> &'static str {
                $name
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #[inline]
            fn into_any(
                self: $crate::__macro_exports::Box<Self>,
            ) -> $crate::__macro_exports::Box<dyn ::core::any::Any> {
                self
            }

            $(
                #[inline]
                fn reflect_parent(&self) -> ::core::option::Option<&dyn $crate::Reflected> {
                    ::core::option::Option::Some(&self.$parent)
                }

                #[inline]
                fn reflect_parent_mut(
                    &mut self,
                ) -> ::core::option::Option<&mut dyn $crate::Reflected> {
                    ::core::option::Option::Some(&mut self.$parent)
                }
            )?
        }
    };
    ($ty:ident $(,)?) => {
        $crate::impl_reflected!(@impl $ty, ::core::stringify!($ty));
    };
    ($ty:ident as $name:literal $(,)?) => {
        $crate::impl_reflected!(@impl $ty, $name);
    };
    ($ty:ident, parent = $parent:ident $(,)?) => {
        $crate::impl_reflected!(@impl $ty, ::core::stringify!($ty), $parent);
    };
    ($ty:ident as $name:literal, parent = $parent:ident $(,)?) => {
        $crate::impl_reflected!(@impl $ty, $name, $parent);
    };
}

// -----------------------------------------------------------------------------
// reflect_property

/// Declare a read/write property for a field, recording its byte offset.
///
/// `reflect_property!(builder, Type, field)` names the property after the
/// field, `reflect_property!(builder, Type, "name" => field)` renames it.
/// Expands to [`TypeBuilder::property_at`](crate::registry::TypeBuilder::property_at),
/// so it can be chained like the builder's own methods.
///
/// # Examples
///
/// ```
/// use rtti_reflect::registry::{Describe, TypeBuilder, TypeRegistryArc};
/// use rtti_reflect::{impl_reflected, reflect_property};
///
/// struct Actor {
///     m_health: f32,
///     m_speed: f32,
/// }
///
/// impl_reflected!(Actor);
///
/// impl Describe for Actor {
///     fn describe(builder: &mut TypeBuilder<'_, Self>) {
///         reflect_property!(builder, Actor, "health" => m_health);
///         reflect_property!(builder, Actor, m_speed);
///     }
/// }
///
/// let ty = TypeRegistryArc::new().register::<Actor>();
/// let speed = ty.get_property("m_speed").unwrap();
/// assert_eq!(speed.offset(), Some(core::mem::offset_of!(Actor, m_speed)));
/// assert!(ty.get_property("health").is_some());
/// ```
#[macro_export]
macro_rules! reflect_property {
    ($builder:expr, $ty:ty, $field:ident) => {
        $crate::reflect_property!($builder, $ty, ::core::stringify!($field) => $field)
    };
    ($builder:expr, $ty:ty, $name:expr => $field:ident) => {
        $builder.property_at(
            $name,
            ::core::mem::offset_of!($ty, $field),
            |this| &this.$field,
            |this| &mut this.$field,
        )
    };
}

// -----------------------------------------------------------------------------
// auto_register

/// Submit types for [`TypeRegistryArc::auto_register`](crate::registry::TypeRegistryArc::auto_register).
///
/// Every listed type must implement [`Describe`](crate::registry::Describe).
/// Expands to nothing when the `auto_register` feature is disabled.
///
/// ```
/// use rtti_reflect::registry::{Describe, TypeBuilder};
/// use rtti_reflect::{auto_register, impl_reflected};
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
///         builder.property("open", |d| &d.open, |d| &mut d.open);
///     }
/// }
///
/// auto_register!(Door);
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::__macro_exports::inventory::submit! {
                $crate::__macro_exports::AutoRegistration::of::<$ty>()
            }
        )+
    };
}

/// Submit types for [`TypeRegistryArc::auto_register`](crate::registry::TypeRegistryArc::auto_register).
///
/// The `auto_register` feature is disabled, so this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! auto_register {
    ($($ty:ty),+ $(,)?) => {};
}
