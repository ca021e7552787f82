use alloc::string::String;

use crate::Identity;

// -----------------------------------------------------------------------------
// TypeName

/// A static accessor to the name a type is known by at runtime.
///
/// The name is what a type's [`Identity`] is computed from, so two types
/// must never share one. Values and method arguments are only handed back
/// to callers asking for a type with the same name.
///
/// # Implementation
///
/// Classes usually get this through [`impl_reflected!`](crate::impl_reflected).
/// Plain value types use [`impl_type_name!`](crate::impl_type_name):
///
/// ```
/// use rtti_reflect::{TypeName, impl_type_name};
///
/// #[derive(Clone)]
/// struct Vec2 {
///     x: f32,
///     y: f32,
/// }
///
/// #[derive(Clone)]
/// struct Tag(u32);
///
/// impl_type_name!(Vec2);
/// impl_type_name!(Tag => "game::Tag");
///
/// assert_eq!(Vec2::type_name(), "Vec2");
/// assert_eq!(Tag::type_name(), "game::Tag");
/// ```
pub trait TypeName: 'static {
    /// Returns the runtime name of the type.
    fn type_name() -> &'static str;

    /// Returns the [`Identity`] computed from [`type_name`](TypeName::type_name).
    #[inline]
    fn identity() -> Identity {
        Identity::of(Self::type_name())
    }
}

crate::impl_type_name!(
    () => "()",
    bool => "bool",
    char => "char",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    String => "String",
    &'static str => "&str",
);

// -----------------------------------------------------------------------------
// Tests
