//! Registries of runtime types.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: types indexed by name and [`Identity`](crate::Identity).
//! - [`TypeRegistryArc`]: a shared, locked `TypeRegistry`.
//! - [`global`]: the process-wide `TypeRegistryArc`.
//! - [`Describe`]: a class describing its [`Type`](crate::info::Type).
//! - [`TypeBuilder`]: assembles a `Type` inside [`Describe::describe`].
//!
//! ## auto_register
//!
//! See [`TypeRegistryArc::auto_register`].
//!
//! We use the [`inventory`] crate for static registration. Types are
//! submitted with [`auto_register!`](crate::auto_register) and registered
//! in bulk at runtime.
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

#[cfg(feature = "auto_register")]
mod auto;
mod describe;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

#[cfg(feature = "auto_register")]
pub use auto::AutoRegistration;
pub use describe::{Describe, TypeBuilder};
pub use type_registry::{TypeRegistry, TypeRegistryArc};

// -----------------------------------------------------------------------------
// global

use std::sync::LazyLock;

static GLOBAL: LazyLock<TypeRegistryArc> = LazyLock::new(TypeRegistryArc::new);

/// The process-wide registry, created on first use and never torn down.
///
/// [`Describe::static_type`] registers into it. Code that needs isolation,
/// tests in particular, should create its own [`TypeRegistryArc`].
#[inline]
pub fn global() -> &'static TypeRegistryArc {
    &GLOBAL
}
