#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

// The registry needs `std` locks, everything else only needs `alloc`.
extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod identity;
mod macros;
mod name;
mod reflected;
mod value;

pub mod info;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::ReflectError;
pub use identity::{Identity, IdentityMap};
pub use name::TypeName;
pub use reflected::{Reflected, resolve, resolve_mut};
pub use value::Value;
