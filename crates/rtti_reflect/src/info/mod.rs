//! Runtime descriptions of reflected classes.
//!
//! ## Menu
//!
//! - [`Type`]: a class, with its name, [`Identity`](crate::Identity), size,
//!   parent, members and factory.
//! - [`Property`]: a named data member, read and written through [`Value`](crate::Value)s.
//!     - [`PropertyFlags`]: `READABLE` and `WRITABLE`.
//! - [`Method`]: a named callable member, invoked with a slice of [`Value`](crate::Value)s.
//!     - [`Parameter`]: the declared type of one argument.
//!     - [`MethodFlags`]: `CONST` for methods taking `&self`.
//!     - [`IntoMethod`]: converts Rust functions into methods.

// -----------------------------------------------------------------------------
// Modules

mod method;
mod property;
mod ty;

// -----------------------------------------------------------------------------
// Exports

pub use method::{Invoker, IntoMethod, Method, MethodFlags, MutReceiver, Parameter, RefReceiver};
pub use property::{Getter, Property, PropertyFlags, Setter};
pub use ty::{Factory, Type};
