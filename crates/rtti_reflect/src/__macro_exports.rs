//! Paths used by exported macros, not public API.

pub use alloc::boxed::Box;

#[cfg(feature = "auto_register")]
pub use crate::registry::AutoRegistration;
#[cfg(feature = "auto_register")]
pub use inventory;
