//! Static registration through `inventory`.
//!
//! Not every platform supports it, see the `inventory` documentation.
//! Where it does not, nothing is ever collected.

use crate::registry::{Describe, TypeRegistryArc};

/// A type submitted with [`auto_register!`](crate::auto_register).
pub struct AutoRegistration {
    name: fn() -> &'static str,
    register: fn(&TypeRegistryArc),
}

impl AutoRegistration {
    pub const fn of<T: Describe>() -> Self {
        Self {
            name: T::type_name,
            register: register::<T>,
        }
    }
}

fn register<T: Describe>(registry: &TypeRegistryArc) {
    registry.register::<T>();
}

inventory::collect!(AutoRegistration);

pub(super) fn register_all(registry: &TypeRegistryArc) -> usize {
    let mut count = 0;
    for entry in inventory::iter::<AutoRegistration> {
        log::trace!("auto registering `{}`", (entry.name)());
        (entry.register)(registry);
        count += 1;
    }
    count
}
