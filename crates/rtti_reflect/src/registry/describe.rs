use alloc::boxed::Box;
use alloc::sync::Arc;
use core::marker::PhantomData;

use crate::info::{Factory, IntoMethod, Method, Property, Type};
use crate::registry::{TypeRegistryArc, global};
use crate::{Reflected, TypeName};

// -----------------------------------------------------------------------------
// Describe

/// A class that can describe its runtime [`Type`].
///
/// [`describe`](Describe::describe) runs once per registry, the first time
/// the class is registered there, see [`TypeRegistryArc::register`].
///
/// # Examples
///
/// ```
/// use rtti_reflect::registry::{Describe, TypeBuilder};
/// use rtti_reflect::{Value, impl_reflected};
///
/// #[derive(Default)]
/// struct Entity {
///     id: u64,
/// }
///
/// #[derive(Default)]
/// struct Monster {
///     entity: Entity,
///     rage: f32,
/// }
///
/// impl Monster {
///     fn roar(&self) -> f32 {
///         self.rage * 2.0
///     }
/// }
///
/// impl_reflected!(Entity);
/// impl_reflected!(Monster, parent = entity);
///
/// impl Describe for Entity {
///     fn describe(builder: &mut TypeBuilder<'_, Self>) {
///         builder.property("id", |e| &e.id, |e| &mut e.id);
///     }
/// }
///
/// impl Describe for Monster {
///     fn describe(builder: &mut TypeBuilder<'_, Self>) {
///         builder
///             .parent::<Entity>()
///             .property("rage", |m| &m.rage, |m| &mut m.rage)
///             .method("roar", Monster::roar)
///             .default_factory();
///     }
/// }
///
/// let ty = Monster::static_type();
/// assert!(ty.is::<Entity>());
///
/// let mut monster = ty.create_instance().unwrap();
/// ty.set_value(&mut *monster, "id", Value::new(12_u64));
/// ty.set_value(&mut *monster, "rage", Value::new(1.5_f32));
///
/// let roar = ty.invoke(&mut *monster, "roar", &[]);
/// assert_eq!(roar.downcast_ref::<f32>(), Some(&3.0));
/// assert_eq!(monster.downcast_ref::<Monster>().unwrap().entity.id, 12);
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not describe a reflected type",
    note = "implement `Describe` for `{Self}` and use `impl_reflected!` for its instances"
)]
pub trait Describe: Reflected + TypeName + Sized {
    /// Declare the parent, properties, methods and factory of the class.
    fn describe(builder: &mut TypeBuilder<'_, Self>);

    /// The [`Type`] of this class in the [`global`] registry,
    /// registered on first use.
    #[inline]
    fn static_type() -> Arc<Type> {
        global().register::<Self>()
    }
}

// -----------------------------------------------------------------------------
// TypeBuilder

/// Assembles the [`Type`] of `T` during [`Describe::describe`].
///
/// Members are added in call order. Declaring a member name twice keeps
/// the last declaration.
pub struct TypeBuilder<'r, T> {
    registry: &'r TypeRegistryArc,
    ty: Type,
    marker: PhantomData<fn() -> T>,
}

impl<'r, T: Describe> TypeBuilder<'r, T> {
    pub(crate) fn new(registry: &'r TypeRegistryArc) -> Self {
        Self {
            registry,
            ty: Type::of::<T>(),
            marker: PhantomData,
        }
    }

    pub(crate) fn build(self) -> Type {
        self.ty
    }

    /// The registry `T` is being registered into.
    #[inline]
    pub fn registry(&self) -> &'r TypeRegistryArc {
        self.registry
    }

    /// Set the parent class, registering it first if needed.
    ///
    /// `T` must embed a `P` and name that field in
    /// [`impl_reflected!`](crate::impl_reflected), otherwise the members
    /// inherited from `P` will reject instances of `T`.
    ///
    /// A parent that would close a cycle, `T` itself or a class still being
    /// described below `P`, is ignored.
    pub fn parent<P: Describe>(&mut self) -> &mut Self {
        if P::identity() == T::identity() {
            log::warn!("type `{}` cannot be its own parent", T::type_name());
            return self;
        }
        if self.registry.is_describing(P::identity()) {
            log::warn!(
                "ignoring parent `{}` of `{}`, it would form an inheritance cycle",
                P::type_name(),
                T::type_name(),
            );
            return self;
        }
        let parent = self.registry.register::<P>();
        self.ty.set_parent(parent);
        self
    }

    /// Add a prepared [`Property`].
    #[inline]
    pub fn add_property(&mut self, property: Property) -> &mut Self {
        self.ty.add_property(property);
        self
    }

    /// Add a prepared [`Method`].
    #[inline]
    pub fn add_method(&mut self, method: Method) -> &mut Self {
        self.ty.add_method(method);
        self
    }

    /// Add a read/write property.
    pub fn property<V>(
        &mut self,
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> &mut Self
    where
        V: TypeName + Clone + Send + Sync,
    {
        self.add_property(Property::of(name, get, get_mut))
    }

    /// Add a read/write property located at `offset` bytes into `T`.
    ///
    /// Usually called through [`reflect_property!`](crate::reflect_property).
    pub fn property_at<V>(
        &mut self,
        name: &'static str,
        offset: usize,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> &mut Self
    where
        V: TypeName + Clone + Send + Sync,
    {
        self.add_property(Property::of(name, get, get_mut).with_offset(offset))
    }

    /// Add a property without a setter.
    pub fn readonly_property<V>(&mut self, name: &'static str, get: fn(&T) -> &V) -> &mut Self
    where
        V: TypeName + Clone + Send + Sync,
    {
        self.add_property(Property::readonly(name, get))
    }

    /// Add a method, see [`IntoMethod`].
    pub fn method<Marker>(
        &mut self,
        name: &'static str,
        func: impl IntoMethod<T, Marker>,
    ) -> &mut Self {
        self.add_method(func.into_method(name))
    }

    /// Let the type create instances with `factory`.
    pub fn factory(&mut self, factory: fn() -> T) -> &mut Self {
        let factory: Factory = Box::new(move || -> Box<dyn Reflected> { Box::new(factory()) });
        self.ty.set_factory(factory);
        self
    }

    /// Let the type create instances with [`Default::default`].
    #[inline]
    pub fn default_factory(&mut self) -> &mut Self
    where
        T: Default,
    {
        self.factory(T::default)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{Describe, TypeBuilder};
    use crate::registry::TypeRegistryArc;
    use crate::{TypeName, Value};

    #[derive(Default)]
    struct Node {
        weight: u16,
    }

    #[derive(Default)]
    struct Branch {
        node: Node,
        leaves: u32,
    }

    struct Loop;

    struct Chicken;

    struct Egg;

    crate::impl_reflected!(Node);
    crate::impl_reflected!(Branch, parent = node);
    crate::impl_reflected!(Loop);
    crate::impl_reflected!(Chicken);
    crate::impl_reflected!(Egg);

    impl Describe for Node {
        fn describe(builder: &mut TypeBuilder<'_, Self>) {
            crate::reflect_property!(builder, Node, weight);
        }
    }

    impl Describe for Branch {
        fn describe(builder: &mut TypeBuilder<'_, Self>) {
            builder
                .parent::<Node>()
                .readonly_property("leaves", |b| &b.leaves)
                .factory(|| Branch {
                    leaves: 3,
                    ..Branch::default()
                });
        }
    }

    impl Describe for Loop {
        fn describe(builder: &mut TypeBuilder<'_, Self>) {
            builder.parent::<Loop>();
        }
    }

    #[test]
    fn parent_is_registered_first() {
        let registry = TypeRegistryArc::new();
        let branch = registry.register::<Branch>();
        let node = registry.find_type_by_name("Node").unwrap();

        assert!(Arc::ptr_eq(branch.parent().unwrap(), &node));
        assert!(branch.is::<Node>());
        assert_eq!(registry.type_count(), 2);
        assert_eq!(
            node.get_property("weight").unwrap().offset(),
            Some(core::mem::offset_of!(Node, weight))
        );
    }

    #[test]
    fn register_is_idempotent() {
        let registry = TypeRegistryArc::new();
        let first = registry.register::<Branch>();
        let second = registry.register::<Branch>();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.type_count(), 2);
    }

    #[test]
    fn factory_and_members() {
        let registry = TypeRegistryArc::new();
        let ty = registry.register::<Branch>();

        let mut branch = registry.create_instance("Branch").unwrap();
        let leaves = ty.get_value(&*branch, "leaves");
        assert_eq!(leaves.downcast_ref::<u32>(), Some(&3));

        ty.set_value(&mut *branch, "weight", Value::new(7_u16));
        ty.set_value(&mut *branch, "leaves", Value::new(9_u32));
        let branch = branch.downcast::<Branch>().unwrap();
        assert_eq!(branch.node.weight, 7);
        assert_eq!(branch.leaves, 3);
    }

    #[test]
    fn self_parent_is_ignored() {
        let registry = TypeRegistryArc::new();
        let ty = registry.register::<Loop>();
        assert!(ty.parent().is_none());
        assert_eq!(ty.identity(), Loop::identity());
    }

    impl Describe for Chicken {
        fn describe(builder: &mut TypeBuilder<'_, Self>) {
            builder.parent::<Egg>();
        }
    }

    impl Describe for Egg {
        fn describe(builder: &mut TypeBuilder<'_, Self>) {
            builder.parent::<Chicken>();
        }
    }

    #[test]
    fn indirect_parent_cycle_is_broken() {
        let registry = TypeRegistryArc::new();
        let chicken = registry.register::<Chicken>();
        let egg = registry.find_type_by_name("Egg").unwrap();

        assert!(Arc::ptr_eq(chicken.parent().unwrap(), &egg));
        assert!(egg.parent().is_none());
        assert_eq!(chicken.depth(), 1);
        assert!(!registry.is_describing(Chicken::identity()));
        assert!(!registry.is_describing(Egg::identity()));

        // Registering from the other side afterwards is a plain lookup.
        assert!(Arc::ptr_eq(&registry.register::<Egg>(), &egg));
        assert_eq!(registry.type_count(), 2);
    }

    #[test]
    fn static_type_uses_global() {
        let ty = Node::static_type();
        assert!(Arc::ptr_eq(&ty, &Node::static_type()));
        assert!(crate::registry::global().contains("Node"));
    }
}
