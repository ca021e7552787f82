use alloc::boxed::Box;
use alloc::string::ToString;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use rtti_utils::hash::HashMap;

use crate::info::{Method, Property};
use crate::{Identity, ReflectError, Reflected, TypeName, Value};

/// Creates a default instance of a class, see [`Type::set_factory`].
pub type Factory = Box<dyn Fn() -> Box<dyn Reflected> + Send + Sync>;

// -----------------------------------------------------------------------------
// Type

/// The runtime description of a reflected class.
///
/// A `Type` holds the class name and its [`Identity`], its size, an optional
/// parent, the properties and methods it declares (in declaration order), and
/// an optional factory. It is assembled once, usually by a
/// [`TypeBuilder`](crate::registry::TypeBuilder), then shared as an
/// `Arc<Type>` and never modified again.
///
/// Member lookup with [`get_property`](Type::get_property) and
/// [`get_method`](Type::get_method) only sees members declared by this class,
/// [`find_property`](Type::find_property) and
/// [`find_method`](Type::find_method) also search the ancestors.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rtti_reflect::info::Type;
///
/// let object = Arc::new(Type::new("Object", 0));
///
/// let mut actor = Type::new("Actor", 8);
/// actor.set_parent(object.clone());
///
/// assert!(actor.is_a_named("Actor"));
/// assert!(actor.is_a_named("Object"));
/// assert!(!object.is_a_named("Actor"));
/// assert_eq!(actor.depth(), 1);
/// ```
pub struct Type {
    name: &'static str,
    identity: Identity,
    size: usize,
    parent: Option<Arc<Type>>,
    properties: Vec<Property>,
    property_index: HashMap<&'static str, usize>,
    methods: Vec<Method>,
    method_index: HashMap<&'static str, usize>,
    factory: Option<Factory>,
}

impl Type {
    /// Create a root type without members.
    pub fn new(name: &'static str, size: usize) -> Self {
        Self {
            name,
            identity: Identity::of(name),
            size,
            parent: None,
            properties: Vec::new(),
            property_index: HashMap::default(),
            methods: Vec::new(),
            method_index: HashMap::default(),
            factory: None,
        }
    }

    /// Create a root type named after `T`, sized like `T`.
    #[inline]
    pub fn of<T: TypeName>() -> Self {
        Self::new(T::type_name(), size_of::<T>())
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Always equal to `Identity::of(self.name())`.
    #[inline]
    pub const fn identity(&self) -> Identity {
        self.identity
    }

    /// Size of an instance in bytes.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    // -------------------------------------------------------------------------
    // Hierarchy

    #[inline]
    pub fn parent(&self) -> Option<&Arc<Type>> {
        self.parent.as_ref()
    }

    /// Set the parent class.
    pub fn set_parent(&mut self, parent: Arc<Type>) {
        if let Some(old) = &self.parent {
            log::warn!(
                "type `{}`: parent `{}` replaced by `{}`",
                self.name,
                old.name,
                parent.name,
            );
        }
        self.parent = Some(parent);
    }

    /// Iterate over this type and then its ancestors, nearest first.
    pub fn hierarchy(&self) -> impl Iterator<Item = &Type> {
        core::iter::successors(Some(self), |ty| ty.parent.as_deref())
    }

    /// Iterate over the ancestors, nearest first.
    #[inline]
    pub fn ancestors(&self) -> impl Iterator<Item = &Type> {
        self.hierarchy().skip(1)
    }

    /// Number of ancestors.
    #[inline]
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Returns `true` if this type, or one of its ancestors, has `identity`.
    #[inline]
    pub fn is_a(&self, identity: Identity) -> bool {
        self.hierarchy().any(|ty| ty.identity == identity)
    }

    /// [`is_a`](Type::is_a) with the identity of `name`.
    #[inline]
    pub fn is_a_named(&self, name: &str) -> bool {
        self.is_a(Identity::of(name))
    }

    /// [`is_a`](Type::is_a) with the identity of `T`.
    #[inline]
    pub fn is<T: TypeName>(&self) -> bool {
        self.is_a(T::identity())
    }

    /// Returns `true` if `other` is this type or one of its ancestors.
    ///
    /// A type counts as its own child.
    #[inline]
    pub fn is_child_of(&self, other: &Type) -> bool {
        self.is_a(other.identity)
    }

    // -------------------------------------------------------------------------
    // Properties

    /// Add a property; one with the same name is replaced in place.
    pub fn add_property(&mut self, property: Property) {
        match self.property_index.get(property.name()) {
            Some(&index) => {
                log::warn!(
                    "type `{}`: property `{}` declared twice, keeping the last one",
                    self.name,
                    property.name(),
                );
                self.properties[index] = property;
            }
            None => {
                self.property_index
                    .insert(property.name(), self.properties.len());
                self.properties.push(property);
            }
        }
    }

    /// The property declared by this type under `name`.
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        let index = *self.property_index.get(name)?;
        self.properties.get(index)
    }

    /// The property `name` of this type or of its nearest ancestor declaring it.
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.hierarchy().find_map(|ty| ty.get_property(name))
    }

    /// Properties declared by this type, in declaration order.
    #[inline]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    // -------------------------------------------------------------------------
    // Methods

    /// Add a method; one with the same name is replaced in place.
    pub fn add_method(&mut self, method: Method) {
        match self.method_index.get(method.name()) {
            Some(&index) => {
                log::warn!(
                    "type `{}`: method `{}` declared twice, keeping the last one",
                    self.name,
                    method.name(),
                );
                self.methods[index] = method;
            }
            None => {
                self.method_index.insert(method.name(), self.methods.len());
                self.methods.push(method);
            }
        }
    }

    /// The method declared by this type under `name`.
    pub fn get_method(&self, name: &str) -> Option<&Method> {
        let index = *self.method_index.get(name)?;
        self.methods.get(index)
    }

    /// The method `name` of this type or of its nearest ancestor declaring it.
    pub fn find_method(&self, name: &str) -> Option<&Method> {
        self.hierarchy().find_map(|ty| ty.get_method(name))
    }

    /// Methods declared by this type, in declaration order.
    #[inline]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    // -------------------------------------------------------------------------
    // Instances

    /// Set the function creating default instances.
    #[inline]
    pub fn set_factory(&mut self, factory: Factory) {
        self.factory = Some(factory);
    }

    #[inline]
    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    /// Create a default instance.
    pub fn try_create_instance(&self) -> Result<Box<dyn Reflected>, ReflectError> {
        match &self.factory {
            Some(factory) => Ok(factory()),
            None => Err(ReflectError::NoFactory(self.name)),
        }
    }

    /// Create a default instance, or `None` if the type has no factory.
    #[inline]
    pub fn create_instance(&self) -> Option<Box<dyn Reflected>> {
        self.try_create_instance().ok()
    }

    /// Create a default instance and downcast it to `T`.
    pub fn create_instance_as<T: Reflected>(&self) -> Option<Box<T>> {
        self.create_instance()?.downcast::<T>().ok()
    }

    // -------------------------------------------------------------------------
    // Member access by name

    /// Read the property `name` (own or inherited) from `instance`.
    pub fn try_get_value(
        &self,
        instance: &dyn Reflected,
        name: &str,
    ) -> Result<Value, ReflectError> {
        self.find_property(name)
            .ok_or_else(|| self.property_not_found(name))?
            .try_get(instance)
    }

    /// Read the property `name` (own or inherited) from `instance`.
    ///
    /// Returns an empty [`Value`] on any failure.
    pub fn get_value(&self, instance: &dyn Reflected, name: &str) -> Value {
        self.try_get_value(instance, name).unwrap_or_else(|err| {
            log::debug!("get_value: {err}");
            Value::empty()
        })
    }

    /// Write the property `name` (own or inherited) of `instance`.
    pub fn try_set_value(
        &self,
        instance: &mut dyn Reflected,
        name: &str,
        value: Value,
    ) -> Result<(), ReflectError> {
        self.find_property(name)
            .ok_or_else(|| self.property_not_found(name))?
            .try_set(instance, value)
    }

    /// Write the property `name` (own or inherited) of `instance`.
    ///
    /// Does nothing on any failure.
    pub fn set_value(&self, instance: &mut dyn Reflected, name: &str, value: Value) {
        if let Err(err) = self.try_set_value(instance, name, value) {
            log::debug!("set_value: {err}");
        }
    }

    /// Invoke the method `name` (own or inherited) on `instance`.
    pub fn try_invoke(
        &self,
        instance: &mut dyn Reflected,
        name: &str,
        args: &[Value],
    ) -> Result<Value, ReflectError> {
        self.find_method(name)
            .ok_or_else(|| self.method_not_found(name))?
            .try_invoke(instance, args)
    }

    /// Invoke the method `name` (own or inherited) on `instance`.
    ///
    /// Returns an empty [`Value`] on any failure, or if the method returns `()`.
    pub fn invoke(&self, instance: &mut dyn Reflected, name: &str, args: &[Value]) -> Value {
        self.try_invoke(instance, name, args).unwrap_or_else(|err| {
            log::debug!("invoke: {err}");
            Value::empty()
        })
    }

    /// Invoke the [`CONST`](crate::info::MethodFlags::CONST) method `name`
    /// (own or inherited) on a shared `instance`.
    pub fn try_invoke_ref(
        &self,
        instance: &dyn Reflected,
        name: &str,
        args: &[Value],
    ) -> Result<Value, ReflectError> {
        self.find_method(name)
            .ok_or_else(|| self.method_not_found(name))?
            .try_invoke_ref(instance, args)
    }

    /// Invoke the [`CONST`](crate::info::MethodFlags::CONST) method `name`
    /// (own or inherited) on a shared `instance`.
    ///
    /// Returns an empty [`Value`] on any failure, or if the method returns `()`.
    pub fn invoke_ref(&self, instance: &dyn Reflected, name: &str, args: &[Value]) -> Value {
        self.try_invoke_ref(instance, name, args).unwrap_or_else(|err| {
            log::debug!("invoke_ref: {err}");
            Value::empty()
        })
    }

    fn method_not_found(&self, name: &str) -> ReflectError {
        ReflectError::MethodNotFound {
            ty: self.name,
            name: name.to_string(),
        }
    }

    fn property_not_found(&self, name: &str) -> ReflectError {
        ReflectError::PropertyNotFound {
            ty: self.name,
            name: name.to_string(),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("size", &self.size)
            .field("parent", &self.parent.as_ref().map(|p| p.name))
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests
