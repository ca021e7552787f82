use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;

use crate::{Identity, ReflectError, Reflected, TypeName, Value};
use crate::{resolve, resolve_mut};

// -----------------------------------------------------------------------------
// MethodFlags

bitflags! {
    /// Properties of a [`Method`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MethodFlags: u8 {
        /// The method takes `&self` and never mutates the instance.
        const CONST = 1 << 0;
    }
}

// -----------------------------------------------------------------------------
// Parameter

/// The declared type of one method parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    type_name: &'static str,
    identity: Identity,
}

impl Parameter {
    #[inline]
    pub fn of<A: TypeName>() -> Self {
        Self {
            type_name: A::type_name(),
            identity: A::identity(),
        }
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub const fn identity(&self) -> Identity {
        self.identity
    }
}

// -----------------------------------------------------------------------------
// Method

/// Calls a method on an instance with type-erased arguments.
///
/// The variant follows the receiver of the wrapped function.
pub enum Invoker {
    /// The method takes `&mut self`.
    Mut(Box<dyn Fn(&mut dyn Reflected, &[Value]) -> Result<Value, ReflectError> + Send + Sync>),
    /// The method takes `&self`.
    Ref(Box<dyn Fn(&dyn Reflected, &[Value]) -> Result<Value, ReflectError> + Send + Sync>),
}

/// A named callable member of a reflected class.
///
/// Arguments are passed as a slice of [`Value`]s. A call only happens after
/// the argument count matches the declared arity, every argument holds its
/// parameter's exact type, and the instance is of the owning class (or
/// derived from it). A method returning `()` yields an empty [`Value`].
///
/// # Examples
///
/// ```
/// use rtti_reflect::info::Method;
/// use rtti_reflect::{Value, impl_reflected};
///
/// struct Wallet {
///     coins: u32,
/// }
///
/// impl Wallet {
///     fn deposit(&mut self, amount: u32) -> u32 {
///         self.coins += amount;
///         self.coins
///     }
/// }
///
/// impl_reflected!(Wallet);
///
/// let deposit = Method::of("deposit", Wallet::deposit);
/// let mut wallet = Wallet { coins: 5 };
///
/// let coins = deposit.invoke(&mut wallet, &[Value::new(10_u32)]);
/// assert_eq!(coins.downcast_ref::<u32>(), Some(&15));
///
/// // Wrong argument type: the method does not run.
/// assert!(!deposit.invoke(&mut wallet, &[Value::new(10_i32)]).is_valid());
/// assert_eq!(wallet.coins, 15);
/// ```
pub struct Method {
    name: &'static str,
    owner: &'static str,
    owner_identity: Identity,
    return_type: &'static str,
    return_identity: Identity,
    params: Box<[Parameter]>,
    flags: MethodFlags,
    invoker: Invoker,
}

impl Method {
    /// Create a method of class `T` returning `R` from a raw invoker.
    ///
    /// The arguments are checked against `params` before `invoker` runs.
    /// [`MethodFlags::CONST`] is set for an [`Invoker::Ref`].
    pub fn new<T: TypeName, R: TypeName>(
        name: &'static str,
        params: Vec<Parameter>,
        invoker: Invoker,
    ) -> Self {
        let flags = match invoker {
            Invoker::Ref(_) => MethodFlags::CONST,
            Invoker::Mut(_) => MethodFlags::empty(),
        };
        Self {
            name,
            owner: T::type_name(),
            owner_identity: T::identity(),
            return_type: R::type_name(),
            return_identity: R::identity(),
            params: params.into_boxed_slice(),
            flags,
            invoker,
        }
    }

    /// Create a method from a function taking `&mut T` or `&T` first.
    #[inline]
    pub fn of<T, Marker>(name: &'static str, func: impl IntoMethod<T, Marker>) -> Self {
        func.into_method(name)
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The name of the class declaring this method.
    #[inline]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    #[inline]
    pub const fn owner_identity(&self) -> Identity {
        self.owner_identity
    }

    #[inline]
    pub const fn return_type_name(&self) -> &'static str {
        self.return_type
    }

    #[inline]
    pub const fn return_identity(&self) -> Identity {
        self.return_identity
    }

    #[inline]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub const fn flags(&self) -> MethodFlags {
        self.flags
    }

    #[inline]
    pub const fn is_const(&self) -> bool {
        self.flags.contains(MethodFlags::CONST)
    }

    fn check_args(&self, args: &[Value]) -> Result<(), ReflectError> {
        if args.len() != self.params.len() {
            return Err(ReflectError::ArityMismatch {
                expected: self.params.len(),
                received: args.len(),
            });
        }
        for (index, (arg, param)) in args.iter().zip(self.params.iter()).enumerate() {
            if arg.identity() != param.identity {
                return Err(ReflectError::ArgumentMismatch {
                    index,
                    expected: param.type_name,
                    found: arg.describe(),
                });
            }
        }
        Ok(())
    }

    /// Call the method on `instance`.
    pub fn try_invoke(
        &self,
        instance: &mut dyn Reflected,
        args: &[Value],
    ) -> Result<Value, ReflectError> {
        self.check_args(args)?;
        match &self.invoker {
            Invoker::Mut(invoker) => invoker(instance, args),
            Invoker::Ref(invoker) => invoker(&*instance, args),
        }
    }

    /// Call a [`CONST`](MethodFlags::CONST) method on a shared `instance`.
    ///
    /// Methods taking `&mut self` are rejected with
    /// [`ReflectError::NotConst`].
    pub fn try_invoke_ref(
        &self,
        instance: &dyn Reflected,
        args: &[Value],
    ) -> Result<Value, ReflectError> {
        let Invoker::Ref(invoker) = &self.invoker else {
            return Err(ReflectError::NotConst(self.name));
        };
        self.check_args(args)?;
        invoker(instance, args)
    }

    /// Call the method on `instance`.
    ///
    /// Returns an empty [`Value`] if the call was rejected, or if the method
    /// returns `()`.
    pub fn invoke(&self, instance: &mut dyn Reflected, args: &[Value]) -> Value {
        self.try_invoke(instance, args).unwrap_or_else(|err| {
            log::debug!("invoke `{}::{}`: {err}", self.owner, self.name);
            Value::empty()
        })
    }

    /// Call a [`CONST`](MethodFlags::CONST) method on a shared `instance`.
    ///
    /// Returns an empty [`Value`] if the call was rejected, or if the method
    /// returns `()`.
    pub fn invoke_ref(&self, instance: &dyn Reflected, args: &[Value]) -> Value {
        self.try_invoke_ref(instance, args).unwrap_or_else(|err| {
            log::debug!("invoke `{}::{}`: {err}", self.owner, self.name);
            Value::empty()
        })
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("return_type", &self.return_type)
            .field("params", &self.params)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// IntoMethod

/// Marker for methods taking `&mut self`.
pub struct MutReceiver;

/// Marker for methods taking `&self`.
pub struct RefReceiver;

/// Conversion of a Rust function into a [`Method`] of class `T`.
///
/// Implemented for functions and closures whose first parameter is `&mut T`
/// or `&T`, followed by up to four arguments. Arguments must be `Clone`,
/// since they are copied out of the caller's [`Value`]s.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a reflected method of `{T}`",
    note = "the first parameter must be `&mut {T}` or `&{T}`, followed by at most 4 `Clone` arguments"
)]
pub trait IntoMethod<T, Marker>: Send + Sync + 'static {
    fn into_method(self, name: &'static str) -> Method;
}

fn argument<A: TypeName + Clone>(value: &Value, index: usize) -> Result<A, ReflectError> {
    value
        .downcast_ref::<A>()
        .cloned()
        .ok_or(ReflectError::ArgumentMismatch {
            index,
            expected: A::type_name(),
            found: value.describe(),
        })
}

fn mismatch<T: TypeName>(instance: &dyn Reflected) -> ReflectError {
    ReflectError::InstanceMismatch {
        expected: T::type_name(),
        actual: instance.reflect_type_name(),
    }
}

macro_rules! impl_into_method {
    ($($index:tt $arg:ident $val:ident),*) => {
        impl<T, F, R, $($arg,)*> IntoMethod<T, (MutReceiver, fn($($arg,)*) -> R)> for F
        where
            T: Reflected + TypeName,
            F: Fn(&mut T, $($arg,)*) -> R + Send + Sync + 'static,
            R: TypeName + Send + Sync,
            $($arg: TypeName + Clone,)*
        {
            fn into_method(self, name: &'static str) -> Method {
                let params = alloc::vec![$(Parameter::of::<$arg>(),)*];
                let arity = params.len();
                let func = self;
                let call = move |instance: &mut dyn Reflected,
                                 args: &[Value]|
                      -> Result<Value, ReflectError> {
                    let [$($val,)*] = args else {
                        return Err(ReflectError::ArityMismatch {
                            expected: arity,
                            received: args.len(),
                        });
                    };
                    $( let $val = argument::<$arg>($val, $index)?; )*
                    let error = mismatch::<T>(instance);
                    let this = resolve_mut::<T>(instance).ok_or(error)?;
                    Ok(Value::from_return(func(this, $($val,)*)))
                };
                Method::new::<T, R>(name, params, Invoker::Mut(Box::new(call)))
            }
        }

        impl<T, F, R, $($arg,)*> IntoMethod<T, (RefReceiver, fn($($arg,)*) -> R)> for F
        where
            T: Reflected + TypeName,
            F: Fn(&T, $($arg,)*) -> R + Send + Sync + 'static,
            R: TypeName + Send + Sync,
            $($arg: TypeName + Clone,)*
        {
            fn into_method(self, name: &'static str) -> Method {
                let params = alloc::vec![$(Parameter::of::<$arg>(),)*];
                let arity = params.len();
                let func = self;
                let call = move |instance: &dyn Reflected,
                                 args: &[Value]|
                      -> Result<Value, ReflectError> {
                    let [$($val,)*] = args else {
                        return Err(ReflectError::ArityMismatch {
                            expected: arity,
                            received: args.len(),
                        });
                    };
                    $( let $val = argument::<$arg>($val, $index)?; )*
                    let error = mismatch::<T>(instance);
                    let this = resolve::<T>(instance).ok_or(error)?;
                    Ok(Value::from_return(func(this, $($val,)*)))
                };
                Method::new::<T, R>(name, params, Invoker::Ref(Box::new(call)))
            }
        }
    };
}

impl_into_method!();
impl_into_method!(0 A0 a0);
impl_into_method!(0 A0 a0, 1 A1 a1);
impl_into_method!(0 A0 a0, 1 A1 a1, 2 A2 a2);
impl_into_method!(0 A0 a0, 1 A1 a1, 2 A2 a2, 3 A3 a3);

// -----------------------------------------------------------------------------
// Tests
