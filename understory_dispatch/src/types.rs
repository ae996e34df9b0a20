// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime type descriptors and argument values.
//!
//! ## Overview
//!
//! Dispatch needs to know, at run time, what an argument *is* and what it may
//! stand in for. [`TypeKey`] carries that information: identity, a readable
//! name, the lineage (one superclass plus any number of interfaces), and an
//! optional [`Primitive`] class shared between a scalar and its boxed form.
//!
//! Types opt in by implementing [`Typed`]. Every `Typed` value is a [`Value`],
//! which is what dispatchers accept as arguments (`&dyn Value`).
//!
//! ## Lineage
//!
//! ```
//! use core::any::Any;
//! use understory_dispatch::types::{TypeKey, Typed, Value};
//!
//! struct Animal { legs: u8 }
//! impl Typed for Animal {}
//!
//! struct Dog { base: Animal }
//! impl Typed for Dog {
//!     fn superclass() -> Option<TypeKey> { Some(TypeKey::of::<Animal>()) }
//!     fn upcast(&self, target: TypeKey) -> Option<&dyn Any> {
//!         (target == TypeKey::of::<Animal>()).then_some(&self.base as &dyn Any)
//!     }
//! }
//!
//! let dog = Dog { base: Animal { legs: 4 } };
//! let v: &dyn Value = &dog;
//! assert!(v.type_key().is_subtype_of(TypeKey::of::<Animal>()));
//! let animal = v.view(TypeKey::of::<Animal>()).and_then(|a| a.downcast_ref::<Animal>());
//! assert_eq!(animal.map(|a| a.legs), Some(4));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::hash::{Hash, Hasher};

/// Primitive classes.
///
/// A scalar (`i32`) and its boxed counterpart (`Box<i32>`) share a class, and
/// converting between them costs nothing during scoring.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Primitive {
    /// `bool`.
    Bool,
    /// `char`.
    Char,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
}

/// Runtime type descriptor.
///
/// Equality and hashing use the underlying [`TypeId`] only.
#[derive(Copy, Clone)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    superclass: fn() -> Option<TypeKey>,
    interfaces: fn() -> Vec<TypeKey>,
    primitive: Option<Primitive>,
}

impl TypeKey {
    /// Descriptor for `T`.
    pub fn of<T: Typed>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
            superclass: T::superclass,
            interfaces: T::interfaces,
            primitive: T::primitive(),
        }
    }

    /// The underlying type id.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name, as reported by [`core::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Direct superclass, if any.
    pub fn superclass(&self) -> Option<Self> {
        (self.superclass)()
    }

    /// Directly implemented interfaces, in declaration order.
    pub fn interfaces(&self) -> Vec<Self> {
        (self.interfaces)()
    }

    /// Primitive class, if this is a scalar or a boxed scalar.
    pub fn primitive(&self) -> Option<Primitive> {
        self.primitive
    }

    /// Whether `self` is `other` or has it anywhere in its lineage.
    ///
    /// Lineages are assumed to be acyclic.
    pub fn is_subtype_of(&self, other: Self) -> bool {
        if *self == other {
            return true;
        }
        if let Some(sup) = self.superclass()
            && sup.is_subtype_of(other)
        {
            return true;
        }
        self.interfaces().iter().any(|i| i.is_subtype_of(other))
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl core::fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name)
    }
}

/// Opt-in runtime type information.
///
/// All methods have defaults; a plain type needs only `impl Typed for T {}`.
/// Interfaces are usually zero-sized marker types that implement `Typed` and
/// list their own super-interfaces through [`Typed::interfaces`].
pub trait Typed: Any {
    /// Direct superclass.
    fn superclass() -> Option<TypeKey> {
        None
    }

    /// Directly implemented interfaces.
    fn interfaces() -> Vec<TypeKey> {
        Vec::new()
    }

    /// Primitive class for scalars and boxed scalars.
    fn primitive() -> Option<Primitive> {
        None
    }

    /// View `self` as one of its ancestors.
    ///
    /// Subtypes that embed their ancestor's data return it here, so a handler
    /// declared against the ancestor can read the argument. Deeper subtypes
    /// should delegate to their embedded base for targets further up.
    fn upcast(&self, target: TypeKey) -> Option<&dyn Any> {
        let _ = target;
        None
    }
}

/// A dispatch argument.
///
/// Blanket-implemented for every [`Typed`] type.
pub trait Value: Any {
    /// Runtime type of this value.
    fn type_key(&self) -> TypeKey;

    /// The value as [`Any`], for exact downcasts.
    fn as_any(&self) -> &dyn Any;

    /// The value viewed as `target`: itself when the types match, otherwise
    /// whatever [`Typed::upcast`] provides.
    fn view(&self, target: TypeKey) -> Option<&dyn Any>;
}

impl<T: Typed> Value for T {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn view(&self, target: TypeKey) -> Option<&dyn Any> {
        if target == TypeKey::of::<T>() {
            Some(self)
        } else {
            self.upcast(target)
        }
    }
}

impl dyn Value {
    /// Exact downcast.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl core::fmt::Debug for dyn Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Value({:?})", self.type_key())
    }
}

/// Runtime types of an argument list, in order.
pub fn type_keys(args: &[&dyn Value]) -> Vec<TypeKey> {
    args.iter().map(|a| a.type_key()).collect()
}

/// A scalar that can be read from either its plain or its boxed form.
pub trait Scalar: Typed + Copy {
    /// Read the scalar out of `value`, unboxing if needed.
    fn unbox(value: &dyn Value) -> Option<Self> {
        value
            .downcast_ref::<Self>()
            .copied()
            .or_else(|| value.downcast_ref::<Box<Self>>().map(|b| **b))
    }
}

macro_rules! impl_primitive {
    ($($ty:ty => $class:ident),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn primitive() -> Option<Primitive> {
                    Some(Primitive::$class)
                }
            }

            impl Typed for Box<$ty> {
                fn primitive() -> Option<Primitive> {
                    Some(Primitive::$class)
                }
            }

            impl Scalar for $ty {}
        )*
    };
}

impl_primitive! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

impl Typed for () {}
impl Typed for String {}
impl Typed for &'static str {}
impl Typed for kurbo::Point {}
impl Typed for kurbo::Vec2 {}
