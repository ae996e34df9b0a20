// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Receivers and their declared handler methods.
//!
//! ## Overview
//!
//! A receiver type implements [`Responder`] and declares its handlers once into
//! a [`Methods`] table: a name, the declared parameter types, and a closure.
//! Dispatchers build the table on the first lookup for a receiver type and
//! cache what they resolve from it, so `declare` is not on the hot path.
//!
//! ## Inheritance
//!
//! [`Methods::inherit`] pulls in an ancestor receiver's handlers through a
//! projection to the embedded ancestor. Inherited handlers sit one level
//! further from the concrete type and are always enumerated after the type's
//! own handlers, so an override declared on the subtype wins a tie.
//!
//! ## Replies
//!
//! Handlers return anything implementing [`Reply`]: `()` (never consumes),
//! `bool`, or a `Result` of either. Only `true` consumes the event.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::error::{ArgError, HandlerError};
use crate::score::{is_better, score};
use crate::types::{Scalar, TypeKey, Typed, Value};

/// A receiver whose handlers can be found by name.
pub trait Responder: 'static {
    /// Declare this type's handlers.
    fn declare(methods: &mut Methods<Self>)
    where
        Self: Sized;
}

/// Handler return values.
pub trait Reply {
    /// `Ok(true)` when the event was consumed.
    fn into_handled(self) -> Result<bool, HandlerError>;
}

impl Reply for () {
    fn into_handled(self) -> Result<bool, HandlerError> {
        Ok(false)
    }
}

impl Reply for bool {
    fn into_handled(self) -> Result<bool, HandlerError> {
        Ok(self)
    }
}

impl<T: Reply, E: Into<HandlerError>> Reply for Result<T, E> {
    fn into_handled(self) -> Result<bool, HandlerError> {
        self.map_err(Into::into)?.into_handled()
    }
}

/// One argument as seen by a handler: the caller's value or a value produced
/// by a call-shape rewrite.
pub enum Arg<'a> {
    /// An argument passed through unchanged.
    Borrowed(&'a dyn Value),
    /// A value created by a rewrite.
    Owned(Box<dyn Value>),
}

impl Arg<'_> {
    /// The argument value.
    pub fn value(&self) -> &dyn Value {
        match self {
            Self::Borrowed(v) => *v,
            Self::Owned(v) => v.as_ref(),
        }
    }
}

impl core::fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self.value(), f)
    }
}

/// Arguments delivered to a handler, already shaped to its parameters.
#[derive(Debug)]
pub struct Args<'a> {
    values: &'a [Arg<'a>],
}

impl<'a> Args<'a> {
    pub(crate) fn new(values: &'a [Arg<'a>]) -> Self {
        Self { values }
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw value at `index`.
    pub fn value(&self, index: usize) -> Result<&dyn Value, ArgError> {
        self.values
            .get(index)
            .map(Arg::value)
            .ok_or(ArgError::Missing {
                index,
                len: self.values.len(),
            })
    }

    /// The argument at `index` viewed as `T`, including ancestor views
    /// provided by [`Typed::upcast`].
    pub fn get<T: Typed>(&self, index: usize) -> Result<&T, ArgError> {
        let value = self.value(index)?;
        value
            .view(TypeKey::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
            .ok_or(ArgError::Type {
                index,
                expected: core::any::type_name::<T>(),
                actual: value.type_key().name(),
            })
    }

    /// The scalar at `index`, unboxing if the caller passed a boxed value.
    pub fn scalar<T: Scalar>(&self, index: usize) -> Result<T, ArgError> {
        let value = self.value(index)?;
        T::unbox(value).ok_or(ArgError::Type {
            index,
            expected: core::any::type_name::<T>(),
            actual: value.type_key().name(),
        })
    }
}

pub(crate) type Handler<R> = Rc<dyn Fn(&mut R, &Args<'_>) -> Result<bool, HandlerError>>;

/// A declared handler.
pub struct Method<R> {
    name: Cow<'static, str>,
    params: Vec<TypeKey>,
    depth: usize,
    handler: Handler<R>,
}

impl<R> Method<R> {
    /// Handler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types.
    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    /// Inheritance distance from the receiver type; `0` for its own handlers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn call(&self, receiver: &mut R, args: &Args<'_>) -> Result<bool, HandlerError> {
        (self.handler)(receiver, args)
    }
}

impl<R> core::fmt::Debug for Method<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

/// The handler table of a receiver type.
pub struct Methods<R> {
    methods: Vec<Rc<Method<R>>>,
}

impl<R> core::fmt::Debug for Methods<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.methods.iter()).finish()
    }
}

impl<R: 'static> Methods<R> {
    fn new() -> Self {
        Self {
            methods: Vec::new(),
        }
    }

    /// Declare a handler named `name` taking `params`.
    pub fn method<F, T>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        params: &[TypeKey],
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&mut R, &Args<'_>) -> T + 'static,
        T: Reply,
    {
        self.methods.push(Rc::new(Method {
            name: name.into(),
            params: params.to_vec(),
            depth: 0,
            handler: Rc::new(move |r: &mut R, args: &Args<'_>| handler(r, args).into_handled()),
        }));
        self
    }

    /// Inherit every handler of `P`, reached through `project`.
    pub fn inherit<P: Responder>(&mut self, project: fn(&mut R) -> &mut P) -> &mut Self {
        for m in Methods::<P>::of().methods {
            let inner = m.handler.clone();
            self.methods.push(Rc::new(Method {
                name: m.name.clone(),
                params: m.params.clone(),
                depth: m.depth + 1,
                handler: Rc::new(move |r: &mut R, args: &Args<'_>| inner(project(r), args)),
            }));
        }
        self
    }

    /// Number of declared and inherited handlers.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Handlers named `name`, own handlers first, then nearest ancestors.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Rc<Method<R>>> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// The best handler named `name` for arguments of types `actual`, with its
    /// per-parameter costs.
    pub(crate) fn best(&self, name: &str, actual: &[TypeKey]) -> Option<(Rc<Method<R>>, Vec<u32>)> {
        let mut best: Option<(Rc<Method<R>>, Vec<u32>)> = None;
        for m in self.named(name) {
            let Some(s) = score(actual, &m.params) else {
                continue;
            };
            if best.as_ref().is_none_or(|(_, old)| is_better(old, &s)) {
                best = Some((m.clone(), s));
            }
        }
        best
    }
}

impl<R: Responder> Methods<R> {
    /// Build the table for `R`.
    pub fn of() -> Self {
        let mut methods = Self::new();
        R::declare(&mut methods);
        // Stable: declaration order is kept within each level.
        methods.methods.sort_by_key(|m| m.depth);
        methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    struct Base {
        log: Vec<&'static str>,
    }

    impl Responder for Base {
        fn declare(methods: &mut Methods<Self>) {
            methods
                .method("tap", &[], |r: &mut Self, _| r.log.push("base tap"))
                .method("press", &[TypeKey::of::<i32>()], |r: &mut Self, _| {
                    r.log.push("base press");
                    true
                });
        }
    }

    struct Derived {
        base: Base,
        label: String,
    }

    impl Responder for Derived {
        fn declare(methods: &mut Methods<Self>) {
            methods
                .inherit(|d| &mut d.base)
                .method("tap", &[], |r: &mut Self, _| {
                    r.label.push('!');
                    true
                });
        }
    }

    #[test]
    fn own_methods_precede_inherited() {
        let table = Methods::<Derived>::of();
        let taps: Vec<usize> = table.named("tap").map(|m| m.depth()).collect();
        assert_eq!(taps, vec![0, 1]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn override_wins_tie() {
        let table = Methods::<Derived>::of();
        let (m, costs) = table.best("tap", &[]).unwrap();
        assert_eq!(m.depth(), 0);
        assert!(costs.is_empty());
    }

    #[test]
    fn inherited_handler_runs_on_embedded_base() {
        let table = Methods::<Derived>::of();
        let (m, _) = table.best("press", &[TypeKey::of::<i32>()]).unwrap();
        let mut d = Derived {
            base: Base { log: Vec::new() },
            label: String::new(),
        };
        let seven = 7_i32;
        let values = [Arg::Borrowed(&seven)];
        assert!(m.call(&mut d, &Args::new(&values)).unwrap());
        assert_eq!(d.base.log, vec!["base press"]);
    }

    #[test]
    fn args_report_missing_and_mismatched() {
        let text = String::from("hi");
        let values = [Arg::Borrowed(&text), Arg::Owned(Box::new(3_i32))];
        let args = Args::new(&values);
        assert_eq!(args.get::<String>(0).unwrap(), "hi");
        assert_eq!(args.scalar::<i32>(1), Ok(3));
        assert_eq!(
            args.value(2).err(),
            Some(ArgError::Missing { index: 2, len: 2 })
        );
        assert!(matches!(
            args.get::<i32>(0),
            Err(ArgError::Type { index: 0, .. })
        ));
    }

    #[test]
    fn replies_map_to_handled() {
        assert!(!().into_handled().unwrap());
        assert!(true.into_handled().unwrap());
        let failed: Result<bool, ArgError> = Err(ArgError::Missing { index: 0, len: 0 });
        assert!(failed.into_handled().is_err());
    }
}
