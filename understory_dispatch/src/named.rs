// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named-event dispatch.
//!
//! ## Overview
//!
//! A [`NamedEvent`] dispatcher delivers one event name to a receiver. For each
//! receiver type and argument-type signature it builds, once, an ordered
//! candidate set:
//!
//! 1. The base shape: the supplied argument types, matched exactly or through
//!    ancestors.
//! 2. Shapes contributed by each registered [`Transformer`], in registration
//!    order.
//!
//! A shape joins the set only if it binds a real handler. A handler may
//! appear more than once under different parameter lists (a reversed
//! rewrite, say), but a repeat of the same handler and parameter list is
//! dropped.
//!
//! ## Delivery
//!
//! [`NamedEvent::dispatch`] walks the set in order, rewriting the arguments for
//! each shape and calling its handler, and stops at the first handler that
//! replies `true`. Handlers that reply `false` or nothing do not stop the walk,
//! so several overloads can run for one event.
//!
//! ## Transformers
//!
//! A [`Transformer`] looks at the argument types and proposes extra
//! [`CallShape`]s. See [`transform`](crate::transform) for the built-in ones.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::cache::{CacheStats, ResolutionCache, ResolutionKey};
use crate::error::DispatchError;
use crate::methods::{Arg, Args, Method, Methods, Responder};
use crate::types::{TypeKey, Value, type_keys};

type Rewrite = dyn for<'a> Fn(&[&'a dyn Value]) -> Vec<Arg<'a>>;

/// A candidate parameter list plus the argument rewrite that fits it.
#[derive(Clone)]
pub struct CallShape {
    params: Vec<TypeKey>,
    rewrite: Rc<Rewrite>,
}

impl CallShape {
    /// A shape with a custom rewrite.
    ///
    /// `rewrite` must produce exactly `params.len()` arguments whose runtime
    /// types are compatible with `params`.
    pub fn new<F>(params: Vec<TypeKey>, rewrite: F) -> Self
    where
        F: for<'a> Fn(&[&'a dyn Value]) -> Vec<Arg<'a>> + 'static,
    {
        Self {
            params,
            rewrite: Rc::new(rewrite),
        }
    }

    /// The arguments as supplied.
    pub fn identity(params: &[TypeKey]) -> Self {
        Self::new(params.to_vec(), pass_through)
    }

    /// The first `params.len()` arguments.
    pub fn truncated(params: &[TypeKey]) -> Self {
        let n = params.len();
        Self::new(params.to_vec(), move |args| {
            args.iter().take(n).map(|a| Arg::Borrowed(*a)).collect()
        })
    }

    /// The arguments in reverse order; `params` are the supplied types.
    pub fn reversed(params: &[TypeKey]) -> Self {
        Self::new(params.iter().rev().copied().collect(), reverse)
    }

    /// Declared parameter types.
    pub fn params(&self) -> &[TypeKey] {
        &self.params
    }

    /// Rewrite `args` for this shape.
    pub fn rewrite<'a>(&self, args: &[&'a dyn Value]) -> Vec<Arg<'a>> {
        (self.rewrite)(args)
    }
}

fn pass_through<'a>(args: &[&'a dyn Value]) -> Vec<Arg<'a>> {
    args.iter().map(|a| Arg::Borrowed(*a)).collect()
}

fn reverse<'a>(args: &[&'a dyn Value]) -> Vec<Arg<'a>> {
    args.iter().rev().map(|a| Arg::Borrowed(*a)).collect()
}

impl core::fmt::Debug for CallShape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallShape")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Contributes extra call shapes for a set of argument types.
pub trait Transformer {
    /// Shapes to try after the base shape, most preferred first.
    fn shapes(&self, args: &[TypeKey]) -> Vec<CallShape>;
}

struct Candidate<R> {
    method: Rc<Method<R>>,
    shape: CallShape,
}

/// Dispatcher for one event name.
pub struct NamedEvent {
    name: Cow<'static, str>,
    transformers: Vec<Box<dyn Transformer>>,
    cache: ResolutionCache,
}

impl core::fmt::Debug for NamedEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NamedEvent")
            .field("name", &self.name)
            .field("transformers", &self.transformers.len())
            .field("cache", &self.cache)
            .finish()
    }
}

impl NamedEvent {
    /// Create a dispatcher that only tries the base shape.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            transformers: Vec::new(),
            cache: ResolutionCache::default(),
        }
    }

    /// Add a transformer; its shapes are tried after those already registered.
    pub fn with_transformer(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// Event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cache counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Whether the receiver's type has any handler for these arguments.
    ///
    /// Only the type `R` is consulted; the receiver itself is not touched.
    pub fn is_supported_by<R: Responder>(&self, _receiver: &R, args: &[&dyn Value]) -> bool {
        !self.candidates::<R>(args).is_empty()
    }

    /// Deliver the event. Returns `Ok(true)` if a handler consumed it.
    pub fn dispatch<R: Responder>(
        &self,
        receiver: &mut R,
        args: &[&dyn Value],
    ) -> Result<bool, DispatchError> {
        let candidates = self.candidates::<R>(args);
        for c in candidates.iter() {
            let values = c.shape.rewrite(args);
            let handled = c
                .method
                .call(receiver, &Args::new(&values))
                .map_err(|source| DispatchError::Invocation {
                    name: self.name.clone(),
                    source,
                })?;
            if handled {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Parameter lists of the resolved candidates for receiver type `R`, in
    /// the order [`dispatch`](Self::dispatch) tries them.
    pub fn resolved_shapes<R: Responder>(&self, args: &[&dyn Value]) -> Vec<Vec<TypeKey>> {
        self.candidates::<R>(args)
            .iter()
            .map(|c| c.shape.params().to_vec())
            .collect()
    }

    fn candidates<R: Responder>(&self, args: &[&dyn Value]) -> Rc<Vec<Candidate<R>>> {
        let key = ResolutionKey::new::<R>(type_keys(args));
        self.cache
            .get_or_resolve(key, |key| self.lookup_transformers::<R>(key.args()))
    }

    fn lookup_transformers<R: Responder>(&self, arg_types: &[TypeKey]) -> Vec<Candidate<R>> {
        let methods = Methods::<R>::of();
        let mut out: Vec<Candidate<R>> = Vec::new();
        let shapes = core::iter::once(CallShape::identity(arg_types))
            .chain(self.transformers.iter().flat_map(|t| t.shapes(arg_types)));
        for shape in shapes {
            let Some((method, _)) = methods.best(&self.name, shape.params()) else {
                continue;
            };
            if out
                .iter()
                .any(|c| Rc::ptr_eq(&c.method, &method) && c.shape.params() == shape.params())
            {
                continue;
            }
            out.push(Candidate { method, shape });
        }
        log::debug!(
            "event `{}` on {} with {:?}: {} candidate(s)",
            self.name,
            core::any::type_name::<R>(),
            arg_types,
            out.len()
        );
        out
    }
}
