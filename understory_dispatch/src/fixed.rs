// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-arity dispatch.
//!
//! ## Overview
//!
//! A [`FixedArity`] dispatcher calls one handler name with a known number of
//! arguments. It scores every handler with that name and arity against the
//! supplied argument order *and* its full reversal, keeps the single best
//! pairing across both, and remembers the decision per receiver type and
//! argument types.
//!
//! ```
//! use understory_dispatch::fixed::FixedArity;
//! use understory_dispatch::methods::{Methods, Responder};
//! use understory_dispatch::types::TypeKey;
//!
//! struct Slider { value: i32 }
//!
//! impl Responder for Slider {
//!     fn declare(methods: &mut Methods<Self>) {
//!         methods.method("set", &[TypeKey::of::<i32>()], |s: &mut Self, args| {
//!             s.value = args.scalar::<i32>(0)?;
//!             Ok::<_, understory_dispatch::error::ArgError>(true)
//!         });
//!     }
//! }
//!
//! let set = FixedArity::new("set", 1);
//! let mut slider = Slider { value: 0 };
//! assert!(set.invoke(&mut slider, &[&42_i32]).unwrap());
//! assert_eq!(slider.value, 42);
//! ```

use alloc::borrow::Cow;
use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::cache::{CacheStats, ResolutionCache, ResolutionKey};
use crate::error::DispatchError;
use crate::methods::{Arg, Args, Method, Methods, Responder};
use crate::score::{is_better, score};
use crate::types::{TypeKey, Value, type_keys};

/// Dispatcher for one handler name at one arity.
#[derive(Debug)]
pub struct FixedArity {
    name: Cow<'static, str>,
    arity: usize,
    cache: ResolutionCache,
}

struct Plan<R> {
    method: Rc<Method<R>>,
    reversed: bool,
}

impl FixedArity {
    /// Create a dispatcher for handlers named `name` taking `arity` arguments.
    pub fn new(name: impl Into<Cow<'static, str>>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
            cache: ResolutionCache::default(),
        }
    }

    /// Handler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared arity.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Cache counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Call the best handler on `receiver`.
    ///
    /// Returns `Ok(true)` only if the handler replied `true`; a handler that
    /// returns nothing still runs but reports `false`. A receiver without a
    /// compatible handler also reports `false`.
    pub fn invoke<R: Responder>(
        &self,
        receiver: &mut R,
        args: &[&dyn Value],
    ) -> Result<bool, DispatchError> {
        let resolved = self.resolve::<R>(args)?;
        let Some(plan) = &*resolved else {
            return Ok(false);
        };
        let values: Vec<Arg<'_>> = if plan.reversed {
            args.iter().rev().map(|a| Arg::Borrowed(*a)).collect()
        } else {
            args.iter().map(|a| Arg::Borrowed(*a)).collect()
        };
        plan.method
            .call(receiver, &Args::new(&values))
            .map_err(|source| DispatchError::Invocation {
                name: self.name.clone(),
                source,
            })
    }

    /// Whether the receiver's type has a handler for these arguments.
    ///
    /// Only the type `R` is consulted; the receiver itself is not touched.
    pub fn supports<R: Responder>(
        &self,
        _receiver: &R,
        args: &[&dyn Value],
    ) -> Result<bool, DispatchError> {
        Ok(self.resolve::<R>(args)?.is_some())
    }

    fn resolve<R: Responder>(
        &self,
        args: &[&dyn Value],
    ) -> Result<Rc<Option<Plan<R>>>, DispatchError> {
        if args.len() != self.arity {
            return Err(DispatchError::ArityMismatch {
                name: self.name.clone(),
                expected: self.arity,
                actual: args.len(),
            });
        }
        let key = ResolutionKey::new::<R>(type_keys(args));
        Ok(self
            .cache
            .get_or_resolve(key, |key| self.scan::<R>(key.args())))
    }

    fn scan<R: Responder>(&self, actual: &[TypeKey]) -> Option<Plan<R>> {
        let methods = Methods::<R>::of();
        let reversed: Vec<_> = actual.iter().rev().copied().collect();
        let mut best: Option<(Plan<R>, Vec<u32>)> = None;
        for m in methods.named(&self.name) {
            if m.params().len() != self.arity {
                continue;
            }
            for (order, is_reversed) in [(actual, false), (reversed.as_slice(), true)] {
                let Some(s) = score(order, m.params()) else {
                    continue;
                };
                if best.as_ref().is_none_or(|(_, old)| is_better(old, &s)) {
                    best = Some((
                        Plan {
                            method: m.clone(),
                            reversed: is_reversed,
                        },
                        s,
                    ));
                }
            }
        }
        log::debug!(
            "fixed `{}`/{} on {}: {}",
            self.name,
            self.arity,
            core::any::type_name::<R>(),
            if best.is_some() { "resolved" } else { "no handler" }
        );
        best.map(|(plan, _)| plan)
    }
}
