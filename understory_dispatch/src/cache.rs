// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-dispatcher resolution cache.
//!
//! Resolution results are keyed by [`ResolutionKey`] and computed at most once
//! per dispatcher. Entries are never invalidated: a receiver type's handler
//! table is fixed once declared.
//!
//! The cache is single-threaded. No borrow is held while a handler runs, so a
//! handler may dispatch again through the same dispatcher.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::cell::{Cell, RefCell};

use hashbrown::HashMap;

use crate::types::TypeKey;

/// Cache key: the receiver's concrete type and the argument types, in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    receiver: TypeId,
    args: Vec<TypeKey>,
}

impl ResolutionKey {
    /// Key for receiver type `R` and the given argument types.
    pub fn new<R: 'static>(args: Vec<TypeKey>) -> Self {
        Self {
            receiver: TypeId::of::<R>(),
            args,
        }
    }

    /// Receiver type id.
    pub fn receiver(&self) -> TypeId {
        self.receiver
    }

    /// Argument types.
    pub fn args(&self) -> &[TypeKey] {
        &self.args
    }
}

/// Counters describing cache behavior.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    /// Lookups that had to scan a handler table.
    pub scans: usize,
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Entries currently cached, including "not found" results.
    pub entries: usize,
}

/// Type-erased resolution results, one per key.
///
/// Values are stored as `Rc<dyn Any>` because one dispatcher serves many
/// receiver types; the key's receiver id fixes the concrete plan type.
#[derive(Default)]
pub(crate) struct ResolutionCache {
    entries: RefCell<HashMap<ResolutionKey, Rc<dyn Any>>>,
    scans: Cell<usize>,
    hits: Cell<usize>,
}

impl ResolutionCache {
    /// Return the cached plan for `key`, resolving it with `resolve` on a miss.
    pub(crate) fn get_or_resolve<P: 'static>(
        &self,
        key: ResolutionKey,
        resolve: impl FnOnce(&ResolutionKey) -> P,
    ) -> Rc<P> {
        let cached = self.entries.borrow().get(&key).cloned();
        if let Some(plan) = cached.and_then(|found| found.downcast::<P>().ok()) {
            self.hits.set(self.hits.get() + 1);
            return plan;
        }
        self.scans.set(self.scans.get() + 1);
        let plan = Rc::new(resolve(&key));
        self.entries
            .borrow_mut()
            .insert(key, plan.clone() as Rc<dyn Any>);
        plan
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            scans: self.scans.get(),
            hits: self.hits.get(),
            entries: self.entries.borrow().len(),
        }
    }
}

impl core::fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("stats", &self.stats())
            .finish()
    }
}
