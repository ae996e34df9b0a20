// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dispatch --heading-base-level=0

//! Understory Dispatch: named-event delivery to arbitrary receivers.
//!
//! ## Overview
//!
//! Given an event name and a list of runtime arguments, this crate finds the best
//! matching handler on a receiver, adapts the arguments to the handler's shape,
//! calls it, and reports whether the event was consumed.
//! Resolution decisions are cached per (receiver type, argument types), so the
//! scan happens once per dispatcher and signature.
//!
//! ## Pieces
//!
//! - [`types`]: runtime type descriptors ([`TypeKey`](crate::types::TypeKey)) and
//!   argument values ([`Value`](crate::types::Value)).
//! - [`score`]: conversion costs between argument and parameter types.
//! - [`methods`]: receivers ([`Responder`](crate::methods::Responder)) and their
//!   handler tables.
//! - [`fixed`]: one name at one arity, trying the supplied order and its reverse.
//! - [`named`]: one name against a family of [`CallShape`](crate::named::CallShape)s.
//! - [`transform`]: optional trailing arguments, reversed arguments, and location
//!   projection.
//! - [`touch`] and [`dpad`]: tables that turn raw input samples into named events.
//!
//! ## Resolution
//!
//! Handlers are scored per parameter: `0` for the same type or a scalar and its
//! boxed form, one per lineage step for an ancestor, incompatible otherwise.
//! The lowest total wins. On equal totals a later candidate replaces the
//! current best if it is strictly cheaper at any position, so the result
//! depends on enumeration order, which is fixed: own handlers before
//! inherited ones, each in declaration order. Identical scores keep the
//! earlier handler.
//! A receiver with no compatible handler is not an error; dispatch reports
//! `false` and the negative result is cached too.
//!
//! ## Example
//!
//! ```
//! use understory_dispatch::methods::{Methods, Responder};
//! use understory_dispatch::named::NamedEvent;
//! use understory_dispatch::types::{TypeKey, Typed};
//!
//! struct Card { title: &'static str }
//! impl Typed for Card {}
//!
//! #[derive(Default)]
//! struct Board { opened: Vec<&'static str>, bumps: u32 }
//!
//! impl Responder for Board {
//!     fn declare(methods: &mut Methods<Self>) {
//!         methods
//!             .method("open", &[TypeKey::of::<Card>()], |b: &mut Self, args| {
//!                 b.opened.push(args.get::<Card>(0)?.title);
//!                 // Not consumed: later shapes still run.
//!                 Ok::<_, understory_dispatch::error::ArgError>(false)
//!             })
//!             .method("open", &[], |b: &mut Self, _| {
//!                 b.bumps += 1;
//!                 true
//!             });
//!     }
//! }
//!
//! let open = NamedEvent::optional("open", 0);
//! let mut board = Board::default();
//! assert!(open.dispatch(&mut board, &[&Card { title: "Inbox" }]).unwrap());
//! assert_eq!(board.opened, ["Inbox"]);
//! assert_eq!(board.bumps, 1);
//! assert_eq!(open.stats().scans, 1);
//! ```
//!
//! ## Threading
//!
//! Dispatchers are single-threaded: caches use `RefCell` and handlers are held
//! in `Rc`. No cache borrow is held while a handler runs, so handlers may
//! dispatch again.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod cache;
pub mod dpad;
pub mod error;
pub mod fixed;
pub mod methods;
pub mod named;
pub mod score;
pub mod touch;
pub mod transform;
pub mod types;
