// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in transformers.
//!
//! - [`OptionalArgument`]: handlers may drop trailing arguments.
//! - [`ReversedArgument`]: handlers may take the arguments in reverse order.
//! - [`PayloadProjection`]: a location may be received as `(f32, f32)`,
//!   `(i32, i32)`, a [`PixelPoint`], or nothing at all.
//!
//! Each has a matching [`NamedEvent`] constructor.
//!
//! ```
//! use understory_dispatch::methods::{Methods, Responder};
//! use understory_dispatch::named::NamedEvent;
//! use understory_dispatch::types::TypeKey;
//!
//! struct Menu { clicked: Vec<String> }
//!
//! impl Responder for Menu {
//!     fn declare(methods: &mut Methods<Self>) {
//!         // Only cares about the item, not its position.
//!         methods.method("item_clicked", &[TypeKey::of::<String>()], |m: &mut Self, args| {
//!             m.clicked.push(args.get::<String>(0)?.clone());
//!             Ok::<_, understory_dispatch::error::ArgError>(true)
//!         });
//!     }
//! }
//!
//! let clicked = NamedEvent::optional("item_clicked", 1);
//! let mut menu = Menu { clicked: Vec::new() };
//! let item = String::from("Open");
//! assert!(clicked.dispatch(&mut menu, &[&item, &2_i32]).unwrap());
//! assert_eq!(menu.clicked, ["Open"]);
//! ```

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::Point;

use crate::methods::Arg;
use crate::named::{CallShape, NamedEvent, Transformer};
use crate::types::{TypeKey, Typed, Value};

/// Shapes that keep only the leading arguments, down to a minimum arity.
///
/// For `n` supplied arguments the shapes are `n, n - 1, …, minimum_arity`
/// arguments long, longest first.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OptionalArgument {
    minimum_arity: usize,
}

impl OptionalArgument {
    /// Allow handlers that take at least `minimum_arity` leading arguments.
    pub fn new(minimum_arity: usize) -> Self {
        Self { minimum_arity }
    }

    /// The shortest accepted arity.
    pub fn minimum_arity(&self) -> usize {
        self.minimum_arity
    }
}

impl Transformer for OptionalArgument {
    fn shapes(&self, args: &[TypeKey]) -> Vec<CallShape> {
        if args.len() < self.minimum_arity {
            return Vec::new();
        }
        (self.minimum_arity..=args.len())
            .rev()
            .map(|n| CallShape::truncated(&args[..n]))
            .collect()
    }
}

/// One shape: all arguments in reverse order.
///
/// Tried even when the forward shape also resolved, after it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ReversedArgument;

impl Transformer for ReversedArgument {
    fn shapes(&self, args: &[TypeKey]) -> Vec<CallShape> {
        vec![CallShape::reversed(args)]
    }
}

/// A location rounded to whole pixels.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct PixelPoint {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl PixelPoint {
    /// Create a pixel point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round `p` to the nearest pixel.
    pub fn round(p: Point) -> Self {
        let r = p.round();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Pixel coordinates fit in i32 for any realistic surface."
        )]
        let (x, y) = (r.x as i32, r.y as i32);
        Self::new(x, y)
    }
}

impl Typed for PixelPoint {}

/// Projections of a single [`Point`] argument.
///
/// In order: `(f32 x, f32 y)`, `(i32 x, i32 y)` rounded, one rounded
/// [`PixelPoint`], and no arguments. Other argument lists get no extra shapes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PayloadProjection;

fn location(args: &[&dyn Value]) -> Point {
    args.first()
        .and_then(|a| a.downcast_ref::<Point>())
        .copied()
        .unwrap_or(Point::ZERO)
}

fn owned(value: impl Value) -> Arg<'static> {
    Arg::Owned(Box::new(value))
}

impl Transformer for PayloadProjection {
    fn shapes(&self, args: &[TypeKey]) -> Vec<CallShape> {
        if args != [TypeKey::of::<Point>()] {
            return Vec::new();
        }
        let f32_key = TypeKey::of::<f32>();
        let i32_key = TypeKey::of::<i32>();
        vec![
            CallShape::new(vec![f32_key, f32_key], |args| {
                let p = location(args);
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Handlers asking for f32 accept the precision loss."
                )]
                let (x, y) = (p.x as f32, p.y as f32);
                vec![owned(x), owned(y)]
            }),
            CallShape::new(vec![i32_key, i32_key], |args| {
                let p = PixelPoint::round(location(args));
                vec![owned(p.x), owned(p.y)]
            }),
            CallShape::new(vec![TypeKey::of::<PixelPoint>()], |args| {
                vec![owned(PixelPoint::round(location(args)))]
            }),
            CallShape::new(Vec::new(), |_| Vec::new()),
        ]
    }
}

impl NamedEvent {
    /// A dispatcher whose handlers may drop trailing arguments down to
    /// `minimum_arity`.
    pub fn optional(name: impl Into<Cow<'static, str>>, minimum_arity: usize) -> Self {
        Self::new(name).with_transformer(OptionalArgument::new(minimum_arity))
    }

    /// A dispatcher whose handlers may take the arguments in reverse order.
    pub fn reversible(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name).with_transformer(ReversedArgument)
    }

    /// A dispatcher for location events, see [`PayloadProjection`].
    pub fn projected(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name).with_transformer(PayloadProjection)
    }
}
