// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch basics.
//!
//! Declares a small widget hierarchy, then delivers a few events through a
//! fixed-arity dispatcher and through named events with optional and reversed
//! arguments. Prints which handler ran and the cache counters.
//!
//! Run:
//! - `cargo run -p understory_demos --example dispatch_basics`

use understory_dispatch::error::ArgError;
use understory_dispatch::fixed::FixedArity;
use understory_dispatch::methods::{Methods, Responder};
use understory_dispatch::named::NamedEvent;
use understory_dispatch::types::{TypeKey, Typed};

struct Shape;
impl Typed for Shape {}

struct Circle {
    radius: f64,
}
impl Typed for Circle {
    fn superclass() -> Option<TypeKey> {
        Some(TypeKey::of::<Shape>())
    }
}

#[derive(Default)]
struct Layer {
    name: &'static str,
}

impl Responder for Layer {
    fn declare(methods: &mut Methods<Self>) {
        methods
            .method("selected", &[], |l: &mut Self, _| {
                println!("  {}: selected()", l.name);
                true
            })
            .method("renamed", &[TypeKey::of::<String>()], |l: &mut Self, args| {
                println!("  {}: renamed({})", l.name, args.get::<String>(0)?);
                Ok::<_, ArgError>(true)
            });
    }
}

struct Canvas {
    layer: Layer,
}

impl Responder for Canvas {
    fn declare(methods: &mut Methods<Self>) {
        let i = TypeKey::of::<i32>();
        methods
            .method("place", &[TypeKey::of::<Shape>(), i], |_: &mut Self, args| {
                println!("  place(Shape, {})", args.scalar::<i32>(1)?);
                Ok::<_, ArgError>(true)
            })
            .method("place", &[TypeKey::of::<Circle>(), i], |_: &mut Self, args| {
                let c = args.get::<Circle>(0)?;
                println!("  place(Circle r={}, {})", c.radius, args.scalar::<i32>(1)?);
                Ok::<_, ArgError>(true)
            })
            .inherit(|c| &mut c.layer);
    }
}

fn main() {
    let mut canvas = Canvas {
        layer: Layer { name: "background" },
    };
    let circle = Circle { radius: 2.5 };

    // Most specific overload wins; the reversed order is tried too.
    let place = FixedArity::new("place", 2);
    println!("place(circle, 3):");
    let _ = place.invoke(&mut canvas, &[&circle, &3_i32]);
    println!("place(7, shape):");
    let _ = place.invoke(&mut canvas, &[&7_i32, &Shape]);
    println!("place(circle, 4) again:");
    let _ = place.invoke(&mut canvas, &[&circle, &4_i32]);
    println!("  cache: {:?}", place.stats());

    // Handler inherited from Layer drops the trailing argument.
    let selected = NamedEvent::optional("selected", 0);
    println!("selected(circle):");
    let handled = selected.dispatch(&mut canvas, &[&circle]);
    println!("  handled: {handled:?}");

    // Arity mismatch is reported, not fatal.
    println!("place(circle):");
    match place.invoke(&mut canvas, &[&circle]) {
        Ok(h) => println!("  handled: {h}"),
        Err(e) => println!("  error: {e}"),
    }

    let renamed = NamedEvent::reversible("renamed");
    println!("renamed(\"foreground\"):");
    let title = String::from("foreground");
    let _ = renamed.dispatch(&mut canvas, &[&title]);
}
