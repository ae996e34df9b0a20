// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional pad.
//!
//! Decodes held keys (arrows, WASD, space) and delivers pad events to two
//! receivers: one that understands diagonals and one that only knows the
//! cardinals.
//!
//! Run:
//! - `cargo run -p understory_demos --example dpad_table`

use understory_dispatch::dpad::{DirectionalPad, Directions, KeyCodes, KeyMask};
use understory_dispatch::error::ArgError;
use understory_dispatch::methods::{Methods, Responder};
use understory_dispatch::types::TypeKey;

struct Ship;

impl Responder for Ship {
    fn declare(methods: &mut Methods<Self>) {
        for name in ["north", "east", "south", "west", "northeast"] {
            methods.method(name, &[], move |_: &mut Self, _| {
                println!("  ship: {name}");
                true
            });
        }
        methods.method(
            "center",
            &[TypeKey::of::<Directions>()],
            |_: &mut Self, args| {
                println!("  ship: fire while {:?}", args.get::<Directions>(0)?);
                Ok::<_, ArgError>(true)
            },
        );
    }
}

struct Cursor;

impl Responder for Cursor {
    fn declare(methods: &mut Methods<Self>) {
        for name in ["north", "east", "south", "west"] {
            methods.method(name, &[], move |_: &mut Self, _| {
                println!("  cursor: {name}");
                true
            });
        }
    }
}

fn main() {
    let pad = DirectionalPad::new();
    let codes = KeyCodes::default();

    let presses: [(&str, &[u8]); 4] = [
        ("up", &[codes.arrows.north]),
        ("up + D", &[codes.arrows.north, codes.wasd.east]),
        ("W + A + S", &[codes.wasd.north, codes.wasd.west, codes.wasd.south]),
        ("space + right", &[codes.center[0], codes.arrows.east]),
    ];
    for (label, held) in presses {
        let mask = KeyMask::from_codes(held);
        println!("{label} -> {:?}", codes.decode(mask));
        let _ = pad.dispatch(&mut Ship, mask);
        let _ = pad.dispatch(&mut Cursor, mask);
    }
}
