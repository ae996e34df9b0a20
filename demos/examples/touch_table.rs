// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch table.
//!
//! Feeds a short gesture through [`TouchDispatch`]. The receiver takes the
//! local location as floats and the screen location as whole pixels; the
//! double tap handler takes nothing.
//!
//! Run:
//! - `cargo run -p understory_demos --example touch_table`

use kurbo::Point;
use understory_dispatch::error::ArgError;
use understory_dispatch::methods::{Methods, Responder};
use understory_dispatch::touch::{TouchAction, TouchDispatch, TouchSample};
use understory_dispatch::transform::PixelPoint;
use understory_dispatch::types::TypeKey;

#[derive(Default)]
struct Sketch {
    strokes: usize,
}

impl Responder for Sketch {
    fn declare(methods: &mut Methods<Self>) {
        let f = TypeKey::of::<f32>();
        methods
            .method("touch_down", &[f, f], |s: &mut Self, args| {
                s.strokes += 1;
                println!(
                    "  touch_down({}, {})",
                    args.scalar::<f32>(0)?,
                    args.scalar::<f32>(1)?
                );
                Ok::<_, ArgError>(true)
            })
            .method("touch_move", &[TypeKey::of::<Point>()], |_: &mut Self, args| {
                println!("  touch_move({:?})", args.get::<Point>(0)?);
                Ok::<_, ArgError>(true)
            })
            .method(
                "screen_touch_up",
                &[TypeKey::of::<PixelPoint>()],
                |_: &mut Self, args| {
                    let p = args.get::<PixelPoint>(0)?;
                    println!("  screen_touch_up({}, {})", p.x, p.y);
                    Ok::<_, ArgError>(())
                },
            )
            .method("double_tap", &[], |s: &mut Self, _| {
                println!("  double_tap() after {} stroke(s)", s.strokes);
                true
            });
    }
}

fn main() {
    let table = TouchDispatch::new();
    let mut sketch = Sketch::default();
    let origin = Point::new(40.0, 120.0);

    let gesture = [
        (TouchAction::Down, Point::new(1.25, 2.5)),
        (TouchAction::Move, Point::new(8.0, 3.0)),
        (TouchAction::Up, Point::new(9.6, 3.4)),
        (TouchAction::DoubleTap, Point::new(9.6, 3.4)),
    ];
    for (action, local) in gesture {
        let sample = TouchSample {
            action,
            local,
            screen: origin + local.to_vec2(),
        };
        println!("{action:?}:");
        match table.dispatch(&mut sketch, &sample) {
            Ok(handled) => println!("  handled: {handled}"),
            Err(e) => println!("  error: {e}"),
        }
    }
}
