// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch dispatch table.
//!
//! ## Overview
//!
//! Each [`TouchAction`] maps to two events, one carrying the location in the
//! receiver's own coordinates and one carrying it in screen coordinates:
//!
//! | Action      | Local event  | Screen event        |
//! |-------------|--------------|---------------------|
//! | `Down`      | `touch_down` | `screen_touch_down` |
//! | `Move`      | `touch_move` | `screen_touch_move` |
//! | `Up`        | `touch_up`   | `screen_touch_up`   |
//! | `DoubleTap` | `double_tap` | `screen_double_tap` |
//!
//! Both events are delivered for every sample. They use
//! [`PayloadProjection`](crate::transform::PayloadProjection), so a handler
//! can take the location as a [`Point`], as `(f32, f32)`, as `(i32, i32)`,
//! as a [`PixelPoint`](crate::transform::PixelPoint), or not at all.
//!
//! ## Probe cache
//!
//! [`TouchDispatch::responds`] records per receiver type whether it handles
//! any of the eight events. Types that handle none are skipped without
//! touching the dispatchers.

use core::any::TypeId;
use core::cell::RefCell;

use hashbrown::HashMap;
use kurbo::Point;

use crate::error::DispatchError;
use crate::methods::Responder;
use crate::named::NamedEvent;

/// Hardware touch actions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TouchAction {
    /// A pointer went down.
    Down,
    /// A pointer moved while down.
    Move,
    /// A pointer went up.
    Up,
    /// Two taps in quick succession.
    DoubleTap,
}

impl TouchAction {
    /// All actions, in table order.
    pub const ALL: [Self; 4] = [Self::Down, Self::Move, Self::Up, Self::DoubleTap];

    fn index(self) -> usize {
        match self {
            Self::Down => 0,
            Self::Move => 1,
            Self::Up => 2,
            Self::DoubleTap => 3,
        }
    }

    /// Event name carrying the receiver-local location.
    pub fn local_event(self) -> &'static str {
        match self {
            Self::Down => "touch_down",
            Self::Move => "touch_move",
            Self::Up => "touch_up",
            Self::DoubleTap => "double_tap",
        }
    }

    /// Event name carrying the screen location.
    pub fn screen_event(self) -> &'static str {
        match self {
            Self::Down => "screen_touch_down",
            Self::Move => "screen_touch_move",
            Self::Up => "screen_touch_up",
            Self::DoubleTap => "screen_double_tap",
        }
    }
}

/// One touch input sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchSample {
    /// What happened.
    pub action: TouchAction,
    /// Location in the receiver's coordinate space.
    pub local: Point,
    /// Location in screen coordinates.
    pub screen: Point,
}

/// Touch event table.
#[derive(Debug)]
pub struct TouchDispatch {
    local: [NamedEvent; 4],
    screen: [NamedEvent; 4],
    responds: RefCell<HashMap<TypeId, bool>>,
}

impl Default for TouchDispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchDispatch {
    /// Create the table.
    pub fn new() -> Self {
        Self {
            local: TouchAction::ALL.map(|a| NamedEvent::projected(a.local_event())),
            screen: TouchAction::ALL.map(|a| NamedEvent::projected(a.screen_event())),
            responds: RefCell::new(HashMap::new()),
        }
    }

    /// Whether `receiver`'s type handles any touch event.
    pub fn responds<R: Responder>(&self, receiver: &R) -> bool {
        let id = TypeId::of::<R>();
        if let Some(&known) = self.responds.borrow().get(&id) {
            return known;
        }
        let probe = Point::ZERO;
        let any = self
            .local
            .iter()
            .chain(&self.screen)
            .any(|d| d.is_supported_by(receiver, &[&probe]));
        log::trace!(
            "touch probe for {}: {}",
            core::any::type_name::<R>(),
            any
        );
        self.responds.borrow_mut().insert(id, any);
        any
    }

    /// Deliver `sample` to `receiver`.
    ///
    /// The local event is delivered first, then the screen event, whatever the
    /// first one returned. Returns `Ok(true)` if either consumed the sample.
    pub fn dispatch<R: Responder>(
        &self,
        receiver: &mut R,
        sample: &TouchSample,
    ) -> Result<bool, DispatchError> {
        if !self.responds(receiver) {
            return Ok(false);
        }
        let i = sample.action.index();
        let local = self.local[i].dispatch(receiver, &[&sample.local])?;
        let screen = self.screen[i].dispatch(receiver, &[&sample.screen])?;
        Ok(local || screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::Methods;
    use crate::transform::PixelPoint;
    use crate::types::TypeKey;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[derive(Default)]
    struct Canvas {
        log: Vec<String>,
    }

    impl Responder for Canvas {
        fn declare(methods: &mut Methods<Self>) {
            let f = TypeKey::of::<f32>();
            methods
                .method("touch_down", &[f, f], |c: &mut Self, args| {
                    let x = args.scalar::<f32>(0)?;
                    c.log.push(alloc::format!("down {x}"));
                    Ok::<_, crate::error::ArgError>(true)
                })
                .method(
                    "screen_touch_down",
                    &[TypeKey::of::<PixelPoint>()],
                    |c: &mut Self, args| {
                        let p = args.get::<PixelPoint>(0)?;
                        c.log.push(alloc::format!("screen down {} {}", p.x, p.y));
                        Ok::<_, crate::error::ArgError>(())
                    },
                )
                .method("screen_touch_up", &[], |c: &mut Self, _| {
                    c.log.push(String::from("screen up"));
                });
        }
    }

    struct Inert;
    impl Responder for Inert {
        fn declare(_: &mut Methods<Self>) {}
    }

    fn sample(action: TouchAction) -> TouchSample {
        TouchSample {
            action,
            local: Point::new(3.0, 4.0),
            screen: Point::new(103.2, 204.7),
        }
    }

    #[test]
    fn both_events_are_delivered() {
        let table = TouchDispatch::new();
        let mut c = Canvas::default();
        assert!(table.dispatch(&mut c, &sample(TouchAction::Down)).unwrap());
        assert_eq!(c.log, ["down 3", "screen down 103 205"]);
    }

    #[test]
    fn unconsumed_sample_reports_false() {
        let table = TouchDispatch::new();
        let mut c = Canvas::default();
        assert!(!table.dispatch(&mut c, &sample(TouchAction::Up)).unwrap());
        assert!(!table.dispatch(&mut c, &sample(TouchAction::Move)).unwrap());
        assert_eq!(c.log, ["screen up"]);
    }

    #[test]
    fn receivers_without_handlers_are_skipped() {
        let table = TouchDispatch::new();
        let mut inert = Inert;
        assert!(!table.responds(&inert));
        for action in TouchAction::ALL {
            assert!(!table.dispatch(&mut inert, &sample(action)).unwrap());
        }
        // One probe per dispatcher, nothing after.
        let scans: usize = table
            .local
            .iter()
            .chain(&table.screen)
            .map(|d| d.stats().scans)
            .sum();
        assert_eq!(scans, 8);
    }

    #[test]
    fn event_names_are_paired() {
        for action in TouchAction::ALL {
            assert!(action.screen_event().ends_with(action.local_event()));
        }
    }
}
