// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional-pad dispatch table.
//!
//! ## Input
//!
//! A [`KeyMask`] packs the codes of the keys currently held, one per byte
//! (zero bytes are empty slots). [`KeyCodes::decode`] turns it into
//! [`Directions`] by testing every byte against both the arrow-key and the
//! WASD conventions, plus the center codes.
//!
//! ## Events
//!
//! - A single adjacent pair (north+east, south+east, south+west, north+west)
//!   is delivered as the compound event (`northeast`, …) when the receiver
//!   type handles it, and as the two cardinal events otherwise.
//! - Any other combination delivers each active cardinal, in
//!   north/east/south/west order.
//! - Center delivers `center`.
//!
//! Every event carries the decoded [`Directions`] and allows dropping it, so
//! handlers may take `(Directions)` or nothing.
//!
//! ```
//! use understory_dispatch::dpad::{Directions, DirectionalPad, KeyCodes, KeyMask};
//! use understory_dispatch::methods::{Methods, Responder};
//!
//! struct Player { x: i32, y: i32 }
//!
//! impl Responder for Player {
//!     fn declare(methods: &mut Methods<Self>) {
//!         methods
//!             .method("north", &[], |p: &mut Self, _| { p.y -= 1; true })
//!             .method("east", &[], |p: &mut Self, _| { p.x += 1; true });
//!     }
//! }
//!
//! let pad = DirectionalPad::new();
//! let codes = KeyCodes::default();
//! let mask = KeyMask::from_codes(&[codes.arrows.north, codes.wasd.east]);
//! assert_eq!(codes.decode(mask), Directions::NORTH | Directions::EAST);
//!
//! let mut player = Player { x: 0, y: 0 };
//! assert!(pad.dispatch(&mut player, mask).unwrap());
//! assert_eq!((player.x, player.y), (1, -1));
//! ```

use core::any::TypeId;
use core::cell::RefCell;

use bitflags::bitflags;
use hashbrown::HashMap;

use crate::error::DispatchError;
use crate::methods::Responder;
use crate::named::NamedEvent;
use crate::types::{Typed, Value};

bitflags! {
    /// Active directions.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Directions: u8 {
        /// Up.
        const NORTH = 1 << 0;
        /// Right.
        const EAST = 1 << 1;
        /// Down.
        const SOUTH = 1 << 2;
        /// Left.
        const WEST = 1 << 3;
        /// Select / fire.
        const CENTER = 1 << 4;
    }
}

impl Typed for Directions {}

/// Held key codes, one per byte.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct KeyMask(pub u64);

impl KeyMask {
    /// Pack up to eight key codes, lowest byte first. Extra codes are ignored.
    pub fn from_codes(codes: &[u8]) -> Self {
        let mut mask = 0_u64;
        for (slot, &code) in codes.iter().take(8).enumerate() {
            mask |= u64::from(code) << (slot * 8);
        }
        Self(mask)
    }

    /// The non-empty key codes in the mask.
    pub fn codes(self) -> impl Iterator<Item = u8> {
        self.0.to_le_bytes().into_iter().filter(|&b| b != 0)
    }
}

/// Key codes for one cardinal layout.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CardinalCodes {
    /// Code for north.
    pub north: u8,
    /// Code for east.
    pub east: u8,
    /// Code for south.
    pub south: u8,
    /// Code for west.
    pub west: u8,
}

impl CardinalCodes {
    fn direction_of(&self, code: u8) -> Directions {
        if code == self.north {
            Directions::NORTH
        } else if code == self.east {
            Directions::EAST
        } else if code == self.south {
            Directions::SOUTH
        } else if code == self.west {
            Directions::WEST
        } else {
            Directions::empty()
        }
    }
}

/// Key-code conventions recognized by the pad.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KeyCodes {
    /// Arrow keys / pad directions.
    pub arrows: CardinalCodes,
    /// W, D, S, A.
    pub wasd: CardinalCodes,
    /// Space and pad center.
    pub center: [u8; 2],
}

impl Default for KeyCodes {
    /// The host toolkit's conventional codes.
    fn default() -> Self {
        Self {
            arrows: CardinalCodes {
                north: 19,
                east: 22,
                south: 20,
                west: 21,
            },
            wasd: CardinalCodes {
                north: 51,
                east: 32,
                south: 47,
                west: 29,
            },
            center: [62, 23],
        }
    }
}

impl KeyCodes {
    /// Directions held in `mask`.
    pub fn decode(&self, mask: KeyMask) -> Directions {
        mask.codes().fold(Directions::empty(), |acc, code| {
            let mut d = acc | self.arrows.direction_of(code) | self.wasd.direction_of(code);
            if self.center.contains(&code) {
                d |= Directions::CENTER;
            }
            d
        })
    }
}

const CARDINALS: [(Directions, &str); 4] = [
    (Directions::NORTH, "north"),
    (Directions::EAST, "east"),
    (Directions::SOUTH, "south"),
    (Directions::WEST, "west"),
];

// Constituents are listed in cardinal order.
const DIAGONALS: [(usize, usize, &str); 4] = [
    (0, 1, "northeast"),
    (1, 2, "southeast"),
    (2, 3, "southwest"),
    (0, 3, "northwest"),
];

/// Directional-pad event table.
#[derive(Debug)]
pub struct DirectionalPad {
    codes: KeyCodes,
    cardinal: [NamedEvent; 4],
    diagonal: [NamedEvent; 4],
    center: NamedEvent,
    responds: RefCell<HashMap<TypeId, bool>>,
}

impl Default for DirectionalPad {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectionalPad {
    /// Create the table with the default key codes.
    pub fn new() -> Self {
        Self::with_key_codes(KeyCodes::default())
    }

    /// Create the table with custom key codes.
    pub fn with_key_codes(codes: KeyCodes) -> Self {
        Self {
            codes,
            cardinal: CARDINALS.map(|(_, name)| NamedEvent::optional(name, 0)),
            diagonal: DIAGONALS.map(|(_, _, name)| NamedEvent::optional(name, 0)),
            center: NamedEvent::optional("center", 0),
            responds: RefCell::new(HashMap::new()),
        }
    }

    /// Key codes in use.
    pub fn key_codes(&self) -> &KeyCodes {
        &self.codes
    }

    /// Whether `receiver`'s type handles any pad event.
    pub fn responds<R: Responder>(&self, receiver: &R) -> bool {
        let id = TypeId::of::<R>();
        if let Some(&known) = self.responds.borrow().get(&id) {
            return known;
        }
        let probe = Directions::empty();
        let args: [&dyn Value; 1] = [&probe];
        let any = self
            .cardinal
            .iter()
            .chain(&self.diagonal)
            .chain(core::iter::once(&self.center))
            .any(|d| d.is_supported_by(receiver, &args));
        log::trace!("pad probe for {}: {}", core::any::type_name::<R>(), any);
        self.responds.borrow_mut().insert(id, any);
        any
    }

    /// Decode `mask` and deliver the resulting events.
    pub fn dispatch<R: Responder>(
        &self,
        receiver: &mut R,
        mask: KeyMask,
    ) -> Result<bool, DispatchError> {
        self.dispatch_directions(receiver, self.codes.decode(mask))
    }

    /// Deliver the events for already-decoded `directions`.
    ///
    /// Every event is delivered even if an earlier one was consumed. Returns
    /// `Ok(true)` if any was.
    pub fn dispatch_directions<R: Responder>(
        &self,
        receiver: &mut R,
        directions: Directions,
    ) -> Result<bool, DispatchError> {
        if directions.is_empty() || !self.responds(receiver) {
            return Ok(false);
        }
        let args: [&dyn Value; 1] = [&directions];
        let mut handled = false;

        let active: [bool; 4] = CARDINALS.map(|(d, _)| directions.contains(d));
        let compound = DIAGONALS
            .iter()
            .position(|&(a, b, _)| {
                active.iter().filter(|&&on| on).count() == 2 && active[a] && active[b]
            })
            .filter(|&i| self.diagonal[i].is_supported_by(receiver, &args));

        if let Some(i) = compound {
            handled |= self.diagonal[i].dispatch(receiver, &args)?;
        } else {
            for (event, on) in self.cardinal.iter().zip(active) {
                if on {
                    handled |= event.dispatch(receiver, &args)?;
                }
            }
        }
        if directions.contains(Directions::CENTER) {
            handled |= self.center.dispatch(receiver, &args)?;
        }
        Ok(handled)
    }
}
