// src/input.rs

//! Button state and the input-polling seam used by the `btn` draw call.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Console buttons, one bit per `btn` index.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Buttons: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const JUMP = 1 << 4; // O
        const DASH = 1 << 5; // X
    }
}

impl Buttons {
    /// Maps a replay-script key letter to its button.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'a' => Some(Buttons::LEFT),
            'd' => Some(Buttons::RIGHT),
            'w' => Some(Buttons::UP),
            's' => Some(Buttons::DOWN),
            'z' | 'c' => Some(Buttons::JUMP),
            'x' => Some(Buttons::DASH),
            _ => None,
        }
    }
}

/// Answers `btn` queries on behalf of the host.
pub trait InputSource {
    /// Whether button `index` is held. Unknown indices are not held.
    fn btn(&self, index: i32) -> bool;
}

impl InputSource for Buttons {
    fn btn(&self, index: i32) -> bool {
        (0..8).contains(&index) && (self.bits() >> index) & 1 != 0
    }
}
