// src/color.rs

//! Defines the fixed 16-color model of the console (`NamedColor`), the RGB
//! display palette used by hosts, and color-index validation.

use serde::{Deserialize, Serialize};

/// Number of entries in both the logical palette and the display palette.
pub const PALETTE_SIZE: usize = 16;

/// The sixteen console colors (indices 0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    DarkBlue = 1,
    DarkPurple = 2,
    DarkGreen = 3,
    Brown = 4,
    DarkGrey = 5,
    LightGrey = 6,
    White = 7,
    Red = 8,
    Orange = 9,
    Yellow = 10,
    Green = 11,
    Blue = 12,
    Lavender = 13,
    Pink = 14,
    Peach = 15,
}

impl NamedColor {
    const ALL: [NamedColor; PALETTE_SIZE] = [
        NamedColor::Black,
        NamedColor::DarkBlue,
        NamedColor::DarkPurple,
        NamedColor::DarkGreen,
        NamedColor::Brown,
        NamedColor::DarkGrey,
        NamedColor::LightGrey,
        NamedColor::White,
        NamedColor::Red,
        NamedColor::Orange,
        NamedColor::Yellow,
        NamedColor::Green,
        NamedColor::Blue,
        NamedColor::Lavender,
        NamedColor::Pink,
        NamedColor::Peach,
    ];

    /// Converts an index (0-15) to a `NamedColor`, `None` outside that range.
    pub fn from_index(idx: i32) -> Option<Self> {
        color_index(idx).map(|i| Self::ALL[i as usize])
    }

    /// Returns the default sRGB value of this color.
    pub fn to_rgb(self) -> Rgb {
        match self {
            NamedColor::Black => Rgb(0x00, 0x00, 0x00),
            NamedColor::DarkBlue => Rgb(0x1d, 0x2b, 0x53),
            NamedColor::DarkPurple => Rgb(0x7e, 0x25, 0x53),
            NamedColor::DarkGreen => Rgb(0x00, 0x87, 0x51),
            NamedColor::Brown => Rgb(0xab, 0x52, 0x36),
            NamedColor::DarkGrey => Rgb(0x5f, 0x57, 0x4f),
            NamedColor::LightGrey => Rgb(0xc2, 0xc3, 0xc7),
            NamedColor::White => Rgb(0xff, 0xf1, 0xe8),
            NamedColor::Red => Rgb(0xff, 0x00, 0x4d),
            NamedColor::Orange => Rgb(0xff, 0xa3, 0x00),
            NamedColor::Yellow => Rgb(0xff, 0xec, 0x27),
            NamedColor::Green => Rgb(0x00, 0xe4, 0x36),
            NamedColor::Blue => Rgb(0x29, 0xad, 0xff),
            NamedColor::Lavender => Rgb(0x83, 0x76, 0x9c),
            NamedColor::Pink => Rgb(0xff, 0x77, 0xa8),
            NamedColor::Peach => Rgb(0xff, 0xcc, 0xaa),
        }
    }
}

/// An RGB true color, with each component from 0 to 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Validates a color index coming from a draw call.
///
/// Returns the index as `u8` when it lies in `[0, 16)`, `None` otherwise.
pub fn color_index(c: i32) -> Option<u8> {
    if (0..PALETTE_SIZE as i32).contains(&c) {
        Some(c as u8)
    } else {
        None
    }
}

/// Maps physical color indices to the RGB values a host displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayPalette {
    pub colors: [Rgb; PALETTE_SIZE],
}

impl Default for DisplayPalette {
    fn default() -> Self {
        DisplayPalette {
            colors: NamedColor::ALL.map(NamedColor::to_rgb),
        }
    }
}

impl DisplayPalette {
    /// The palette as consecutive R, G, B bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| [c.0, c.1, c.2]).collect()
    }

    /// Resolves a physical index. Indices outside the palette fall back to black.
    pub fn rgb(&self, physical: u8) -> Rgb {
        self.colors
            .get(physical as usize)
            .copied()
            .unwrap_or(Rgb(0, 0, 0))
    }
}
