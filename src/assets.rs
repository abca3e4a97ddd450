// src/assets.rs

//! Read-only asset tables consumed by the blit primitives: the sprite/tile
//! atlas, the font atlas, the 128x128 tile map and the per-tile flag table.
//!
//! Every accessor is bounds-checked and answers out-of-range reads with a
//! neutral value (transparent pixel, tile 0, no flags) instead of failing.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use bitflags::bitflags;
use log::debug;
use serde::{Deserialize, Serialize};

/// Edge length of one atlas cell (sprite, tile or glyph).
pub const CELL_SIZE: i32 = 8;
/// Number of cells per atlas row.
pub const CELLS_PER_ROW: i32 = 16;
/// Width and height of the tile map, in tiles.
pub const MAP_SIZE: usize = 128;

/// Returns the top-left atlas pixel of cell `index`.
pub fn cell_origin(index: i32) -> (i32, i32) {
    (
        (index % CELLS_PER_ROW) * CELL_SIZE,
        (index / CELLS_PER_ROW) * CELL_SIZE,
    )
}

/// A bitmap divided into 8x8 cells, sampled by the blit primitives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Atlas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Atlas {
    /// Builds an atlas from row-major pixel data.
    pub fn new(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != width * height {
            bail!(
                "atlas pixel count {} does not match {}x{}",
                pixels.len(),
                width,
                height
            );
        }
        Ok(Atlas {
            width,
            height,
            pixels,
        })
    }

    /// Builds an atlas from rows of hex digits, one digit per pixel.
    /// All rows must have the same length.
    pub fn from_hex_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut pixels = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                bail!("atlas row {} has {} pixels, expected {}", y, row.len(), width);
            }
            for (x, ch) in row.chars().enumerate() {
                let value = ch
                    .to_digit(16)
                    .with_context(|| format!("invalid pixel {:?} at ({}, {})", ch, x, y))?;
                pixels.push(value as u8);
            }
        }
        Self::new(width, rows.len(), pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reads one pixel; anything outside the bitmap reads as 0 (transparent).
    pub fn sample(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.pixels[y as usize * self.width + x as usize]
    }
}

/// The 128x128 grid of tile indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    tiles: Vec<u8>,
}

impl Default for TileMap {
    fn default() -> Self {
        TileMap {
            tiles: vec![0; MAP_SIZE * MAP_SIZE],
        }
    }
}

impl TileMap {
    /// Builds a map from row-major tile indices. Short input is zero-padded,
    /// excess input is rejected.
    pub fn new(mut tiles: Vec<u8>) -> Result<Self> {
        if tiles.len() > MAP_SIZE * MAP_SIZE {
            bail!("tile map has {} cells, at most {} allowed", tiles.len(), MAP_SIZE * MAP_SIZE);
        }
        tiles.resize(MAP_SIZE * MAP_SIZE, 0);
        Ok(TileMap { tiles })
    }

    /// Builds a map from rows of hex byte pairs (two digits per tile).
    pub fn from_hex_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        if rows.len() > MAP_SIZE {
            bail!("tile map has {} rows, at most {} allowed", rows.len(), MAP_SIZE);
        }
        let mut tiles = vec![0; MAP_SIZE * MAP_SIZE];
        for (y, row) in rows.iter().enumerate() {
            let bytes = parse_hex_bytes(row.as_ref())
                .with_context(|| format!("tile map row {}", y))?;
            if bytes.len() > MAP_SIZE {
                bail!("tile map row {} has {} tiles, at most {} allowed", y, bytes.len(), MAP_SIZE);
            }
            tiles[y * MAP_SIZE..y * MAP_SIZE + bytes.len()].copy_from_slice(&bytes);
        }
        Ok(TileMap { tiles })
    }

    /// Tile index at map cell `(x, y)`, `None` outside the map.
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        let size = MAP_SIZE as i32;
        if x < 0 || x >= size || y < 0 || y >= size {
            return None;
        }
        Some(self.tiles[y as usize * MAP_SIZE + x as usize])
    }
}

bitflags! {
    /// The eight boolean flags a tile can carry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileFlags: u8 {
        const FLAG_0 = 1 << 0;
        const FLAG_1 = 1 << 1;
        const FLAG_2 = 1 << 2;
        const FLAG_3 = 1 << 3;
        const FLAG_4 = 1 << 4;
        const FLAG_5 = 1 << 5;
        const FLAG_6 = 1 << 6;
        const FLAG_7 = 1 << 7;
    }
}

/// Flag bitmasks indexed by tile number. Tiles past the end have no flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileFlagTable {
    flags: Vec<TileFlags>,
}

impl TileFlagTable {
    pub fn new(raw: &[u8]) -> Self {
        TileFlagTable {
            flags: raw.iter().map(|&b| TileFlags::from_bits_retain(b)).collect(),
        }
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        Ok(Self::new(&parse_hex_bytes(hex).context("tile flags")?))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// The full bitmask of `tile`, `None` outside the table.
    pub fn get(&self, tile: i32) -> Option<TileFlags> {
        usize::try_from(tile).ok().and_then(|t| self.flags.get(t).copied())
    }

    /// Whether bit `flag` is set for `tile`. Unknown tiles and bits outside
    /// `[0, 8)` read as unset.
    pub fn is_set(&self, tile: i32, flag: i32) -> bool {
        if !(0..8).contains(&flag) {
            return false;
        }
        self.get(tile)
            .is_some_and(|f| f.bits() & (1u8 << flag) != 0)
    }
}

/// Every read-only table the core draws from.
#[derive(Debug, Clone, Default)]
pub struct Assets {
    pub gfx: Atlas,
    pub font: Atlas,
    pub map: TileMap,
    pub flags: TileFlagTable,
}

/// On-disk JSON layout of an asset pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPack {
    /// Sprite/tile atlas, one hex digit per pixel.
    pub gfx: Vec<String>,
    /// Font atlas, one hex digit per pixel (non-zero means covered).
    pub font: Vec<String>,
    /// Tile map, two hex digits per tile.
    pub map: Vec<String>,
    /// Tile flags, two hex digits per tile.
    pub flags: String,
}

impl Assets {
    /// Converts a parsed asset pack into lookup tables.
    pub fn from_pack(pack: &AssetPack) -> Result<Self> {
        Ok(Assets {
            gfx: Atlas::from_hex_rows(pack.gfx.as_slice()).context("gfx atlas")?,
            font: Atlas::from_hex_rows(pack.font.as_slice()).context("font atlas")?,
            map: TileMap::from_hex_rows(pack.map.as_slice())?,
            flags: TileFlagTable::from_hex(&pack.flags)?,
        })
    }

    /// Loads an asset pack from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading asset pack {}", path.display()))?;
        let pack: AssetPack = serde_json::from_str(&text)
            .with_context(|| format!("parsing asset pack {}", path.display()))?;
        let assets = Self::from_pack(&pack)?;
        debug!(
            "Loaded assets: gfx {}x{}, font {}x{}, {} tile flags",
            assets.gfx.width(),
            assets.gfx.height(),
            assets.font.width(),
            assets.font.height(),
            assets.flags.len()
        );
        Ok(assets)
    }
}

fn parse_hex_bytes(hex: &str) -> Result<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        bail!("odd number of hex digits ({})", hex.len());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            let pair = hex.get(i..i + 2).context("non-ASCII hex data")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex byte {:?}", pair))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_origin_uses_sixteen_cells_per_row() {
        assert_eq!(cell_origin(0), (0, 0));
        assert_eq!(cell_origin(1), (8, 0));
        assert_eq!(cell_origin(16), (0, 8));
        assert_eq!(cell_origin(33), (8, 16));
    }

    #[test]
    fn atlas_sample_outside_bitmap_is_transparent() {
        let atlas = Atlas::from_hex_rows(&["12", "3f"]).unwrap();
        assert_eq!(atlas.sample(1, 1), 15);
        assert_eq!(atlas.sample(2, 0), 0);
        assert_eq!(atlas.sample(-1, 0), 0);
        assert_eq!(atlas.sample(0, 2), 0);
    }

    #[test]
    fn atlas_rejects_ragged_rows_and_bad_digits() {
        assert!(Atlas::from_hex_rows(&["12", "3"]).is_err());
        assert!(Atlas::from_hex_rows(&["1g"]).is_err());
        assert!(Atlas::new(2, 2, vec![0; 3]).is_err());
    }

    #[test]
    fn tile_map_pads_short_rows_and_bounds_checks() {
        let map = TileMap::from_hex_rows(&["0a1b", "ff"]).unwrap();
        assert_eq!(map.get(0, 0), Some(0x0a));
        assert_eq!(map.get(1, 0), Some(0x1b));
        assert_eq!(map.get(2, 0), Some(0));
        assert_eq!(map.get(0, 1), Some(0xff));
        assert_eq!(map.get(128, 0), None);
        assert_eq!(map.get(0, -1), None);
    }

    #[test]
    fn tile_flags_past_table_are_unset() {
        let flags = TileFlagTable::from_hex("0104").unwrap();
        assert!(flags.is_set(0, 0));
        assert!(flags.is_set(1, 2));
        assert!(!flags.is_set(1, 0));
        assert!(!flags.is_set(2, 0));
        assert!(!flags.is_set(-1, 0));
        assert!(!flags.is_set(0, 8));
        assert!(!flags.is_set(0, -1));
        assert_eq!(flags.get(1), Some(TileFlags::FLAG_2));
    }

    #[test]
    fn asset_pack_parses_from_json() {
        let json = r#"{ "gfx": ["01", "23"], "font": ["1"], "map": ["02"], "flags": "0003" }"#;
        let pack: AssetPack = serde_json::from_str(json).unwrap();
        let assets = Assets::from_pack(&pack).unwrap();
        assert_eq!(assets.gfx.sample(1, 1), 3);
        assert_eq!(assets.font.sample(0, 0), 1);
        assert_eq!(assets.map.get(0, 0), Some(2));
        assert!(assets.flags.is_set(1, 1));
    }
}
