// src/raster/blit.rs

//! Atlas-indexed blitting: sprites, proportional text and the tile map.

use std::ops::Range;

use log::trace;

use super::{plot, resolve_color, MAX_COORD};
use crate::assets::{cell_origin, Assets, CELL_SIZE, MAP_SIZE};
use crate::canvas::RenderContext;
use crate::color::PALETTE_SIZE;

/// `map` mask value that demands an exact flag bitmask rather than a bit test.
const EXACT_FLAGS_MASK: i32 = 4;

/// Horizontal advance per printed character.
const GLYPH_ADVANCE: i64 = 4;

/// Draws sprite `sprite` from the gfx atlas with its top-left at `(x, y)`.
///
/// Only a 1x1 cell span is drawn; any other span, or a negative sprite
/// index, is ignored. Flips mirror the source cell. Sample 0 is transparent,
/// samples 1-15 go through the palette, larger samples are skipped.
#[allow(clippy::too_many_arguments)]
pub fn spr(
    ctx: &mut RenderContext,
    assets: &Assets,
    sprite: i32,
    x: i32,
    y: i32,
    cols: i32,
    rows: i32,
    flip_x: bool,
    flip_y: bool,
) {
    if cols != 1 || rows != 1 {
        trace!("spr({}) ignored: unsupported {}x{} span", sprite, cols, rows);
        return;
    }
    if sprite < 0 {
        return;
    }
    let (ax, ay) = cell_origin(sprite);
    let (x, y) = (i64::from(x), i64::from(y));

    for j in 0..CELL_SIZE {
        for i in 0..CELL_SIZE {
            let sx = if flip_x { CELL_SIZE - 1 - i } else { i };
            let sy = if flip_y { CELL_SIZE - 1 - j } else { j };
            let sample = assets.gfx.sample(ax + sx, ay + sy);
            if sample > 0 && (sample as usize) < PALETTE_SIZE {
                let physical = ctx.palette.resolve(sample);
                plot(&mut ctx.canvas, x + i64::from(i), y + i64::from(j), physical);
            }
        }
    }
}

/// Prints `text` at `(x, y)` in color `c` using the font atlas.
///
/// Each byte is masked to 7 bits and selects an 8x8 glyph cell; the cursor
/// advances 4 pixels per character. Any non-zero font sample is drawn in
/// `c`. Printing stops at the first NUL byte.
pub fn print(ctx: &mut RenderContext, assets: &Assets, text: &[u8], x: i32, y: i32, c: i32) {
    let Some(physical) = resolve_color(ctx, "print", c) else {
        return;
    };

    let y = i64::from(y);
    let mut cursor_x = i64::from(x);
    for &byte in text.iter().take_while(|&&b| b != 0) {
        if cursor_x > MAX_COORD {
            break;
        }
        let (gx, gy) = cell_origin(i32::from(byte & 0x7F));
        for j in 0..CELL_SIZE {
            for i in 0..CELL_SIZE {
                if assets.font.sample(gx + i, gy + j) != 0 {
                    plot(&mut ctx.canvas, cursor_x + i64::from(i), y + i64::from(j), physical);
                }
            }
        }
        cursor_x += GLYPH_ADVANCE;
    }
}

/// Draws an `mw` x `mh` tile region of the map, starting at map cell
/// `(mx, my)`, with its top-left at screen position `(tx, ty)`.
///
/// `mask` filters tiles by their flags: 0 draws every tile, 4 draws tiles
/// whose flag bitmask equals exactly 4, any other value `m` draws tiles with
/// flag bit `m - 1` set.
///
/// Tile pixels are written as physical indices without palette lookup.
/// Sample 0 and samples outside the palette range are transparent.
#[allow(clippy::too_many_arguments)]
pub fn map(
    ctx: &mut RenderContext,
    assets: &Assets,
    mx: i32,
    my: i32,
    tx: i32,
    ty: i32,
    mw: i32,
    mh: i32,
    mask: i32,
) {
    let cell = i64::from(CELL_SIZE);
    for y in map_window(my, mh) {
        for x in map_window(mx, mw) {
            let (map_x, map_y) = (i64::from(mx) + x, i64::from(my) + y);
            let Some(tile) = assets.map.get(map_x as i32, map_y as i32) else {
                continue;
            };
            let tile = i32::from(tile);
            if !tile_passes_mask(assets, tile, mask) {
                continue;
            }

            let (ax, ay) = cell_origin(tile);
            let screen_x = i64::from(tx) + x * cell;
            let screen_y = i64::from(ty) + y * cell;
            for dy in 0..CELL_SIZE {
                for dx in 0..CELL_SIZE {
                    let sample = assets.gfx.sample(ax + dx, ay + dy);
                    if sample != 0 && (sample as usize) < PALETTE_SIZE {
                        plot(
                            &mut ctx.canvas,
                            screen_x + i64::from(dx),
                            screen_y + i64::from(dy),
                            sample,
                        );
                    }
                }
            }
        }
    }
}

/// Offsets in `0..extent` whose map coordinate `origin + offset` is inside
/// the tile map.
fn map_window(origin: i32, extent: i32) -> Range<i64> {
    let origin = i64::from(origin);
    (-origin).max(0)..(MAP_SIZE as i64 - origin).min(i64::from(extent))
}

fn tile_passes_mask(assets: &Assets, tile: i32, mask: i32) -> bool {
    match mask {
        0 => true,
        EXACT_FLAGS_MASK => assets
            .flags
            .get(tile)
            .is_some_and(|flags| i32::from(flags.bits()) == EXACT_FLAGS_MASK),
        m => assets.flags.is_set(tile, m.saturating_sub(1)),
    }
}
