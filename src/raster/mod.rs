// src/raster/mod.rs

//! Shape primitives (rectangle fill, line, circle fill) and, in `blit`, the
//! atlas-indexed sprite, text and tile-map primitives.
//!
//! Two clipping granularities apply to every primitive:
//! - an invalid logical color rejects the whole operation before any pixel
//!   is touched;
//! - an out-of-canvas coordinate skips only that pixel.
//!
//! Public entry points validate the color once and hand a resolved physical
//! index to the internal span/point helpers below.

pub mod blit;

pub use blit::{map, print, spr};

use std::ops::RangeInclusive;

use log::trace;

use crate::canvas::{Canvas, RenderContext, CANVAS_SIZE};
use crate::color::color_index;

const MAX_COORD: i64 = CANVAS_SIZE as i64 - 1;

/// Validates a logical color and resolves it through the palette table.
pub(crate) fn resolve_color(ctx: &RenderContext, op: &str, c: i32) -> Option<u8> {
    match color_index(c) {
        Some(logical) => Some(ctx.palette.resolve(logical)),
        None => {
            trace!("{} rejected: color {} out of range", op, c);
            None
        }
    }
}

/// Fills the inclusive rectangle `(x1, y1)-(x2, y2)` with color `c`.
///
/// A reversed rectangle (`x1 > x2` or `y1 > y2`) draws nothing.
pub fn rectfill(ctx: &mut RenderContext, x1: i32, y1: i32, x2: i32, y2: i32, c: i32) {
    let Some(physical) = resolve_color(ctx, "rectfill", c) else {
        return;
    };
    fill_rect(
        &mut ctx.canvas,
        i64::from(x1),
        i64::from(y1),
        i64::from(x2),
        i64::from(y2),
        physical,
    );
}

/// Draws a Bresenham line from `(x1, y1)` to `(x2, y2)`, both endpoints
/// included.
pub fn line(ctx: &mut RenderContext, x1: i32, y1: i32, x2: i32, y2: i32, c: i32) {
    let Some(physical) = resolve_color(ctx, "line", c) else {
        return;
    };
    draw_line(
        &mut ctx.canvas,
        i64::from(x1),
        i64::from(y1),
        i64::from(x2),
        i64::from(y2),
        physical,
    );
}

/// Draws a filled disk of radius `r` centred on `(x, y)`.
///
/// Radii up to 3 are drawn as fixed unions of rectangles (radius 0 and 1
/// give a five-pixel plus); larger radii produce the pixels of the midpoint
/// circle algorithm, which fills each computed row with a horizontal span.
pub fn circfill(ctx: &mut RenderContext, x: i32, y: i32, r: i32, c: i32) {
    let Some(p) = resolve_color(ctx, "circfill", c) else {
        return;
    };
    let canvas = &mut ctx.canvas;
    let (x, y, r) = (i64::from(x), i64::from(y), i64::from(r));

    if r <= 1 {
        fill_rect(canvas, x - 1, y, x + 1, y, p);
        fill_rect(canvas, x, y - 1, x, y + 1, p);
    } else if r <= 2 {
        fill_rect(canvas, x - 2, y - 1, x + 2, y + 1, p);
        fill_rect(canvas, x - 1, y - 2, x + 1, y + 2, p);
    } else if r <= 3 {
        fill_rect(canvas, x - 3, y - 1, x + 3, y + 1, p);
        fill_rect(canvas, x - 1, y - 3, x + 1, y + 3, p);
        fill_rect(canvas, x - 2, y - 2, x + 2, y + 2, p);
    } else {
        fill_disk(canvas, x, y, r, p);
    }
}

/// Writes a physical index at `(x, y)` if that lies on the canvas.
pub(crate) fn plot(canvas: &mut Canvas, x: i64, y: i64, physical: u8) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        canvas.set(x, y, physical);
    }
}

/// Writes an already-resolved physical index into every canvas pixel of the
/// inclusive rectangle. The iteration range is intersected with the canvas
/// first, which visits exactly the pixels per-pixel clipping would keep.
fn fill_rect(canvas: &mut Canvas, x1: i64, y1: i64, x2: i64, y2: i64, physical: u8) {
    let (x_start, x_end) = (x1.max(0), x2.min(MAX_COORD));
    let (y_start, y_end) = (y1.max(0), y2.min(MAX_COORD));
    for i in x_start..=x_end {
        for j in y_start..=y_end {
            plot(canvas, i, j, physical);
        }
    }
}

/// Plots the points of the symmetric Bresenham walk from `(x1, y1)` to
/// `(x2, y2)`.
///
/// The walk advances the major axis on every step, and after `t` steps the
/// minor axis has advanced `minor_offset(..., t)`, so only the steps whose
/// major coordinate is on the canvas are visited.
fn draw_line(canvas: &mut Canvas, x1: i64, y1: i64, x2: i64, y2: i64, physical: u8) {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };

    if dx >= dy {
        for t in axis_window(x1, sx, dx) {
            let n = minor_offset(dy, dx, t);
            plot(canvas, x1 + sx * t, y1 + sy * n, physical);
        }
    } else {
        for t in axis_window(y1, sy, dy) {
            let n = minor_offset(dx, dy, t);
            plot(canvas, x1 + sx * n, y1 + sy * t, physical);
        }
    }
}

/// Steps `t` in `0..=len` for which `start + step * t` is a canvas coordinate.
fn axis_window(start: i64, step: i64, len: i64) -> RangeInclusive<i64> {
    let (lo, hi) = if step > 0 {
        (-start, MAX_COORD - start)
    } else {
        (start - MAX_COORD, start)
    };
    lo.max(0)..=hi.min(len)
}

/// Minor-axis distance covered after `t` major steps of a line with slope
/// `minor / major` (`minor <= major`).
fn minor_offset(minor: i64, major: i64, t: i64) -> i64 {
    if major == 0 {
        return 0;
    }
    let (minor, major, t) = (i128::from(minor), i128::from(major), i128::from(t));
    ((2 * minor * t + major - 1) / (2 * major)) as i64
}

/// Fills the pixels of the incremental midpoint circle of radius `r`
/// (`r > 3`): a vertical and a horizontal seed line through the centre,
/// then for every step `(ox, oy)` the spans `x - ox..=x + ox` on rows
/// `y +- oy` and `x - oy..=x + oy` on rows `y +- ox`.
///
/// Step `k` sits at `ox = k`, `oy = step_height(k)`, which has a closed
/// form, so the disk is filled one visible canvas row at a time.
fn fill_disk(canvas: &mut Canvas, x: i64, y: i64, r: i64, physical: u8) {
    let rr = i128::from(r) * i128::from(r);

    // The walk stops after the first step with ox >= oy.
    let (mut lo, mut hi) = (1, r);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if mid >= octant_height(rr, mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    let last = lo;

    // The final step can start on the diagonal, where the closed form no
    // longer matches a single decrement.
    let before = octant_height(rr, last - 1);
    let last_height = if last < before {
        octant_height(rr, last)
    } else if i128::from(before) * i128::from(before - 1) >= rr - i128::from(last) * i128::from(last) {
        before - 1
    } else {
        before
    };
    let step_height = |k: i64| {
        if k == last {
            last_height
        } else {
            octant_height(rr, k)
        }
    };

    for row in (y - r).max(0)..=(y + r).min(MAX_COORD) {
        let a = (row - y).abs();
        let mut half = if a == 0 { r } else { 0 };

        // spans on rows y +- ox
        if (1..=last).contains(&a) {
            half = half.max(step_height(a));
        }

        // spans on rows y +- oy: the widest step whose height is `a`
        let room = rr - i128::from(a) * i128::from(a - 1);
        if room > 0 {
            if last_height == a {
                half = half.max(last);
            } else {
                let widest = (isqrt(room - 1) as i64).min(last - 1);
                if widest >= 1 && octant_height(rr, widest) == a {
                    half = half.max(widest);
                }
            }
        }

        fill_rect(canvas, x - half, row, x + half, row, physical);
    }
}

/// Largest `h` with `h * (h - 1) < r*r - k*k`: the row offset the midpoint
/// walk holds after step `k` while it stays below the diagonal.
fn octant_height(rr: i128, k: i64) -> i64 {
    let room = rr - i128::from(k) * i128::from(k);
    if room <= 0 {
        return 0;
    }
    ((isqrt(4 * room - 3) + 1) / 2) as i64
}

fn isqrt(n: i128) -> i128 {
    let mut g = (n as f64).sqrt() as i128;
    while g * g > n {
        g -= 1;
    }
    while (g + 1) * (g + 1) <= n {
        g += 1;
    }
    g
}
