// src/frame.rs

//! A captured, camera-shifted view of the canvas and its export to RGB.

use std::io::Write;

use anyhow::{ensure, Result};

use crate::canvas::{RenderContext, CANVAS_SIZE};
use crate::color::DisplayPalette;

/// One readback: 128x128 physical color indices, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Vec<u8>,
}

impl Frame {
    /// Reads the canvas back through the current camera offset.
    pub fn capture(ctx: &RenderContext) -> Self {
        let mut pixels = vec![0u8; CANVAS_SIZE * CANVAS_SIZE];
        ctx.readback(&mut pixels);
        Frame { pixels }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= CANVAS_SIZE || y >= CANVAS_SIZE {
            return None;
        }
        Some(self.pixels[y * CANVAS_SIZE + x])
    }

    /// Physical indices with each pixel enlarged to a `scale` x `scale`
    /// block; the result is `128 * scale` pixels on a side.
    pub fn scaled_indices(&self, scale: usize) -> Vec<u8> {
        let side = CANVAS_SIZE * scale;
        let mut out = Vec::with_capacity(side * side);
        for row in self.pixels.chunks(CANVAS_SIZE) {
            let start = out.len();
            for &p in row {
                out.extend(std::iter::repeat(p).take(scale));
            }
            for _ in 1..scale {
                out.extend_from_within(start..start + side);
            }
        }
        out
    }

    /// Expands to packed RGB triples.
    pub fn to_rgb(&self, palette: &DisplayPalette) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for &p in &self.pixels {
            let c = palette.rgb(p);
            rgb.extend_from_slice(&[c.0, c.1, c.2]);
        }
        rgb
    }

    /// Writes a binary PPM (P6) image, each pixel enlarged to a
    /// `scale` x `scale` block.
    pub fn write_ppm<W: Write>(&self, out: &mut W, palette: &DisplayPalette, scale: u32) -> Result<()> {
        ensure!(scale >= 1, "frame scale must be at least 1 (got {})", scale);
        let scale = scale as usize;
        let side = CANVAS_SIZE * scale;
        write!(out, "P6\n{} {}\n255\n", side, side)?;

        let mut rgb = Vec::with_capacity(side * side * 3);
        for p in self.scaled_indices(scale) {
            let c = palette.rgb(p);
            rgb.extend_from_slice(&[c.0, c.1, c.2]);
        }
        out.write_all(&rgb)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use test_log::test;

    #[test]
    fn capture_applies_camera() {
        let mut ctx = RenderContext::new();
        ctx.canvas.set(5, 0, 8);
        ctx.set_camera(5, 0);
        let frame = Frame::capture(&ctx);
        assert_eq!(frame.get(0, 0), Some(8));
        assert_eq!(frame.get(128, 0), None);
    }

    #[test]
    fn ppm_output_is_scaled() {
        let mut ctx = RenderContext::new();
        ctx.canvas.set(0, 0, 8);
        let frame = Frame::capture(&ctx);
        let palette = DisplayPalette::default();

        let mut out = Vec::new();
        frame.write_ppm(&mut out, &palette, 2).unwrap();
        let header = b"P6\n256 256\n255\n";
        assert!(out.starts_with(header));
        assert_eq!(out.len(), header.len() + 256 * 256 * 3);

        let red = palette.rgb(8);
        let body = &out[header.len()..];
        let at = |x: usize, y: usize| {
            let i = (y * 256 + x) * 3;
            Rgb(body[i], body[i + 1], body[i + 2])
        };
        assert_eq!(at(0, 0), red);
        assert_eq!(at(1, 1), red);
        assert_eq!(at(2, 0), palette.rgb(0));
    }

    #[test]
    fn scaled_indices_repeat_rows_and_columns() {
        let mut ctx = RenderContext::new();
        ctx.canvas.set(1, 0, 5);
        let frame = Frame::capture(&ctx);
        let scaled = frame.scaled_indices(3);
        let side = CANVAS_SIZE * 3;
        assert_eq!(scaled.len(), side * side);
        for y in 0..3 {
            assert_eq!(&scaled[y * side..y * side + 7], &[0, 0, 0, 5, 5, 5, 0]);
        }
        assert_eq!(scaled[3 * side + 3], 0);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let frame = Frame::capture(&RenderContext::new());
        assert!(frame.write_ppm(&mut Vec::new(), &DisplayPalette::default(), 0).is_err());
    }
}
