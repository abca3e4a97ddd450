// src/canvas/mod.rs

//! The pixel state of the console: the 128x128 indexed `Canvas`, the logical
//! to physical `PaletteTable`, the readback `CameraOffset`, and the
//! `RenderContext` that bundles them for the primitives and the dispatcher.

use log::trace;

use crate::color::{color_index, PALETTE_SIZE};

/// Width and height of the canvas in pixels.
pub const CANVAS_SIZE: usize = 128;

/// Bitmask used for toroidal wraparound; `CANVAS_SIZE` is a power of two.
const WRAP_MASK: i32 = CANVAS_SIZE as i32 - 1;

/// A row-major 128x128 grid of physical color indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pixels: Vec<u8>,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            pixels: vec![0; CANVAS_SIZE * CANVAS_SIZE],
        }
    }
}

impl Canvas {
    /// Creates a zero-filled canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the physical index at `(x, y)`, `None` outside the canvas.
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        Self::offset(x, y).map(|i| self.pixels[i])
    }

    /// Stores a physical index at `(x, y)`. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, physical: u8) {
        if let Some(i) = Self::offset(x, y) {
            self.pixels[i] = physical;
        }
    }

    /// Fills the whole canvas with one physical index.
    pub fn fill(&mut self, physical: u8) {
        self.pixels.fill(physical);
    }

    /// The raw row-major pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(x: i32, y: i32) -> Option<usize> {
        let size = CANVAS_SIZE as i32;
        if x < 0 || x >= size || y < 0 || y >= size {
            return None;
        }
        Some(y as usize * CANVAS_SIZE + x as usize)
    }
}

/// Indirection from logical color index to physical color index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteTable {
    entries: [u8; PALETTE_SIZE],
}

impl Default for PaletteTable {
    fn default() -> Self {
        let mut entries = [0u8; PALETTE_SIZE];
        for (i, entry) in entries.iter_mut().enumerate() {
            *entry = i as u8;
        }
        PaletteTable { entries }
    }
}

impl PaletteTable {
    /// Creates the identity mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaps `logical` to `physical`. Either index outside `[0, 16)` makes
    /// this a no-op.
    pub fn set(&mut self, logical: i32, physical: i32) {
        match (color_index(logical), color_index(physical)) {
            (Some(l), Some(p)) => self.entries[l as usize] = p,
            _ => trace!("pal({}, {}) ignored: index out of range", logical, physical),
        }
    }

    /// Restores the identity mapping.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Looks up the physical index for a validated logical index.
    pub fn resolve(&self, logical: u8) -> u8 {
        self.entries[logical as usize & (PALETTE_SIZE - 1)]
    }
}

/// The readback scroll offset. Any value is accepted; readback wraps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraOffset {
    pub x: i32,
    pub y: i32,
}

/// All mutable render state, owned by the caller and lent to every
/// primitive and to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub canvas: Canvas,
    pub palette: PaletteTable,
    pub camera: CameraOffset,
}

impl RenderContext {
    /// Creates a context in its initial state: blank canvas, identity
    /// palette, zero camera.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-applies the initial state to an existing context.
    pub fn reset(&mut self) {
        self.camera = CameraOffset::default();
        self.palette.reset();
        self.canvas.fill(0);
    }

    /// Stores the camera offset. Only readback observes it.
    pub fn set_camera(&mut self, x: i32, y: i32) {
        self.camera = CameraOffset { x, y };
    }

    /// Copies the canvas into `out` (row-major, 128x128) through the camera
    /// offset, wrapping both axes so the view scrolls toroidally.
    ///
    /// `out` shorter than a full canvas receives only the leading pixels.
    pub fn readback(&self, out: &mut [u8]) {
        let CameraOffset { x: cx, y: cy } = self.camera;
        for (j, row) in out.chunks_mut(CANVAS_SIZE).take(CANVAS_SIZE).enumerate() {
            let sy = (j as i32).wrapping_add(cy) & WRAP_MASK;
            for (i, px) in row.iter_mut().enumerate() {
                let sx = (i as i32).wrapping_add(cx) & WRAP_MASK;
                *px = self.canvas.pixels[sy as usize * CANVAS_SIZE + sx as usize];
            }
        }
    }
}

#[cfg(test)]
mod tests;
