// src/dispatch/mod.rs

//! Routes draw calls from the interpreter to the raster primitives.
//!
//! The interpreter sees only the `DrawTarget` trait. `Dispatcher` implements
//! it by borrowing the caller's `RenderContext`, the read-only `Assets` and
//! the input source for the duration of a frame.

pub mod commands;

pub use commands::{Arg, DrawCall, Opcode};

use log::{trace, warn};

use crate::assets::Assets;
use crate::canvas::RenderContext;
use crate::input::InputSource;
use crate::raster;

/// The receiving end of an interpreter's draw calls.
pub trait DrawTarget {
    /// Executes one typed instruction and returns its integer result
    /// (0 when the instruction has no meaningful result).
    fn call(&mut self, call: &DrawCall) -> i32;

    /// Executes one untyped instruction. Unknown opcodes and malformed
    /// payloads return 0 and change nothing.
    fn call_raw(&mut self, opcode: i32, args: &[Arg]) -> i32 {
        let Some(op) = Opcode::from_i32(opcode) else {
            warn!("Ignoring unknown opcode {}", opcode);
            return 0;
        };
        match DrawCall::from_args(op, args) {
            Some(call) => self.call(&call),
            None => {
                warn!("Ignoring {} with malformed arguments: {:?}", op, args);
                0
            }
        }
    }
}

/// Executes `call` against the given state. Drawing opcodes return 0.
pub fn dispatch(
    ctx: &mut RenderContext,
    assets: &Assets,
    input: &dyn InputSource,
    call: &DrawCall,
) -> i32 {
    trace!("dispatch: {:?}", call);
    match *call {
        DrawCall::Music { channel, track, fade } => {
            trace!("music({}, {}, {}) ignored: no audio", channel, track, fade);
            0
        }
        DrawCall::Spr {
            sprite,
            x,
            y,
            cols,
            rows,
            flip_x,
            flip_y,
        } => {
            raster::spr(ctx, assets, sprite, x, y, cols, rows, flip_x, flip_y);
            0
        }
        DrawCall::Btn { button } => i32::from(input.btn(button)),
        DrawCall::Sfx { id } => {
            trace!("sfx({}) ignored: no audio", id);
            0
        }
        DrawCall::Pal { logical, physical } => {
            ctx.palette.set(logical, physical);
            0
        }
        DrawCall::PalReset => {
            ctx.palette.reset();
            0
        }
        DrawCall::Circfill { x, y, r, color } => {
            raster::circfill(ctx, x, y, r, color);
            0
        }
        DrawCall::Print {
            ref text,
            x,
            y,
            color,
        } => {
            raster::print(ctx, assets, text, x, y, color);
            0
        }
        DrawCall::Rectfill {
            x1,
            y1,
            x2,
            y2,
            color,
        } => {
            raster::rectfill(ctx, x1, y1, x2, y2, color);
            0
        }
        DrawCall::Line {
            x1,
            y1,
            x2,
            y2,
            color,
        } => {
            raster::line(ctx, x1, y1, x2, y2, color);
            0
        }
        DrawCall::Mget { x, y } => assets.map.get(x, y).map_or(0, i32::from),
        DrawCall::Camera { x, y } => {
            ctx.set_camera(x, y);
            0
        }
        DrawCall::Fget { tile, flag } => i32::from(assets.flags.is_set(tile, flag)),
        DrawCall::Map {
            mx,
            my,
            tx,
            ty,
            mw,
            mh,
            mask,
        } => {
            raster::map(ctx, assets, mx, my, tx, ty, mw, mh, mask);
            0
        }
    }
}

/// Binds render state, assets and input into a `DrawTarget` for one frame.
pub struct Dispatcher<'a> {
    ctx: &'a mut RenderContext,
    assets: &'a Assets,
    input: &'a dyn InputSource,
}

impl<'a> Dispatcher<'a> {
    pub fn new(ctx: &'a mut RenderContext, assets: &'a Assets, input: &'a dyn InputSource) -> Self {
        Dispatcher { ctx, assets, input }
    }
}

impl DrawTarget for Dispatcher<'_> {
    fn call(&mut self, call: &DrawCall) -> i32 {
        dispatch(self.ctx, self.assets, self.input, call)
    }
}
