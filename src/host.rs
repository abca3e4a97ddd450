// src/host.rs
//! Drives a game interpreter one frame at a time. The host owns the render
//! state and the asset tables, lends them to the interpreter through a
//! `Dispatcher` for every callback, and reads the canvas back after drawing.

use log::{debug, trace};

use crate::{
    assets::Assets,
    canvas::RenderContext,
    dispatch::{Dispatcher, DrawTarget},
    frame::Frame,
    input::Buttons,
};

/// The interpreter side of the seam. Each callback receives the draw-call
/// target it must issue its instructions to.
pub trait GameLogic {
    /// Called once before the first frame.
    fn init(&mut self, _target: &mut dyn DrawTarget) {}

    /// Advances game state by one tick.
    fn update(&mut self, target: &mut dyn DrawTarget);

    /// Issues the draw calls for the current tick.
    fn draw(&mut self, target: &mut dyn DrawTarget);
}

/// Owns the render state for one game session.
pub struct Host {
    ctx: RenderContext,
    assets: Assets,
    frames: u64,
}

impl Host {
    /// Creates a host in the initial render state: camera at zero, identity
    /// palette, canvas cleared to 0.
    pub fn new(assets: Assets) -> Self {
        let mut ctx = RenderContext::new();
        ctx.reset();
        Host {
            ctx,
            assets,
            frames: 0,
        }
    }

    /// Runs the game's `init` callback. Button state reads as released.
    pub fn start(&mut self, game: &mut dyn GameLogic) {
        debug!("Host: running game init");
        let input = Buttons::empty();
        let mut target = Dispatcher::new(&mut self.ctx, &self.assets, &input);
        game.init(&mut target);
    }

    /// Runs `update` then `draw` with `buttons` held, without reading back.
    pub fn advance(&mut self, game: &mut dyn GameLogic, buttons: Buttons) {
        trace!("Host: frame {} with buttons {:?}", self.frames, buttons);
        let mut target = Dispatcher::new(&mut self.ctx, &self.assets, &buttons);
        game.update(&mut target);
        game.draw(&mut target);
        self.frames += 1;
    }

    /// Runs one frame and returns the camera-shifted readback.
    pub fn step(&mut self, game: &mut dyn GameLogic, buttons: Buttons) -> Frame {
        self.advance(game, buttons);
        Frame::capture(&self.ctx)
    }

    /// Number of frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DrawCall;
    use test_log::test;

    /// Moves a 2x2 block right while RIGHT is held and scrolls the camera
    /// once the block passes x=8.
    #[derive(Default)]
    struct MockGame {
        x: i32,
        inits: u32,
        updates: u32,
    }

    impl GameLogic for MockGame {
        fn init(&mut self, target: &mut dyn DrawTarget) {
            self.inits += 1;
            target.call(&DrawCall::Pal {
                logical: 1,
                physical: 8,
            });
        }

        fn update(&mut self, target: &mut dyn DrawTarget) {
            self.updates += 1;
            if target.call(&DrawCall::Btn { button: 1 }) != 0 {
                self.x += 4;
            }
        }

        fn draw(&mut self, target: &mut dyn DrawTarget) {
            target.call(&DrawCall::Rectfill {
                x1: 0,
                y1: 0,
                x2: 127,
                y2: 127,
                color: 0,
            });
            target.call(&DrawCall::Rectfill {
                x1: self.x,
                y1: 0,
                x2: self.x + 1,
                y2: 1,
                color: 1,
            });
            let cam = if self.x > 8 { self.x } else { 0 };
            target.call(&DrawCall::Camera { x: cam, y: 0 });
        }
    }

    #[test]
    fn new_host_starts_blank() {
        let host = Host::new(Assets::default());
        assert_eq!(host.frame_count(), 0);
        assert!(host.context().canvas.pixels().iter().all(|&p| p == 0));
        assert_eq!(host.context().camera.x, 0);
    }

    #[test]
    fn init_runs_once_and_state_persists() {
        let mut host = Host::new(Assets::default());
        let mut game = MockGame::default();
        host.start(&mut game);
        assert_eq!(game.inits, 1);

        let frame = host.step(&mut game, Buttons::empty());
        // pal(1, 8) from init still applies
        assert_eq!(frame.get(0, 0), Some(8));
        assert_eq!(game.updates, 1);
    }

    #[test]
    fn buttons_reach_the_game() {
        let mut host = Host::new(Assets::default());
        let mut game = MockGame::default();
        host.advance(&mut game, Buttons::RIGHT);
        host.advance(&mut game, Buttons::LEFT);
        assert_eq!(game.x, 4);
        assert_eq!(host.frame_count(), 2);
    }

    #[test]
    fn readback_follows_camera() {
        let mut host = Host::new(Assets::default());
        let mut game = MockGame::default();
        for _ in 0..2 {
            host.advance(&mut game, Buttons::RIGHT);
        }
        let frame = host.step(&mut game, Buttons::RIGHT);
        assert_eq!(game.x, 12);
        // camera follows the block, so it is read back at the left edge
        assert_eq!(frame.get(0, 0), Some(1));
        assert_eq!(frame.get(1, 1), Some(1));
        assert_eq!(frame.get(2, 0), Some(0));
        assert_eq!(host.context().canvas.get(12, 0), Some(1));
    }
}
