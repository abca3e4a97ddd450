// src/canvas/tests.rs

use super::*;
use test_log::test;

fn readback(ctx: &RenderContext) -> Vec<u8> {
    let mut out = vec![0u8; CANVAS_SIZE * CANVAS_SIZE];
    ctx.readback(&mut out);
    out
}

#[test]
fn new_context_is_blank_with_identity_palette() {
    let ctx = RenderContext::new();
    assert!(ctx.canvas.pixels().iter().all(|&p| p == 0));
    for i in 0..16u8 {
        assert_eq!(ctx.palette.resolve(i), i);
    }
    assert_eq!(ctx.camera, CameraOffset::default());
}

#[test]
fn canvas_clips_out_of_bounds_access() {
    let mut canvas = Canvas::new();
    canvas.set(-1, 0, 5);
    canvas.set(0, 128, 5);
    canvas.set(127, 127, 5);
    assert_eq!(canvas.get(-1, 0), None);
    assert_eq!(canvas.get(128, 0), None);
    assert_eq!(canvas.get(127, 127), Some(5));
    assert_eq!(canvas.pixels().iter().filter(|&&p| p != 0).count(), 1);
}

#[test]
fn palette_set_rejects_out_of_range_indices() {
    let mut palette = PaletteTable::new();
    palette.set(3, 16);
    palette.set(-1, 4);
    palette.set(16, 4);
    assert_eq!(palette, PaletteTable::new());

    palette.set(3, 9);
    assert_eq!(palette.resolve(3), 9);
    palette.reset();
    assert_eq!(palette.resolve(3), 3);
}

#[test]
fn readback_without_camera_is_identity() {
    let mut ctx = RenderContext::new();
    ctx.canvas.set(10, 20, 7);
    let out = readback(&ctx);
    assert_eq!(out[20 * CANVAS_SIZE + 10], 7);
    assert_eq!(out.iter().filter(|&&p| p != 0).count(), 1);
}

#[test]
fn camera_shift_wraps_toroidally() {
    let mut ctx = RenderContext::new();
    for y in 0..128 {
        for x in 0..128 {
            ctx.canvas.set(x, y, ((x + y) % 16) as u8);
        }
    }
    ctx.set_camera(64, 64);
    let out = readback(&ctx);
    for j in 0..128i32 {
        for i in 0..128i32 {
            let expected = ctx.canvas.get((i + 64) % 128, (j + 64) % 128).unwrap();
            assert_eq!(out[(j * 128 + i) as usize], expected);
        }
    }
}

#[test]
fn negative_camera_wraps_like_euclidean_mod() {
    let mut ctx = RenderContext::new();
    ctx.canvas.set(127, 126, 3);
    ctx.set_camera(-1, -2);
    let out = readback(&ctx);
    assert_eq!(out[0], 3);
}

#[test]
fn reset_restores_initial_state() {
    let mut ctx = RenderContext::new();
    ctx.canvas.fill(9);
    ctx.palette.set(1, 2);
    ctx.set_camera(5, 6);
    ctx.reset();
    assert!(ctx.canvas.pixels().iter().all(|&p| p == 0));
    assert_eq!(ctx.palette, PaletteTable::new());
    assert_eq!(ctx.camera, CameraOffset::default());
}
