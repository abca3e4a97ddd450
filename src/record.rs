// src/record.rs

//! Destinations for recorded replay frames: a looping animated GIF, or a
//! directory of numbered PPM images.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use log::debug;

use crate::canvas::CANVAS_SIZE;
use crate::color::DisplayPalette;
use crate::frame::Frame;

/// Display time of one GIF frame, in hundredths of a second.
pub const FRAME_DELAY: u16 = 3;

/// Receives frames in order. `finish` must be called once all frames are in.
pub trait FrameSink {
    fn record(&mut self, frame: &Frame) -> Result<()>;

    fn finish(self: Box<Self>) -> Result<()>;
}

/// Edge length of a frame scaled by `scale`, bounded by the GIF size field.
fn scaled_side(scale: u32) -> Result<u16> {
    ensure!(scale >= 1, "frame scale must be at least 1 (got {})", scale);
    let side = CANVAS_SIZE as u64 * u64::from(scale);
    u16::try_from(side).with_context(|| format!("frame scale {} is too large", scale))
}

/// Encodes frames as an infinitely looping GIF with the display palette as
/// its global color table.
pub struct GifRecorder<W: Write> {
    encoder: gif::Encoder<W>,
    side: u16,
    scale: usize,
    frames: u64,
}

impl<W: Write> GifRecorder<W> {
    pub fn new(writer: W, palette: &DisplayPalette, scale: u32) -> Result<Self> {
        let side = scaled_side(scale)?;
        let mut encoder = gif::Encoder::new(writer, side, side, &palette.to_bytes())
            .context("writing GIF header")?;
        encoder.set_repeat(gif::Repeat::Infinite)?;
        Ok(GifRecorder {
            encoder,
            side,
            scale: scale as usize,
            frames: 0,
        })
    }

    /// Writes the GIF trailer and hands back the writer.
    pub fn into_inner(self) -> Result<W> {
        debug!("GIF complete: {} frames", self.frames);
        Ok(self.encoder.into_inner()?)
    }
}

impl<W: Write> FrameSink for GifRecorder<W> {
    fn record(&mut self, frame: &Frame) -> Result<()> {
        let gif_frame = gif::Frame {
            width: self.side,
            height: self.side,
            delay: FRAME_DELAY,
            buffer: Cow::Owned(frame.scaled_indices(self.scale)),
            ..gif::Frame::default()
        };
        self.encoder
            .write_frame(&gif_frame)
            .with_context(|| format!("encoding GIF frame {}", self.frames))?;
        self.frames += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        let mut writer = self.into_inner()?;
        writer.flush()?;
        Ok(())
    }
}

/// Writes each frame to `frame_NNNNN.ppm` inside a directory.
pub struct PpmSequence {
    dir: PathBuf,
    palette: DisplayPalette,
    scale: u32,
    next: u64,
}

impl PpmSequence {
    pub fn new(dir: PathBuf, palette: DisplayPalette, scale: u32) -> Result<Self> {
        scaled_side(scale)?;
        Ok(PpmSequence {
            dir,
            palette,
            scale,
            next: 0,
        })
    }
}

/// Path of the `index`-th image of a PPM sequence.
pub fn frame_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("frame_{:05}.ppm", index))
}

impl FrameSink for PpmSequence {
    fn record(&mut self, frame: &Frame) -> Result<()> {
        let path = frame_path(&self.dir, self.next);
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);
        frame.write_ppm(&mut out, &self.palette, self.scale)?;
        out.flush().with_context(|| format!("writing {}", path.display()))?;
        self.next += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        debug!("Wrote {} PPM frames to {}", self.next, self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RenderContext;
    use test_log::test;

    fn frame_with(x: i32, y: i32, physical: u8) -> Frame {
        let mut ctx = RenderContext::new();
        ctx.canvas.set(x, y, physical);
        Frame::capture(&ctx)
    }

    #[test]
    fn gif_holds_every_frame_with_palette_and_delay() {
        let palette = DisplayPalette::default();
        let mut recorder = GifRecorder::new(Vec::new(), &palette, 1).unwrap();
        recorder.record(&frame_with(0, 0, 8)).unwrap();
        recorder.record(&frame_with(5, 9, 12)).unwrap();
        recorder.record(&frame_with(127, 127, 3)).unwrap();
        let bytes = recorder.into_inner().unwrap();

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options.read_info(bytes.as_slice()).unwrap();
        assert_eq!((decoder.width(), decoder.height()), (128, 128));
        assert_eq!(decoder.global_palette(), Some(palette.to_bytes().as_slice()));

        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            assert_eq!(frame.delay, FRAME_DELAY);
            frames.push(frame.buffer.to_vec());
        }
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0][0], 8);
        assert_eq!(frames[1][9 * 128 + 5], 12);
        assert_eq!(frames[1][0], 0);
        assert_eq!(frames[2][128 * 128 - 1], 3);
    }

    #[test]
    fn gif_frames_are_scaled() {
        let mut recorder = GifRecorder::new(Vec::new(), &DisplayPalette::default(), 2).unwrap();
        recorder.record(&frame_with(1, 0, 9)).unwrap();
        let bytes = recorder.into_inner().unwrap();

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::Indexed);
        let mut decoder = options.read_info(bytes.as_slice()).unwrap();
        assert_eq!(decoder.width(), 256);
        let frame = decoder.read_next_frame().unwrap().unwrap();
        assert_eq!(&frame.buffer[..5], &[0, 0, 9, 9, 0]);
        assert_eq!(frame.buffer[256 + 3], 9);
    }

    #[test]
    fn oversized_scale_is_rejected() {
        assert!(GifRecorder::new(Vec::new(), &DisplayPalette::default(), 0).is_err());
        assert!(GifRecorder::new(Vec::new(), &DisplayPalette::default(), 600).is_err());
        assert!(scaled_side(511).is_ok());
    }

    #[test]
    fn frame_files_are_numbered() {
        assert_eq!(
            frame_path(Path::new("out"), 7),
            PathBuf::from("out/frame_00007.ppm")
        );
    }
}
