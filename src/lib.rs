// src/lib.rs

//! A 128x128 indexed-color software rasterizer in the style of the PICO-8
//! fantasy console, with the draw-call dispatcher a game interpreter talks
//! to and a replay host that records frames from scripted input.

pub mod assets;
pub mod canvas;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod frame;
pub mod host;
pub mod input;
pub mod raster;
pub mod record;
pub mod replay;
