// src/config.rs

//! Defines the configuration structures for the `pico-canvas` replay host.
//!
//! The structs deserialize from a JSON file. Every section and field has a
//! default, so a config file only needs to name the values it changes, and
//! running without a config file at all is valid.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::DisplayPalette;

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration of the replay host.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the read-only asset tables come from.
    pub assets: AssetsConfig,
    /// Which inputs to replay and where recorded frames go.
    pub replay: ReplayConfig,
    /// How physical color indices are shown.
    pub display: DisplayConfig,
}

impl Config {
    /// Reads a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

// --- Assets Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    /// JSON asset pack. When `None`, empty tables are used and sprite, text
    /// and map calls draw nothing.
    pub path: Option<PathBuf>,
}

// --- Replay Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReplayConfig {
    /// Recorded action script (e.g. "xc 120").
    pub actions: String,
    /// Action script run before recording starts; its frames are not saved.
    pub preactions: String,
    /// Output file for `gif`, output directory for `ppm`.
    pub output: PathBuf,
    /// How recorded frames are written.
    pub format: OutputFormat,
    /// Integer upscaling factor for written frames.
    pub scale: u32,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        ReplayConfig {
            actions: "xc 120".to_string(),
            preactions: String::new(),
            output: PathBuf::from("./output/replay.gif"),
            format: OutputFormat::Gif,
            scale: 1,
        }
    }
}

/// Container for recorded frames.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One looping animated GIF.
    #[default]
    Gif,
    /// One binary PPM image per frame, named `frame_NNNNN.ppm`.
    Ppm,
}

// --- Display Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// RGB value for each physical color index.
    pub palette: DisplayPalette,
}
