// src/replay/script.rs

//! A game whose behaviour is a fixed list of draw calls read from JSON.
//!
//! ```json
//! {
//!   "init":   [ { "op": "pal", "logical": 1, "physical": 8 } ],
//!   "frames": [ [ { "op": "rectfill", "x1": 0, "y1": 0, "x2": 127, "y2": 127, "color": 1 } ] ]
//! }
//! ```
//!
//! Frame `n` issues `frames[n % frames.len()]`, so a short script loops.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::dispatch::{DrawCall, DrawTarget};
use crate::host::GameLogic;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawScript {
    /// Calls issued once from `init`.
    pub init: Vec<DrawCall>,
    /// Calls issued by each drawn frame, cycled.
    pub frames: Vec<Vec<DrawCall>>,
}

impl DrawScript {
    pub fn from_json(text: &str) -> Result<Self> {
        let script: DrawScript = serde_json::from_str(text)?;
        if script.frames.is_empty() {
            bail!("draw script has no frames");
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading draw script {}", path.display()))?;
        let script = Self::from_json(&text)
            .with_context(|| format!("parsing draw script {}", path.display()))?;
        debug!(
            "Loaded draw script: {} init calls, {} frames",
            script.init.len(),
            script.frames.len()
        );
        Ok(script)
    }
}

/// Plays a `DrawScript` through the `GameLogic` seam.
#[derive(Debug, Clone)]
pub struct ScriptedGame {
    script: DrawScript,
    drawn: usize,
}

impl ScriptedGame {
    pub fn new(script: DrawScript) -> Self {
        ScriptedGame { script, drawn: 0 }
    }

    /// Number of frames drawn so far.
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl GameLogic for ScriptedGame {
    fn init(&mut self, target: &mut dyn DrawTarget) {
        for call in &self.script.init {
            target.call(call);
        }
    }

    fn update(&mut self, _target: &mut dyn DrawTarget) {}

    fn draw(&mut self, target: &mut dyn DrawTarget) {
        if self.script.frames.is_empty() {
            return;
        }
        let index = self.drawn % self.script.frames.len();
        trace!("ScriptedGame: drawing script frame {}", index);
        for call in &self.script.frames[index] {
            target.call(call);
        }
        self.drawn += 1;
    }
}
