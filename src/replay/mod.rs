// src/replay/mod.rs

//! Replays a scripted sequence of button states against a game.
//!
//! An action script is a compact text form of input over time. Letters
//! select buttons (`a` left, `d` right, `w` up, `s` down, `z`/`c` jump,
//! `x` dash) and a decimal number holds them for that many frames:
//!
//! ```text
//! xc 120      one frame of dash+jump, then 120 idle frames
//! d30 x       right for 30 frames, then one frame of dash
//! ```
//!
//! Whitespace ends the current action. A letter that follows a non-zero
//! hold also ends it. An action with no hold lasts one frame.

pub mod script;

pub use script::{DrawScript, ScriptedGame};

use anyhow::{bail, Result};
use log::{debug, info};

use crate::{
    frame::Frame,
    host::{GameLogic, Host},
    input::Buttons,
};

/// Holds at or above this value reject any further digit.
pub const MAX_HOLD: u32 = 10000;

/// One button state and the number of frames it is held for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub buttons: Buttons,
    pub hold: u32,
}

/// Parses an action script. An empty or all-whitespace script gives no
/// actions.
pub fn parse_actions(script: &str) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    let mut buttons = Buttons::empty();
    let mut hold: u32 = 0;

    let mut push = |buttons: &mut Buttons, hold: &mut u32| {
        actions.push(Action {
            buttons: *buttons,
            hold: (*hold).max(1),
        });
        *buttons = Buttons::empty();
        *hold = 0;
    };

    for ch in script.chars() {
        if ch.is_whitespace() {
            if !buttons.is_empty() || hold != 0 {
                push(&mut buttons, &mut hold);
            }
        } else if let Some(digit) = ch.to_digit(10) {
            if hold >= MAX_HOLD {
                bail!("action hold is too long (limit is {} frames)", MAX_HOLD);
            }
            hold = hold * 10 + digit;
        } else {
            if hold > 0 {
                push(&mut buttons, &mut hold);
            }
            if let Some(b) = Buttons::from_key(ch) {
                buttons |= b;
            }
        }
    }
    if !buttons.is_empty() || hold != 0 {
        push(&mut buttons, &mut hold);
    }

    debug!("Parsed {} actions from {:?}", actions.len(), script);
    Ok(actions)
}

/// Total number of frames a list of actions spans.
pub fn total_frames(actions: &[Action]) -> u64 {
    actions.iter().map(|a| u64::from(a.hold)).sum()
}

/// Runs `preactions` without reading back, then runs `actions` and hands
/// each frame to `on_frame` together with its zero-based recorded index.
///
/// Stops at the first error returned by `on_frame`.
pub fn run<F>(
    host: &mut Host,
    game: &mut dyn GameLogic,
    preactions: &[Action],
    actions: &[Action],
    mut on_frame: F,
) -> Result<u64>
where
    F: FnMut(u64, &Frame) -> Result<()>,
{
    info!(
        "Replaying {} pre-action frames, {} recorded frames",
        total_frames(preactions),
        total_frames(actions)
    );
    for action in preactions {
        for _ in 0..action.hold {
            host.advance(game, action.buttons);
        }
    }

    let mut recorded = 0u64;
    for action in actions {
        for _ in 0..action.hold {
            let frame = host.step(game, action.buttons);
            on_frame(recorded, &frame)?;
            recorded += 1;
        }
    }
    Ok(recorded)
}

#[cfg(test)]
mod tests;
