// src/replay/tests.rs

use super::*;
use crate::assets::Assets;
use crate::dispatch::DrawCall;
use anyhow::anyhow;
use test_log::test;

fn action(buttons: Buttons, hold: u32) -> Action {
    Action { buttons, hold }
}

fn fill(color: i32) -> DrawCall {
    DrawCall::Rectfill {
        x1: 0,
        y1: 0,
        x2: 127,
        y2: 127,
        color,
    }
}

fn two_color_game() -> ScriptedGame {
    ScriptedGame::new(DrawScript {
        init: vec![],
        frames: vec![vec![fill(1)], vec![fill(2)]],
    })
}

#[test]
fn default_script_is_one_dash_jump_then_idle() {
    let actions = parse_actions("xc 120").unwrap();
    assert_eq!(
        actions,
        vec![
            action(Buttons::DASH | Buttons::JUMP, 1),
            action(Buttons::empty(), 120),
        ]
    );
    assert_eq!(total_frames(&actions), 121);
}

#[test]
fn letter_after_hold_starts_a_new_action() {
    let expected = vec![action(Buttons::RIGHT, 30), action(Buttons::DASH, 1)];
    assert_eq!(parse_actions("d30x").unwrap(), expected);
    assert_eq!(parse_actions("d30 x").unwrap(), expected);
    assert_eq!(parse_actions("  d30\n\tx  ").unwrap(), expected);
}

#[test]
fn empty_and_zero_scripts() {
    assert!(parse_actions("").unwrap().is_empty());
    assert!(parse_actions("   ").unwrap().is_empty());
    assert!(parse_actions("0").unwrap().is_empty());
    assert_eq!(parse_actions("a0").unwrap(), vec![action(Buttons::LEFT, 1)]);
}

#[test]
fn unknown_letters_select_nothing() {
    assert_eq!(parse_actions("q5").unwrap(), vec![action(Buttons::empty(), 5)]);
    assert_eq!(
        parse_actions("wsz2").unwrap(),
        vec![action(Buttons::UP | Buttons::DOWN | Buttons::JUMP, 2)]
    );
}

#[test]
fn overlong_hold_is_rejected() {
    assert_eq!(
        parse_actions("a10000").unwrap(),
        vec![action(Buttons::LEFT, 10000)]
    );
    assert!(parse_actions("a100000").is_err());
}

#[test]
fn draw_script_requires_frames() {
    assert!(DrawScript::from_json(r#"{ "init": [] }"#).is_err());
    let script = DrawScript::from_json(
        r#"{ "frames": [[ { "op": "circfill", "x": 64, "y": 64, "r": 4, "color": 8 } ]] }"#,
    )
    .unwrap();
    assert!(script.init.is_empty());
    assert_eq!(script.frames[0].len(), 1);
}

#[test]
fn scripted_game_runs_init_once() {
    let script = DrawScript {
        init: vec![DrawCall::Pal {
            logical: 1,
            physical: 9,
        }],
        frames: vec![vec![fill(1)]],
    };
    let mut game = ScriptedGame::new(script);
    let mut host = Host::new(Assets::default());
    host.start(&mut game);
    let frame = host.step(&mut game, Buttons::empty());
    assert_eq!(frame.get(64, 64), Some(9));
    assert_eq!(game.drawn(), 1);
}

#[test]
fn preactions_are_not_recorded() {
    let mut game = two_color_game();
    let mut host = Host::new(Assets::default());
    let mut seen = Vec::new();
    let recorded = run(
        &mut host,
        &mut game,
        &[action(Buttons::empty(), 2)],
        &[action(Buttons::RIGHT, 3)],
        |index, frame| {
            seen.push((index, frame.get(0, 0)));
            Ok(())
        },
    )
    .unwrap();

    assert_eq!(recorded, 3);
    assert_eq!(game.drawn(), 5);
    assert_eq!(seen, vec![(0, Some(1)), (1, Some(2)), (2, Some(1))]);
}

#[test]
fn frame_callback_errors_stop_the_run() {
    let mut game = two_color_game();
    let mut host = Host::new(Assets::default());
    let result = run(
        &mut host,
        &mut game,
        &[],
        &[action(Buttons::empty(), 10)],
        |index, _| {
            if index == 1 {
                Err(anyhow!("disk full"))
            } else {
                Ok(())
            }
        },
    );
    assert!(result.is_err());
    assert_eq!(game.drawn(), 2);
}
