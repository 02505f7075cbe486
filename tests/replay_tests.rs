//! Input mapping and scripted replay tests

use std::fs;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use tetris_sim::core::{EngineConfig, GameState};
use tetris_sim::input::{map_key_event, parse_key_code};
use tetris_sim::replay::{self, parse_replay_args, run_script, ReplayScript};
use tetris_sim::types::{InputEvent, InputKey};

fn script(json: &str) -> ReplayScript {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_terminal_press_and_release() {
    let press = KeyEvent::new_with_kind(KeyCode::Down, KeyModifiers::NONE, KeyEventKind::Press);
    let release = KeyEvent::new_with_kind(KeyCode::Down, KeyModifiers::NONE, KeyEventKind::Release);
    assert_eq!(map_key_event(press), Some(InputEvent::press(InputKey::SoftDrop)));
    assert_eq!(map_key_event(release), Some(InputEvent::release(InputKey::SoftDrop)));
}

#[test]
fn test_every_engine_key_is_reachable_by_name() {
    for name in ["up", "left", "right", "down", "space", "p", "enter", "q"] {
        let code = parse_key_code(name).unwrap();
        assert!(map_key_event(KeyEvent::from(code)).is_some(), "{name} unbound");
    }
}

#[test]
fn test_replay_hard_drop() {
    let s = script(
        r#"{
            "seed": 11,
            "duration_ms": 500,
            "events": [
                { "at_ms": 0, "key": "enter", "phase": "press" },
                { "at_ms": 100, "key": "space", "phase": "press" },
                { "at_ms": 100, "key": "space", "phase": "release" }
            ]
        }"#,
    );
    let snap = run_script(&s, EngineConfig::default(), None, None).unwrap();
    assert_eq!(snap.state, GameState::Playing);
    assert_eq!(snap.occupied_count(), 4);
    assert!(snap.score > 0);
    assert_eq!(snap.clock_ms, 500);
}

#[test]
fn test_replay_is_deterministic() {
    let s = script(
        r#"{
            "duration_ms": 3000,
            "events": [
                { "at_ms": 0, "key": "enter", "phase": "press" },
                { "at_ms": 40, "key": "left", "phase": "press" },
                { "at_ms": 400, "key": "left", "phase": "release" },
                { "at_ms": 500, "key": "x", "phase": "press" },
                { "at_ms": 600, "key": "space", "phase": "press" },
                { "at_ms": 900, "key": "down", "phase": "press" },
                { "at_ms": 1500, "key": "down", "phase": "release" }
            ]
        }"#,
    );
    let a = run_script(&s, EngineConfig::default(), Some(5), None).unwrap();
    let b = run_script(&s, EngineConfig::default(), Some(5), None).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_replay_stops_on_quit() {
    let s = script(
        r#"{
            "step_ms": 10,
            "duration_ms": 10000,
            "events": [
                { "at_ms": 0, "key": "enter", "phase": "press" },
                { "at_ms": 250, "key": "q", "phase": "press" }
            ]
        }"#,
    );
    let snap = run_script(&s, EngineConfig::default(), None, None).unwrap();
    assert!(snap.quit_requested);
    assert_eq!(snap.clock_ms, 250);
}

#[test]
fn test_replay_without_begin_stays_at_start() {
    let s = script(r#"{ "duration_ms": 1000 }"#);
    let snap = run_script(&s, EngineConfig::default(), None, Some(100)).unwrap();
    assert_eq!(snap.state, GameState::Start);
    assert!(snap.current.is_none());
}

#[test]
fn test_replay_rejects_unknown_key() {
    let s = script(
        r#"{ "duration_ms": 100, "events": [{ "at_ms": 0, "key": "f13", "phase": "press" }] }"#,
    );
    assert!(run_script(&s, EngineConfig::default(), None, None).is_err());
}

#[test]
fn test_replay_from_files() {
    let dir = std::env::temp_dir().join(format!("tetris-sim-replay-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let script_path = dir.join("script.json");
    let config_path = dir.join("engine.json");
    fs::write(
        &script_path,
        r#"{ "duration_ms": 200, "events": [{ "at_ms": 0, "key": "enter", "phase": "press" }] }"#,
    )
    .unwrap();
    fs::write(&config_path, r#"{ "max_step_ms": 50 }"#).unwrap();

    let args: Vec<String> = [
        "replay",
        script_path.to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
        "--step-ms",
        "100",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let parsed = parse_replay_args(&args).unwrap().unwrap();
    let snap = replay::run(&parsed).unwrap();
    // Each 100 ms step is clamped to 50 ms by the config.
    assert_eq!(snap.clock_ms, 100);
    assert_eq!(snap.state, GameState::Playing);

    fs::write(&config_path, r#"{ "arr_ms": 0 }"#).unwrap();
    assert!(replay::run(&parsed).is_err());

    fs::remove_dir_all(&dir).unwrap();
}
