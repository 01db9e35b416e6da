//! Tests for play definition parsing, validation, and loading

use std::fs;
use std::path::PathBuf;

use super::{load_plays_from_dir, load_plays_from_file, ActionSpec, BuildError, ScriptError};
use crate::action::TAG_UNSET;

fn parse_play(toml_str: &str) -> super::PlayDefinition {
    toml::from_str(toml_str).expect("definition parses")
}

/// Scratch directory unique to this test run.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cadence-script-tests-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("scratch dir created");
    dir
}

#[test]
fn test_play_definition_parses_and_builds() {
    let play = parse_play(
        r#"
id = "intro"
target = "hero"

[action]
type = "sequence"

[[action.actions]]
type = "move_by"
duration = 1.0
delta = [10.0, 0.0, 0.0]

[[action.actions]]
type = "delay"
duration = 0.5
"#,
    );

    assert_eq!(play.id, "intro");
    assert_eq!(play.target, "hero");
    assert!(play.enabled, "enabled defaults to true");
    assert_eq!(play.tag, TAG_UNSET);

    let action = play.build().expect("valid definition builds");
    assert!((action.duration() - 1.5).abs() < 1e-6);
}

#[test]
fn test_easing_and_decorations_parse() {
    let play = parse_play(
        r#"
id = "bounce"
target = "hero"
speed = 2.0
tag = 9

[action]
type = "repeat"
times = 3

[action.action]
type = "move_by"
duration = 1.0
delta = [0.0, 5.0, 0.0]
stackable = true

[[action.action.easing]]
type = "bounce_out"

[[action.action.easing]]
type = "in"
rate = 2.0
"#,
    );

    let action = play.build().expect("valid definition builds");
    assert_eq!(action.tag(), 9);
    assert!((action.speed() - 2.0).abs() < 1e-6);
    assert!((action.duration() - 3.0).abs() < 1e-6);
}

#[test]
fn test_negative_duration_rejected() {
    let spec = ActionSpec::MoveBy {
        duration: -1.0,
        delta: [1.0, 0.0, 0.0],
        stackable: false,
        easing: Vec::new(),
    };
    assert_eq!(spec.build().unwrap_err(), BuildError::NegativeDuration(-1.0));
}

#[test]
fn test_zero_repeat_rejected() {
    let spec = ActionSpec::Repeat {
        times: 0,
        action: Box::new(ActionSpec::Delay { duration: 1.0 }),
    };
    assert_eq!(spec.build().unwrap_err(), BuildError::ZeroRepeat);
}

#[test]
fn test_empty_sequence_rejected() {
    let spec = ActionSpec::Sequence {
        actions: Vec::new(),
    };
    assert_eq!(spec.build().unwrap_err(), BuildError::EmptyComposite("sequence"));
}

#[test]
fn test_non_positive_speed_rate_rejected() {
    let spec = ActionSpec::Speed {
        rate: 0.0,
        action: Box::new(ActionSpec::Delay { duration: 1.0 }),
    };
    assert_eq!(spec.build().unwrap_err(), BuildError::NonPositiveRate(0.0));
}

#[test]
fn test_load_plays_from_file() {
    let dir = scratch_dir("file");
    let path = dir.join("plays.toml");
    fs::write(
        &path,
        r#"
[[play]]
id = "a"
target = "hero"
action = { type = "delay", duration = 1.0 }

[[play]]
id = "b"
target = "villain"
action = { type = "move_by", duration = 2.0, delta = [1.0, 0.0, 0.0] }
"#,
    )
    .expect("play file written");

    let plays = load_plays_from_file(&path).expect("file loads");
    assert_eq!(plays.len(), 2);
    assert_eq!(plays[0].id, "a");
    assert_eq!(plays[1].target, "villain");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_load_missing_file_is_read_error() {
    let err = load_plays_from_file(std::path::Path::new("/nonexistent/plays.toml")).unwrap_err();
    assert!(matches!(err, ScriptError::ReadFile { .. }));
}

#[test]
fn test_load_malformed_toml_is_parse_error() {
    let dir = scratch_dir("malformed");
    let path = dir.join("bad.toml");
    fs::write(&path, "[[play]\nid = ").expect("file written");

    let err = load_plays_from_file(&path).unwrap_err();
    assert!(matches!(err, ScriptError::ParseToml { .. }));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_invalid_definition_reported_with_play_id() {
    let dir = scratch_dir("invalid");
    let path = dir.join("plays.toml");
    fs::write(
        &path,
        r#"
[[play]]
id = "broken"
target = "hero"
action = { type = "repeat", times = 0, action = { type = "delay", duration = 1.0 } }
"#,
    )
    .expect("file written");

    let err = load_plays_from_file(&path).unwrap_err();
    match err {
        ScriptError::InvalidDefinition { reason, .. } => {
            assert!(reason.contains("broken"), "reason names the play: {reason}");
        }
        other => panic!("expected InvalidDefinition, got {other:?}"),
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_load_plays_from_dir_skips_non_toml() {
    let dir = scratch_dir("dir");
    fs::write(
        dir.join("one.toml"),
        r#"
[[play]]
id = "a"
target = "hero"
action = { type = "delay", duration = 1.0 }
"#,
    )
    .expect("file written");
    fs::write(dir.join("notes.txt"), "not a play").expect("file written");

    let plays = load_plays_from_dir(&dir).expect("dir loads");
    assert_eq!(plays.len(), 1);

    let _ = fs::remove_dir_all(&dir);
}
