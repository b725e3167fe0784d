//! Integration test: gameplay step
//!
//! Drives `Game` through whole frames the way the terminal loop does:
//! physics integration, pipe scrolling and removal, scoring, game over and
//! the high score round trip through a store.

use std::fs;
use std::path::PathBuf;

use flappy_term::consts::PIPE_WIDTH;
use flappy_term::entity::{Pipe, PipeKind};
use flappy_term::{Config, FileScoreStore, Game, GameEvent, Input, MemoryScoreStore, Phase};
use proptest::prelude::*;

fn config() -> Config {
    Config {
        seed: Some(2024),
        audio: false,
        ..Config::default()
    }
}

/// Gravity off, so the player hovers in the middle of the screen
fn floating_config() -> Config {
    Config {
        gravity: 0.0,
        ..config()
    }
}

fn new_game(config: Config) -> Game {
    Game::new(config, Box::new(MemoryScoreStore::default()))
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "flappy-term-it-{}-{}.txt",
        name,
        std::process::id()
    ))
}

fn count(events: &[GameEvent], wanted: GameEvent) -> usize {
    events.iter().filter(|e| **e == wanted).count()
}

proptest! {
    #[test]
    fn step_is_semi_implicit_euler(
        y in 100.0f32..300.0,
        v in -200.0f32..200.0,
        dt in 0.001f32..0.1,
    ) {
        let mut game = new_game(config());
        game.session.start_timer = 2.0;
        game.player.y = y;
        game.player.bounds.y = y;
        game.player.velocity = v;

        game.step(dt);

        let expected_v = v + game.config.gravity * dt;
        let expected_y = y + expected_v * dt;
        prop_assert!((game.player.velocity - expected_v).abs() < 1e-3);
        prop_assert!((game.player.y - expected_y).abs() < 1e-3);
        prop_assert_eq!(game.player.bounds.y, game.player.y);
        prop_assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn half_steps_agree_with_full_step(
        y in 100.0f32..300.0,
        v in -200.0f32..200.0,
        dt in 0.001f32..0.1,
    ) {
        let start = |game: &mut Game| {
            game.session.start_timer = 2.0;
            game.player.y = y;
            game.player.bounds.y = y;
            game.player.velocity = v;
        };
        let mut whole = new_game(config());
        start(&mut whole);
        whole.step(dt);

        let mut halves = new_game(config());
        start(&mut halves);
        halves.step(dt / 2.0);
        halves.step(dt / 2.0);

        let g = whole.config.gravity;
        prop_assert!((whole.player.velocity - halves.player.velocity).abs() < 1e-3);
        // Semi-implicit Euler differs by g * dt² / 4 between the two
        prop_assert!((whole.player.y - halves.player.y).abs() <= g * dt * dt * 0.25 + 1e-3);
    }
}

#[test]
fn test_free_fall_ends_round_once() {
    let mut game = new_game(config());
    let grace = game.config.grace_period;
    let mut events = Vec::new();
    let mut prev_y = game.player.y;
    for _ in 0..60 * 5 {
        let playing = game.phase() == Phase::Playing;
        game.step(1.0 / 60.0);
        events.extend(game.take_events());

        let y = game.player.y;
        assert!(y >= prev_y, "bird rose from {} to {}", prev_y, y);
        if playing && game.phase() == Phase::Playing && game.session.start_timer > grace {
            assert!(y > prev_y, "bird stalled at {}", y);
        }
        prev_y = y;
    }
    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(count(&events, GameEvent::Died), 1);
    assert_eq!(game.session.score, 0);

    // The world is frozen after game over
    let y = game.player.y;
    game.step(1.0 / 60.0);
    assert_eq!(game.player.y, y);
    assert!(game.take_events().is_empty());
}

#[test]
fn test_pipes_scroll_at_fixed_speed() {
    let mut game = new_game(floating_config());
    game.pipes.push(Pipe::new(PipeKind::Upper, 960.0, -300.0));
    for _ in 0..8 {
        game.step(0.25);
    }
    assert_eq!(game.pipes[0].x, 660.0);
    assert_eq!(game.pipes[0].bounds.x, 660.0);
    // The spawner fired at the 2 second mark; the new pair already moved
    // with the rest of that frame
    assert_eq!(game.pipes.len(), 3);
    assert_eq!(game.pipes[1].x, 960.0 - 37.5);
}

#[test]
fn test_pair_scores_once() {
    let mut game = new_game(floating_config());
    // Upper bottom at 220, lower top at 300: the hovering player fits
    game.pipes.push(Pipe::new(PipeKind::Upper, 500.0, -100.0));
    game.pipes.push(Pipe::new(PipeKind::Lower, 500.0, 300.0));

    let mut events = Vec::new();
    for _ in 0..6 {
        game.step(0.25);
        events.extend(game.take_events());
    }
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.session.score, 1);
    assert_eq!(count(&events, GameEvent::Scored), 1);
    assert!(game.pipes.iter().take(2).all(|p| p.is_behind));
}

#[test]
fn test_pipe_removed_once_fully_offscreen() {
    let mut game = new_game(floating_config());
    game.pipes.push(Pipe::new(PipeKind::Upper, 37.5 - PIPE_WIDTH, -300.0));

    game.step(0.25);
    // Right edge exactly at 0
    assert_eq!(game.pipes.len(), 1);
    assert_eq!(game.pipes[0].bounds.right(), 0.0);

    game.step(0.25);
    assert!(game.pipes.is_empty());
}

#[test]
fn test_restart_keeps_best_score() {
    let store = MemoryScoreStore { value: Some(5) };
    let mut game = Game::new(config(), Box::new(store));
    assert_eq!(game.session.high_score, 5);

    game.session.score = 8;
    game.session.end_round();
    game.press(Input::Restart, 1.0 / 60.0);
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.session.score, 0);
    assert_eq!(game.session.high_score, 8);

    game.session.score = 2;
    game.session.end_round();
    game.press(Input::Flap, 1.0 / 60.0);
    assert_eq!(game.session.high_score, 8);
}

#[test]
fn test_high_score_file_round_trip() {
    let path = temp_path("round-trip");
    let _ = fs::remove_file(&path);

    let mut game = Game::new(config(), Box::new(FileScoreStore::new(&path)));
    // Missing file is created holding 0
    assert_eq!(game.session.high_score, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "0");

    game.session.score = 3;
    game.session.end_round();
    assert_eq!(fs::read_to_string(&path).unwrap(), "3");

    // A fresh game picks the saved score up
    let game = Game::new(config(), Box::new(FileScoreStore::new(&path)));
    assert_eq!(game.session.high_score, 3);

    let _ = fs::remove_file(&path);
}

#[test]
fn test_lower_score_does_not_overwrite_file() {
    let path = temp_path("lower");
    fs::write(&path, "10").unwrap();

    let mut game = Game::new(config(), Box::new(FileScoreStore::new(&path)));
    game.session.score = 4;
    game.session.end_round();
    game.restart();
    assert_eq!(game.session.high_score, 10);
    assert_eq!(fs::read_to_string(&path).unwrap(), "10");

    let _ = fs::remove_file(&path);
}

#[test]
fn test_pause_freezes_world() {
    let mut game = new_game(config());
    game.pipes.push(Pipe::new(PipeKind::Upper, 700.0, -300.0));
    game.press(Input::Pause, 0.0);

    for _ in 0..10 {
        game.step(0.1);
    }
    assert_eq!(game.pipes[0].x, 700.0);
    assert_eq!(game.session.start_timer, 0.0);
    assert_eq!(game.spawner.timer, 0.0);

    game.press(Input::Pause, 0.0);
    game.step(0.25);
    assert_eq!(game.pipes[0].x, 662.5);
}

#[test]
fn test_config_file_drives_game() {
    let path = temp_path("config");
    fs::write(&path, r#"{ "scroll_speed": 300.0, "gravity": 0.0, "seed": 1 }"#).unwrap();
    let config = Config::load(&path).unwrap();
    let _ = fs::remove_file(&path);

    let mut game = new_game(config);
    game.pipes.push(Pipe::new(PipeKind::Upper, 900.0, -300.0));
    game.step(0.5);
    assert_eq!(game.pipes[0].x, 750.0);
}
