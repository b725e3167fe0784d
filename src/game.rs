//! Per-frame gameplay step
//!
//! `Game` owns every piece of mutable state. The frame loop feeds it input
//! with `press`, advances it with `step`, and drains the resulting events
//! (for sound effects) with `take_events`.

use rand::Rng;

use crate::config::Config;
use crate::consts::*;
use crate::entity::{Pipe, PipeKind, Player, ScrollingStrip};
use crate::geom::Rect;
use crate::session::{Phase, ScoreStore, Session};
use crate::spawner::Spawner;

/// Player input for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Space, Up or mouse click: flap while playing, restart after game over
    Flap,
    /// Enter or `r`: restart after game over
    Restart,
    /// `f` or `p`
    Pause,
}

/// Things that happened during a frame, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flapped,
    Scored,
    Died,
    Paused,
    Resumed,
    Restarted,
}

pub struct Game {
    pub config: Config,
    pub player: Player,
    /// Active pipes, upper and lower interleaved in spawn order
    pub pipes: Vec<Pipe>,
    pub ground: ScrollingStrip,
    pub background: ScrollingStrip,
    /// Collision box of the ground, spanning the screen
    pub ground_bounds: Rect,
    pub spawner: Spawner,
    pub session: Session,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: Config, store: Box<dyn ScoreStore>) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        log::info!("Starting game with seed {}", seed);

        let ground_y = config.ground_y();
        let ground = ScrollingStrip::covering(
            ground_y,
            GROUND_WIDTH,
            config.screen_width,
            config.scroll_speed,
        );
        let background = ScrollingStrip::covering(
            0.0,
            BACKGROUND_WIDTH,
            config.screen_width,
            config.background_speed,
        );

        Self {
            player: Player::new(&config),
            pipes: Vec::new(),
            ground,
            background,
            ground_bounds: Rect::new(0.0, ground_y, config.screen_width, GROUND_HEIGHT),
            spawner: Spawner::new(&config, seed),
            session: Session::new(store),
            events: Vec::new(),
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Apply one input event. `dt` is the current frame's delta, which
    /// scales the flap velocity.
    pub fn press(&mut self, input: Input, dt: f32) {
        match (input, self.phase()) {
            (Input::Flap | Input::Restart, Phase::GameOver) => self.restart(),
            (Input::Flap, Phase::Playing) => self.flap(dt),
            (Input::Pause, _) => self.toggle_pause(),
            _ => {}
        }
    }

    pub fn flap(&mut self, dt: f32) {
        self.player.flap(dt);
        self.events.push(GameEvent::Flapped);
    }

    pub fn toggle_pause(&mut self) {
        if self.session.toggle_pause() {
            self.events.push(if self.session.paused {
                GameEvent::Paused
            } else {
                GameEvent::Resumed
            });
        }
    }

    /// Full reset back into a fresh round
    pub fn restart(&mut self) {
        self.session.reset();
        self.player.reset(&self.config);
        self.pipes.clear();
        self.spawner.reset();
        self.events.push(GameEvent::Restarted);
    }

    /// Advance the world by `dt` seconds. Does nothing unless playing.
    pub fn step(&mut self, dt: f32) {
        if self.phase() != Phase::Playing {
            return;
        }
        let dt = dt.max(0.0);

        self.player.animate();
        self.session.start_timer += dt;

        if let Some(pair) = self.spawner.advance(dt) {
            self.pipes.extend(pair);
        }

        let mut hit = false;

        if self.player.is_above_screen() {
            log::debug!("Player left the top of the screen");
            hit = true;
        }

        let grounded = self.player.bounds.intersects(&self.ground_bounds);
        if self.session.start_timer > self.config.grace_period && !hit && !grounded {
            self.player.integrate(dt);
        }

        if self.player.bounds.intersects(&self.ground_bounds) {
            log::debug!("Player hit the ground");
            hit = true;
        }

        self.ground.scroll(dt);
        self.background.scroll(dt);

        let dx = self.config.scroll_speed * dt;
        for pipe in &mut self.pipes {
            pipe.scroll(dx);
            if pipe.is_destroyed {
                continue;
            }

            if self.player.bounds.intersects(&pipe.bounds) {
                log::debug!("Player hit a pipe at x {}", pipe.x);
                hit = true;
            }

            if !pipe.is_behind && self.player.bounds.x > pipe.bounds.x {
                pipe.is_behind = true;
                // Only the upper half of a pair scores, and only when the
                // player went under it
                if pipe.kind == PipeKind::Upper && pipe.bounds.bottom() < self.player.bounds.y {
                    self.session.add_point();
                    self.events.push(GameEvent::Scored);
                }
            }
        }
        self.pipes.retain(|p| !p.is_destroyed);

        if hit && self.session.end_round() {
            self.events.push(GameEvent::Died);
        }
    }

    /// Events since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryScoreStore;

    fn test_game() -> Game {
        let config = Config {
            seed: Some(12345),
            ..Config::default()
        };
        Game::new(config, Box::new(MemoryScoreStore::default()))
    }

    #[test]
    fn test_no_gravity_during_grace_period() {
        let mut game = test_game();
        let y = game.player.y;
        for _ in 0..4 {
            game.step(0.25);
        }
        // 1.0s exactly has not exceeded the grace period
        assert_eq!(game.player.y, y);
        game.step(0.25);
        assert!(game.player.y > y);
    }

    #[test]
    fn test_flap_then_restart_inputs() {
        let mut game = test_game();
        game.press(Input::Flap, 0.02);
        assert!(game.player.velocity < 0.0);
        assert_eq!(game.take_events(), vec![GameEvent::Flapped]);

        // Restart is ignored while playing
        game.press(Input::Restart, 0.02);
        assert!(game.take_events().is_empty());

        game.session.end_round();
        game.press(Input::Flap, 0.02);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.player.velocity, 0.0);
        assert_eq!(game.take_events(), vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_pause_blocks_step() {
        let mut game = test_game();
        game.press(Input::Pause, 0.0);
        assert_eq!(game.phase(), Phase::Paused);
        game.step(5.0);
        assert_eq!(game.session.start_timer, 0.0);
        assert!(game.pipes.is_empty());

        // No flapping while paused
        game.press(Input::Flap, 0.02);
        assert_eq!(game.player.velocity, 0.0);

        game.press(Input::Pause, 0.0);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(
            game.take_events(),
            vec![GameEvent::Paused, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_leaving_top_ends_round() {
        let mut game = test_game();
        game.player.y = -game.player.bounds.h - 1.0;
        game.player.bounds.y = game.player.y;
        game.step(0.01);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.take_events(), vec![GameEvent::Died]);
    }

    #[test]
    fn test_pipe_collision_ends_round() {
        let mut game = test_game();
        let px = game.player.bounds.x;
        // Upper pipe hanging down over the player
        game.pipes.push(Pipe::new(PipeKind::Upper, px, 0.0));
        game.step(0.001);
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_strips_stay_covered_while_playing() {
        let config = Config {
            seed: Some(9),
            gravity: 0.0,
            ..Config::default()
        };
        let mut game = Game::new(config, Box::new(MemoryScoreStore::default()));
        let w = game.config.screen_width;
        // A full wrap cycle of the slow background
        for _ in 0..60 * 50 {
            game.step(1.0 / 60.0);
            game.pipes.clear();
            assert_eq!(game.phase(), Phase::Playing);
            for strip in [&game.background, &game.ground] {
                let right = strip.tiles.iter().map(|t| t.0).fold(f32::MIN, f32::max);
                assert!(right + strip.tile_width >= w);
            }
        }
    }

    #[test]
    fn test_restart_clears_round_state() {
        let mut game = test_game();
        game.pipes.extend(game.spawner.spawn_pair());
        game.session.score = 4;
        game.session.start_timer = 3.0;
        game.spawner.timer = 1.5;
        game.player.y = 100.0;
        game.session.end_round();

        game.restart();
        assert!(game.pipes.is_empty());
        assert_eq!(game.session.score, 0);
        assert_eq!(game.session.high_score, 4);
        assert_eq!(game.session.start_timer, 0.0);
        assert_eq!(game.spawner.timer, 0.0);
        assert_eq!(game.player.y, game.config.screen_height / 2.0);
    }
}
