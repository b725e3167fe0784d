//! flappy-term - a Flappy Bird clone for the terminal
//!
//! Core modules:
//! - `game`: per-frame physics, collision and scoring step
//! - `spawner`: timed pipe pair generation
//! - `session`: score, high score persistence, game-over/pause state
//! - `entity`: player, pipes, scrolling strips
//! - `render`: draw order and the half-block pixel buffer
//! - `assets` / `audio`: sprites and synthesized sound effects

pub mod assets;
pub mod audio;
pub mod config;
pub mod entity;
pub mod error;
pub mod game;
pub mod geom;
pub mod render;
pub mod session;
pub mod spawner;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use game::{Game, GameEvent, Input};
pub use session::{FileScoreStore, MemoryScoreStore, Phase, ScoreStore, Session};

/// Gameplay constants. `Config::default()` is built from these.
pub mod consts {
    /// World size in game units
    pub const SCREEN_WIDTH: f32 = 960.0;
    pub const SCREEN_HEIGHT: f32 = 544.0;
    pub const FRAME_RATE: u32 = 60;

    /// Seconds after a (re)start before gravity kicks in
    pub const GRACE_PERIOD: f32 = 1.0;

    /// Horizontal speed of pipes and ground (units/s)
    pub const SCROLL_SPEED: f32 = 150.0;
    /// Background parallax speed (units/s)
    pub const BACKGROUND_SPEED: f32 = 30.0;

    /// Vertical gap between the upper pipe's bottom and the lower pipe's top
    pub const PIPE_GAP: f32 = 80.0;
    /// Seconds between pipe pairs
    pub const PIPE_INTERVAL: f32 = 2.0;
    /// Upper pipe y is drawn from -(0..PIPE_OFFSET_RANGE)
    pub const PIPE_OFFSET_RANGE: u32 = 220;

    /// Flap sets velocity to IMPULSE * dt
    pub const IMPULSE: f32 = -10_000.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 400.0;

    /// Upper bound on a single frame's dt (s)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Sprite sizes in world units
    pub const PLAYER_WIDTH: f32 = 34.0;
    pub const PLAYER_HEIGHT: f32 = 24.0;
    pub const PIPE_WIDTH: f32 = 52.0;
    pub const PIPE_HEIGHT: f32 = 320.0;
    pub const GROUND_WIDTH: f32 = 336.0;
    pub const GROUND_HEIGHT: f32 = 112.0;
    pub const BACKGROUND_WIDTH: f32 = 288.0;
}
