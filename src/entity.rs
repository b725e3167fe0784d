//! Player, pipes and scrolling strips

use crate::assets::BIRD_FRAMES;
use crate::config::Config;
use crate::consts::*;
use crate::geom::Rect;

/// Game frames per flap animation frame (6 fps at 60 fps)
const ANIMATION_STEP: u32 = 10;

#[derive(Debug, Clone)]
pub struct Player {
    pub y: f32,
    pub bounds: Rect,
    /// Vertical velocity (units/s, negative is up)
    pub velocity: f32,
    /// Flap sets velocity to impulse * dt
    pub impulse: f32,
    pub gravity_increment: f32,
    /// Visual only
    frame_counter: u32,
    pub frame: usize,
}

impl Player {
    pub fn new(config: &Config) -> Self {
        let mut player = Self {
            y: 0.0,
            bounds: Rect::new(0.0, 0.0, PLAYER_WIDTH, PLAYER_HEIGHT),
            velocity: 0.0,
            impulse: config.impulse,
            gravity_increment: config.gravity,
            frame_counter: 0,
            frame: 0,
        };
        player.reset(config);
        player
    }

    /// Back to the middle of the screen, at rest
    pub fn reset(&mut self, config: &Config) {
        self.y = config.screen_height / 2.0;
        self.bounds.x = config.screen_width / 2.0;
        self.bounds.y = self.y;
        self.velocity = 0.0;
        self.frame_counter = 0;
        self.frame = 0;
    }

    /// One semi-implicit Euler step
    pub fn integrate(&mut self, dt: f32) {
        self.velocity += self.gravity_increment * dt;
        self.y += self.velocity * dt;
        self.bounds.y = self.y;
    }

    pub fn flap(&mut self, dt: f32) {
        self.velocity = self.impulse * dt;
    }

    /// Above the top of the screen with no part visible
    pub fn is_above_screen(&self) -> bool {
        self.y < -self.bounds.h
    }

    /// Advance the flap animation by one frame
    pub fn animate(&mut self) {
        self.frame_counter += 1;
        if self.frame_counter >= ANIMATION_STEP {
            self.frame_counter = 0;
            self.frame = (self.frame + 1) % BIRD_FRAMES;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeKind {
    Upper,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Pipe {
    pub x: f32,
    pub bounds: Rect,
    pub kind: PipeKind,
    /// The player has passed it; never scored again
    pub is_behind: bool,
    /// Scrolled off the left edge, pending removal
    pub is_destroyed: bool,
}

impl Pipe {
    pub fn new(kind: PipeKind, x: f32, y: f32) -> Self {
        Self {
            x,
            bounds: Rect::new(x, y, PIPE_WIDTH, PIPE_HEIGHT),
            kind,
            is_behind: false,
            is_destroyed: false,
        }
    }

    /// Move left by `dx`; marks the pipe destroyed once its right edge
    /// passes the left side of the screen.
    pub fn scroll(&mut self, dx: f32) {
        if self.is_destroyed {
            return;
        }
        self.x -= dx;
        self.bounds.x = self.x;
        if self.bounds.right() < 0.0 {
            self.is_destroyed = true;
        }
    }
}

/// Row of identical tiles that scrolls left forever
#[derive(Debug, Clone)]
pub struct ScrollingStrip {
    pub tiles: Vec<(f32, f32)>,
    pub tile_width: f32,
    pub speed: f32,
}

impl ScrollingStrip {
    /// Strip with just enough tiles to cover `view_width` while the
    /// leftmost tile is anywhere in its wrap range.
    pub fn covering(y: f32, tile_width: f32, view_width: f32, speed: f32) -> Self {
        let count = (view_width / tile_width).ceil().max(0.0) as usize + 1;
        Self::new(y, tile_width, count, speed)
    }

    pub fn new(y: f32, tile_width: f32, tile_count: usize, speed: f32) -> Self {
        let tiles = (0..tile_count)
            .map(|i| (i as f32 * tile_width, y))
            .collect();
        Self {
            tiles,
            tile_width,
            speed,
        }
    }

    pub fn scroll(&mut self, dt: f32) {
        let span = self.tiles.len() as f32 * self.tile_width;
        for (x, _) in &mut self.tiles {
            *x -= self.speed * dt;
            if *x < -self.tile_width {
                *x += span;
            }
        }
    }
}
