//! Timed pipe pair generation

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::Config;
use crate::consts::PIPE_HEIGHT;
use crate::entity::{Pipe, PipeKind};

#[derive(Debug, Clone)]
pub struct Spawner {
    /// Seconds since the last pair
    pub timer: f32,
    interval: f32,
    gap: f32,
    offset_range: u32,
    spawn_x: f32,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(config: &Config, seed: u64) -> Self {
        Self {
            timer: 0.0,
            interval: config.pipe_interval,
            gap: config.pipe_gap,
            offset_range: config.pipe_offset_range,
            spawn_x: config.screen_width,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Accumulate `dt`; once the interval is reached, return a new
    /// (upper, lower) pair and restart the timer.
    pub fn advance(&mut self, dt: f32) -> Option<[Pipe; 2]> {
        self.timer += dt;
        if self.timer >= self.interval {
            self.timer = 0.0;
            Some(self.spawn_pair())
        } else {
            None
        }
    }

    /// Upper pipe top in -(0..range); the lower pipe sits a fixed gap below
    /// the upper pipe's bottom edge.
    pub fn spawn_pair(&mut self) -> [Pipe; 2] {
        let offset = if self.offset_range == 0 {
            0
        } else {
            self.rng.random_range(0..self.offset_range)
        };
        let upper_y = -(offset as f32);
        let lower_y = upper_y + PIPE_HEIGHT + self.gap;
        log::debug!("Pipe pair spawned, upper y {}", upper_y);
        [
            Pipe::new(PipeKind::Upper, self.spawn_x, upper_y),
            Pipe::new(PipeKind::Lower, self.spawn_x, lower_y),
        ]
    }

    pub fn reset(&mut self) {
        self.timer = 0.0;
    }
}
