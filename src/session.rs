//! Score, high score persistence and the game-over/pause state

use std::fs;
use std::io;
use std::path::PathBuf;

/// Where the high score lives between runs
pub trait ScoreStore {
    /// Stored high score. A missing or unreadable store is created with 0.
    fn load(&mut self) -> u32;
    fn save(&mut self, score: u32) -> io::Result<()>;
}

/// Single-line text file holding the decimal high score
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> io::Result<u32> {
        let text = fs::read_to_string(&self.path)?;
        let line = text.lines().next().unwrap_or("").trim();
        line.parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&mut self) -> u32 {
        match self.read() {
            Ok(score) => {
                log::info!("Loaded high score {} from {}", score, self.path.display());
                score
            }
            Err(e) => {
                log::warn!(
                    "No usable high score at {} ({}), starting from 0",
                    self.path.display(),
                    e
                );
                if let Err(e) = self.save(0) {
                    log::warn!("Could not create {}: {}", self.path.display(), e);
                }
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> io::Result<()> {
        fs::write(&self.path, score.to_string())?;
        log::info!("High score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// In-memory store, handy for tests and for running without a disk
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub value: Option<u32>,
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> u32 {
        *self.value.get_or_insert(0)
    }

    fn save(&mut self, score: u32) -> io::Result<()> {
        self.value = Some(score);
        Ok(())
    }
}

/// Current phase, derived from the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Paused,
    GameOver,
}

pub struct Session {
    pub score: u32,
    pub high_score: u32,
    pub game_over: bool,
    pub paused: bool,
    /// Seconds since the round started
    pub start_timer: f32,
    store: Box<dyn ScoreStore>,
}

impl Session {
    pub fn new(mut store: Box<dyn ScoreStore>) -> Self {
        let high_score = store.load();
        Self {
            score: 0,
            high_score,
            game_over: false,
            paused: false,
            start_timer: 0.0,
            store,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.paused {
            Phase::Paused
        } else {
            Phase::Playing
        }
    }

    /// Enter game over. Returns false if already over. Persists the score
    /// when it beats the stored high score.
    pub fn end_round(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.game_over = true;
        log::info!("Game over with score {}", self.score);
        if self.score > self.high_score {
            self.high_score = self.score;
            if let Err(e) = self.store.save(self.score) {
                log::warn!("Failed to save high score: {}", e);
            }
        }
        true
    }

    /// Start a new round and reload the stored high score
    pub fn reset(&mut self) {
        self.score = 0;
        self.game_over = false;
        self.paused = false;
        self.start_timer = 0.0;
        let stored = self.store.load();
        // Keep the in-memory best when the last save failed
        self.high_score = self.high_score.max(stored);
        log::info!("New round, high score {}", self.high_score);
    }

    /// Toggle pause. Ignored while game over; returns whether it toggled.
    pub fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = !self.paused;
        log::debug!("Paused: {}", self.paused);
        true
    }

    pub fn add_point(&mut self) {
        self.score += 1;
    }
}
