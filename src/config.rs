//! Game configuration
//!
//! Loaded from a JSON file when one exists; every field falls back to the
//! constants in `crate::consts`. Loading does not log, since it runs before
//! the logger knows where to write.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Env var naming the config file
pub const CONFIG_ENV: &str = "FLAPPY_CONFIG";
/// Config file used when the env var is unset
pub const DEFAULT_CONFIG_PATH: &str = "flappy-term.json";

/// Why a config file was not used
#[derive(Debug)]
pub enum ConfigError {
    /// No file at the path
    Missing,
    Read(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing => write!(f, "file not found"),
            ConfigError::Read(e) => write!(f, "read failed: {}", e),
            ConfigError::Parse(e) => write!(f, "invalid JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === World ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub frame_rate: u32,

    // === Tuning ===
    /// Seconds before gravity applies after a (re)start
    pub grace_period: f32,
    pub scroll_speed: f32,
    pub background_speed: f32,
    pub pipe_gap: f32,
    pub pipe_interval: f32,
    pub pipe_offset_range: u32,
    pub impulse: f32,
    pub gravity: f32,
    /// Largest dt handed to a single step
    pub max_frame_dt: f32,

    // === Files ===
    pub high_score_path: PathBuf,
    pub log_path: PathBuf,

    // === Misc ===
    /// Open an audio device for sound effects
    pub audio: bool,
    /// RNG seed for pipe placement (random when unset)
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            frame_rate: FRAME_RATE,

            grace_period: GRACE_PERIOD,
            scroll_speed: SCROLL_SPEED,
            background_speed: BACKGROUND_SPEED,
            pipe_gap: PIPE_GAP,
            pipe_interval: PIPE_INTERVAL,
            pipe_offset_range: PIPE_OFFSET_RANGE,
            impulse: IMPULSE,
            gravity: GRAVITY,
            max_frame_dt: MAX_FRAME_DT,

            high_score_path: PathBuf::from("high-score.txt"),
            log_path: PathBuf::from("flappy-term.log"),

            audio: true,
            seed: None,
        }
    }
}

impl Config {
    /// Path from `FLAPPY_CONFIG`, or the default file name
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load config from `path`. Callers fall back to `Config::default()` on
    /// error; `ConfigError::Missing` is the normal case of no file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::Missing,
            _ => ConfigError::Read(e),
        })?;
        serde_json::from_str(&json).map_err(ConfigError::Parse)
    }

    /// Target frame duration in seconds
    pub fn frame_budget(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }

    /// Y of the ground's top edge
    pub fn ground_y(&self) -> f32 {
        self.screen_height - GROUND_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let config = Config::default();
        assert_eq!(config.screen_width, 960.0);
        assert_eq!(config.scroll_speed, 150.0);
        assert_eq!(config.pipe_gap, 80.0);
        assert_eq!(config.pipe_interval, 2.0);
        assert_eq!(config.grace_period, 1.0);
        assert_eq!(config.ground_y(), 432.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{ "scroll_speed": 200.0, "seed": 7 }"#).unwrap();
        assert_eq!(config.scroll_speed, 200.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pipe_gap, PIPE_GAP);
        assert!(config.audio);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let path = std::env::temp_dir().join("flappy-term-no-such-config.json");
        let _ = fs::remove_file(&path);
        assert!(matches!(Config::load(&path), Err(ConfigError::Missing)));
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let path = std::env::temp_dir().join(format!("flappy-term-bad-config-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = Config::load(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn test_valid_file_loads() {
        let path = std::env::temp_dir().join(format!("flappy-term-good-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "audio": false }"#).unwrap();
        let config = Config::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert!(!config.audio);
        assert_eq!(config.scroll_speed, SCROLL_SPEED);
    }

    #[test]
    fn test_frame_budget() {
        let config = Config::default();
        assert!((config.frame_budget() - 1.0 / 60.0).abs() < 1e-6);
    }
}
