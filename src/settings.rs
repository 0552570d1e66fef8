//! Game settings and tunables
//!
//! Read from an optional JSON file next to the binary's working directory.
//! Missing keys fall back to the built-in defaults; out-of-range values are
//! replaced with defaults and logged.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{Arena, SessionConfig};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Entities ===
    /// Player square edge
    pub player_size: f32,
    /// Player step per tick
    pub player_speed: f32,
    /// Obstacle square edge
    pub obstacle_size: f32,
    /// Obstacle fall per tick
    pub obstacle_speed: f32,
    pub obstacle_count: usize,

    // === Loop ===
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// How long the game-over summary stays on screen
    pub game_over_delay_ms: u64,
    /// Fixed RNG seed; a fresh one is drawn per run when absent
    pub seed: Option<u64>,

    // === Leaderboard ===
    /// Rows shown on the game-over screen
    pub leaderboard_size: usize,
    /// JSON-lines score file
    pub scores_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            obstacle_size: OBSTACLE_SIZE,
            obstacle_speed: OBSTACLE_SPEED,
            obstacle_count: OBSTACLE_COUNT,

            tick_rate: TICK_RATE,
            game_over_delay_ms: GAME_OVER_DELAY_MS,
            seed: None,

            leaderboard_size: LEADERBOARD_SIZE,
            scores_path: PathBuf::from(SCORES_FILE),
        }
    }
}

impl Settings {
    /// Settings file looked up in the working directory
    pub const FILE_NAME: &'static str = "dodger_settings.json";

    /// Load from [`Self::FILE_NAME`]
    pub fn load() -> Self {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Load from `path`, falling back to defaults if it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings file at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read {}: {}; using defaults", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace values that would break the simulation with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !(positive(self.arena_width) && positive(self.arena_height)) {
            log::warn!(
                "Arena {}x{} is invalid, using {}x{}",
                self.arena_width,
                self.arena_height,
                defaults.arena_width,
                defaults.arena_height
            );
            self.arena_width = defaults.arena_width;
            self.arena_height = defaults.arena_height;
        }

        let max_edge = self.arena_width.min(self.arena_height);
        let fit = |value: f32, default: f32, what: &str| {
            if positive(value) && value <= max_edge {
                value
            } else {
                log::warn!("{} {} does not fit the arena, using default", what, value);
                default.min(max_edge)
            }
        };
        self.player_size = fit(self.player_size, defaults.player_size, "player_size");
        self.obstacle_size = fit(self.obstacle_size, defaults.obstacle_size, "obstacle_size");

        if !positive(self.player_speed) {
            log::warn!("player_speed {} is invalid, using default", self.player_speed);
            self.player_speed = defaults.player_speed;
        }
        if !positive(self.obstacle_speed) {
            log::warn!("obstacle_speed {} is invalid, using default", self.obstacle_speed);
            self.obstacle_speed = defaults.obstacle_speed;
        }
        if self.tick_rate == 0 {
            log::warn!("tick_rate 0 is invalid, using default");
            self.tick_rate = defaults.tick_rate;
        }
        if self.leaderboard_size == 0 {
            log::warn!("leaderboard_size 0 is invalid, using default");
            self.leaderboard_size = defaults.leaderboard_size;
        }

        self
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Parameters for building a [`crate::sim::GameSession`]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            arena: self.arena(),
            player_size: self.player_size,
            player_speed: self.player_speed,
            obstacle_size: self.obstacle_size,
            obstacle_speed: self.obstacle_speed,
            obstacle_count: self.obstacle_count,
        }
    }

    /// Simulated seconds per tick
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Real time budget per frame
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate))
    }

    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
