//! Dodger - a falling-block arcade game
//!
//! Core modules:
//! - `sim`: Tick-based simulation (entities, collisions, session state)
//! - `highscores`: Durable append-only leaderboard
//! - `controller`: Fixed-rate game loop tying input, simulation and rendering
//! - `platform`: Renderer/input abstractions and the terminal frontend
//! - `settings`: Data-driven configuration

pub mod controller;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use controller::{GameController, GameError, GameSummary, RunOutcome};
pub use highscores::{
    JsonlScoreStore, MemoryScoreStore, ScoreRecord, ScoreStore, StoreError, UnavailableScoreStore,
};
pub use settings::Settings;

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Nominal duration of one tick in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Arena dimensions (origin top-left, y down)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player square edge and per-tick step
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Obstacle square edge and per-tick fall distance
    pub const OBSTACLE_SIZE: f32 = 50.0;
    pub const OBSTACLE_SPEED: f32 = 5.0;
    pub const OBSTACLE_COUNT: usize = 5;

    /// Number of leaderboard rows shown after a run
    pub const LEADERBOARD_SIZE: usize = 5;
    /// Player names are capped at this many code points
    pub const NAME_MAX_LEN: usize = 10;

    /// How long the game-over summary stays up (ms)
    pub const GAME_OVER_DELAY_MS: u64 = 5000;

    /// Default leaderboard file, relative to the working directory
    pub const SCORES_FILE: &str = "game_scores.jsonl";
}

/// RGB color handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}
