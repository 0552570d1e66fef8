//! Tick-based simulation module
//!
//! All gameplay logic lives here:
//! - One tick advances every entity exactly once
//! - Seeded RNG only (obstacle re-spawns)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod state;
pub mod tick;

pub use aabb::{Aabb, Arena};
pub use collision::check_collision;
pub use state::{Entity, GameSession, Obstacle, Player, SessionConfig, SessionPhase, StepContext};
pub use tick::{TickInput, tick};
