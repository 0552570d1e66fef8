//! Fixed timestep simulation tick
//!
//! Advances a session by exactly one step: move, collide, score.

use serde::{Deserialize, Serialize};

use super::collision::check_collision;
use super::state::{Entity, GameSession, SessionPhase, StepContext};

/// Directions held during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Advance the session by one tick.
///
/// Moves the player, then every obstacle, then runs a single collision
/// check on the post-move boxes. A collision ends the session without
/// scoring the tick; otherwise the score goes up by one.
///
/// Returns whether the player is still alive. Ticking a terminated
/// session is a caller bug: it asserts in debug builds and does nothing
/// in release builds.
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) -> bool {
    debug_assert!(session.is_alive(), "tick called on a terminated session");
    if !session.is_alive() {
        return false;
    }

    let mut ctx = StepContext {
        arena: session.arena,
        input: *input,
        rng: &mut session.rng,
    };

    session.player.update(&mut ctx);
    for obstacle in &mut session.obstacles {
        obstacle.update(&mut ctx);
    }

    session.ticks += 1;
    session.elapsed += dt;

    let hit = check_collision(
        &session.player.bounds(),
        session.obstacles.iter().map(Entity::bounds),
    );

    if hit {
        session.phase = SessionPhase::Terminated;
        log::info!(
            "{:?} collided after {} ticks, final score {}",
            session.player.name,
            session.ticks,
            session.player.score
        );
        false
    } else {
        session.player.score += 1;
        true
    }
}
