//! Collision detection between the player and falling obstacles
//!
//! A single existential check per tick: does the player box strictly
//! overlap any obstacle box? Which obstacle was hit is never reported.

use super::aabb::Aabb;

/// Returns true iff any box in `obstacles` overlaps `player`.
///
/// Pure and stateless. Stops at the first overlap found; the iteration
/// order of `obstacles` does not affect the result.
pub fn check_collision<I>(player: &Aabb, obstacles: I) -> bool
where
    I: IntoIterator<Item = Aabb>,
{
    obstacles.into_iter().any(|obstacle| player.overlaps(&obstacle))
}
