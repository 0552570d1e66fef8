//! Game session state and entity types
//!
//! A session owns one player, a fixed set of obstacles and the RNG used
//! to re-spawn them. Everything needed to advance a tick lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::{Aabb, Arena};
use super::tick::TickInput;
use crate::Color;
use crate::consts::*;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Player alive, ticks advance the world
    Running,
    /// First collision happened; terminal
    Terminated,
}

/// Everything an entity may read or mutate while advancing one tick
pub struct StepContext<'a> {
    pub arena: Arena,
    pub input: TickInput,
    pub rng: &'a mut Pcg32,
}

/// Shared capability set of the player and obstacles
pub trait Entity {
    /// Advance by one tick
    fn update(&mut self, ctx: &mut StepContext<'_>);

    /// Current bounding box
    fn bounds(&self) -> Aabb;

    /// Fill color used when drawing the box
    fn color(&self) -> Color;
}

/// The player-controlled square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub pos: Vec2,
    pub size: Vec2,
    /// Distance moved per tick along each held direction
    pub speed: f32,
    pub score: u64,
}

impl Player {
    /// Spawn at the horizontal center, resting on the bottom edge. Wide
    /// players are pulled left so the box stays inside the arena.
    pub fn new(name: impl Into<String>, arena: &Arena, size: f32, speed: f32) -> Self {
        let x = arena.center_x().min(arena.max_x_for(size));
        let y = (arena.height - size).max(0.0);
        Self {
            name: name.into(),
            pos: Vec2::new(x, y),
            size: Vec2::splat(size),
            speed,
            score: 0,
        }
    }

    /// Per-direction movement, each direction checked against the pre-tick box.
    ///
    /// A direction contributes its step only if the box moved by that step
    /// alone stays inside the arena. Opposing directions that both pass
    /// simply add up to zero.
    pub fn step(&mut self, input: &TickInput, arena: &Arena) {
        let start = self.bounds();
        let s = self.speed;
        let fits = |delta: Vec2| arena.contains(&start.translated(delta));

        let mut delta = Vec2::ZERO;
        if input.left && fits(Vec2::new(-s, 0.0)) {
            delta.x -= s;
        }
        if input.right && fits(Vec2::new(s, 0.0)) {
            delta.x += s;
        }
        if input.up && fits(Vec2::new(0.0, -s)) {
            delta.y -= s;
        }
        if input.down && fits(Vec2::new(0.0, s)) {
            delta.y += s;
        }

        self.pos = start.pos + delta;
    }
}

impl Entity for Player {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        let input = ctx.input;
        self.step(&input, &ctx.arena);
    }

    fn bounds(&self) -> Aabb {
        Aabb {
            pos: self.pos,
            size: self.size,
        }
    }

    fn color(&self) -> Color {
        Color::GREEN
    }
}

/// A falling square that wraps back to the top forever
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward distance per tick
    pub speed: f32,
}

impl Obstacle {
    /// Place a new obstacle on the top edge at a random column
    pub fn spawn<R: Rng + ?Sized>(arena: &Arena, size: f32, speed: f32, rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(random_x(arena, size, rng), 0.0),
            size: Vec2::splat(size),
            speed,
        }
    }

    /// Place an obstacle at an exact position
    pub fn at(x: f32, y: f32, size: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::splat(size),
            speed,
        }
    }

    /// Fall by `speed`; once past the bottom, re-enter just above the top
    /// at a fresh random column.
    pub fn fall<R: Rng + ?Sized>(&mut self, arena: &Arena, rng: &mut R) {
        self.pos.y += self.speed;
        if self.pos.y > arena.height {
            self.pos.y = -self.size.y;
            self.pos.x = random_x(arena, self.size.x, rng);
        }
    }
}

impl Entity for Obstacle {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        let arena = ctx.arena;
        self.fall(&arena, &mut *ctx.rng);
    }

    fn bounds(&self) -> Aabb {
        Aabb {
            pos: self.pos,
            size: self.size,
        }
    }

    fn color(&self) -> Color {
        Color::RED
    }
}

/// Uniform x in `[0, arena.width - width]`
fn random_x<R: Rng + ?Sized>(arena: &Arena, width: f32, rng: &mut R) -> f32 {
    rng.random_range(0.0..=arena.max_x_for(width))
}

/// Tunables for building a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub arena: Arena,
    pub player_size: f32,
    pub player_speed: f32,
    pub obstacle_size: f32,
    pub obstacle_speed: f32,
    pub obstacle_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            obstacle_size: OBSTACLE_SIZE,
            obstacle_speed: OBSTACLE_SPEED,
            obstacle_count: OBSTACLE_COUNT,
        }
    }
}

/// One run of the game, from name entry to the first collision
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) arena: Arena,
    pub(crate) player: Player,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) phase: SessionPhase,
    /// Ticks advanced so far (including the terminating one)
    pub(crate) ticks: u64,
    /// Simulated seconds survived
    pub(crate) elapsed: f32,
    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// Create a session with freshly spawned obstacles
    pub fn new(name: impl Into<String>, config: &SessionConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let arena = config.arena;
        let player = Player::new(name, &arena, config.player_size, config.player_speed);
        let obstacles = (0..config.obstacle_count)
            .map(|_| Obstacle::spawn(&arena, config.obstacle_size, config.obstacle_speed, &mut rng))
            .collect();

        log::info!(
            "New session for {:?} (seed {}, {} obstacles)",
            player.name,
            seed,
            config.obstacle_count
        );

        Self::from_parts(arena, player, obstacles, rng)
    }

    /// Create a session from pre-placed entities
    pub fn with_entities(arena: Arena, player: Player, obstacles: Vec<Obstacle>, seed: u64) -> Self {
        Self::from_parts(arena, player, obstacles, Pcg32::seed_from_u64(seed))
    }

    fn from_parts(arena: Arena, player: Player, obstacles: Vec<Obstacle>, rng: Pcg32) -> Self {
        Self {
            arena,
            player,
            obstacles,
            phase: SessionPhase::Running,
            ticks: 0,
            elapsed: 0.0,
            rng,
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_alive(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn score(&self) -> u64 {
        self.player.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    fn held(left: bool, right: bool, up: bool, down: bool) -> TickInput {
        TickInput {
            left,
            right,
            up,
            down,
        }
    }

    #[test]
    fn test_player_spawns_bottom_center() {
        let arena = Arena::new(800.0, 600.0);
        let player = Player::new("ann", &arena, 50.0, 5.0);
        assert_eq!(player.pos, Vec2::new(400.0, 550.0));
        assert_eq!(player.score, 0);
    }

    #[test]
    fn test_wide_player_spawns_inside_arena_and_can_move() {
        let arena = Arena::new(100.0, 100.0);
        let mut player = Player::new("big", &arena, 80.0, 5.0);
        assert_eq!(player.pos, Vec2::new(20.0, 20.0));
        assert!(arena.contains(&player.bounds()));

        for _ in 0..20 {
            player.step(&held(true, false, false, false), &arena);
        }
        assert_eq!(player.pos.x, 0.0);
    }

    #[test]
    fn test_player_moves_each_held_direction() {
        let arena = Arena::new(800.0, 600.0);
        let mut player = Player::new("ann", &arena, 50.0, 5.0);
        player.pos = Vec2::new(100.0, 100.0);

        player.step(&held(true, false, true, false), &arena);
        assert_eq!(player.pos, Vec2::new(95.0, 95.0));

        player.step(&held(false, true, false, true), &arena);
        assert_eq!(player.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_player_blocked_at_boundary() {
        let arena = Arena::new(800.0, 600.0);
        let mut player = Player::new("ann", &arena, 50.0, 5.0);

        // Spawn rests on the bottom edge
        player.step(&held(false, false, false, true), &arena);
        assert_eq!(player.pos.y, 550.0);

        player.pos = Vec2::new(3.0, 3.0);
        player.step(&held(true, false, true, false), &arena);
        assert_eq!(player.pos, Vec2::new(3.0, 3.0));

        // Exactly one step from the wall still fits
        player.pos = Vec2::new(5.0, 5.0);
        player.step(&held(true, false, true, false), &arena);
        assert_eq!(player.pos, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_opposing_directions_cancel() {
        let arena = Arena::new(800.0, 600.0);
        let mut player = Player::new("ann", &arena, 50.0, 5.0);
        player.pos = Vec2::new(200.0, 200.0);
        player.step(&held(true, true, true, true), &arena);
        assert_eq!(player.pos, Vec2::new(200.0, 200.0));
    }

    #[test]
    fn test_opposing_directions_at_wall_only_one_applies() {
        let arena = Arena::new(800.0, 600.0);
        let mut player = Player::new("ann", &arena, 50.0, 5.0);
        player.pos = Vec2::new(0.0, 200.0);
        player.step(&held(true, true, false, false), &arena);
        assert_eq!(player.pos, Vec2::new(5.0, 200.0));
    }

    #[test]
    fn test_corner_diagonal_matches_independent_axes() {
        let arena = Arena::new(800.0, 600.0);
        let mut diagonal = Player::new("ann", &arena, 50.0, 5.0);
        diagonal.pos = Vec2::new(745.0, 2.0);
        diagonal.step(&held(false, true, true, false), &arena);

        let mut right_only = diagonal.clone();
        right_only.pos = Vec2::new(745.0, 2.0);
        right_only.step(&held(false, true, false, false), &arena);
        let mut up_only = diagonal.clone();
        up_only.pos = Vec2::new(745.0, 2.0);
        up_only.step(&held(false, false, true, false), &arena);

        assert_eq!(diagonal.pos.x, right_only.pos.x);
        assert_eq!(diagonal.pos.y, up_only.pos.y);
        // Right still fits exactly, up is blocked
        assert_eq!(diagonal.pos, Vec2::new(750.0, 2.0));
    }

    #[test]
    fn test_obstacle_spawns_on_top_edge_in_range() {
        let arena = Arena::new(800.0, 600.0);
        let mut rng = rng();
        for _ in 0..100 {
            let o = Obstacle::spawn(&arena, 50.0, 5.0, &mut rng);
            assert_eq!(o.pos.y, 0.0);
            assert!(o.pos.x >= 0.0 && o.pos.x <= 750.0);
        }
    }

    #[test]
    fn test_obstacle_falls_by_speed() {
        let arena = Arena::new(800.0, 600.0);
        let mut o = Obstacle::at(100.0, 0.0, 50.0, 5.0);
        o.fall(&arena, &mut rng());
        assert_eq!(o.pos, Vec2::new(100.0, 5.0));
    }

    #[test]
    fn test_obstacle_wraps_past_bottom() {
        let arena = Arena::new(800.0, 600.0);
        let mut rng = rng();

        // Landing exactly on the bottom edge does not wrap
        let mut o = Obstacle::at(100.0, 595.0, 50.0, 5.0);
        o.fall(&arena, &mut rng);
        assert_eq!(o.pos.y, 600.0);

        o.fall(&arena, &mut rng);
        assert_eq!(o.pos.y, -50.0);
        assert!(o.pos.x >= 0.0 && o.pos.x <= 750.0);
    }

    #[test]
    fn test_entity_colors() {
        let arena = Arena::default();
        assert_eq!(Player::new("a", &arena, 50.0, 5.0).color(), Color::GREEN);
        assert_eq!(Obstacle::at(0.0, 0.0, 50.0, 5.0).color(), Color::RED);
    }

    #[test]
    fn test_new_session_spawns_configured_obstacles() {
        let config = SessionConfig::default();
        let session = GameSession::new("ann", &config, 42);
        assert_eq!(session.obstacles().len(), OBSTACLE_COUNT);
        assert!(session.is_alive());
        assert_eq!(session.score(), 0);
        assert_eq!(session.player().name, "ann");
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = SessionConfig::default();
        let a = GameSession::new("a", &config, 1234);
        let b = GameSession::new("b", &config, 1234);
        let xs = |s: &GameSession| s.obstacles().iter().map(|o| o.pos.x).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
    }
}
