//! Property tests for the simulation core

use dodger::sim::{Arena, GameSession, Obstacle, Player, SessionConfig, TickInput, tick};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn any_input() -> impl Strategy<Value = TickInput> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(left, right, up, down)| TickInput {
            left,
            right,
            up,
            down,
        },
    )
}

proptest! {
    #[test]
    fn player_never_leaves_arena(
        x in 0.0f32..=750.0,
        y in 0.0f32..=550.0,
        speed in 0.5f32..80.0,
        inputs in prop::collection::vec(any_input(), 1..60),
    ) {
        let arena = Arena::new(800.0, 600.0);
        let mut player = Player::new("p", &arena, 50.0, speed);
        player.pos.x = x;
        player.pos.y = y;

        for input in &inputs {
            player.step(input, &arena);
            let b = player.pos;
            prop_assert!(b.x >= 0.0 && b.x + 50.0 <= 800.0, "x out of bounds: {}", b.x);
            prop_assert!(b.y >= 0.0 && b.y + 50.0 <= 600.0, "y out of bounds: {}", b.y);
        }
    }

    #[test]
    fn obstacle_wraps_above_top(
        seed in any::<u64>(),
        x in 0.0f32..=750.0,
        y in -50.0f32..=600.0,
        speed in 1.0f32..40.0,
    ) {
        let arena = Arena::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut obstacle = Obstacle::at(x, y, 50.0, speed);

        obstacle.fall(&arena, &mut rng);

        if y + speed > 600.0 {
            prop_assert_eq!(obstacle.pos.y, -50.0);
            prop_assert!(obstacle.pos.x >= 0.0 && obstacle.pos.x <= 750.0);
        } else {
            prop_assert_eq!(obstacle.pos.y, y + speed);
            prop_assert_eq!(obstacle.pos.x, x);
        }
    }

    #[test]
    fn obstacle_stays_in_band_over_many_falls(
        seed in any::<u64>(),
        x in 0.0f32..=750.0,
        speed in 1.0f32..40.0,
        falls in 1usize..400,
    ) {
        let arena = Arena::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut obstacle = Obstacle::at(x, 0.0, 50.0, speed);

        for _ in 0..falls {
            obstacle.fall(&arena, &mut rng);
            let pos = obstacle.pos;
            prop_assert!(pos.y >= -50.0 && pos.y <= 600.0, "y = {}", pos.y);
            prop_assert!(pos.x >= 0.0 && pos.x <= 750.0, "x = {}", pos.x);
        }
    }

    #[test]
    fn score_counts_surviving_ticks(
        seed in any::<u64>(),
        inputs in prop::collection::vec(any_input(), 1..200),
    ) {
        let arena = Arena::new(800.0, 600.0);
        let player = Player::new("solo", &arena, 50.0, 5.0);
        let mut session = GameSession::with_entities(arena, player, Vec::new(), seed);

        let mut last = session.score();
        for input in &inputs {
            prop_assert!(tick(&mut session, input, 1.0 / 60.0));
            prop_assert_eq!(session.score(), last + 1);
            last = session.score();
        }
        prop_assert_eq!(session.score(), inputs.len() as u64);
    }

    #[test]
    fn same_seed_same_run(
        seed in any::<u64>(),
        inputs in prop::collection::vec(any_input(), 1..120),
    ) {
        let config = SessionConfig::default();
        let mut a = GameSession::new("a", &config, seed);
        let mut b = GameSession::new("a", &config, seed);

        for input in &inputs {
            let alive_a = a.is_alive() && tick(&mut a, input, 1.0 / 60.0);
            let alive_b = b.is_alive() && tick(&mut b, input, 1.0 / 60.0);
            prop_assert_eq!(alive_a, alive_b);
            if !alive_a {
                break;
            }
        }

        prop_assert_eq!(a.score(), b.score());
        prop_assert_eq!(a.player().pos, b.player().pos);
        for (oa, ob) in a.obstacles().iter().zip(b.obstacles()) {
            prop_assert_eq!(oa.pos, ob.pos);
        }
    }
}

#[test]
fn collision_ends_session_for_good() {
    let arena = Arena::new(800.0, 600.0);
    let player = Player::new("p", &arena, 50.0, 5.0);
    let obstacle = Obstacle::at(400.0, 500.0, 50.0, 5.0);
    let mut session = GameSession::with_entities(arena, player, vec![obstacle], 1);

    // Obstacle bottom reaches 555 on the first tick, past the player's top at 550
    assert!(!tick(&mut session, &TickInput::default(), 1.0 / 60.0));
    assert!(!session.is_alive());
    assert_eq!(session.score(), 0);
    assert_eq!(session.ticks(), 1);
}
