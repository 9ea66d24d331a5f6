//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL input sequences:
//! - Player position stays inside the play area
//! - Velocity never exceeds the posture's speed cap
//! - Releasing every direction stops the knight dead
//! - Swing scoring does not depend on enemy iteration order

use proptest::prelude::*;

use ember_knight::Tuning;
use ember_knight::consts::*;
use ember_knight::sim::{
    Directions, Enemy, EnemyKind, Facing, GamePhase, GameState, PlayerState, TickInput,
    in_reach, resolve_attack, tick,
};

fn directions() -> impl Strategy<Value = Directions> {
    any::<(bool, bool, bool, bool)>().prop_map(|(left, right, up, down)| Directions {
        left,
        right,
        up,
        down,
    })
}

fn tick_input() -> impl Strategy<Value = TickInput> {
    (directions(), any::<bool>(), prop::bool::weighted(0.05)).prop_map(
        |(directions, attack, crouch_toggle)| TickInput {
            directions,
            attack,
            crouch_toggle,
            confirm: false,
        },
    )
}

fn enemy_kind() -> impl Strategy<Value = EnemyKind> {
    prop_oneof![Just(EnemyKind::Fire), Just(EnemyKind::Candle)]
}

// ============================================================
// Motion Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_position_stays_in_bounds(
        inputs in prop::collection::vec(tick_input(), 1..400),
        vertical in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let tuning = Tuning { vertical_movement: vertical, ..Tuning::default() };
        let mut state = GameState::new(seed, tuning);
        tick(&mut state, &TickInput { confirm: true, ..Default::default() });

        for input in &inputs {
            tick(&mut state, input);
            let pos = state.player.pos;
            prop_assert!((PLAY_AREA_MIN_X..=PLAY_AREA_MAX_X).contains(&pos.x), "x out of bounds: {}", pos.x);
            prop_assert!((PLAY_AREA_MIN_Y..=PLAY_AREA_MAX_Y).contains(&pos.y), "y out of bounds: {}", pos.y);
            if !vertical {
                prop_assert_eq!(pos.y, PLAYER_START_Y);
            }
        }
    }

    #[test]
    fn prop_velocity_respects_posture_cap(
        steps in prop::collection::vec((directions(), prop::bool::weighted(0.1)), 1..400),
    ) {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(100.0);

        for (dirs, toggle) in steps {
            if toggle {
                player.toggle_crouch();
            }
            player.step(dirs, &tuning);
            let cap = tuning.speed_cap(player.is_crouching());
            prop_assert!(player.vel.x.abs() <= cap, "vx {} above cap {}", player.vel.x, cap);
            prop_assert!(player.vel.y.abs() <= cap, "vy {} above cap {}", player.vel.y, cap);
        }
    }

    #[test]
    fn prop_release_stops_dead(
        steps in prop::collection::vec(directions(), 1..200),
        crouching in any::<bool>(),
    ) {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(100.0);
        if crouching {
            player.toggle_crouch();
        }
        for dirs in steps {
            player.step(dirs, &tuning);
        }

        player.step(Directions::default(), &tuning);
        prop_assert_eq!(player.vel.x, 0.0);
        prop_assert_eq!(player.vel.y, 0.0);

        let pos = player.pos;
        player.step(Directions::default(), &tuning);
        prop_assert_eq!(player.pos, pos);
    }
}

// ============================================================
// Combat Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_swing_score_is_order_independent(
        enemies in prop::collection::vec((enemy_kind(), 5.0f32..95.0), 0..12),
        facing_right in any::<bool>(),
        rotate_by in 0usize..12,
    ) {
        let facing = if facing_right { Facing::Right } else { Facing::Left };
        let range = Tuning::default().attack_range;

        // Only single-hit enemies die to one swing
        let expected: u64 = enemies
            .iter()
            .filter(|(kind, x)| kind.max_health() == 1 && in_reach(50.0, facing, *x, range))
            .map(|(kind, _)| kind.points())
            .sum();

        let swing = |order: &[(EnemyKind, f32)]| {
            let mut state = GameState::new(1, Tuning::default());
            state.reset_session();
            state.phase = GamePhase::Playing;
            state.player.pos.x = 50.0;
            state.player.facing = facing;
            for &(kind, x) in order {
                let id = state.next_entity_id();
                state.enemies.push(Enemy::new(id, kind, x, 0.0));
            }
            resolve_attack(&mut state);
            (state.score, state.popups.len())
        };

        let forward = swing(enemies.as_slice());
        let mut reversed = enemies.clone();
        reversed.reverse();
        let mut rotated = enemies.clone();
        if !rotated.is_empty() {
            let k = rotate_by % rotated.len();
            rotated.rotate_left(k);
        }

        prop_assert_eq!(forward.0, expected);
        prop_assert_eq!(swing(reversed.as_slice()), forward);
        prop_assert_eq!(swing(rotated.as_slice()), forward);
    }

    #[test]
    fn prop_enemy_health_never_exceeds_max(
        kinds in prop::collection::vec(enemy_kind(), 1..8),
        swings in 1usize..6,
    ) {
        let mut state = GameState::new(2, Tuning::default());
        state.reset_session();
        state.player.pos.x = 50.0;
        state.player.facing = Facing::Right;
        for kind in kinds {
            let id = state.next_entity_id();
            state.enemies.push(Enemy::new(id, kind, 55.0, 0.0));
        }
        for _ in 0..swings {
            resolve_attack(&mut state);
            for enemy in &state.enemies {
                prop_assert!(enemy.health <= enemy.max_health);
                prop_assert!(enemy.health > 0);
            }
        }
    }
}
