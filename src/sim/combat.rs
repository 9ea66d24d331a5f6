//! Melee hit resolution
//!
//! One resolution per attack press. The swing is an area effect: every enemy
//! within reach and in front of the knight takes a hit, plus the boss if it
//! is in reach too.

use super::schedule::ScheduledEvent;
use super::state::{Facing, GameEvent, GameState};
use crate::ms_to_ticks;

/// Outcome of one swing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackResult {
    /// Enemies hit (killed or not)
    pub enemies_hit: usize,
    /// Enemies killed
    pub enemies_killed: usize,
    /// Boss took a hit
    pub boss_hit: bool,
    /// Boss died from this swing
    pub boss_killed: bool,
    /// Points awarded
    pub points: u64,
}

/// Is `target_x` within `range` of the attacker and on the side it faces
#[inline]
pub fn in_reach(attacker_x: f32, facing: Facing, target_x: f32, range: f32) -> bool {
    (target_x - attacker_x).abs() < range && facing.is_in_front(attacker_x, target_x)
}

/// Resolve the player's swing against every enemy and the boss
pub fn resolve_attack(state: &mut GameState) -> AttackResult {
    let mut result = AttackResult::default();
    let px = state.player.pos.x;
    let facing = state.player.facing;
    let range = state.tuning.attack_range;

    let mut kills = Vec::new();
    for enemy in &mut state.enemies {
        if !in_reach(px, facing, enemy.x, range) {
            continue;
        }
        result.enemies_hit += 1;
        if enemy.hit() {
            kills.push((enemy.id, enemy.kind(), enemy.x));
        }
    }
    state.enemies.retain(|e| e.health > 0);

    for (id, kind, x) in kills {
        let points = kind.points();
        log::debug!("Enemy {} ({:?}) killed at x={:.1}", id, kind, x);
        state.award(x, points);
        state.events.push(GameEvent::EnemyKilled {
            id,
            kind,
            x,
            points,
        });
        result.enemies_killed += 1;
        result.points += points;
    }

    let boss_outcome = state.boss.as_mut().and_then(|boss| {
        if !in_reach(px, facing, boss.x, range) {
            return None;
        }
        Some((boss.id, boss.x, boss.hit(), boss.health))
    });

    if let Some((id, x, killed, health)) = boss_outcome {
        result.boss_hit = true;
        state.events.push(GameEvent::BossHit { id, health });
        if killed {
            let points = 100u64 * state.level as u64;
            log::info!("Boss {} defeated on level {}", id, state.level);
            state.boss = None;
            state.award(x, points);
            state.events.push(GameEvent::BossDefeated { id, x, points });
            let due = state.time_ticks + ms_to_ticks(state.tuning.boss_defeat_delay_ms);
            state
                .schedule
                .schedule(due, ScheduledEvent::FinishBossDefeat);
            result.boss_killed = true;
            result.points += points;
        }
    }

    result
}
