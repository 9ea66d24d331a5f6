//! Fixed timestep simulation tick
//!
//! Advances the session one step and drives the phase machine:
//!
//! ```text
//! menu --start--> playing --timer--> boss --kill, level < 3--> level-complete --confirm--> playing
//!                    |                 |--kill, level >= 3--> boss (loop, level 1)
//!                    +---- health 0 ---+--> game-over --confirm--> playing (fresh session)
//! ```

use super::combat::resolve_attack;
use super::enemy::{roll_enemy, spawn_interval_ms};
use super::input::TickInput;
use super::schedule::ScheduledEvent;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::ms_to_ticks;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.time_ticks += 1;

    run_scheduled(state);

    match state.phase {
        GamePhase::Menu => {
            if input.attack || input.confirm {
                start_game(state);
            }
        }
        GamePhase::LevelComplete => {
            if input.confirm {
                next_level(state);
            }
        }
        GamePhase::GameOver => {
            if input.confirm {
                start_game(state);
            }
        }
        GamePhase::Playing | GamePhase::Boss => step_active(state, input),
    }

    state.normalize_order();
}

/// Fire every scheduled event that has come due. A teardown triggered by
/// one event invalidates the rest of the batch.
fn run_scheduled(state: &mut GameState) {
    let epoch = state.schedule.epoch();
    for event in state.schedule.drain_due(state.time_ticks) {
        if state.schedule.epoch() != epoch {
            break;
        }
        match event {
            ScheduledEvent::ReleaseAttack => state.player.end_attack(),
            ScheduledEvent::ExpirePopup { popup_id } => {
                state.popups.retain(|p| p.id != popup_id);
            }
            ScheduledEvent::FinishBossDefeat => finish_boss_defeat(state),
        }
    }
}

fn start_game(state: &mut GameState) {
    log::info!("Starting new game (from {:?})", state.phase);
    state.reset_session();
}

fn next_level(state: &mut GameState) {
    state.teardown();
    state.level = state.level.saturating_add(1);
    state.begin_level();
}

/// Runs once the post-kill pause is over
fn finish_boss_defeat(state: &mut GameState) {
    // Stale if the fight already ended some other way
    if state.phase != GamePhase::Boss || state.boss.is_some() {
        return;
    }

    if state.level >= FINAL_LEVEL {
        state.boss_loop_count = state.boss_loop_count.saturating_add(1);
        // The countdown stays at zero: a loop goes straight to the next boss
        state.level = 1;
        state.enemies.clear();
        log::info!("Boss rush loop {} begins", state.boss_loop_count);
        state.events.push(GameEvent::BossLoop {
            loop_count: state.boss_loop_count,
        });
        state.spawn_boss();
    } else {
        log::info!("Level {} complete", state.level);
        // Popups still on screen are cut short along with every other timer
        state.teardown();
        state.phase = GamePhase::LevelComplete;
        state.events.push(GameEvent::LevelComplete { level: state.level });
    }
}

fn enter_game_over(state: &mut GameState) {
    log::info!(
        "Game over: score={}, level={}, loop={}",
        state.score,
        state.level,
        state.boss_loop_count
    );
    state.schedule.cancel_all();
    state.player.end_attack();
    state.popups.clear();
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver { score: state.score });
}

/// One tick of `playing` or `boss`
fn step_active(state: &mut GameState, input: &TickInput) {
    if input.crouch_toggle {
        state.player.toggle_crouch();
    }

    if input.attack && state.player.begin_attack() {
        let due = state.time_ticks + ms_to_ticks(state.tuning.attack_lock_ms);
        state.schedule.schedule(due, ScheduledEvent::ReleaseAttack);
        resolve_attack(state);
    }

    state.player.step(input.directions, &state.tuning);

    if state.phase == GamePhase::Playing {
        run_countdown(state);
    }
    if state.phase == GamePhase::Playing {
        run_spawner(state);
    }

    update_enemies(state);
    update_boss(state);

    if state.player.is_dead() {
        enter_game_over(state);
    }
}

fn run_countdown(state: &mut GameState) {
    if state.time_ticks < state.next_countdown_tick {
        return;
    }
    state.next_countdown_tick = state.time_ticks + ms_to_ticks(COUNTDOWN_INTERVAL_MS);
    state.time_remaining = state.time_remaining.saturating_sub(1);

    if state.time_remaining == 0 {
        log::info!("Level {} timer expired", state.level);
        state.phase = GamePhase::Boss;
        state.spawn_boss();
    }
}

fn run_spawner(state: &mut GameState) {
    if state.time_ticks < state.next_spawn_tick {
        return;
    }
    state.next_spawn_tick = state.time_ticks + ms_to_ticks(spawn_interval_ms(state.level));

    let id = state.next_entity_id();
    let level = state.level;
    let jitter = state.tuning.enemy_speed_jitter;
    let enemy = roll_enemy(state.rng(), id, level, jitter);
    log::debug!("Enemy {} ({:?}) spawned at x={}", id, enemy.kind(), enemy.x);
    state.events.push(GameEvent::EnemySpawned {
        id,
        kind: enemy.kind(),
    });
    state.enemies.push(enemy);
}

/// Walk every enemy toward the player and apply contact damage
fn update_enemies(state: &mut GameState) {
    let px = state.player.pos.x;
    let range = state.tuning.enemy_contact_range;
    let mut damage = 0.0;

    for enemy in &mut state.enemies {
        enemy.approach(px);
        if enemy.touches(px, range) {
            damage += enemy.kind().contact_damage();
        }
    }

    if damage > 0.0 {
        state.player.take_damage(damage);
        state.events.push(GameEvent::PlayerDamaged { amount: damage });
    }
}

/// Boss AI runs at its own slower cadence
fn update_boss(state: &mut GameState) {
    if state.time_ticks % ms_to_ticks(BOSS_STEP_INTERVAL_MS) != 0 {
        return;
    }
    let px = state.player.pos.x;
    let range = state.tuning.boss_contact_range;
    let cooldown = state.tuning.boss_attack_cooldown_steps;

    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if let Some(damage) = boss.step(px, range, cooldown) {
        state.player.take_damage(damage);
        state.events.push(GameEvent::PlayerDamaged { amount: damage });
    }
}
