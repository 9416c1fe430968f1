//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Order within a
//! tick: player, formation, projectile motion, spawns, collisions, prune.

use super::player::{HitOutcome, Steer};
use super::state::{GameEvent, GameState};
use crate::snapshot::Snapshot;

/// Input intents for a single tick (deterministic)
///
/// Press flags are edge-detected by the caller; held flags reflect the
/// current key state.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Fire key is down (auto-fire on cooldown)
    pub fire_held: bool,
    /// Fire key went down this tick
    pub fire_pressed: bool,
    /// Charge key is down; releasing it casts the special when full
    pub charge_held: bool,
    /// Restart after game over
    pub reset_pressed: bool,
}

/// Advance the game state by one tick and capture the result for rendering
pub fn step(state: &mut GameState, input: &TickInput) -> Snapshot {
    tick(state, input);
    Snapshot::capture(state)
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Game over is terminal until reset
    if state.game_over {
        if input.reset_pressed {
            state.reset();
        }
        return;
    }

    state.elapsed_ticks += 1;
    let bounds = state.bounds();

    // Player
    let steer = Steer::from_intents(input.move_left, input.move_right);
    state.player.apply_movement(steer, bounds.x);
    let special = state.player.update_charge(input.charge_held);
    state.player.tick_cooldowns();

    // Formation
    let report = state.formation.update(&mut state.rng, state.player.pos.y);
    for pos in report.shots {
        state.add_enemy_bullet(pos);
    }
    if report.wave_cleared {
        state.events.push(GameEvent::WaveCleared {
            wave: state.formation.wave_index,
        });
    }
    if report.reached_player {
        state.end_game();
    }

    // Projectile motion
    for bullet in state
        .player_bullets
        .iter_mut()
        .chain(state.enemy_bullets.iter_mut())
        .chain(state.special_bullets.iter_mut())
    {
        *bullet = bullet.advanced(bounds);
    }

    // Spawns
    let wants_fire = input.fire_held || input.fire_pressed;
    if wants_fire && state.player.try_fire(state.tuning.fire_cooldown_ticks) {
        state.add_player_bullet();
    }
    if let Some(kind) = special {
        state.fire_special(kind);
    }

    // Collisions, in scoring priority order
    resolve_player_bullets(state);
    resolve_special_vs_enemies(state);
    if resolve_enemy_bullets_vs_player(state) == Some(HitOutcome::Fatal) {
        state.end_game();
    }
    resolve_special_vs_enemy_bullets(state);
    if state.formation.reaches_player(state.player.pos.y) {
        state.end_game();
    }

    state.prune();
}

/// Each player bullet destroys the first live enemy it overlaps
fn resolve_player_bullets(state: &mut GameState) {
    let GameState {
        player_bullets,
        formation,
        score,
        events,
        tuning,
        ..
    } = state;

    for bullet in player_bullets.iter_mut().filter(|b| b.active) {
        let hitbox = bullet.aabb();
        if let Some(enemy) = formation
            .enemies
            .iter_mut()
            .find(|e| e.active && e.aabb().overlaps(&hitbox))
        {
            enemy.active = false;
            bullet.active = false;
            *score += tuning.score_bullet_kill;
            events.push(GameEvent::EnemyDestroyed {
                pos: enemy.pos,
                by_special: false,
            });
        }
    }
}

/// Special bullets destroy enemies; penetrating ones keep going
fn resolve_special_vs_enemies(state: &mut GameState) {
    let GameState {
        special_bullets,
        formation,
        score,
        events,
        tuning,
        ..
    } = state;

    for bullet in special_bullets.iter_mut().filter(|b| b.active) {
        for enemy in formation.enemies.iter_mut().filter(|e| e.active) {
            if !bullet.aabb().overlaps(&enemy.aabb()) {
                continue;
            }
            enemy.active = false;
            *score += tuning.score_special_kill;
            events.push(GameEvent::EnemyDestroyed {
                pos: enemy.pos,
                by_special: true,
            });
            if !bullet.is_penetrating() {
                bullet.active = false;
                break;
            }
        }
    }
}

/// At most one enemy bullet is resolved against the player per tick
fn resolve_enemy_bullets_vs_player(state: &mut GameState) -> Option<HitOutcome> {
    let GameState {
        enemy_bullets,
        player,
        events,
        ..
    } = state;

    let hitbox = player.aabb();
    let bullet = enemy_bullets
        .iter_mut()
        .find(|b| b.active && b.aabb().overlaps(&hitbox))?;
    bullet.active = false;

    let was_invincible = player.invincible;
    let outcome = player.hit();
    if !was_invincible {
        log::debug!("Player hit, {} lives left", player.lives);
        events.push(GameEvent::PlayerHit {
            lives_left: player.lives,
        });
    }
    Some(outcome)
}

/// Special bullets clear enemy bullets; penetrating ones keep going
fn resolve_special_vs_enemy_bullets(state: &mut GameState) {
    let GameState {
        special_bullets,
        enemy_bullets,
        ..
    } = state;

    for special in special_bullets.iter_mut().filter(|b| b.active) {
        for bullet in enemy_bullets.iter_mut().filter(|b| b.active) {
            if !special.aabb().overlaps(&bullet.aabb()) {
                continue;
            }
            bullet.active = false;
            if !special.is_penetrating() {
                special.active = false;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::{Projectile, SpecialKind};
    use glam::Vec2;
    use proptest::prelude::*;

    /// State with the formation parked out of the way and firing disabled
    fn quiet_state() -> GameState {
        let mut state = GameState::new(12345);
        for enemy in state.formation.enemies.iter_mut() {
            enemy.shoot_probability = 0.0;
        }
        state
    }

    /// Keep only one live enemy, at a fixed position, with the sweep stopped
    fn lone_enemy(state: &mut GameState, pos: Vec2) {
        state.formation.speed = 0.0;
        for enemy in state.formation.enemies.iter_mut() {
            enemy.active = false;
        }
        state.formation.enemies[0].active = true;
        state.formation.enemies[0].pos = pos;
    }

    fn charge_and_release(state: &mut GameState) {
        let hold = TickInput {
            charge_held: true,
            ..Default::default()
        };
        for _ in 0..state.tuning.max_charge {
            tick(state, &hold);
        }
        tick(state, &TickInput::default());
    }

    #[test]
    fn test_player_bullet_kills_enemy() {
        let mut state = quiet_state();
        lone_enemy(&mut state, Vec2::new(50.0, 52.0));
        // Keep a second enemy alive so the wave doesn't clear
        state.formation.enemies[17].active = true;
        state.formation.enemies[17].pos = Vec2::new(140.0, 10.0);

        // Positioned so it lands at (50, 50) after this tick's motion
        state.player_bullets.push(Projectile::player(Vec2::new(50.0, 55.0)));
        tick(&mut state, &TickInput::default());

        assert!(!state.formation.enemies[0].active);
        assert!(state.player_bullets.is_empty());
        assert_eq!(state.score, 10);
        assert!(matches!(
            state.events.as_slice(),
            [GameEvent::EnemyDestroyed {
                by_special: false,
                ..
            }]
        ));
    }

    #[test]
    fn test_bullet_kills_only_first_enemy() {
        let mut state = quiet_state();
        state.formation.speed = 0.0;
        // Two stacked enemies under one bullet
        state.formation.enemies[0].pos = Vec2::new(50.0, 52.0);
        state.formation.enemies[1].pos = Vec2::new(50.0, 48.0);
        state.player_bullets.push(Projectile::player(Vec2::new(51.0, 55.0)));
        tick(&mut state, &TickInput::default());

        assert!(!state.formation.enemies[0].active);
        assert!(state.formation.enemies[1].active);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_penetrating_passes_through() {
        let mut state = quiet_state();
        state.formation.speed = 0.0;
        state.formation.enemies[0].pos = Vec2::new(50.0, 52.0);
        state.formation.enemies[1].pos = Vec2::new(50.0, 44.0);
        state.special_bullets.push(Projectile::penetrating(Vec2::new(51.0, 56.0)));
        tick(&mut state, &TickInput::default());

        assert!(!state.formation.enemies[0].active);
        assert!(!state.formation.enemies[1].active);
        assert_eq!(state.score, 40);
        assert_eq!(state.special_bullets.len(), 1);
    }

    #[test]
    fn test_bouncing_stops_at_first_enemy() {
        let mut state = quiet_state();
        state.formation.speed = 0.0;
        state.formation.enemies[0].pos = Vec2::new(50.0, 52.0);
        state.formation.enemies[1].pos = Vec2::new(50.0, 50.0);
        state.special_bullets.push(Projectile::bouncing(Vec2::new(49.0, 55.0), 1.5));
        tick(&mut state, &TickInput::default());

        assert!(!state.formation.enemies[0].active);
        assert!(state.formation.enemies[1].active);
        assert_eq!(state.score, 20);
        assert!(state.special_bullets.is_empty());
    }

    #[test]
    fn test_enemy_bullet_hits_player() {
        let mut state = quiet_state();
        let target = state.player.pos + Vec2::new(3.0, 1.0);
        state.enemy_bullets.push(Projectile::enemy(target));
        state.enemy_bullets.push(Projectile::enemy(target));
        tick(&mut state, &TickInput::default());

        assert_eq!(state.player.lives, 4);
        assert!(state.player.invincible);
        // Second bullet is left for the next tick, where invincibility absorbs it
        assert_eq!(state.enemy_bullets.len(), 1);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.lives, 4);
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_fatal_hit_ends_game() {
        let mut state = quiet_state();
        state.player.lives = 1;
        let target = state.player.pos + Vec2::new(3.0, 1.0);
        state.enemy_bullets.push(Projectile::enemy(target));
        tick(&mut state, &TickInput::default());

        assert!(state.game_over);
        assert_eq!(state.player.lives, 0);
        assert!(state.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_special_clears_enemy_bullets() {
        let mut state = quiet_state();
        state.enemy_bullets.push(Projectile::enemy(Vec2::new(60.0, 60.0)));
        state.enemy_bullets.push(Projectile::enemy(Vec2::new(61.0, 58.0)));
        state.special_bullets.push(Projectile::penetrating(Vec2::new(60.0, 66.0)));
        tick(&mut state, &TickInput::default());

        assert!(state.enemy_bullets.is_empty());
        assert_eq!(state.special_bullets.len(), 1);

        // A bouncing bullet is spent on the first one
        state.enemy_bullets.push(Projectile::enemy(Vec2::new(60.0, 60.0)));
        state.enemy_bullets.push(Projectile::enemy(Vec2::new(61.0, 60.0)));
        state.special_bullets.clear();
        state.special_bullets.push(Projectile::bouncing(Vec2::new(59.5, 64.0), 1.5));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.enemy_bullets.len(), 1);
        assert!(state.special_bullets.is_empty());
    }

    #[test]
    fn test_enemy_reaching_player_ends_game() {
        let mut state = quiet_state();
        lone_enemy(&mut state, Vec2::new(20.0, 92.0));
        tick(&mut state, &TickInput::default());
        assert!(state.game_over);
    }

    #[test]
    fn test_reach_still_finishes_the_tick() {
        let mut state = quiet_state();
        lone_enemy(&mut state, Vec2::new(20.0, 92.0));
        state.formation.enemies[1].active = true;
        state.formation.enemies[1].pos = Vec2::new(50.0, 52.0);
        state.player_bullets.push(Projectile::player(Vec2::new(50.0, 55.0)));
        tick(&mut state, &TickInput::default());

        assert!(state.game_over);
        assert!(!state.formation.enemies[1].active);
        assert_eq!(state.score, 10);
        assert!(state.player_bullets.is_empty());
        assert_eq!(
            state.events.iter().filter(|e| **e == GameEvent::GameOver).count(),
            1
        );
        assert!(state.events.contains(&GameEvent::EnemyDestroyed {
            pos: Vec2::new(50.0, 52.0),
            by_special: false,
        }));
    }

    #[test]
    fn test_game_over_freezes_until_reset() {
        let mut state = quiet_state();
        state.score = 70;
        state.end_game();
        let frozen_x = state.player.pos.x;

        let left = TickInput {
            move_left: true,
            fire_held: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &left);
        }
        assert_eq!(state.player.pos.x, frozen_x);
        assert!(state.player_bullets.is_empty());
        assert_eq!(state.elapsed_ticks, 0);

        let reset = TickInput {
            reset_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &reset);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.lives, 5);
        assert_eq!(state.formation.active_count(), 18);
        assert_eq!(state.projectiles().count(), 0);
        assert_eq!(state.events, vec![GameEvent::Reset]);
    }

    #[test]
    fn test_reset_ignored_while_playing() {
        let mut state = quiet_state();
        state.score = 30;
        let reset = TickInput {
            reset_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &reset);
        assert_eq!(state.score, 30);
    }

    #[test]
    fn test_auto_fire_rate() {
        let mut state = quiet_state();
        // Park the formation high up out of the bullet lane
        lone_enemy(&mut state, Vec2::new(0.0, 5.0));
        let fire = TickInput {
            fire_held: true,
            ..Default::default()
        };
        let mut shots = 0;
        for _ in 0..17 {
            tick(&mut state, &fire);
            shots += state
                .events
                .iter()
                .filter(|e| **e == GameEvent::PlayerShot)
                .count();
        }
        // Ticks 1, 9 and 17
        assert_eq!(shots, 3);
    }

    #[test]
    fn test_special_cast_alternates_and_spawns() {
        let mut state = quiet_state();
        lone_enemy(&mut state, Vec2::new(0.0, 5.0));

        charge_and_release(&mut state);
        assert!(state.events.contains(&GameEvent::SpecialFired(SpecialKind::Penetrating)));
        assert_eq!(state.special_bullets.len(), 1);
        assert_eq!(state.player.special.charge, 0);
        assert_eq!(state.player.special.cooldown_ticks, 179);

        // Charged again but still cooling down: nothing fires, charge kept
        charge_and_release(&mut state);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::SpecialFired(_))));
        assert_eq!(state.player.special.charge, 100);

        // Wait out the cooldown while holding, then release
        let hold = TickInput {
            charge_held: true,
            ..Default::default()
        };
        while state.player.special.cooldown_ticks > 0 {
            tick(&mut state, &hold);
        }
        tick(&mut state, &TickInput::default());
        assert!(state.events.contains(&GameEvent::SpecialFired(SpecialKind::Bouncing)));
        let bouncing = state
            .special_bullets
            .iter()
            .filter(|b| b.bounce_count() == 0 && !b.is_penetrating())
            .count();
        assert_eq!(bouncing, 2);
    }

    #[test]
    fn test_wave_clear_in_tick() {
        let mut state = quiet_state();
        lone_enemy(&mut state, Vec2::new(50.0, 52.0));
        state.player_bullets.push(Projectile::player(Vec2::new(50.0, 55.0)));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.formation.active_count(), 0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.formation.active_count(), 18);
        assert_eq!(state.formation.wave_index, 1);
        assert!((state.formation.speed - 0.2).abs() < 1e-6);
        assert!(state.events.contains(&GameEvent::WaveCleared { wave: 1 }));
    }

    #[test]
    fn test_no_inactive_projectiles_survive_tick() {
        let mut state = GameState::new(7);
        let input = TickInput {
            fire_held: true,
            move_right: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &input);
            assert!(state.projectiles().all(|p| p.active));
        }
    }

    #[test]
    fn test_step_snapshot_matches_state() {
        let mut state = GameState::new(3);
        let snapshot = step(&mut state, &TickInput::default());
        assert_eq!(snapshot.hud.score, state.score);
        assert_eq!(snapshot.hud.lives, state.player.lives);
        assert!(!snapshot.hud.game_over);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        let inputs = [
            TickInput {
                move_left: true,
                fire_held: true,
                ..Default::default()
            },
            TickInput {
                charge_held: true,
                ..Default::default()
            },
            TickInput {
                move_right: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..2000 {
            let input = &inputs[(i / 37) % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.elapsed_ticks, state2.elapsed_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.enemy_bullets, state2.enemy_bullets);
        assert_eq!(state1.player.pos, state2.player.pos);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(moves in prop::collection::vec((any::<bool>(), any::<bool>()), 0..300)) {
            let mut state = quiet_state();
            for (left, right) in moves {
                let input = TickInput { move_left: left, move_right: right, ..Default::default() };
                tick(&mut state, &input);
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= state.tuning.world_width - 8.0);
            }
        }
    }
}
