//! Enemy formation
//!
//! The formation moves as one block: it sweeps sideways until any live enemy
//! touches a wall, spends one tick dropping down, then reverses. Each live
//! enemy rolls independently to fire every tick. Clearing a wave ratchets
//! speed and fire probability up and rebuilds the grid.

use glam::{UVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::tuning::Tuning;

/// A single invader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub active: bool,
    /// Copied from the formation when the grid is built
    pub shoot_probability: f32,
}

impl Enemy {
    pub const SIZE: UVec2 = UVec2::new(ENEMY_SIZE, ENEMY_SIZE);

    pub fn new(pos: Vec2, shoot_probability: f32) -> Self {
        Self {
            pos,
            active: true,
            shoot_probability,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Self::SIZE)
    }

    /// Spawn point for a 2-wide enemy bullet, under the enemy's center
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + (ENEMY_SIZE / 2) as f32 - 1.0,
            self.pos.y + ENEMY_SIZE as f32,
        )
    }

    /// Whether the bottom edge has reached the given line
    #[inline]
    pub fn reaches(&self, y: f32) -> bool {
        self.active && self.aabb().bottom() >= y
    }
}

/// Sweep state of the formation for the tick just run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sweep {
    #[default]
    Advancing,
    Descending,
}

/// What happened during one formation update
#[derive(Debug, Clone, Default)]
pub struct FormationReport {
    /// Spawn points for enemy bullets fired this tick
    pub shots: Vec<Vec2>,
    /// The grid was emptied and rebuilt this tick
    pub wave_cleared: bool,
    /// A live enemy reached the player's row
    pub reached_player: bool,
}

/// The invader grid and its shared movement state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    /// Row-major
    pub enemies: Vec<Enemy>,
    /// -1 = left, +1 = right
    pub direction: f32,
    pub speed: f32,
    pub shoot_probability: f32,
    pub sweep: Sweep,
    /// Waves cleared so far
    pub wave_index: u32,
    rows: u32,
    cols: u32,
    origin: Vec2,
    spacing: Vec2,
    speed_step: f32,
    shoot_probability_step: f32,
    descent: f32,
    world_width: f32,
}

impl Formation {
    /// Build the first wave
    pub fn new(tuning: &Tuning) -> Self {
        let mut formation = Self {
            enemies: Vec::new(),
            direction: 1.0,
            speed: tuning.start_speed,
            shoot_probability: tuning.start_shoot_probability,
            sweep: Sweep::Advancing,
            wave_index: 0,
            rows: tuning.formation_rows,
            cols: tuning.formation_cols,
            origin: tuning.formation_origin,
            spacing: tuning.formation_spacing,
            speed_step: tuning.speed_step,
            shoot_probability_step: tuning.shoot_probability_step,
            descent: tuning.descent,
            world_width: tuning.world_width,
        };
        formation.create_enemies();
        formation
    }

    /// Rebuild the full grid at the canonical layout
    pub fn create_enemies(&mut self) {
        self.enemies.clear();
        self.enemies.reserve((self.rows * self.cols) as usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = self.origin + self.spacing * Vec2::new(col as f32, row as f32);
                self.enemies.push(Enemy::new(pos, self.shoot_probability));
            }
        }
    }

    /// Live enemies, in grid order
    pub fn active(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn is_cleared(&self) -> bool {
        self.enemies.iter().all(|e| !e.active)
    }

    /// Whether any live enemy touches the wall it is heading toward
    fn at_wall(&self) -> bool {
        let max_x = self.world_width - ENEMY_SIZE as f32;
        self.active().any(|e| {
            (self.direction > 0.0 && e.pos.x >= max_x) || (self.direction < 0.0 && e.pos.x <= 0.0)
        })
    }

    /// Sweep or descend one step
    pub fn step_movement(&mut self) {
        if self.at_wall() {
            self.sweep = Sweep::Descending;
            self.direction = -self.direction;
            let dy = self.descent;
            for enemy in self.enemies.iter_mut().filter(|e| e.active) {
                enemy.pos.y += dy;
            }
        } else {
            self.sweep = Sweep::Advancing;
            let dx = self.direction * self.speed;
            for enemy in self.enemies.iter_mut().filter(|e| e.active) {
                enemy.pos.x += dx;
            }
        }
    }

    /// Roll every live enemy's fire chance; returns bullet spawn points
    pub fn roll_shots<R: Rng>(&self, rng: &mut R) -> Vec<Vec2> {
        self.active()
            .filter(|e| rng.random::<f32>() < e.shoot_probability)
            .map(Enemy::muzzle)
            .collect()
    }

    /// Ratchet difficulty and rebuild the grid if every enemy is down
    ///
    /// Returns true if a new wave was started.
    pub fn check_wave_clear(&mut self) -> bool {
        if !self.is_cleared() {
            return false;
        }
        self.speed += self.speed_step;
        self.shoot_probability += self.shoot_probability_step;
        self.wave_index += 1;
        self.create_enemies();
        log::info!(
            "Wave {} cleared: speed {:.2}, shoot probability {:.3}",
            self.wave_index,
            self.speed,
            self.shoot_probability
        );
        true
    }

    /// Whether any live enemy's bottom edge reached `player_top`
    pub fn reaches_player(&self, player_top: f32) -> bool {
        self.enemies.iter().any(|e| e.reaches(player_top))
    }

    /// Full per-tick update: movement, firing, wave clear, reach check
    pub fn update<R: Rng>(&mut self, rng: &mut R, player_top: f32) -> FormationReport {
        self.step_movement();
        let shots = self.roll_shots(rng);
        let wave_cleared = self.check_wave_clear();
        let reached_player = self.reaches_player(player_top);
        FormationReport {
            shots,
            wave_cleared,
            reached_player,
        }
    }
}
