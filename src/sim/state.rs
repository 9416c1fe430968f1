//! Game state and core simulation types
//!
//! The world owns every entity collection. Entities hold no references back
//! to their owners; the tick passes whatever context they need.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::formation::Formation;
use super::player::Player;
use super::projectile::{Projectile, SpecialKind};
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// Notable things that happened during a tick, for audio/effects consumers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerShot,
    SpecialFired(SpecialKind),
    EnemyDestroyed { pos: Vec2, by_special: bool },
    PlayerHit { lives_left: u32 },
    WaveCleared { wave: u32 },
    GameOver,
    Reset,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub score: u64,
    /// Terminal until an explicit reset
    pub game_over: bool,
    /// Ticks simulated since the last reset
    pub elapsed_ticks: u64,
    pub player: Player,
    pub formation: Formation,
    pub player_bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    /// Penetrating and bouncing bullets
    pub special_bullets: Vec<Projectile>,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a new game state with custom tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            game_over: false,
            elapsed_ticks: 0,
            player: Player::new(&tuning),
            formation: Formation::new(&tuning),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            special_bullets: Vec::new(),
            events: Vec::new(),
            tuning,
        }
    }

    /// Restore the startup configuration, keeping seed and tuning
    pub fn reset(&mut self) {
        log::info!("Resetting run (seed {}), final score {}", self.seed, self.score);
        let events = std::mem::take(&mut self.events);
        *self = Self::build(self.seed, self.tuning.clone());
        self.events = events;
        self.events.push(GameEvent::Reset);
    }

    /// Swap in a new seed; takes effect for subsequent rolls and resets
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    #[inline]
    pub fn bounds(&self) -> Vec2 {
        self.tuning.bounds()
    }

    pub fn add_player_bullet(&mut self) {
        let pos = self.player.muzzle(Projectile::BULLET_SIZE.x);
        self.player_bullets.push(Projectile::player(pos));
        self.events.push(GameEvent::PlayerShot);
    }

    pub fn add_enemy_bullet(&mut self, pos: Vec2) {
        self.enemy_bullets.push(Projectile::enemy(pos));
    }

    /// Spawn a special cast at the player's muzzle
    pub fn fire_special(&mut self, kind: SpecialKind) {
        match kind {
            SpecialKind::Penetrating => {
                let pos = self.player.muzzle(Projectile::PENETRATING_SIZE.x);
                self.special_bullets.push(Projectile::penetrating(pos));
            }
            SpecialKind::Bouncing => {
                let pos = self.player.muzzle(Projectile::BOUNCING_SIZE.x);
                self.special_bullets
                    .push(Projectile::bouncing(pos, -BOUNCING_BULLET_SPREAD));
                self.special_bullets
                    .push(Projectile::bouncing(pos, BOUNCING_BULLET_SPREAD));
            }
        }
        log::debug!("Special fired: {:?}", kind);
        self.events.push(GameEvent::SpecialFired(kind));
    }

    /// Drop inactive projectiles from every collection
    pub fn prune(&mut self) {
        self.player_bullets.retain(|b| b.active);
        self.enemy_bullets.retain(|b| b.active);
        self.special_bullets.retain(|b| b.active);
    }

    /// All projectiles in render order
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.player_bullets
            .iter()
            .chain(&self.enemy_bullets)
            .chain(&self.special_bullets)
    }

    /// Play time in whole seconds since the last reset
    pub fn play_time_secs(&self) -> u64 {
        self.elapsed_ticks / TICKS_PER_SECOND
    }

    /// Mark the run as over (idempotent)
    pub fn end_game(&mut self) {
        if !self.game_over {
            self.game_over = true;
            log::info!("Game over: score {}, wave {}", self.score, self.formation.wave_index);
            self.events.push(GameEvent::GameOver);
        }
    }
}
