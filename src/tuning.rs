//! Game balance tuning
//!
//! Every balance number the simulation reads lives here so a run can be
//! replayed or rebalanced from a JSON blob. Defaults match `crate::consts`.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Upper bound on `formation_rows * formation_cols`
pub const MAX_FORMATION_ENEMIES: u32 = 1024;

/// Errors produced while loading or validating a tuning blob
#[derive(Error, Debug)]
pub enum TuningError {
    /// JSON was malformed or had the wrong shape
    #[error("Failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value was outside the range the simulation can handle
    #[error("Invalid tuning value for `{field}`: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance configuration for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// World width in units
    pub world_width: f32,
    /// World height in units
    pub world_height: f32,

    // === Player ===
    /// Horizontal movement per tick
    pub player_speed: f32,
    /// Lives at the start of a run
    pub player_lives: u32,
    /// Ticks between held-fire shots
    pub fire_cooldown_ticks: u32,
    /// Ticks of invincibility after a survived hit
    pub invincibility_ticks: u32,

    // === Special weapon ===
    /// Charge needed to cast (one point per held tick)
    pub max_charge: u32,
    /// Ticks before the next cast is allowed
    pub special_cooldown_ticks: u32,

    // === Formation ===
    pub formation_rows: u32,
    pub formation_cols: u32,
    /// Top-left enemy position
    pub formation_origin: Vec2,
    /// Distance between neighboring enemies
    pub formation_spacing: Vec2,
    /// Horizontal sweep speed of the first wave
    pub start_speed: f32,
    /// Per-enemy, per-tick fire probability of the first wave
    pub start_shoot_probability: f32,
    /// Added to the sweep speed on every wave clear
    pub speed_step: f32,
    /// Added to the fire probability on every wave clear
    pub shoot_probability_step: f32,
    /// Vertical drop when the formation hits a wall
    pub descent: f32,

    // === Scoring ===
    pub score_bullet_kill: u64,
    pub score_special_kill: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            player_speed: PLAYER_SPEED,
            player_lives: PLAYER_START_LIVES,
            fire_cooldown_ticks: FIRE_COOLDOWN_TICKS,
            invincibility_ticks: INVINCIBILITY_TICKS,

            max_charge: SPECIAL_MAX_CHARGE,
            special_cooldown_ticks: SPECIAL_COOLDOWN_TICKS,

            formation_rows: FORMATION_ROWS,
            formation_cols: FORMATION_COLS,
            formation_origin: Vec2::new(FORMATION_ORIGIN.0, FORMATION_ORIGIN.1),
            formation_spacing: Vec2::new(FORMATION_SPACING.0, FORMATION_SPACING.1),
            start_speed: FORMATION_START_SPEED,
            start_shoot_probability: FORMATION_START_SHOOT_PROBABILITY,
            speed_step: FORMATION_SPEED_STEP,
            shoot_probability_step: FORMATION_SHOOT_PROBABILITY_STEP,
            descent: FORMATION_DESCENT,

            score_bullet_kill: SCORE_BULLET_KILL,
            score_special_kill: SCORE_SPECIAL_KILL,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning blob. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: {}x{} world, {} lives",
            tuning.world_width,
            tuning.world_height,
            tuning.player_lives
        );
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// World bounds as a vector (width, height)
    #[inline]
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            if ok {
                Ok(())
            } else {
                Err(TuningError::OutOfRange { field, reason })
            }
        }

        check(
            self.world_width > PLAYER_SIZE as f32,
            "world_width",
            "must be wider than the player",
        )?;
        check(
            self.world_height > PLAYER_BOTTOM_MARGIN + PLAYER_SIZE as f32,
            "world_height",
            "must fit the player row",
        )?;
        check(self.player_speed > 0.0, "player_speed", "must be positive")?;
        check(self.player_lives > 0, "player_lives", "must be at least 1")?;
        check(self.max_charge > 0, "max_charge", "must be at least 1")?;
        check(self.formation_rows > 0, "formation_rows", "must be at least 1")?;
        check(self.formation_cols > 0, "formation_cols", "must be at least 1")?;
        check(
            self.formation_rows
                .checked_mul(self.formation_cols)
                .is_some_and(|n| n <= MAX_FORMATION_ENEMIES),
            "formation_rows",
            "rows * cols must not exceed 1024 enemies",
        )?;
        check(self.start_speed >= 0.0, "start_speed", "must not be negative")?;
        check(
            (0.0..=1.0).contains(&self.start_shoot_probability),
            "start_shoot_probability",
            "must be within [0, 1]",
        )?;
        check(self.speed_step >= 0.0, "speed_step", "must not be negative")?;
        check(
            self.shoot_probability_step >= 0.0,
            "shoot_probability_step",
            "must not be negative",
        )?;
        check(self.descent > 0.0, "descent", "must be positive")?;
        Ok(())
    }
}
