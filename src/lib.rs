//! Charge Invaders - A fixed-timestep invaders arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, formation, collisions, game state)
//! - `snapshot`: Render snapshot handed to an external renderer
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use snapshot::{ColorId, ShapeInstance, Snapshot};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Simulation rate the play clock assumes (ticks per second)
    pub const TICKS_PER_SECOND: u64 = 30;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 160.0;
    pub const WORLD_HEIGHT: f32 = 120.0;

    /// Player defaults
    pub const PLAYER_SIZE: u32 = 8;
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_START_LIVES: u32 = 5;
    /// Player row sits this far above the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
    pub const FIRE_COOLDOWN_TICKS: u32 = 8;
    pub const INVINCIBILITY_TICKS: u32 = 60;
    /// Blink cycle while invincible; visible for the first half
    pub const BLINK_PERIOD: u32 = 6;
    pub const BLINK_VISIBLE: u32 = 3;

    /// Special weapon
    pub const SPECIAL_MAX_CHARGE: u32 = 100;
    pub const SPECIAL_COOLDOWN_TICKS: u32 = 180;

    /// Enemy formation
    pub const ENEMY_SIZE: u32 = 8;
    pub const FORMATION_ROWS: u32 = 3;
    pub const FORMATION_COLS: u32 = 6;
    pub const FORMATION_ORIGIN: (f32, f32) = (20.0, 5.0);
    pub const FORMATION_SPACING: (f32, f32) = (20.0, 10.0);
    pub const FORMATION_START_SPEED: f32 = 0.5;
    pub const FORMATION_START_SHOOT_PROBABILITY: f32 = 0.005;
    pub const FORMATION_SPEED_STEP: f32 = 0.2;
    pub const FORMATION_SHOOT_PROBABILITY_STEP: f32 = 0.002;
    pub const FORMATION_DESCENT: f32 = 3.0;

    /// Projectiles (speeds in units per tick)
    pub const PLAYER_BULLET_SPEED: f32 = 5.0;
    pub const ENEMY_BULLET_SPEED: f32 = 1.0;
    pub const PENETRATING_BULLET_SPEED: f32 = 6.0;
    pub const BOUNCING_BULLET_SPEED: f32 = 3.0;
    /// Horizontal component of each bouncing bullet in a cast (mirrored)
    pub const BOUNCING_BULLET_SPREAD: f32 = 1.5;
    pub const MAX_BOUNCES: u8 = 5;

    /// Scoring
    pub const SCORE_BULLET_KILL: u64 = 10;
    pub const SCORE_SPECIAL_KILL: u64 = 20;
}
