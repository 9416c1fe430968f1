//! The player's ship
//!
//! Owns lives, the invincibility window after a hit, the fire cooldown and
//! the special weapon's charge/cooldown state machine.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::projectile::SpecialKind;
use crate::consts::*;
use crate::tuning::Tuning;

/// Horizontal movement intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steer {
    #[default]
    None,
    Left,
    Right,
}

impl Steer {
    /// Resolve raw left/right intents; both held cancel out
    pub fn from_intents(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => Steer::Left,
            (false, true) => Steer::Right,
            _ => Steer::None,
        }
    }
}

/// Outcome of being struck by an enemy bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Life lost (or absorbed by invincibility), still in play
    Survived,
    /// Last life lost
    Fatal,
}

/// Special weapon charge/cooldown state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialWeapon {
    pub charge: u32,
    pub max_charge: u32,
    /// Charge input was held on the previous tick
    pub is_charging: bool,
    pub cooldown_ticks: u32,
    pub cooldown_duration: u32,
    pub next_kind: SpecialKind,
}

impl SpecialWeapon {
    pub fn new(max_charge: u32, cooldown_duration: u32) -> Self {
        assert!(max_charge > 0, "special weapon needs a positive max charge");
        Self {
            charge: 0,
            max_charge,
            is_charging: false,
            cooldown_ticks: 0,
            cooldown_duration,
            next_kind: SpecialKind::default(),
        }
    }

    /// Fraction of max charge accumulated, in [0, 1]
    pub fn charge_ratio(&self) -> f32 {
        self.charge as f32 / self.max_charge as f32
    }

    /// Fraction of the cooldown still remaining, in [0, 1]
    pub fn cooldown_ratio(&self) -> f32 {
        if self.cooldown_duration == 0 {
            0.0
        } else {
            (self.cooldown_ticks as f32 / self.cooldown_duration as f32).min(1.0)
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.charge >= self.max_charge
    }

    /// Advance charge from the held state of the charge input
    ///
    /// Returns the kind to fire on a release edge with a full charge and no
    /// cooldown. A release that fails either condition keeps the charge.
    pub fn update(&mut self, charge_held: bool) -> Option<SpecialKind> {
        if charge_held {
            self.is_charging = true;
            self.charge = (self.charge + 1).min(self.max_charge);
            return None;
        }

        if !self.is_charging {
            return None;
        }
        self.is_charging = false;

        if self.is_full() && self.cooldown_ticks == 0 {
            let kind = self.next_kind;
            self.charge = 0;
            self.cooldown_ticks = self.cooldown_duration;
            self.next_kind = kind.next();
            Some(kind)
        } else {
            None
        }
    }
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub speed: f32,
    pub lives: u32,
    pub invincible: bool,
    pub invincible_ticks: u32,
    pub invincibility_duration: u32,
    /// Cycles 0..BLINK_PERIOD while invincible
    pub blink_phase: u32,
    pub bullet_cooldown: u32,
    pub special: SpecialWeapon,
}

impl Player {
    pub const SIZE: UVec2 = UVec2::new(PLAYER_SIZE, PLAYER_SIZE);

    /// Player centered on the bottom row of a world described by `tuning`
    pub fn new(tuning: &Tuning) -> Self {
        assert!(tuning.player_lives > 0, "player must start with at least one life");
        Self {
            pos: Vec2::new(
                (tuning.world_width / 2.0).floor(),
                tuning.world_height - PLAYER_BOTTOM_MARGIN,
            ),
            speed: tuning.player_speed,
            lives: tuning.player_lives,
            invincible: false,
            invincible_ticks: 0,
            invincibility_duration: tuning.invincibility_ticks,
            blink_phase: 0,
            bullet_cooldown: 0,
            special: SpecialWeapon::new(tuning.max_charge, tuning.special_cooldown_ticks),
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, Self::SIZE)
    }

    /// Where shots leave the ship for a projectile of the given width
    pub fn muzzle(&self, projectile_width: u32) -> Vec2 {
        Vec2::new(
            self.pos.x + (PLAYER_SIZE / 2) as f32 - (projectile_width / 2) as f32,
            self.pos.y,
        )
    }

    /// Move horizontally, clamped to `[0, world_width - width]`
    pub fn apply_movement(&mut self, steer: Steer, world_width: f32) {
        let dx = match steer {
            Steer::Left => -self.speed,
            Steer::Right => self.speed,
            Steer::None => return,
        };
        let max_x = world_width - PLAYER_SIZE as f32;
        self.pos.x = (self.pos.x + dx).clamp(0.0, max_x);
    }

    /// Tick down fire/special cooldowns and the invincibility window
    pub fn tick_cooldowns(&mut self) {
        self.bullet_cooldown = self.bullet_cooldown.saturating_sub(1);
        self.special.cooldown_ticks = self.special.cooldown_ticks.saturating_sub(1);

        if self.invincible {
            self.invincible_ticks = self.invincible_ticks.saturating_sub(1);
            self.blink_phase = (self.blink_phase + 1) % BLINK_PERIOD;
            if self.invincible_ticks == 0 {
                self.invincible = false;
            }
        }
    }

    /// Advance the special weapon; see `SpecialWeapon::update`
    pub fn update_charge(&mut self, charge_held: bool) -> Option<SpecialKind> {
        self.special.update(charge_held)
    }

    /// Start the fire cooldown if a shot is allowed this tick
    pub fn try_fire(&mut self, cooldown: u32) -> bool {
        if self.bullet_cooldown > 0 {
            return false;
        }
        self.bullet_cooldown = cooldown;
        true
    }

    /// Take a hit from an enemy bullet
    pub fn hit(&mut self) -> HitOutcome {
        if self.invincible {
            return HitOutcome::Survived;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            return HitOutcome::Fatal;
        }

        self.invincible = true;
        self.invincible_ticks = self.invincibility_duration;
        HitOutcome::Survived
    }

    /// Drawn this tick (blinks while invincible)
    pub fn is_visible(&self) -> bool {
        !self.invincible || self.blink_phase < BLINK_VISIBLE
    }
}
