//! Projectiles
//!
//! One tagged type covers all four kinds. Each kind has its own motion rule
//! and expiry test, applied by `advanced()` once per tick.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Special weapon variants, alternating on each successful cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpecialKind {
    #[default]
    Penetrating,
    Bouncing,
}

impl SpecialKind {
    /// The kind fired after this one
    pub fn next(self) -> Self {
        match self {
            SpecialKind::Penetrating => SpecialKind::Bouncing,
            SpecialKind::Bouncing => SpecialKind::Penetrating,
        }
    }

    /// HUD label
    pub fn label(self) -> &'static str {
        match self {
            SpecialKind::Penetrating => "PENETRATE",
            SpecialKind::Bouncing => "BOUNCE",
        }
    }
}

/// Projectile variant with per-kind motion state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight up
    Player,
    /// Straight down
    Enemy,
    /// Fast, straight up, passes through enemies
    Penetrating,
    /// Reflects off the side and top walls
    Bouncing { dir: Vec2, bounces: u8 },
}

/// A projectile entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub kind: ProjectileKind,
    pub active: bool,
}

impl Projectile {
    pub const BULLET_SIZE: UVec2 = UVec2::new(2, 4);
    pub const PENETRATING_SIZE: UVec2 = UVec2::new(4, 8);
    pub const BOUNCING_SIZE: UVec2 = UVec2::new(4, 4);

    fn spawn(pos: Vec2, kind: ProjectileKind) -> Self {
        Self {
            pos,
            kind,
            active: true,
        }
    }

    pub fn player(pos: Vec2) -> Self {
        Self::spawn(pos, ProjectileKind::Player)
    }

    pub fn enemy(pos: Vec2) -> Self {
        Self::spawn(pos, ProjectileKind::Enemy)
    }

    pub fn penetrating(pos: Vec2) -> Self {
        Self::spawn(pos, ProjectileKind::Penetrating)
    }

    /// Bouncing bullet heading upward with horizontal component `dx`
    pub fn bouncing(pos: Vec2, dx: f32) -> Self {
        Self::spawn(
            pos,
            ProjectileKind::Bouncing {
                dir: Vec2::new(dx, -1.0),
                bounces: 0,
            },
        )
    }

    /// Box size for this kind
    pub fn size(&self) -> UVec2 {
        match self.kind {
            ProjectileKind::Player | ProjectileKind::Enemy => Self::BULLET_SIZE,
            ProjectileKind::Penetrating => Self::PENETRATING_SIZE,
            ProjectileKind::Bouncing { .. } => Self::BOUNCING_SIZE,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size())
    }

    /// Whether this projectile survives contact with enemies and enemy bullets
    #[inline]
    pub fn is_penetrating(&self) -> bool {
        matches!(self.kind, ProjectileKind::Penetrating)
    }

    /// Wall bounces so far (always 0 for non-bouncing kinds)
    pub fn bounce_count(&self) -> u8 {
        match self.kind {
            ProjectileKind::Bouncing { bounces, .. } => bounces,
            _ => 0,
        }
    }

    /// Apply one tick of motion inside a world of the given bounds
    ///
    /// Inactive projectiles are returned unchanged.
    pub fn advanced(self, bounds: Vec2) -> Self {
        if !self.active {
            return self;
        }

        let mut next = self;
        match &mut next.kind {
            ProjectileKind::Player => {
                next.pos.y -= PLAYER_BULLET_SPEED;
                next.active = next.pos.y >= 0.0;
            }
            ProjectileKind::Enemy => {
                next.pos.y += ENEMY_BULLET_SPEED;
                next.active = next.pos.y <= bounds.y;
            }
            ProjectileKind::Penetrating => {
                next.pos.y -= PENETRATING_BULLET_SPEED;
                next.active = next.pos.y >= 0.0;
            }
            ProjectileKind::Bouncing { dir, bounces } => {
                let size = self.size().as_vec2();
                next.pos.x += dir.x;
                next.pos.y += dir.y * BOUNCING_BULLET_SPEED;

                if next.pos.x <= 0.0 || next.pos.x >= bounds.x - size.x {
                    dir.x = -dir.x;
                    *bounces = (*bounces + 1).min(MAX_BOUNCES);
                }

                if next.pos.y <= 0.0 {
                    dir.y = -dir.y;
                    *bounces = (*bounces + 1).min(MAX_BOUNCES);
                } else if next.pos.y >= bounds.y - size.y {
                    // Floor absorbs, no bounce
                    next.active = false;
                }

                if *bounces >= MAX_BOUNCES {
                    next.active = false;
                }
            }
        }
        next
    }
}
