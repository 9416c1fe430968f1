//! Render snapshot
//!
//! Everything an external renderer needs to draw one frame: a flat list of
//! colored boxes for the live entities, HUD overlay boxes, and scalar HUD
//! fields. Shape instances are plain-old-data so they can be uploaded as-is.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

use crate::sim::{Enemy, GameState, Player, Projectile, ProjectileKind};

/// Opaque color tags; the renderer maps them to visuals
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorId {
    Player = 0,
    Enemy = 1,
    PlayerBullet = 2,
    EnemyBullet = 3,
    PenetratingBullet = 4,
    BouncingBullet = 5,
    GaugeBackground = 6,
    GaugeCharging = 7,
    GaugeReady = 8,
    CooldownFill = 9,
}

impl ColorId {
    pub fn from_u32(id: u32) -> Option<Self> {
        Some(match id {
            0 => ColorId::Player,
            1 => ColorId::Enemy,
            2 => ColorId::PlayerBullet,
            3 => ColorId::EnemyBullet,
            4 => ColorId::PenetratingBullet,
            5 => ColorId::BouncingBullet,
            6 => ColorId::GaugeBackground,
            7 => ColorId::GaugeCharging,
            8 => ColorId::GaugeReady,
            9 => ColorId::CooldownFill,
            _ => return None,
        })
    }

    /// Suggested RGBA for renderers without their own palette
    pub fn rgba(self) -> [f32; 4] {
        match self {
            ColorId::Player | ColorId::GaugeReady | ColorId::CooldownFill => colors::GREEN,
            ColorId::Enemy | ColorId::EnemyBullet => colors::GRAY,
            ColorId::PlayerBullet | ColorId::GaugeCharging => colors::YELLOW,
            ColorId::PenetratingBullet => colors::ORANGE,
            ColorId::BouncingBullet => colors::BLUE,
            ColorId::GaugeBackground => colors::NAVY,
        }
    }
}

/// Default palette
pub mod colors {
    pub const GREEN: [f32; 4] = [0.44, 0.78, 0.43, 1.0];
    pub const GRAY: [f32; 4] = [0.5, 0.5, 0.55, 1.0];
    pub const YELLOW: [f32; 4] = [0.91, 0.78, 0.27, 1.0];
    pub const ORANGE: [f32; 4] = [0.91, 0.5, 0.23, 1.0];
    pub const BLUE: [f32; 4] = [0.32, 0.58, 0.95, 1.0];
    pub const NAVY: [f32; 4] = [0.17, 0.18, 0.4, 1.0];
}

/// One axis-aligned colored box
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct ShapeInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: u32,
}

impl ShapeInstance {
    pub fn new(pos: Vec2, size: Vec2, color: ColorId) -> Self {
        Self {
            position: pos.to_array(),
            size: size.to_array(),
            color: color as u32,
        }
    }

    pub fn color_id(&self) -> Option<ColorId> {
        ColorId::from_u32(self.color)
    }
}

/// Scalar HUD fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    /// Special charge in [0, 1]
    pub charge_ratio: f32,
    /// Special cooldown remaining in [0, 1]
    pub cooldown_ratio: f32,
    pub special_kind: &'static str,
    pub wave: u32,
    pub play_time_secs: u64,
    pub game_over: bool,
}

/// A full frame for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Player, live enemies, then live projectiles
    pub shapes: Vec<ShapeInstance>,
    /// Charge gauge and cooldown bar
    pub overlay: Vec<ShapeInstance>,
    pub hud: Hud,
}

/// Charge gauge geometry, relative to the player's top-left corner
const GAUGE_OFFSET: Vec2 = Vec2::new(-4.0, -4.0);
const GAUGE_SIZE: Vec2 = Vec2::new(16.0, 2.0);
/// Cooldown bar geometry; y is measured up from the bottom edge
const COOLDOWN_BAR_X: f32 = 70.0;
const COOLDOWN_BAR_BOTTOM_OFFSET: f32 = 6.0;
const COOLDOWN_BAR_SIZE: Vec2 = Vec2::new(40.0, 2.0);

fn projectile_color(projectile: &Projectile) -> ColorId {
    match projectile.kind {
        ProjectileKind::Player => ColorId::PlayerBullet,
        ProjectileKind::Enemy => ColorId::EnemyBullet,
        ProjectileKind::Penetrating => ColorId::PenetratingBullet,
        ProjectileKind::Bouncing { .. } => ColorId::BouncingBullet,
    }
}

impl Snapshot {
    /// Capture the current state. Inactive entities are never included.
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        let mut shapes = Vec::with_capacity(
            1 + state.formation.enemies.len()
                + state.player_bullets.len()
                + state.enemy_bullets.len()
                + state.special_bullets.len(),
        );

        if player.is_visible() {
            shapes.push(ShapeInstance::new(
                player.pos,
                Player::SIZE.as_vec2(),
                ColorId::Player,
            ));
        }
        shapes.extend(state.formation.active().map(|e| {
            ShapeInstance::new(e.pos, Enemy::SIZE.as_vec2(), ColorId::Enemy)
        }));
        shapes.extend(
            state
                .projectiles()
                .filter(|p| p.active)
                .map(|p| ShapeInstance::new(p.pos, p.size().as_vec2(), projectile_color(p))),
        );

        let special = &player.special;
        let mut overlay = Vec::with_capacity(4);

        // Charge gauge above the ship
        let gauge_pos = player.pos + GAUGE_OFFSET;
        overlay.push(ShapeInstance::new(gauge_pos, GAUGE_SIZE, ColorId::GaugeBackground));
        let fill = (special.charge_ratio() * GAUGE_SIZE.x).floor();
        if fill > 0.0 {
            let color = if special.is_full() {
                ColorId::GaugeReady
            } else {
                ColorId::GaugeCharging
            };
            overlay.push(ShapeInstance::new(
                gauge_pos,
                Vec2::new(fill, GAUGE_SIZE.y),
                color,
            ));
        }

        // Cooldown bar, filling back up as the cooldown runs out
        if special.cooldown_ticks > 0 {
            let bar_pos = Vec2::new(
                COOLDOWN_BAR_X,
                state.tuning.world_height - COOLDOWN_BAR_BOTTOM_OFFSET,
            );
            overlay.push(ShapeInstance::new(
                bar_pos,
                COOLDOWN_BAR_SIZE,
                ColorId::GaugeBackground,
            ));
            let fill = (COOLDOWN_BAR_SIZE.x * (1.0 - special.cooldown_ratio())).floor();
            if fill > 0.0 {
                overlay.push(ShapeInstance::new(
                    bar_pos,
                    Vec2::new(fill, COOLDOWN_BAR_SIZE.y),
                    ColorId::CooldownFill,
                ));
            }
        }

        Self {
            shapes,
            overlay,
            hud: Hud {
                score: state.score,
                lives: player.lives,
                charge_ratio: special.charge_ratio(),
                cooldown_ratio: special.cooldown_ratio(),
                special_kind: special.next_kind.label(),
                wave: state.formation.wave_index,
                play_time_secs: state.play_time_secs(),
                game_over: state.game_over,
            },
        }
    }

    /// HUD clock as `MM:SS`
    pub fn play_time_label(&self) -> String {
        let secs = self.hud.play_time_secs;
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Instance buffer bytes for the entity shapes
    pub fn shape_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.shapes)
    }
}
