//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod formation;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;

pub use collision::{Aabb, overlaps};
pub use formation::{Enemy, Formation, FormationReport, Sweep};
pub use player::{HitOutcome, Player, SpecialWeapon, Steer};
pub use projectile::{Projectile, ProjectileKind, SpecialKind};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, step, tick};
