//! Axis-aligned box collision
//!
//! Every entity exposes an `Aabb`. Overlap uses open intervals on both axes,
//! so boxes that only share an edge do not collide. Callers filter out
//! inactive entities before testing.

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box: top-left corner plus integer size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: UVec2,
}

impl Aabb {
    pub const fn new(pos: Vec2, size: UVec2) -> Self {
        Self { pos, size }
    }

    /// Right edge (exclusive)
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x as f32
    }

    /// Bottom edge (exclusive)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y as f32
    }

    /// True iff the two boxes strictly overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        overlaps(self, other)
    }
}

/// Strict AABB overlap test (touching edges do not count)
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.pos.x < b.right() && a.right() > b.pos.x && a.pos.y < b.bottom() && a.bottom() > b.pos.y
}
