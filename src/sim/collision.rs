//! Collision detection in screen space
//!
//! Obstacles are classified as frontal or side hits. A frontal hit is one
//! whose leading (bottom) edge is still inside the narrow impact zone just
//! below the player's resting top edge; everything else is a side-swipe.
//! Pickups only need a plain overlap test.

use serde::{Deserialize, Serialize};

use super::entity::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    /// Instant crash, ignores remaining lives
    Frontal,
    /// Costs one life
    Side,
}

/// Standard AABB overlap (touching edges do not count)
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Frontal iff the obstacle's bottom edge is above `resting_top + depth`
#[inline]
pub fn classify_impact(obstacle_bottom: f32, resting_top: f32, frontal_zone_depth: f32) -> Impact {
    if obstacle_bottom < resting_top + frontal_zone_depth {
        Impact::Frontal
    } else {
        Impact::Side
    }
}

/// Test an obstacle against the player's visual hitbox
///
/// Classification is measured from the player's resting top edge, not the
/// leaning visual one.
pub fn obstacle_impact(
    player: &Rect,
    resting_top: f32,
    obstacle: &Rect,
    frontal_zone_depth: f32,
) -> Option<Impact> {
    aabb_overlap(player, obstacle)
        .then(|| classify_impact(obstacle.bottom(), resting_top, frontal_zone_depth))
}

/// Pickup collection test
#[inline]
pub fn collects(player: &Rect, pickup: &Rect) -> bool {
    aabb_overlap(player, pickup)
}
