//! Lane geometry
//!
//! The road is split into `LANE_COUNT` equal vertical strips. Every entity
//! is drawn centered in its strip, so horizontal position is always derived
//! from the lane index rather than stored.

use crate::consts::{LANE_COUNT, MAX_LANE};

/// Clamp a lane index into the valid range
#[inline]
pub fn clamp_lane(lane: i32) -> i32 {
    lane.clamp(0, MAX_LANE)
}

/// Whether `lane` is on the road
#[inline]
pub fn is_valid_lane(lane: i32) -> bool {
    (0..LANE_COUNT).contains(&lane)
}

/// Left edge that centers an entity of `entity_width` in `lane`
///
/// Returns 0 before layout (viewport width <= 0). Out-of-range lanes are
/// clamped onto the road.
pub fn lane_center_x(lane: i32, viewport_width: f32, entity_width: f32) -> f32 {
    if viewport_width <= 0.0 {
        return 0.0;
    }
    let lane_width = viewport_width / LANE_COUNT as f32;
    let center = lane_width * clamp_lane(lane) as f32 + lane_width / 2.0;
    center - entity_width / 2.0
}
