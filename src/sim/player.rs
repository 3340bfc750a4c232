//! Player locomotion
//!
//! The player owns a logical lane plus an eased visual position. Lane
//! changes run a fixed-length animation; while it plays the visual x is a
//! function of elapsed frames and the current viewport, and further
//! requests are dropped. Endpoints are stored as lanes so a resize mid
//! animation still lands on the lane center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Rect;
use super::lane::{clamp_lane, is_valid_lane, lane_center_x};
use super::state::Viewport;
use crate::consts::START_LANE;
use crate::tuning::PlayerTuning;
use crate::{ease_in_out, lerp};

/// Requested lane change direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneShift {
    Left,
    Right,
}

impl LaneShift {
    pub fn delta(&self) -> i32 {
        match self {
            LaneShift::Left => -1,
            LaneShift::Right => 1,
        }
    }
}

/// Outcome of a lane change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneChange {
    /// Animation started toward the new lane
    Started { lane: i32 },
    /// Already mid-transition; request dropped
    Busy,
    /// Would leave the road
    BoundaryViolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Locomotion {
    #[default]
    Idle,
    Transitioning {
        /// Lane the animation started from; the target is `Player::lane`
        from_lane: i32,
        elapsed: u32,
        total: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Logical lane (0..=MAX_LANE)
    pub lane: i32,
    pub locomotion: Locomotion,
    /// Animated top-left position, also used as the hitbox
    pub visual: Vec2,
    pub size: Vec2,
}

impl Player {
    pub fn new(tuning: &PlayerTuning, viewport: Viewport) -> Self {
        let size = Vec2::new(tuning.width, tuning.height);
        Self {
            lane: START_LANE,
            locomotion: Locomotion::Idle,
            visual: Vec2::new(
                lane_center_x(START_LANE, viewport.width, size.x),
                resting_y(tuning, viewport),
            ),
            size,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.locomotion, Locomotion::Transitioning { .. })
    }

    /// Try to start a lane change
    pub fn request_lane_change(
        &mut self,
        shift: LaneShift,
        tuning: &PlayerTuning,
        viewport: Viewport,
    ) -> LaneChange {
        if self.is_transitioning() {
            return LaneChange::Busy;
        }
        let lane = self.lane + shift.delta();
        if !is_valid_lane(lane) {
            return LaneChange::BoundaryViolation;
        }

        let from_lane = self.lane;
        self.lane = lane;
        self.locomotion = Locomotion::Transitioning {
            from_lane,
            elapsed: 0,
            total: tuning.lane_change_frames.max(1),
        };
        LaneChange::Started { lane }
    }

    /// Advance the animation by one tick
    pub fn update(&mut self, tuning: &PlayerTuning, viewport: Viewport) {
        let rest_y = resting_y(tuning, viewport);
        match self.locomotion {
            Locomotion::Idle => {
                self.lane = clamp_lane(self.lane);
                self.visual = Vec2::new(lane_center_x(self.lane, viewport.width, self.size.x), rest_y);
            }
            Locomotion::Transitioning {
                from_lane,
                elapsed,
                total,
            } => {
                let start_x = lane_center_x(from_lane, viewport.width, self.size.x);
                let target_x = lane_center_x(self.lane, viewport.width, self.size.x);
                let elapsed = elapsed + 1;
                if elapsed >= total {
                    self.visual = Vec2::new(target_x, rest_y);
                    self.locomotion = Locomotion::Idle;
                    return;
                }
                let progress = elapsed as f32 / total as f32;
                self.visual.x = lerp(start_x, target_x, ease_in_out(progress));
                self.visual.y = rest_y - tuning.lean_amount * 4.0 * progress * (1.0 - progress);
                self.locomotion = Locomotion::Transitioning {
                    from_lane,
                    elapsed,
                    total,
                };
            }
        }
    }

    /// Start and target x of the running animation in `viewport`
    pub fn transition_endpoints(&self, viewport: Viewport) -> Option<(f32, f32)> {
        match self.locomotion {
            Locomotion::Idle => None,
            Locomotion::Transitioning { from_lane, .. } => Some((
                lane_center_x(from_lane, viewport.width, self.size.x),
                lane_center_x(self.lane, viewport.width, self.size.x),
            )),
        }
    }

    /// Hitbox at the animated position
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.visual, self.size)
    }
}

/// Top edge of the player when not leaning
#[inline]
pub fn resting_y(tuning: &PlayerTuning, viewport: Viewport) -> f32 {
    viewport.height - tuning.forward_offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (Player, PlayerTuning, Viewport) {
        let tuning = PlayerTuning::default();
        let viewport = Viewport::new(300.0, 600.0);
        (Player::new(&tuning, viewport), tuning, viewport)
    }

    #[test]
    fn test_starts_idle_in_center_lane() {
        let (player, _, _) = setup();
        assert_eq!(player.lane, 1);
        assert_eq!(player.visual, Vec2::new(120.0, 450.0));
        assert!(!player.is_transitioning());
    }

    #[test]
    fn test_idle_updates_keep_lane() {
        let (mut player, tuning, viewport) = setup();
        for _ in 0..100 {
            player.update(&tuning, viewport);
        }
        assert_eq!(player.lane, 1);
        assert_eq!(player.locomotion, Locomotion::Idle);
        assert_eq!(player.visual, Vec2::new(120.0, 450.0));
    }

    #[test]
    fn test_lane_change_completes_and_snaps() {
        let (mut player, tuning, viewport) = setup();
        let result = player.request_lane_change(LaneShift::Right, &tuning, viewport);
        assert_eq!(result, LaneChange::Started { lane: 2 });
        assert_eq!(player.lane, 2);

        for _ in 0..tuning.lane_change_frames - 1 {
            player.update(&tuning, viewport);
            assert!(player.is_transitioning());
        }
        player.update(&tuning, viewport);
        assert_eq!(player.locomotion, Locomotion::Idle);
        assert_eq!(player.visual, Vec2::new(220.0, 450.0));
    }

    #[test]
    fn test_lean_dips_and_returns() {
        let (mut player, tuning, viewport) = setup();
        player.request_lane_change(LaneShift::Left, &tuning, viewport);
        let mut lowest = f32::MAX;
        for _ in 0..tuning.lane_change_frames {
            player.update(&tuning, viewport);
            lowest = lowest.min(player.visual.y);
        }
        // Peak lean at the halfway frame
        assert!((lowest - (450.0 - tuning.lean_amount)).abs() < 1e-3);
        assert_eq!(player.visual.y, 450.0);
    }

    #[test]
    fn test_resize_mid_transition_lands_on_lane_center() {
        let (mut player, tuning, viewport) = setup();
        player.request_lane_change(LaneShift::Right, &tuning, viewport);
        player.update(&tuning, viewport);

        let wide = Viewport::new(600.0, 600.0);
        assert_eq!(player.transition_endpoints(wide), Some((270.0, 470.0)));
        while player.is_transitioning() {
            player.update(&tuning, wide);
            assert!(player.visual.x >= 270.0 && player.visual.x <= 470.0);
        }
        assert_eq!(player.visual, Vec2::new(470.0, 450.0));
    }

    #[test]
    fn test_busy_while_transitioning() {
        let (mut player, tuning, viewport) = setup();
        player.request_lane_change(LaneShift::Left, &tuning, viewport);
        player.update(&tuning, viewport);
        assert_eq!(
            player.request_lane_change(LaneShift::Left, &tuning, viewport),
            LaneChange::Busy
        );
        assert_eq!(player.lane, 0);
    }

    #[test]
    fn test_boundary_violation() {
        let (mut player, tuning, viewport) = setup();
        player.lane = 0;
        assert_eq!(
            player.request_lane_change(LaneShift::Left, &tuning, viewport),
            LaneChange::BoundaryViolation
        );
        assert_eq!(player.lane, 0);
        assert!(!player.is_transitioning());
    }

    proptest! {
        #[test]
        fn prop_transition_stays_between_endpoints(
            start_lane in 0i32..3,
            right in any::<bool>(),
            width in 90.0f32..2000.0,
        ) {
            let tuning = PlayerTuning::default();
            let viewport = Viewport::new(width, 800.0);
            let mut player = Player::new(&tuning, viewport);
            player.lane = start_lane;
            player.update(&tuning, viewport);

            let shift = if right { LaneShift::Right } else { LaneShift::Left };
            if let LaneChange::Started { .. } = player.request_lane_change(shift, &tuning, viewport) {
                let (start_x, target_x) = player.transition_endpoints(viewport).unwrap();
                let (lo, hi) = if start_x <= target_x { (start_x, target_x) } else { (target_x, start_x) };
                let mut last = start_x;
                while player.is_transitioning() {
                    player.update(&tuning, viewport);
                    let x = player.visual.x;
                    prop_assert!(x >= lo - 1e-3 && x <= hi + 1e-3);
                    // Monotonic toward the target
                    prop_assert!((x - last) * (target_x - start_x) >= -1e-3);
                    last = x;
                }
                prop_assert_eq!(player.visual.x, target_x);
            }
        }
    }
}
