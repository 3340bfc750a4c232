//! Speed scaling with score

use crate::tuning::DifficultyTuning;

/// Scroll speed for a given score
///
/// Pure in (score, multiplier) so it can be recomputed every tick.
pub fn scroll_speed(score: u64, speed_multiplier: f32, tuning: &DifficultyTuning) -> f32 {
    let steps = (score / tuning.speed_interval.max(1)).min(tuning.cap_steps);
    let speed = tuning.base_speed * speed_multiplier + steps as f32 * tuning.speed_increment;
    speed.min(tuning.max_speed)
}
