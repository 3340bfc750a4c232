//! Lane Rush - a three-lane arcade driving game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (locomotion, spawning, collisions, power-ups, fuel)
//! - `tuning`: Data-driven game balance
//! - `upgrades`: Upgrade levels and the session parameters they derive
//! - `highscores`: Final score/currency tally

pub mod error;
pub mod highscores;
pub mod sim;
pub mod tuning;
pub mod upgrades;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use tuning::Tuning;
pub use upgrades::{UpgradeKind, UpgradeLevels, UpgradeParams};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Number of road lanes
    pub const LANE_COUNT: i32 = 3;
    /// Highest valid lane index
    pub const MAX_LANE: i32 = LANE_COUNT - 1;
    /// Lane the player starts a session in
    pub const START_LANE: i32 = 1;

    /// Road markings repeat every this many pixels
    pub const ROAD_MARKING_PERIOD: f32 = 60.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cosine ease-in-out for t in [0, 1]
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    (1.0 - (std::f32::consts::PI * t).cos()) / 2.0
}
