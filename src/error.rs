//! Error types for configuration, upgrades and tallies
//!
//! The simulation tick itself never fails; these cover the data the host
//! feeds in or stores between sessions.

use crate::upgrades::UpgradeKind;

/// Crate error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tuning values that would break the simulation
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    /// Malformed JSON for tuning or high scores
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upgrade is already maxed out
    #[error("{kind:?} is already at max level {max}")]
    MaxLevel { kind: UpgradeKind, max: u32 },

    /// Not enough coins for the next upgrade level
    #[error("Need {needed} coins, have {available}")]
    InsufficientCoins { needed: u32, available: u32 },
}

/// Result type for fallible lane_rush operations
pub type Result<T> = std::result::Result<T, Error>;
