//! Upgrade levels and the session parameters derived from them
//!
//! The host persists `UpgradeLevels` however it likes; the simulation only
//! ever sees the `UpgradeParams` handed to `reset`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest level any upgrade can reach
pub const MAX_UPGRADE_LEVEL: u32 = 10;
/// Coins per level for the next upgrade
pub const PRICE_PER_LEVEL: u32 = 100;
/// Scroll speed bonus per speed level above 1
pub const SPEED_BONUS_PER_LEVEL: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Durability,
    Speed,
    FuelCapacity,
    EngineEfficiency,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Durability,
        UpgradeKind::Speed,
        UpgradeKind::FuelCapacity,
        UpgradeKind::EngineEfficiency,
    ];
}

/// Parameters the simulation reads once at session start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeParams {
    pub durability_level: u32,
    pub speed_multiplier: f32,
    pub fuel_capacity_level: u32,
    pub engine_efficiency_level: u32,
}

impl Default for UpgradeParams {
    fn default() -> Self {
        UpgradeLevels::default().to_params()
    }
}

impl UpgradeParams {
    /// Lives at session start (one per durability level)
    pub fn starting_lives(&self) -> u32 {
        self.durability_level.max(1)
    }
}

/// Purchased upgrade levels, each in `1..=MAX_UPGRADE_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLevels", into = "RawLevels")]
pub struct UpgradeLevels {
    durability: u32,
    speed: u32,
    fuel_capacity: u32,
    engine_efficiency: u32,
}

#[derive(Serialize, Deserialize)]
struct RawLevels {
    #[serde(default = "first_level")]
    durability: u32,
    #[serde(default = "first_level")]
    speed: u32,
    #[serde(default = "first_level")]
    fuel_capacity: u32,
    #[serde(default = "first_level")]
    engine_efficiency: u32,
}

fn first_level() -> u32 {
    1
}

impl From<RawLevels> for UpgradeLevels {
    fn from(raw: RawLevels) -> Self {
        Self::new(
            raw.durability,
            raw.speed,
            raw.fuel_capacity,
            raw.engine_efficiency,
        )
    }
}

impl From<UpgradeLevels> for RawLevels {
    fn from(levels: UpgradeLevels) -> Self {
        Self {
            durability: levels.durability,
            speed: levels.speed,
            fuel_capacity: levels.fuel_capacity,
            engine_efficiency: levels.engine_efficiency,
        }
    }
}

impl Default for UpgradeLevels {
    fn default() -> Self {
        Self::new(1, 1, 1, 1)
    }
}

impl UpgradeLevels {
    /// Build from stored levels, clamping anything out of range
    pub fn new(durability: u32, speed: u32, fuel_capacity: u32, engine_efficiency: u32) -> Self {
        let clamp = |level: u32| level.clamp(1, MAX_UPGRADE_LEVEL);
        Self {
            durability: clamp(durability),
            speed: clamp(speed),
            fuel_capacity: clamp(fuel_capacity),
            engine_efficiency: clamp(engine_efficiency),
        }
    }

    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Durability => self.durability,
            UpgradeKind::Speed => self.speed,
            UpgradeKind::FuelCapacity => self.fuel_capacity,
            UpgradeKind::EngineEfficiency => self.engine_efficiency,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Durability => &mut self.durability,
            UpgradeKind::Speed => &mut self.speed,
            UpgradeKind::FuelCapacity => &mut self.fuel_capacity,
            UpgradeKind::EngineEfficiency => &mut self.engine_efficiency,
        }
    }

    /// Price of the next level, or None when maxed out
    pub fn price(&self, kind: UpgradeKind) -> Option<u32> {
        let level = self.level(kind);
        (level < MAX_UPGRADE_LEVEL).then(|| PRICE_PER_LEVEL * level)
    }

    /// Buy the next level of `kind`, returning the coins left over
    pub fn purchase(&mut self, kind: UpgradeKind, coins: u32) -> Result<u32> {
        let needed = self.price(kind).ok_or(Error::MaxLevel {
            kind,
            max: MAX_UPGRADE_LEVEL,
        })?;
        if coins < needed {
            return Err(Error::InsufficientCoins {
                needed,
                available: coins,
            });
        }
        *self.level_mut(kind) += 1;
        log::info!("{:?} upgraded to level {}", kind, self.level(kind));
        Ok(coins - needed)
    }

    pub fn to_params(&self) -> UpgradeParams {
        UpgradeParams {
            durability_level: self.durability,
            speed_multiplier: 1.0 + SPEED_BONUS_PER_LEVEL * (self.speed - 1) as f32,
            fuel_capacity_level: self.fuel_capacity,
            engine_efficiency_level: self.engine_efficiency,
        }
    }
}
