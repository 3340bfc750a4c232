//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so balance passes can be
//! done from JSON without touching code. Each section deserializes with
//! defaults, so an override file only needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Player vehicle and lane-change animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Resting top edge sits this far above the bottom of the viewport
    pub forward_offset: f32,
    /// Duration of a lane change in ticks
    pub lane_change_frames: u32,
    /// Peak of the forward lean during a lane change (pixels)
    pub lean_amount: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 100.0,
            forward_offset: 150.0,
            lane_change_frames: 10,
            lean_amount: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// Depth of the frontal impact zone below the player's resting top edge
    pub frontal_zone_depth: f32,
    /// Grace period after a side hit or wall hit (ticks)
    pub invulnerability_frames: u32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            frontal_zone_depth: 20.0,
            invulnerability_frames: 90,
        }
    }
}

/// Fuel-can cadence for one fuel band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelSpawnBand {
    /// Ticks between spawn attempts
    pub interval: u32,
    /// Probability that an attempt produces a can
    pub chance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub obstacle_interval: u32,
    pub coin_interval: u32,
    pub power_up_interval: u32,
    pub power_up_chance: f32,
    /// Re-roll budget when a coin lands in a blocked lane
    pub coin_attempts: u32,
    /// Obstacles this close to the top of the screen block coin lanes
    pub danger_band: f32,
    /// RegularCar, Truck, Motorcycle, Police
    pub obstacle_weights: [f32; 4],
    /// Shield, Magnet, SlowMotion, Multiplier, CoinRain
    pub power_up_weights: [f32; 5],
    /// Per-tick chance a police car in the upper half steps toward the player
    pub police_retarget_chance: f32,
    pub coin_size: f32,
    pub power_up_size: f32,
    pub fuel_can_width: f32,
    pub fuel_can_height: f32,
    pub fuel_normal: FuelSpawnBand,
    /// Used below `fuel_low_fraction`
    pub fuel_low: FuelSpawnBand,
    /// Used below `fuel_critical_fraction`
    pub fuel_critical: FuelSpawnBand,
    pub fuel_low_fraction: f32,
    pub fuel_critical_fraction: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            obstacle_interval: 60,
            coin_interval: 45,
            power_up_interval: 180,
            power_up_chance: 0.5,
            coin_attempts: 10,
            danger_band: 200.0,
            obstacle_weights: [50.0, 20.0, 15.0, 15.0],
            power_up_weights: [30.0, 25.0, 20.0, 15.0, 10.0],
            police_retarget_chance: 0.02,
            coin_size: 30.0,
            power_up_size: 40.0,
            fuel_can_width: 36.0,
            fuel_can_height: 44.0,
            fuel_normal: FuelSpawnBand {
                interval: 80,
                chance: 0.35,
            },
            fuel_low: FuelSpawnBand {
                interval: 60,
                chance: 0.6,
            },
            fuel_critical: FuelSpawnBand {
                interval: 40,
                chance: 0.9,
            },
            fuel_low_fraction: 0.4,
            fuel_critical_fraction: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub shield_frames: u32,
    pub magnet_frames: u32,
    pub slow_motion_frames: u32,
    pub multiplier_frames: u32,
    /// Score multiplier while Multiplier is active
    pub multiplier_value: u32,
    /// Obstacle speed factor while SlowMotion is active
    pub slow_motion_factor: f32,
    pub coin_rain_count: u32,
    /// Vertical gap between coins in a coin rain burst
    pub coin_rain_spacing: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            shield_frames: 300,
            magnet_frames: 360,
            slow_motion_frames: 300,
            multiplier_frames: 600,
            multiplier_value: 2,
            slow_motion_factor: 0.5,
            coin_rain_count: 5,
            coin_rain_spacing: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelTuning {
    pub base_capacity: f32,
    pub capacity_per_level: f32,
    /// Fuel lost per consumption interval at efficiency level 1
    pub consumption_rate: f32,
    /// Fractional consumption reduction per efficiency level
    pub rate_step: f32,
    /// Consumption never drops below this fraction of the base rate
    pub min_rate_factor: f32,
    /// Seconds between losses at efficiency level 1
    pub base_interval: f32,
    pub interval_step: f32,
    pub min_interval: f32,
    pub can_amount: f32,
    /// Extra fuel per can for each capacity level above 1
    pub can_bonus_per_level: f32,
    /// Score per unit of fuel actually gained from a can
    pub score_per_unit: f32,
    pub low_warning: f32,
    pub critical_warning: f32,
}

impl Default for FuelTuning {
    fn default() -> Self {
        Self {
            base_capacity: 120.0,
            capacity_per_level: 15.0,
            consumption_rate: 1.1,
            rate_step: 0.06,
            min_rate_factor: 0.5,
            base_interval: 0.5,
            interval_step: 0.01,
            min_interval: 0.4,
            can_amount: 20.0,
            can_bonus_per_level: 2.0,
            score_per_unit: 2.0,
            low_warning: 30.0,
            critical_warning: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub base_speed: f32,
    /// Score needed per speed step
    pub speed_interval: u64,
    pub speed_increment: f32,
    pub cap_steps: u64,
    pub max_speed: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            base_speed: 10.0,
            speed_interval: 500,
            speed_increment: 0.5,
            cap_steps: 20,
            max_speed: 22.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub coin_currency: u32,
    pub coin_score: u64,
    pub power_up_score: u64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            coin_currency: 1,
            coin_score: 10,
            power_up_score: 25,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub collision: CollisionTuning,
    pub spawn: SpawnTuning,
    pub power_ups: PowerUpTuning,
    pub fuel: FuelTuning,
    pub difficulty: DifficultyTuning,
    pub scoring: ScoringTuning,
}

impl Tuning {
    /// Parse and validate a tuning override
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or break the tick
    pub fn validate(&self) -> Result<()> {
        let p = &self.player;
        positive("player.width", p.width)?;
        positive("player.height", p.height)?;
        nonzero("player.lane_change_frames", p.lane_change_frames)?;

        let s = &self.spawn;
        nonzero("spawn.obstacle_interval", s.obstacle_interval)?;
        nonzero("spawn.coin_interval", s.coin_interval)?;
        nonzero("spawn.power_up_interval", s.power_up_interval)?;
        nonzero("spawn.fuel_normal.interval", s.fuel_normal.interval)?;
        nonzero("spawn.fuel_low.interval", s.fuel_low.interval)?;
        nonzero("spawn.fuel_critical.interval", s.fuel_critical.interval)?;
        probability("spawn.power_up_chance", s.power_up_chance)?;
        probability("spawn.police_retarget_chance", s.police_retarget_chance)?;
        probability("spawn.fuel_normal.chance", s.fuel_normal.chance)?;
        probability("spawn.fuel_low.chance", s.fuel_low.chance)?;
        probability("spawn.fuel_critical.chance", s.fuel_critical.chance)?;
        weights("spawn.obstacle_weights", &s.obstacle_weights)?;
        weights("spawn.power_up_weights", &s.power_up_weights)?;
        positive("spawn.coin_size", s.coin_size)?;
        positive("spawn.power_up_size", s.power_up_size)?;
        positive("spawn.fuel_can_width", s.fuel_can_width)?;
        positive("spawn.fuel_can_height", s.fuel_can_height)?;

        let u = &self.power_ups;
        nonzero("power_ups.shield_frames", u.shield_frames)?;
        nonzero("power_ups.magnet_frames", u.magnet_frames)?;
        nonzero("power_ups.slow_motion_frames", u.slow_motion_frames)?;
        nonzero("power_ups.multiplier_frames", u.multiplier_frames)?;
        nonzero("power_ups.multiplier_value", u.multiplier_value)?;

        let f = &self.fuel;
        positive("fuel.base_capacity", f.base_capacity)?;
        positive("fuel.min_interval", f.min_interval)?;
        positive("fuel.consumption_rate", f.consumption_rate)?;

        let d = &self.difficulty;
        nonzero("difficulty.speed_interval", d.speed_interval)?;
        if d.max_speed < d.base_speed {
            return Err(Error::InvalidTuning(format!(
                "difficulty.max_speed ({}) is below base_speed ({})",
                d.max_speed, d.base_speed
            )));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    // NaN fails this too
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidTuning(format!("{name} must be positive, got {value}")))
    }
}

fn nonzero<T: Into<u64>>(name: &str, value: T) -> Result<()> {
    if value.into() > 0 {
        Ok(())
    } else {
        Err(Error::InvalidTuning(format!("{name} must be non-zero")))
    }
}

fn probability(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidTuning(format!("{name} must be in [0, 1], got {value}")))
    }
}

fn weights(name: &str, values: &[f32]) -> Result<()> {
    if values.iter().any(|w| !(*w >= 0.0)) {
        return Err(Error::InvalidTuning(format!("{name} has a negative weight")));
    }
    if values.iter().sum::<f32>() <= 0.0 {
        return Err(Error::InvalidTuning(format!("{name} weights sum to zero")));
    }
    Ok(())
}
