//! Fuel consumption
//!
//! Consumption runs off a real-time accumulator: each tick adds its frame
//! duration, and every full interval drains a fixed amount. A long frame
//! drains several intervals at once.

use serde::{Deserialize, Serialize};

use crate::tuning::FuelTuning;
use crate::upgrades::UpgradeParams;

/// Smallest interval the accumulator will run with
const MIN_CONSUMPTION_INTERVAL: f32 = 1e-3;

/// HUD warning level, ordered from full to nearly empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FuelLevel {
    Normal,
    Low,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelTank {
    pub current: f32,
    pub max: f32,
    /// Fuel lost per interval
    pub consumption_rate: f32,
    /// Seconds between losses
    pub interval: f32,
    /// Accumulated seconds since the last loss
    pub timer: f32,
    pub depleted: bool,
}

impl FuelTank {
    /// A full tank
    pub fn new(max: f32, consumption_rate: f32, interval: f32) -> Self {
        Self {
            current: max,
            max,
            consumption_rate,
            interval: interval.max(MIN_CONSUMPTION_INTERVAL),
            timer: 0.0,
            depleted: false,
        }
    }

    pub fn from_params(params: &UpgradeParams, tuning: &FuelTuning) -> Self {
        Self::new(
            capacity(params.fuel_capacity_level, tuning),
            consumption_rate(params.engine_efficiency_level, tuning),
            consumption_interval(params.engine_efficiency_level, tuning),
        )
    }

    /// Accumulate `dt` seconds and drain every full interval.
    /// Returns true once the tank is empty.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.depleted {
            return true;
        }
        self.timer += dt;
        while self.timer >= self.interval {
            self.current -= self.consumption_rate;
            self.timer -= self.interval;
            if self.current <= 0.0 {
                break;
            }
        }
        if self.current <= 0.0 {
            self.current = 0.0;
            self.depleted = true;
        }
        self.depleted
    }

    /// Add fuel up to capacity, returning the amount actually gained
    pub fn refuel(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn level(&self, tuning: &FuelTuning) -> FuelLevel {
        if self.current < tuning.critical_warning {
            FuelLevel::Critical
        } else if self.current < tuning.low_warning {
            FuelLevel::Low
        } else {
            FuelLevel::Normal
        }
    }
}

/// Tank size for a capacity level
pub fn capacity(level: u32, tuning: &FuelTuning) -> f32 {
    tuning.base_capacity + tuning.capacity_per_level * level.saturating_sub(1) as f32
}

/// Fuel lost per interval for an efficiency level
pub fn consumption_rate(efficiency_level: u32, tuning: &FuelTuning) -> f32 {
    let factor = 1.0 - tuning.rate_step * efficiency_level.saturating_sub(1) as f32;
    tuning.consumption_rate * factor.max(tuning.min_rate_factor)
}

/// Seconds between losses for an efficiency level, floored at `min_interval`
pub fn consumption_interval(efficiency_level: u32, tuning: &FuelTuning) -> f32 {
    let interval =
        tuning.base_interval - tuning.interval_step * efficiency_level.saturating_sub(1) as f32;
    interval.max(tuning.min_interval)
}

/// Fuel restored by one can at a capacity level
pub fn can_amount(capacity_level: u32, tuning: &FuelTuning) -> f32 {
    tuning.can_amount + tuning.can_bonus_per_level * capacity_level.saturating_sub(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_drains_on_interval() {
        let mut tank = FuelTank::new(10.0, 1.0, 0.25);
        assert!(!tank.advance(0.125));
        assert_eq!(tank.current, 10.0);
        assert!(!tank.advance(0.125));
        assert_eq!(tank.current, 9.0);
        assert_eq!(tank.timer, 0.0);
    }

    #[test]
    fn test_hitch_drains_multiple_intervals() {
        let mut tank = FuelTank::new(10.0, 1.0, 0.25);
        tank.advance(1.0);
        assert_eq!(tank.current, 6.0);
    }

    #[test]
    fn test_overdraw_clamps_and_depletes() {
        let mut tank = FuelTank::new(10.0, 1.5, 0.25);
        tank.current = 1.0;
        assert!(tank.advance(0.25));
        assert_eq!(tank.current, 0.0);
        assert!(tank.depleted);
    }

    #[test]
    fn test_refuel_caps_at_max() {
        let mut tank = FuelTank::new(120.0, 1.1, 0.5);
        tank.current = 110.0;
        assert_eq!(tank.refuel(20.0), 10.0);
        assert_eq!(tank.current, 120.0);
    }

    #[test]
    fn test_upgrade_formulas() {
        let t = FuelTuning::default();
        assert_eq!(capacity(1, &t), 120.0);
        assert_eq!(capacity(3, &t), 150.0);
        assert_eq!(consumption_interval(1, &t), 0.5);
        assert!(consumption_interval(5, &t) < consumption_interval(1, &t));
        assert_eq!(consumption_interval(100, &t), t.min_interval);
        assert!(consumption_rate(10, &t) < consumption_rate(1, &t));
        assert_eq!(consumption_rate(100, &t), t.consumption_rate * t.min_rate_factor);
        assert_eq!(can_amount(1, &t), 20.0);
        assert_eq!(can_amount(4, &t), 26.0);
    }

    #[test]
    fn test_warning_levels() {
        let t = FuelTuning::default();
        let mut tank = FuelTank::new(120.0, 1.1, 0.5);
        assert_eq!(tank.level(&t), FuelLevel::Normal);
        tank.current = 25.0;
        assert_eq!(tank.level(&t), FuelLevel::Low);
        tank.current = 5.0;
        assert_eq!(tank.level(&t), FuelLevel::Critical);
    }

    proptest! {
        #[test]
        fn prop_never_negative(
            start in 0.1f32..50.0,
            rate in 0.1f32..10.0,
            steps in proptest::collection::vec(0.0f32..0.2, 1..400),
        ) {
            let mut tank = FuelTank::new(50.0, rate, 0.1);
            tank.current = start;
            let mut drained = 0.0f32;
            for dt in steps {
                let prev_drained = drained;
                tank.advance(dt);
                prop_assert!(tank.current >= 0.0);
                drained = start - tank.current;
                prop_assert!(drained >= prev_drained);
                prop_assert_eq!(tank.depleted, tank.current == 0.0);
            }
        }
    }
}
