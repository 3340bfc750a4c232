//! Timed power-up effects
//!
//! Four independent countdowns. Collecting a power-up that is already
//! running refreshes it to full duration; it never stacks.

use serde::{Deserialize, Serialize};

use super::entity::BonusKind;
use crate::tuning::PowerUpTuning;

/// Power-ups that run on a timer (CoinRain is instant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedBonus {
    Shield,
    Magnet,
    SlowMotion,
    Multiplier,
}

impl TimedBonus {
    pub const ALL: [TimedBonus; 4] = [
        TimedBonus::Shield,
        TimedBonus::Magnet,
        TimedBonus::SlowMotion,
        TimedBonus::Multiplier,
    ];
}

impl BonusKind {
    pub fn timed(&self) -> Option<TimedBonus> {
        match self {
            BonusKind::Shield => Some(TimedBonus::Shield),
            BonusKind::Magnet => Some(TimedBonus::Magnet),
            BonusKind::SlowMotion => Some(TimedBonus::SlowMotion),
            BonusKind::Multiplier => Some(TimedBonus::Multiplier),
            BonusKind::CoinRain => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub active: bool,
    pub remaining: u32,
    pub duration: u32,
}

impl Timer {
    pub fn new(duration: u32) -> Self {
        Self {
            active: false,
            remaining: 0,
            duration,
        }
    }

    /// Start or refresh. Returns true on a fresh activation.
    pub fn activate(&mut self) -> bool {
        let fresh = !self.active;
        self.active = true;
        self.remaining = self.duration;
        fresh
    }

    /// Count down one tick. Returns true on the tick the timer expires.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTimers {
    pub shield: Timer,
    pub magnet: Timer,
    pub slow_motion: Timer,
    pub multiplier: Timer,
    /// Per-tick score increment
    pub score_multiplier: u32,
    multiplier_value: u32,
}

impl PowerUpTimers {
    pub fn new(tuning: &PowerUpTuning) -> Self {
        Self {
            shield: Timer::new(tuning.shield_frames),
            magnet: Timer::new(tuning.magnet_frames),
            slow_motion: Timer::new(tuning.slow_motion_frames),
            multiplier: Timer::new(tuning.multiplier_frames),
            score_multiplier: 1,
            multiplier_value: tuning.multiplier_value,
        }
    }

    pub fn timer(&self, bonus: TimedBonus) -> &Timer {
        match bonus {
            TimedBonus::Shield => &self.shield,
            TimedBonus::Magnet => &self.magnet,
            TimedBonus::SlowMotion => &self.slow_motion,
            TimedBonus::Multiplier => &self.multiplier,
        }
    }

    fn timer_mut(&mut self, bonus: TimedBonus) -> &mut Timer {
        match bonus {
            TimedBonus::Shield => &mut self.shield,
            TimedBonus::Magnet => &mut self.magnet,
            TimedBonus::SlowMotion => &mut self.slow_motion,
            TimedBonus::Multiplier => &mut self.multiplier,
        }
    }

    pub fn is_active(&self, bonus: TimedBonus) -> bool {
        self.timer(bonus).active
    }

    /// Activate or refresh. Returns true on a fresh activation.
    pub fn activate(&mut self, bonus: TimedBonus) -> bool {
        let fresh = self.timer_mut(bonus).activate();
        if fresh && bonus == TimedBonus::Multiplier {
            self.score_multiplier = self.multiplier_value;
        }
        fresh
    }

    /// Count every active timer down one tick, returning what expired
    pub fn advance(&mut self) -> Vec<TimedBonus> {
        let mut expired = Vec::new();
        for bonus in TimedBonus::ALL {
            if self.timer_mut(bonus).tick() {
                if bonus == TimedBonus::Multiplier {
                    self.score_multiplier = 1;
                }
                expired.push(bonus);
            }
        }
        expired
    }
}
