//! Simulation state and core types
//!
//! `SimState` is the single source of truth a renderer reads between
//! ticks. Only the tick functions write to it.

use serde::{Deserialize, Serialize};

use super::entity::{BonusKind, Coin, FuelCan, Obstacle, PowerUp};
use super::fuel::{FuelLevel, FuelTank};
use super::player::Player;
use super::powerups::{PowerUpTimers, TimedBonus};
use super::spawn::SpawnCounters;
use crate::tuning::Tuning;
use crate::upgrades::UpgradeParams;

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// False until the host has measured the screen
    pub fn is_laid_out(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not started
    #[default]
    Idle,
    Running,
    /// Terminal; further ticks do nothing
    GameOver,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalEvent {
    /// Frontal collision
    Crashed,
    /// Side collision with no lives left
    OutOfLives,
    /// Steered off the road with no lives left
    WallHit,
    OutOfFuel,
}

/// Final report, emitted once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOver {
    pub event: TerminalEvent,
    pub score: u64,
    pub currency: u32,
    pub ticks: u64,
}

/// Things that happened during the last tick, for audio and effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LaneChangeStarted { lane: i32 },
    /// Non-fatal wall bump
    WallHit { lives_left: u32 },
    /// Non-fatal side-swipe
    SideCollision { lives_left: u32 },
    CoinCollected { count: u32 },
    PowerUpCollected(BonusKind),
    PowerUpExpired(TimedBonus),
    CoinRain { coins: u32 },
    FuelCollected { gained: f32 },
    /// Fuel dropped into a lower warning level
    FuelWarning(FuelLevel),
    GameOver(TerminalEvent),
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub phase: GamePhase,
    pub params: UpgradeParams,
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// Ticks advanced while running
    pub time_ticks: u64,
    pub score: u64,
    /// Coins collected this session
    pub currency: u32,
    pub lives: u32,
    /// Obstacle damage is suppressed while > 0
    pub invulnerability_frames: u32,
    /// Current scroll speed (pixels per tick)
    pub scroll_speed: f32,
    /// Road marking scroll offset in [0, ROAD_MARKING_PERIOD)
    pub road_marking_offset: f32,
    pub player: Player,
    pub power_ups: PowerUpTimers,
    pub fuel: FuelTank,
    pub spawn: SpawnCounters,
    /// Live entities (spawn order)
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub power_up_pickups: Vec<PowerUp>,
    pub fuel_cans: Vec<FuelCan>,
    /// Cleared at the start of every tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl SimState {
    /// A not-yet-started session
    pub fn idle(tuning: Tuning, viewport: Viewport) -> Self {
        let params = UpgradeParams::default();
        Self {
            phase: GamePhase::Idle,
            params,
            tuning,
            viewport,
            time_ticks: 0,
            score: 0,
            currency: 0,
            lives: params.starting_lives(),
            invulnerability_frames: 0,
            scroll_speed: tuning.difficulty.base_speed,
            road_marking_offset: 0.0,
            player: Player::new(&tuning.player, viewport),
            power_ups: PowerUpTimers::new(&tuning.power_ups),
            fuel: FuelTank::from_params(&params, &tuning.fuel),
            spawn: SpawnCounters::default(),
            obstacles: Vec::new(),
            coins: Vec::new(),
            power_up_pickups: Vec::new(),
            fuel_cans: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn shield_active(&self) -> bool {
        self.power_ups.is_active(TimedBonus::Shield)
    }

    pub fn magnet_active(&self) -> bool {
        self.power_ups.is_active(TimedBonus::Magnet)
    }

    pub fn slow_motion_active(&self) -> bool {
        self.power_ups.is_active(TimedBonus::SlowMotion)
    }

    pub fn multiplier_active(&self) -> bool {
        self.power_ups.is_active(TimedBonus::Multiplier)
    }

    /// Either grace gate suppresses obstacle damage
    pub fn damage_suppressed(&self) -> bool {
        self.invulnerability_frames > 0 || self.shield_active()
    }

    pub fn fuel_level(&self) -> FuelLevel {
        self.fuel.level(&self.tuning.fuel)
    }

    pub fn game_over_report(&self, event: TerminalEvent) -> GameOver {
        GameOver {
            event,
            score: self.score,
            currency: self.currency,
            ticks: self.time_ticks,
        }
    }
}
