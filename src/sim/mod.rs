//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod fuel;
pub mod lane;
pub mod player;
pub mod powerups;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Impact, aabb_overlap, classify_impact, collects, obstacle_impact};
pub use difficulty::scroll_speed;
pub use entity::{BonusKind, Body, Coin, FuelCan, Obstacle, ObstacleKind, PowerUp, Rect};
pub use fuel::{FuelLevel, FuelTank};
pub use lane::{clamp_lane, is_valid_lane, lane_center_x};
pub use player::{LaneChange, LaneShift, Locomotion, Player};
pub use powerups::{PowerUpTimers, TimedBonus, Timer};
pub use session::Session;
pub use spawn::SpawnCounters;
pub use state::{GameEvent, GameOver, GamePhase, SimState, TerminalEvent, Viewport};
pub use tick::{TickInput, advance, reset, tick};
