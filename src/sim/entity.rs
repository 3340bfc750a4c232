//! Scrolling entities: obstacles and pickups
//!
//! Every moving object embeds a `Body` (top-left position, size, downward
//! speed) and a lane. Horizontal position is re-derived from the lane each
//! tick; only `y` is integrated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::lane::lane_center_x;

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }
}

/// Kinematic fields shared by every scrolling entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed in pixels per tick
    pub speed: f32,
}

impl Body {
    /// A body parked just above the viewport
    pub fn above_viewport(size: Vec2, speed: f32) -> Self {
        Self {
            pos: Vec2::new(0.0, -size.y),
            size,
            speed,
        }
    }

    /// Snap x to the center of `lane`
    pub fn place_in_lane(&mut self, lane: i32, viewport_width: f32) {
        self.pos.x = lane_center_x(lane, viewport_width, self.size.x);
    }

    /// Move down by `dy` pixels
    pub fn descend(&mut self, dy: f32) {
        self.pos.y += dy;
    }

    /// Has scrolled past the bottom of the viewport
    pub fn is_off_screen(&self, viewport_height: f32) -> bool {
        self.pos.y > viewport_height
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Obstacle archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    RegularCar,
    /// Long and slow
    Truck,
    /// Narrow and fast
    Motorcycle,
    /// Steers toward the player while in the upper half of the screen
    Police,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::RegularCar,
        ObstacleKind::Truck,
        ObstacleKind::Motorcycle,
        ObstacleKind::Police,
    ];

    /// Hitbox size
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::RegularCar => Vec2::new(60.0, 100.0),
            ObstacleKind::Truck => Vec2::new(72.0, 160.0),
            ObstacleKind::Motorcycle => Vec2::new(40.0, 78.0),
            ObstacleKind::Police => Vec2::new(62.0, 100.0),
        }
    }

    /// Multiple of the scroll speed at spawn time
    pub fn speed_factor(&self) -> f32 {
        match self {
            ObstacleKind::RegularCar => 1.0,
            ObstacleKind::Truck => 0.7,
            ObstacleKind::Motorcycle => 1.3,
            ObstacleKind::Police => 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub lane: i32,
    pub body: Body,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, lane: i32, scroll_speed: f32) -> Self {
        Self {
            id,
            kind,
            lane,
            body: Body::above_viewport(kind.size(), scroll_speed * kind.speed_factor()),
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    Shield,
    Magnet,
    SlowMotion,
    Multiplier,
    /// Instant burst of coins, not a timed effect
    CoinRain,
}

impl BonusKind {
    pub const ALL: [BonusKind; 5] = [
        BonusKind::Shield,
        BonusKind::Magnet,
        BonusKind::SlowMotion,
        BonusKind::Multiplier,
        BonusKind::CoinRain,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub lane: i32,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: BonusKind,
    pub lane: i32,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelCan {
    pub id: u32,
    pub lane: i32,
    pub body: Body,
    /// Fuel restored on pickup (before clamping to capacity)
    pub amount: f32,
}
