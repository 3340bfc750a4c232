//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Step
//! order is fixed because later steps read what earlier ones wrote:
//!
//! 0. lane-change intent (a fatal wall hit ends the tick here)
//! 1. fuel accumulator, ending the session on depletion
//! 2. scroll speed from score
//! 3. player locomotion
//! 4. score
//! 5. road markings
//! 6. power-up timers
//! 7. invulnerability countdown
//! 8. spawners
//! 9. obstacles (may end the session)
//! 10. coins
//! 11. power-up pickups
//! 12. fuel cans
//!
//! A session that ends mid-tick keeps the mutations already applied.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Impact, collects, obstacle_impact};
use super::difficulty::scroll_speed;
use super::entity::{BonusKind, Obstacle, ObstacleKind};
use super::fuel::FuelTank;
use super::player::{LaneChange, LaneShift, resting_y};
use super::spawn::{run_spawners, spawn_coin_rain};
use super::state::{GameEvent, GameOver, GamePhase, SimState, TerminalEvent, Viewport};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::upgrades::UpgradeParams;

/// Host input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Lane change intent (from swipe/keys)
    pub lane_change: Option<LaneShift>,
    /// New viewport size after a layout change
    pub viewport: Option<Viewport>,
}

impl TickInput {
    pub fn shift(shift: LaneShift) -> Self {
        Self {
            lane_change: Some(shift),
            ..Default::default()
        }
    }
}

/// Start a fresh running session
pub fn reset(params: UpgradeParams, tuning: Tuning, viewport: Viewport) -> SimState {
    let mut state = SimState::idle(tuning, viewport);
    state.phase = GamePhase::Running;
    state.params = params;
    state.lives = params.starting_lives();
    state.scroll_speed = scroll_speed(0, params.speed_multiplier, &tuning.difficulty);
    state.fuel = FuelTank::from_params(&params, &tuning.fuel);
    log::info!(
        "Session start: lives={}, speed={:.2}, fuel={:.1}/{:.1}",
        state.lives,
        state.scroll_speed,
        state.fuel.current,
        state.fuel.max
    );
    state
}

/// Produce the next state without touching the previous one
pub fn tick<R: Rng + ?Sized>(
    state: &SimState,
    input: &TickInput,
    rng: &mut R,
) -> (SimState, Option<GameOver>) {
    let mut next = state.clone();
    let over = advance(&mut next, input, rng);
    (next, over)
}

/// Advance the state in place by one fixed timestep
///
/// Returns the game-over report on the tick the session ends, and None on
/// every other tick (including ticks after the session has ended).
pub fn advance<R: Rng + ?Sized>(
    state: &mut SimState,
    input: &TickInput,
    rng: &mut R,
) -> Option<GameOver> {
    if !state.is_running() {
        return None;
    }
    state.events.clear();
    if let Some(viewport) = input.viewport {
        state.viewport = viewport;
    }
    // Nothing is positioned until the host knows the screen size
    if !state.viewport.is_laid_out() {
        return None;
    }

    let event = run_steps(state, input, rng)?;
    Some(end_session(state, event))
}

fn run_steps<R: Rng + ?Sized>(
    state: &mut SimState,
    input: &TickInput,
    rng: &mut R,
) -> Option<TerminalEvent> {
    state.time_ticks += 1;

    if let Some(shift) = input.lane_change {
        if let Some(event) = apply_lane_change(state, shift) {
            return Some(event);
        }
    }

    let fuel_before = state.fuel_level();
    if state.fuel.advance(SIM_DT) {
        return Some(TerminalEvent::OutOfFuel);
    }
    let fuel_after = state.fuel_level();
    if fuel_after > fuel_before {
        state.events.push(GameEvent::FuelWarning(fuel_after));
    }

    state.scroll_speed = scroll_speed(
        state.score,
        state.params.speed_multiplier,
        &state.tuning.difficulty,
    );

    state.player.update(&state.tuning.player, state.viewport);

    state.score += state.power_ups.score_multiplier as u64;

    state.road_marking_offset =
        (state.road_marking_offset + state.scroll_speed / 2.0).rem_euclid(ROAD_MARKING_PERIOD);

    for expired in state.power_ups.advance() {
        log::debug!("{:?} expired", expired);
        state.events.push(GameEvent::PowerUpExpired(expired));
    }

    state.invulnerability_frames = state.invulnerability_frames.saturating_sub(1);

    run_spawners(state, rng);

    if let Some(event) = update_obstacles(state, rng) {
        return Some(event);
    }
    update_coins(state);
    update_power_ups(state, rng);
    update_fuel_cans(state);
    None
}

fn end_session(state: &mut SimState, event: TerminalEvent) -> GameOver {
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver(event));
    let report = state.game_over_report(event);
    log::info!(
        "Game over ({:?}): score={}, coins={}, ticks={}",
        event,
        report.score,
        report.currency,
        report.ticks
    );
    report
}

/// Lane change request; boundary violations cost a life like a side hit
fn apply_lane_change(state: &mut SimState, shift: LaneShift) -> Option<TerminalEvent> {
    let result = state
        .player
        .request_lane_change(shift, &state.tuning.player, state.viewport);
    match result {
        LaneChange::Started { lane } => {
            state.events.push(GameEvent::LaneChangeStarted { lane });
            None
        }
        LaneChange::Busy => None,
        LaneChange::BoundaryViolation => {
            if state.damage_suppressed() {
                return None;
            }
            state.lives = state.lives.saturating_sub(1);
            if state.lives == 0 {
                return Some(TerminalEvent::WallHit);
            }
            state.invulnerability_frames = state.tuning.collision.invulnerability_frames;
            log::debug!("Wall hit, {} lives left", state.lives);
            state.events.push(GameEvent::WallHit {
                lives_left: state.lives,
            });
            None
        }
    }
}

/// Police cars drift one lane toward the player while in the upper half
fn steer_police<R: Rng + ?Sized>(
    obstacle: &mut Obstacle,
    player_lane: i32,
    viewport_height: f32,
    chance: f32,
    rng: &mut R,
) {
    let center_y = obstacle.body.pos.y + obstacle.body.size.y / 2.0;
    if obstacle.lane == player_lane || center_y >= viewport_height / 2.0 {
        return;
    }
    if rng.random::<f32>() < chance {
        obstacle.lane += (player_lane - obstacle.lane).signum();
    }
}

fn update_obstacles<R: Rng + ?Sized>(state: &mut SimState, rng: &mut R) -> Option<TerminalEvent> {
    let speed_factor = if state.slow_motion_active() {
        state.tuning.power_ups.slow_motion_factor
    } else {
        1.0
    };
    let viewport = state.viewport;
    let player_lane = state.player.lane;
    let player_rect = state.player.rect();
    let resting_top = resting_y(&state.tuning.player, viewport);
    let depth = state.tuning.collision.frontal_zone_depth;
    let retarget_chance = state.tuning.spawn.police_retarget_chance;

    let mut i = 0;
    while i < state.obstacles.len() {
        let obstacle = &mut state.obstacles[i];
        obstacle.body.descend(obstacle.body.speed * speed_factor);
        if obstacle.kind == ObstacleKind::Police {
            steer_police(obstacle, player_lane, viewport.height, retarget_chance, rng);
        }
        obstacle.body.place_in_lane(obstacle.lane, viewport.width);
        let rect = obstacle.body.rect();
        let off_screen = obstacle.body.is_off_screen(viewport.height);

        if !state.damage_suppressed() {
            match obstacle_impact(&player_rect, resting_top, &rect, depth) {
                Some(Impact::Frontal) => return Some(TerminalEvent::Crashed),
                Some(Impact::Side) => {
                    state.lives = state.lives.saturating_sub(1);
                    if state.lives == 0 {
                        return Some(TerminalEvent::OutOfLives);
                    }
                    state.invulnerability_frames = state.tuning.collision.invulnerability_frames;
                    state.obstacles.remove(i);
                    log::debug!("Side collision, {} lives left", state.lives);
                    state.events.push(GameEvent::SideCollision {
                        lives_left: state.lives,
                    });
                    continue;
                }
                None => {}
            }
        }

        if off_screen {
            state.obstacles.remove(i);
            continue;
        }
        i += 1;
    }
    None
}

fn award_coins(state: &mut SimState, count: u32) {
    if count == 0 {
        return;
    }
    let scoring = state.tuning.scoring;
    state.currency += count * scoring.coin_currency;
    state.score += count as u64 * scoring.coin_score;
    state.events.push(GameEvent::CoinCollected { count });
}

fn update_coins(state: &mut SimState) {
    if state.magnet_active() {
        let count = state.coins.len() as u32;
        state.coins.clear();
        award_coins(state, count);
        return;
    }

    let viewport = state.viewport;
    let player_rect = state.player.rect();
    let mut collected = 0;
    state.coins.retain_mut(|coin| {
        coin.body.descend(coin.body.speed);
        coin.body.place_in_lane(coin.lane, viewport.width);
        if collects(&player_rect, &coin.body.rect()) {
            collected += 1;
            return false;
        }
        !coin.body.is_off_screen(viewport.height)
    });
    award_coins(state, collected);
}

fn update_power_ups<R: Rng + ?Sized>(state: &mut SimState, rng: &mut R) {
    let viewport = state.viewport;
    let player_rect = state.player.rect();
    let mut collected: Vec<BonusKind> = Vec::new();
    state.power_up_pickups.retain_mut(|power_up| {
        power_up.body.descend(power_up.body.speed);
        power_up.body.place_in_lane(power_up.lane, viewport.width);
        if collects(&player_rect, &power_up.body.rect()) {
            collected.push(power_up.kind);
            return false;
        }
        !power_up.body.is_off_screen(viewport.height)
    });

    for kind in collected {
        state.score += state.tuning.scoring.power_up_score;
        state.events.push(GameEvent::PowerUpCollected(kind));
        match kind.timed() {
            Some(bonus) => {
                if state.power_ups.activate(bonus) {
                    log::debug!("{:?} activated", bonus);
                } else {
                    log::debug!("{:?} refreshed", bonus);
                }
            }
            None => {
                let coins = spawn_coin_rain(state, rng);
                log::debug!("Coin rain: {} coins", coins);
                state.events.push(GameEvent::CoinRain { coins });
            }
        }
    }
}

fn update_fuel_cans(state: &mut SimState) {
    let viewport = state.viewport;
    let player_rect = state.player.rect();
    let mut amounts: Vec<f32> = Vec::new();
    state.fuel_cans.retain_mut(|can| {
        can.body.descend(can.body.speed);
        can.body.place_in_lane(can.lane, viewport.width);
        if collects(&player_rect, &can.body.rect()) {
            amounts.push(can.amount);
            return false;
        }
        !can.body.is_off_screen(viewport.height)
    });

    for amount in amounts {
        let gained = state.fuel.refuel(amount);
        state.score += (gained * state.tuning.fuel.score_per_unit).round() as u64;
        log::debug!("Fuel +{:.1} ({:.1}/{:.1})", gained, state.fuel.current, state.fuel.max);
        state.events.push(GameEvent::FuelCollected { gained });
    }
}
