//! Spawn scheduling
//!
//! Each entity kind has its own tick counter. When a counter reaches its
//! threshold it resets and one spawn attempt fires. All randomness comes
//! from the RNG passed in, so a seed pins the whole sequence.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Body, BonusKind, Coin, FuelCan, Obstacle, ObstacleKind, PowerUp};
use super::fuel::can_amount;
use super::state::SimState;
use crate::consts::LANE_COUNT;
use crate::tuning::{FuelSpawnBand, SpawnTuning};

/// Per-kind frame counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCounters {
    pub obstacle: u32,
    pub coin: u32,
    pub power_up: u32,
    pub fuel_can: u32,
}

/// Increment `counter`; on reaching `threshold` reset it and return true
fn bump(counter: &mut u32, threshold: u32) -> bool {
    *counter += 1;
    if *counter >= threshold {
        *counter = 0;
        true
    } else {
        false
    }
}

/// Pick an index with probability proportional to its weight
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[f32]) -> usize {
    let total: f32 = weights.iter().sum();
    if weights.is_empty() || total <= 0.0 {
        return 0;
    }
    let mut roll = rng.random::<f32>() * total;
    for (i, &weight) in weights.iter().enumerate() {
        if roll < weight {
            return i;
        }
        roll -= weight;
    }
    // Float rounding can leave a sliver past the last bucket
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

pub fn random_lane<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.random_range(0..LANE_COUNT)
}

pub fn roll_obstacle_kind<R: Rng + ?Sized>(rng: &mut R, tuning: &SpawnTuning) -> ObstacleKind {
    ObstacleKind::ALL[weighted_index(rng, &tuning.obstacle_weights)]
}

pub fn roll_bonus_kind<R: Rng + ?Sized>(rng: &mut R, tuning: &SpawnTuning) -> BonusKind {
    BonusKind::ALL[weighted_index(rng, &tuning.power_up_weights)]
}

/// Fuel-can cadence for the current fuel fraction
pub fn fuel_band(fraction: f32, tuning: &SpawnTuning) -> FuelSpawnBand {
    if fraction < tuning.fuel_critical_fraction {
        tuning.fuel_critical
    } else if fraction < tuning.fuel_low_fraction {
        tuning.fuel_low
    } else {
        tuning.fuel_normal
    }
}

/// Choose a coin lane that is neither the player's lane nor blocked by an
/// obstacle near the top of the screen. None if every attempt is rejected.
pub fn pick_coin_lane<R: Rng + ?Sized>(
    rng: &mut R,
    player_lane: i32,
    obstacles: &[Obstacle],
    tuning: &SpawnTuning,
) -> Option<i32> {
    (0..tuning.coin_attempts).find_map(|_| {
        let lane = random_lane(rng);
        let blocked = lane == player_lane
            || obstacles
                .iter()
                .any(|o| o.lane == lane && o.body.pos.y < tuning.danger_band);
        (!blocked).then_some(lane)
    })
}

/// Run all four spawners for one tick
pub fn run_spawners<R: Rng + ?Sized>(state: &mut SimState, rng: &mut R) {
    let tuning = state.tuning.spawn;

    if bump(&mut state.spawn.obstacle, tuning.obstacle_interval) {
        spawn_obstacle(state, rng);
    }

    if bump(&mut state.spawn.coin, tuning.coin_interval) {
        if let Some(lane) = pick_coin_lane(rng, state.player.lane, &state.obstacles, &tuning) {
            spawn_coin(state, lane, 0.0);
        } else {
            log::trace!("Coin spawn skipped: no open lane");
        }
    }

    if bump(&mut state.spawn.power_up, tuning.power_up_interval)
        && rng.random::<f32>() < tuning.power_up_chance
    {
        let kind = roll_bonus_kind(rng, &tuning);
        spawn_power_up(state, rng, kind);
    }

    let band = fuel_band(state.fuel.fraction(), &tuning);
    if bump(&mut state.spawn.fuel_can, band.interval) && rng.random::<f32>() < band.chance {
        spawn_fuel_can(state, rng);
    }
}

pub fn spawn_obstacle<R: Rng + ?Sized>(state: &mut SimState, rng: &mut R) {
    let lane = random_lane(rng);
    let kind = roll_obstacle_kind(rng, &state.tuning.spawn);
    let id = state.next_entity_id();
    let mut obstacle = Obstacle::new(id, kind, lane, state.scroll_speed);
    obstacle.body.place_in_lane(lane, state.viewport.width);
    log::trace!("Spawned {:?} #{} in lane {}", kind, id, lane);
    state.obstacles.push(obstacle);
}

/// Spawn a coin in `lane`, raised `lift` pixels above the usual entry point
pub fn spawn_coin(state: &mut SimState, lane: i32, lift: f32) {
    let size = state.tuning.spawn.coin_size;
    let mut body = Body::above_viewport(Vec2::splat(size), state.scroll_speed);
    body.pos.y -= lift;
    body.place_in_lane(lane, state.viewport.width);
    let id = state.next_entity_id();
    state.coins.push(Coin { id, lane, body });
}

/// Burst of coins at random lanes, stacked upward so they don't overlap
pub fn spawn_coin_rain<R: Rng + ?Sized>(state: &mut SimState, rng: &mut R) -> u32 {
    let count = state.tuning.power_ups.coin_rain_count;
    let spacing = state.tuning.power_ups.coin_rain_spacing;
    for i in 0..count {
        let lane = random_lane(rng);
        spawn_coin(state, lane, i as f32 * spacing);
    }
    count
}

fn spawn_power_up<R: Rng + ?Sized>(state: &mut SimState, rng: &mut R, kind: BonusKind) {
    let lane = random_lane(rng);
    let size = state.tuning.spawn.power_up_size;
    let mut body = Body::above_viewport(Vec2::splat(size), state.scroll_speed);
    body.place_in_lane(lane, state.viewport.width);
    let id = state.next_entity_id();
    log::trace!("Spawned {:?} power-up #{} in lane {}", kind, id, lane);
    state.power_up_pickups.push(PowerUp { id, kind, lane, body });
}

fn spawn_fuel_can<R: Rng + ?Sized>(state: &mut SimState, rng: &mut R) {
    let lane = random_lane(rng);
    let tuning = &state.tuning;
    let size = Vec2::new(tuning.spawn.fuel_can_width, tuning.spawn.fuel_can_height);
    let amount = can_amount(state.params.fuel_capacity_level, &tuning.fuel);
    let mut body = Body::above_viewport(size, state.scroll_speed);
    body.place_in_lane(lane, state.viewport.width);
    let id = state.next_entity_id();
    log::trace!("Spawned fuel can #{} in lane {}", id, lane);
    state.fuel_cans.push(FuelCan {
        id,
        lane,
        body,
        amount,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> SimState {
        SimState::idle(Tuning::default(), Viewport::new(300.0, 600.0))
    }

    fn obstacle_at(lane: i32, y: f32) -> Obstacle {
        let mut o = Obstacle::new(0, ObstacleKind::RegularCar, lane, 10.0);
        o.body.pos.y = y;
        o
    }

    #[test]
    fn test_bump_resets_at_threshold() {
        let mut counter = 0;
        let fired: Vec<bool> = (0..6).map(|_| bump(&mut counter, 3)).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true]);
    }

    #[test]
    fn test_weighted_index_respects_zero_weights() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(weighted_index(&mut rng, &[0.0, 1.0, 0.0]), 1);
        }
    }

    #[test]
    fn test_weighted_index_distribution() {
        let mut rng = Pcg32::seed_from_u64(42);
        let weights = Tuning::default().spawn.obstacle_weights;
        let mut counts = [0u32; 4];
        for _ in 0..20_000 {
            counts[weighted_index(&mut rng, &weights)] += 1;
        }
        // RegularCar ~50 %
        assert!((9_000..11_000).contains(&counts[0]), "{counts:?}");
        assert!((3_400..4_600).contains(&counts[1]), "{counts:?}");
    }

    #[test]
    fn test_coin_lane_avoids_player_and_danger_band() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = SpawnTuning::default();
        // Player in lane 1, lane 0 blocked near the top: only lane 2 is open
        let obstacles = vec![obstacle_at(0, 50.0)];
        for _ in 0..200 {
            if let Some(lane) = pick_coin_lane(&mut rng, 1, &obstacles, &tuning) {
                assert_eq!(lane, 2);
            }
        }
    }

    #[test]
    fn test_coin_lane_ignores_obstacles_below_band() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = SpawnTuning::default();
        let obstacles = vec![obstacle_at(0, 400.0)];
        let lanes: Vec<_> = (0..200)
            .filter_map(|_| pick_coin_lane(&mut rng, 1, &obstacles, &tuning))
            .collect();
        assert!(lanes.contains(&0));
        assert!(!lanes.contains(&1));
    }

    #[test]
    fn test_coin_lane_gives_up_when_blocked() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = SpawnTuning::default();
        let obstacles = vec![obstacle_at(0, -50.0), obstacle_at(2, 10.0)];
        assert_eq!(pick_coin_lane(&mut rng, 1, &obstacles, &tuning), None);
    }

    #[test]
    fn test_fuel_band_scales_with_fraction() {
        let tuning = SpawnTuning::default();
        assert_eq!(fuel_band(0.9, &tuning), tuning.fuel_normal);
        assert_eq!(fuel_band(0.3, &tuning), tuning.fuel_low);
        assert_eq!(fuel_band(0.1, &tuning), tuning.fuel_critical);
        assert!(tuning.fuel_critical.interval < tuning.fuel_low.interval);
        assert!(tuning.fuel_critical.chance > tuning.fuel_low.chance);
    }

    #[test]
    fn test_obstacle_spawns_on_interval() {
        let mut state = state();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..state.tuning.spawn.obstacle_interval - 1 {
            run_spawners(&mut state, &mut rng);
        }
        assert!(state.obstacles.is_empty());
        run_spawners(&mut state, &mut rng);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn.obstacle, 0);

        let obstacle = &state.obstacles[0];
        assert_eq!(obstacle.body.pos.y, -obstacle.body.size.y);
        let expected = state.scroll_speed * obstacle.kind.speed_factor();
        assert!((obstacle.body.speed - expected).abs() < 1e-5);
    }

    /// Idle state with only the fuel-can and power-up spawners live
    fn pickup_only_state() -> SimState {
        let mut state = state();
        let spawn = &mut state.tuning.spawn;
        spawn.obstacle_interval = 1_000_000;
        spawn.coin_interval = 1_000_000;
        spawn.power_up_chance = 1.0;
        spawn.fuel_normal.chance = 1.0;
        spawn.fuel_low.chance = 1.0;
        spawn.fuel_critical.chance = 1.0;
        state
    }

    #[test]
    fn test_critical_fuel_uses_fast_cadence() {
        let mut state = pickup_only_state();
        state.tuning.spawn.power_up_interval = 1_000_000;
        state.fuel.current = state.fuel.max * 0.1;
        let interval = state.tuning.spawn.fuel_critical.interval;
        let mut rng = Pcg32::seed_from_u64(17);

        for _ in 0..interval - 1 {
            run_spawners(&mut state, &mut rng);
        }
        assert!(state.fuel_cans.is_empty());
        run_spawners(&mut state, &mut rng);
        assert_eq!(state.fuel_cans.len(), 1);
        assert_eq!(state.spawn.fuel_can, 0);

        for _ in 0..interval * 2 {
            run_spawners(&mut state, &mut rng);
        }
        assert_eq!(state.fuel_cans.len(), 3);
        assert!(state.fuel_cans.iter().all(|c| c.amount == 20.0));
    }

    #[test]
    fn test_full_tank_waits_for_normal_cadence() {
        let mut state = pickup_only_state();
        state.tuning.spawn.power_up_interval = 1_000_000;
        let mut rng = Pcg32::seed_from_u64(19);
        for _ in 0..state.tuning.spawn.fuel_critical.interval {
            run_spawners(&mut state, &mut rng);
        }
        assert!(state.fuel_cans.is_empty());
        for _ in state.tuning.spawn.fuel_critical.interval..state.tuning.spawn.fuel_normal.interval {
            run_spawners(&mut state, &mut rng);
        }
        assert_eq!(state.fuel_cans.len(), 1);
    }

    #[test]
    fn test_power_up_spawner_follows_weights() {
        let mut state = pickup_only_state();
        state.tuning.spawn.fuel_normal.interval = 1_000_000;
        let interval = state.tuning.spawn.power_up_interval;
        let mut rng = Pcg32::seed_from_u64(23);

        for _ in 0..interval - 1 {
            run_spawners(&mut state, &mut rng);
        }
        assert!(state.power_up_pickups.is_empty());

        let spawns = 2_000;
        for _ in 0..interval * spawns - (interval - 1) {
            run_spawners(&mut state, &mut rng);
        }
        assert_eq!(state.power_up_pickups.len(), spawns as usize);
        let count = |kind: BonusKind| {
            state
                .power_up_pickups
                .iter()
                .filter(|p| p.kind == kind)
                .count()
        };
        // Shield 30 %, CoinRain 10 %
        assert!((520..680).contains(&count(BonusKind::Shield)));
        assert!((140..260).contains(&count(BonusKind::CoinRain)));
        assert!(state.power_up_pickups.iter().all(|p| (0..LANE_COUNT).contains(&p.lane)));
    }

    #[test]
    fn test_coin_rain_stacks_coins() {
        let mut state = state();
        let mut rng = Pcg32::seed_from_u64(11);
        let count = spawn_coin_rain(&mut state, &mut rng);
        assert_eq!(count, 5);
        assert_eq!(state.coins.len(), 5);
        let size = state.tuning.spawn.coin_size;
        for (i, coin) in state.coins.iter().enumerate() {
            assert_eq!(coin.body.pos.y, -size - i as f32 * 60.0);
        }
    }

    #[test]
    fn test_fuel_cans_use_upgrade_amount() {
        let mut state = state();
        state.params.fuel_capacity_level = 3;
        let mut rng = Pcg32::seed_from_u64(13);
        spawn_fuel_can(&mut state, &mut rng);
        assert_eq!(state.fuel_cans[0].amount, 24.0);
    }
}
