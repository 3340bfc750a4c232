//! Host-facing session wrapper
//!
//! Owns the seeded RNG alongside the state so a host only has to feed
//! inputs. Replaying the same seed and inputs reproduces a run exactly.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::{GameOver, SimState, Viewport};
use super::tick::{TickInput, advance, reset};
use crate::tuning::Tuning;
use crate::upgrades::UpgradeParams;

#[derive(Debug, Clone)]
pub struct Session {
    seed: u64,
    rng: Pcg32,
    state: SimState,
    result: Option<GameOver>,
}

impl Session {
    /// A session waiting for `reset`
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            state: SimState::idle(tuning, viewport),
            result: None,
        }
    }

    /// Start a run, reseeding the RNG so runs replay from the same seed
    pub fn reset(&mut self, params: UpgradeParams) -> &SimState {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.state = reset(params, self.state.tuning, self.state.viewport);
        self.result = None;
        &self.state
    }

    /// Change the seed used by the next `reset`
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Advance one fixed step. Returns the report on the tick the run ends.
    pub fn tick(&mut self, input: &TickInput) -> Option<GameOver> {
        let over = advance(&mut self.state, input, &mut self.rng);
        if over.is_some() {
            self.result = over;
        }
        over
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Final report of the last finished run
    pub fn result(&self) -> Option<GameOver> {
        self.result
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
