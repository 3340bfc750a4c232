//! Lane Rush entry point
//!
//! Headless demo host: plays a few seeded sessions with a simple dodging
//! autopilot and prints the resulting leaderboard as JSON.
//!
//! Usage: `lane-rush [seed] [runs] [max_ticks]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use lane_rush::consts::MAX_LANE;
    use lane_rush::highscores::RunRecord;
    use lane_rush::sim::{LaneShift, Session, SimState, TickInput, Viewport};
    use lane_rush::{HighScores, Result, Tuning, UpgradeKind, UpgradeLevels};

    const VIEWPORT: Viewport = Viewport {
        width: 360.0,
        height: 640.0,
    };

    /// How far above the player an obstacle counts as a threat
    const LOOKAHEAD: f32 = 260.0;

    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
        let runs: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5);
        let max_ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60 * 5);

        let tuning = Tuning::default();
        tuning.validate()?;

        let mut levels = UpgradeLevels::default();
        let mut wallet = 0u32;
        let mut scores = HighScores::new();

        for i in 0..runs {
            let mut session = Session::new(seed.wrapping_add(i), tuning, VIEWPORT);
            session.reset(levels.to_params());

            while session.result().is_none() && session.state().time_ticks < max_ticks {
                let input = autopilot(session.state());
                session.tick(&input);
            }

            let state = session.state();
            let record = match session.result() {
                Some(over) => RunRecord::from(over),
                None => {
                    log::info!("Run {} hit the tick limit", i + 1);
                    continue;
                }
            };
            log::info!(
                "Run {}: {:?} after {} ticks, score {}, coins {}, fuel {:.1}",
                i + 1,
                record.event,
                state.time_ticks,
                record.score,
                record.currency,
                state.fuel.current
            );
            scores.add(record);

            wallet += record.currency;
            wallet = spend(&mut levels, wallet);
        }

        println!("{}", scores.to_json()?);
        Ok(())
    }

    /// Buy the cheapest affordable upgrade until the wallet runs dry
    fn spend(levels: &mut UpgradeLevels, mut wallet: u32) -> u32 {
        loop {
            let cheapest = UpgradeKind::ALL
                .into_iter()
                .filter_map(|kind| levels.price(kind).map(|price| (kind, price)))
                .min_by_key(|&(_, price)| price);
            let Some((kind, _)) = cheapest else {
                return wallet;
            };
            match levels.purchase(kind, wallet) {
                Ok(left) => wallet = left,
                Err(e) => {
                    log::debug!("Upgrade skipped: {e}");
                    return wallet;
                }
            }
        }
    }

    /// Steer away from the nearest obstacle ahead in the current lane
    fn autopilot(state: &SimState) -> TickInput {
        if state.player.is_transitioning() {
            return TickInput::default();
        }
        let lane = state.player.lane;
        let player_top = state.player.visual.y;
        let blocked = |l: i32| {
            state.obstacles.iter().any(|o| {
                o.lane == l
                    && o.body.pos.y + o.body.size.y > player_top - LOOKAHEAD
                    && o.body.pos.y < player_top + state.player.size.y
            })
        };
        if !blocked(lane) {
            return TickInput::default();
        }
        let shift = if lane > 0 && !blocked(lane - 1) {
            LaneShift::Left
        } else if lane < MAX_LANE && !blocked(lane + 1) {
            LaneShift::Right
        } else {
            return TickInput::default();
        };
        TickInput::shift(shift)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Rush (native) starting...");
    if let Err(e) = demo::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on wasm32
}
