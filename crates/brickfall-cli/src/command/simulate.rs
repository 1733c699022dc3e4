use std::time::Duration;

use brickfall_engine::{Engine, EngineEvent, ShapeSource};
use chrono::Utc;
use clap::Args;
use rand::{Rng, SeedableRng as _, rngs::StdRng};

use crate::schema::record::SimulationRecord;

use super::{EngineArg, OutputArg};

#[derive(Debug, Clone, Args)]
pub struct SimulateArg {
    #[clap(flatten)]
    engine: EngineArg,
    /// Maximum number of frames to run before stopping
    #[arg(long, default_value_t = 60_000)]
    max_frames: u64,
    /// Simulated time per frame in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Seed for the random input policy (random when omitted)
    #[arg(long)]
    policy_seed: Option<u64>,
    #[clap(flatten)]
    output: OutputArg,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        engine,
        max_frames,
        frame_ms,
        policy_seed,
        output,
    } = arg;

    let config = engine.load_config()?;
    let policy_seed = policy_seed.unwrap_or_else(|| rand::rng().random());
    let mut engine = Engine::new(config)?;
    tracing::info!(seed = %engine.seed(), policy_seed, "simulation started");

    let mut policy = RandomPolicy::new(policy_seed);
    let frame = Duration::from_millis(*frame_ms);
    let mut frames = 0;
    while frames < *max_frames {
        frames += 1;
        policy.act(&mut engine);
        match engine.tick(frame) {
            EngineEvent::NoOp => {}
            EngineEvent::PieceLocked { lines_cleared } => {
                tracing::debug!(
                    frame = frames,
                    lines_cleared,
                    score = engine.stats().score(),
                    "piece locked"
                );
            }
            EngineEvent::GameOver => break,
        }
    }

    let record = SimulationRecord {
        recorded_at: Utc::now(),
        config,
        seed: engine.seed(),
        policy_seed,
        frames,
        frame_ms: *frame_ms,
        final_stats: engine.stats().clone(),
        final_snapshot: engine.snapshot(),
    };
    tracing::info!(
        frames,
        score = record.final_stats.score(),
        level = record.final_stats.level(),
        lines = record.final_stats.total_cleared_lines(),
        game_over = record.final_snapshot.game_over,
        "simulation finished"
    );
    output.write_record(&record)
}

/// Presses random keys, at most one per frame.
#[derive(Debug)]
struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn act<S>(&mut self, engine: &mut Engine<S>)
    where
        S: ShapeSource,
    {
        match self.rng.random_range(0..100) {
            0..6 => {
                engine.move_left();
            }
            6..12 => {
                engine.move_right();
            }
            12..16 => {
                engine.rotate();
            }
            16..18 => {
                engine.hard_drop();
            }
            18..20 => {
                let held = engine.is_soft_drop_held();
                engine.set_soft_drop(!held);
            }
            _ => {}
        }
    }
}
