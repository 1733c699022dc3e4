use brickfall_engine::{EngineConfig, EngineEvent, GameStats, ShapeSeed, Snapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::script::ScriptCommand;

/// Result of a `simulate` run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRecord {
    /// Timestamp when the run finished (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    pub config: EngineConfig,
    /// Seed actually used for shape generation
    pub seed: ShapeSeed,
    /// Seed of the random input policy
    pub policy_seed: u64,
    /// Number of frames fed to the engine
    pub frames: u64,
    pub frame_ms: u64,
    pub final_stats: GameStats,
    pub final_snapshot: Snapshot,
}

/// Result of a `script` run.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptRecord {
    pub recorded_at: DateTime<Utc>,
    pub config: EngineConfig,
    pub shapes: String,
    pub steps: Vec<ScriptStep>,
    pub final_stats: GameStats,
    pub final_snapshot: Snapshot,
    /// Text picture of the final playfield, top row first
    pub final_board: Vec<String>,
}

/// One executed script line.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptStep {
    /// 1-based line number in the script
    pub line: usize,
    pub command: ScriptCommand,
    /// Whether the engine applied the command
    pub applied: bool,
    /// Set for `wait`, which advances time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EngineEvent>,
}
