//! Game engine logic and state management.
//!
//! This module drives the [`core`](crate::core) data structures through a
//! full game:
//!
//! - [`Engine`] - the tick/command state machine (spawn, fall, lock, clear, score)
//! - [`EngineConfig`] - difficulty, shape seed and horizontal repeat delay
//! - [`Difficulty`] - selects the base fall interval
//! - [`GameStats`] - score, level and line-clear statistics
//! - [`ShapeSource`] - where spawned shapes come from ([`ShapeGenerator`] or
//!   [`ShapeSequence`])
//! - [`MoveRateLimiter`] - debounce for repeated horizontal moves
//! - [`Snapshot`] - serializable view of everything a renderer needs
//!
//! # Game Flow
//!
//! 1. Create an [`Engine`] from an [`EngineConfig`]; the first piece spawns
//!    immediately.
//! 2. Feed elapsed time to [`Engine::tick`]; gravity moves the piece down one
//!    row per fall interval.
//! 3. Apply player commands (move, rotate, soft drop, hard drop, pause).
//! 4. A piece that cannot fall further locks; full rows clear and score.
//! 5. Repeat until a new piece cannot spawn.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use brickfall_engine::{Engine, EngineConfig, EngineEvent, ShapeSequence};
//!
//! let shapes: ShapeSequence = "O".parse().unwrap();
//! let mut engine = Engine::with_shape_source(EngineConfig::default(), shapes).unwrap();
//!
//! assert!(engine.move_left());
//! assert!(engine.hard_drop());
//! assert_eq!(engine.tick(Duration::from_millis(10)), EngineEvent::NoOp);
//! assert_eq!(engine.snapshot().pieces, 1);
//! ```

pub use self::{
    config::*, difficulty::*, game_engine::*, game_stats::*, move_limiter::*, shape_source::*,
    snapshot::*,
};

mod config;
mod difficulty;
mod game_engine;
mod game_stats;
mod move_limiter;
mod serde_millis;
mod shape_source;
mod snapshot;
