//! Falling-block puzzle engine.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - immutable shape templates, the board grid, the falling piece
//!   and the collision test that ties them together.
//! - [`engine`] - the tick/command driven state machine that spawns, drops,
//!   locks and scores pieces.
//!
//! The engine performs no I/O and has no notion of wall-clock time; the host
//! feeds it elapsed durations and player commands, and reads back a
//! [`Snapshot`] to draw.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Returned when a difficulty name is not one of `easy`, `medium` or `hard`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown difficulty `{name}` (expected easy, medium or hard)")]
pub struct ParseDifficultyError {
    #[error(not(source))]
    name: String,
}

impl ParseDifficultyError {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("move repeat delay must not exceed {max_ms}ms, got {got_ms}ms")]
    MoveRepeatDelayTooLong { max_ms: u128, got_ms: u128 },
    #[display("prepared board already has complete rows: {rows:?}")]
    CompleteRowsOnBoard {
        #[error(not(source))]
        rows: Vec<usize>,
    },
}

/// Returned when a textual board picture cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board picture has {got} rows, at most {max} allowed")]
    TooManyRows { max: usize, got: usize },
    #[display("row {row} has {got} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[display("unexpected character {ch:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, ch: char },
}

/// Rejected fixed shape sequence.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ShapeSequenceError {
    #[display("shape sequence must not be empty")]
    Empty,
    #[display("unknown shape {ch:?} (expected one of I, O, T, Z, S)")]
    InvalidShape {
        #[error(not(source))]
        ch: char,
    },
}
