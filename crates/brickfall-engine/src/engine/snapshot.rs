use std::time::Duration;

use serde::Serialize;

use crate::core::{ActivePiece, BOARD_HEIGHT, BOARD_WIDTH, Board, ShapeKind, ShapeMask};

/// Read-only view of the engine, produced by [`Engine::snapshot`](super::Engine::snapshot).
///
/// Holds everything a renderer needs: the settled cells, the falling piece
/// and where it would land, the next shape, and the score panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub board: Board,
    pub active_piece: Option<ActivePiece>,
    /// Landing position of the active piece.
    pub ghost_piece: Option<ActivePiece>,
    pub next_shape: ShapeKind,
    pub next_mask: ShapeMask,
    pub score: u64,
    pub level: u32,
    pub lines: usize,
    pub pieces: usize,
    pub paused: bool,
    pub game_over: bool,
    pub soft_drop: bool,
    #[serde(rename = "fall_interval_ms", with = "super::serde_millis")]
    pub fall_interval: Duration,
    #[serde(rename = "play_time_ms", with = "super::serde_millis")]
    pub play_time: Duration,
}

impl Snapshot {
    /// Renders the playfield as text, top row first.
    ///
    /// Settled cells show their shape letter, the active piece is `@`, its
    /// landing position is `+`, and empty cells are `.`.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        let mut grid: Vec<Vec<char>> = self
            .board
            .rows()
            .map(|row| row.cells().iter().map(|b| b.as_char()).collect())
            .collect();

        let mut paint = |piece: &ActivePiece, ch: char| {
            for (x, y) in piece.occupied_positions() {
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if x < BOARD_WIDTH && y < BOARD_HEIGHT {
                    grid[y][x] = ch;
                }
            }
        };
        if let Some(ghost) = &self.ghost_piece {
            paint(ghost, '+');
        }
        if let Some(active) = &self.active_piece {
            paint(active, '@');
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect())
            .collect()
    }
}
