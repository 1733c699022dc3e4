use std::fmt;

use arrayvec::ArrayVec;
use serde::{Serialize, Serializer};

use crate::ParseBoardError;

use super::shape::{ShapeKind, ShapeMask};

/// Board width in cells.
pub const BOARD_WIDTH: usize = 10;
/// Board height in cells.
pub const BOARD_HEIGHT: usize = 20;

/// A single board cell.
///
/// Filled cells remember which shape settled there so a renderer can color
/// them; game logic only looks at occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Block {
    #[default]
    Empty,
    Filled(ShapeKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Block::Empty => '.',
            Block::Filled(kind) => kind.as_char(),
        }
    }
}

/// One row of the board, always exactly [`BOARD_WIDTH`] cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardRow {
    cells: [Block; BOARD_WIDTH],
}

impl BoardRow {
    pub const EMPTY: Self = Self {
        cells: [Block::Empty; BOARD_WIDTH],
    };

    #[must_use]
    pub fn cells(&self) -> &[Block; BOARD_WIDTH] {
        &self.cells
    }

    /// A row is complete when every cell is filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|b| b.is_filled())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|b| b.is_empty())
    }

    fn to_line(self) -> String {
        self.cells.iter().map(|b| b.as_char()).collect()
    }
}

/// The settled-cell grid.
///
/// Rows are indexed from the top (row 0) down to row [`BOARD_HEIGHT`]` - 1`.
/// The board always holds exactly [`BOARD_HEIGHT`] rows: clearing removes a
/// row and pushes a fresh empty row in at the top.
///
/// # Example
///
/// ```
/// use brickfall_engine::{Board, ShapeKind};
///
/// let mut board = Board::new();
/// board.lock(ShapeKind::O, &ShapeKind::O.mask(), 0, 18);
/// assert_eq!(board.clear_lines(), 0);
/// assert_eq!(board.filled_cell_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: ArrayVec<BoardRow, BOARD_HEIGHT>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: std::iter::repeat_n(BoardRow::EMPTY, BOARD_HEIGHT).collect(),
        }
    }

    /// Builds a board from a picture of its bottom rows.
    ///
    /// Each line is one row of exactly [`BOARD_WIDTH`] characters: `.` for an
    /// empty cell, `#` or a shape letter for a filled one. The last line is
    /// the bottom row; rows not given are empty.
    ///
    /// # Example
    ///
    /// ```
    /// use brickfall_engine::Board;
    ///
    /// let board = Board::from_rows(&["#########."]).unwrap();
    /// assert!(board.is_filled(0, 19));
    /// assert!(!board.is_filled(9, 19));
    /// ```
    pub fn from_rows<S>(lines: &[S]) -> Result<Self, ParseBoardError>
    where
        S: AsRef<str>,
    {
        if lines.len() > BOARD_HEIGHT {
            return Err(ParseBoardError::TooManyRows {
                max: BOARD_HEIGHT,
                got: lines.len(),
            });
        }

        let mut board = Self::new();
        let top = BOARD_HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let width = line.chars().count();
            if width != BOARD_WIDTH {
                return Err(ParseBoardError::RowWidth {
                    row: i,
                    expected: BOARD_WIDTH,
                    got: width,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let block = match ch {
                    '.' => Block::Empty,
                    '#' => Block::Filled(ShapeKind::O),
                    c => Block::Filled(
                        ShapeKind::from_char(c)
                            .ok_or(ParseBoardError::InvalidCell { row: i, col, ch: c })?,
                    ),
                };
                board.rows[top + i].cells[col] = block;
            }
        }
        Ok(board)
    }

    /// Returns the block at `(x, y)`, or `None` outside the board.
    #[must_use]
    pub fn block(&self, x: usize, y: usize) -> Option<Block> {
        self.rows.get(y)?.cells.get(x).copied()
    }

    /// Returns whether `(x, y)` lies on the board and is filled.
    #[must_use]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.block(x, y).is_some_and(Block::is_filled)
    }

    /// Returns whether `(x, y)` lies on the board and is empty.
    #[must_use]
    pub fn is_empty_at(&self, x: usize, y: usize) -> bool {
        self.block(x, y).is_some_and(Block::is_empty)
    }

    /// Overwrites a single cell. Coordinates outside the board are ignored.
    pub fn set_block(&mut self, x: usize, y: usize, block: Block) {
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.cells.get_mut(x)) {
            *cell = block;
        }
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &BoardRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn row(&self, y: usize) -> Option<&BoardRow> {
        self.rows.get(y)
    }

    #[must_use]
    pub fn filled_cell_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|b| b.is_filled())
            .count()
    }

    /// Indices of rows that are currently complete, top to bottom.
    #[must_use]
    pub fn complete_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_complete())
            .map(|(y, _)| y)
            .collect()
    }

    /// Merges a mask anchored at `(x, y)` into the board.
    ///
    /// Cells that land above the top edge have no storage and are dropped;
    /// the number of dropped cells is returned. Callers validate placements
    /// with [`can_place`](super::can_place) first, so cells never land beside
    /// or below the board.
    pub fn lock(&mut self, kind: ShapeKind, mask: &ShapeMask, x: i32, y: i32) -> usize {
        let mut dropped = 0;
        for (dx, dy) in mask.occupied_offsets() {
            let (Ok(col), Ok(row)) = (usize::try_from(x + dx), usize::try_from(y + dy)) else {
                dropped += 1;
                continue;
            };
            debug_assert!(col < BOARD_WIDTH && row < BOARD_HEIGHT);
            self.set_block(col, row, Block::Filled(kind));
        }
        dropped
    }

    /// Removes every complete row and returns how many were removed.
    ///
    /// Rows are scanned from the bottom up. When a complete row is removed,
    /// everything above it shifts down one row and an empty row is inserted at
    /// the top, so the same index is examined again before the scan moves up.
    /// This handles adjacent and non-adjacent complete rows in one pass.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = BOARD_HEIGHT;
        while y > 0 {
            let row = y - 1;
            if self.rows[row].is_complete() {
                self.rows.remove(row);
                self.rows.insert(0, BoardRow::EMPTY);
                cleared += 1;
                // `row` now holds what was above it: check it again.
                continue;
            }
            y -= 1;
        }
        debug_assert_eq!(self.rows.len(), BOARD_HEIGHT);
        cleared
    }
}

/// Renders the board as `BOARD_HEIGHT` lines of `.` and shape letters.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            f.write_str(&row.to_line())?;
        }
        Ok(())
    }
}

/// Serialized as a list of row strings, top row first.
impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.rows.iter().map(|row| row.to_line()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: usize) {
        for x in 0..BOARD_WIDTH {
            board.set_block(x, y, Block::Filled(ShapeKind::I));
        }
    }

    #[test]
    fn test_initial_board() {
        let board = Board::new();
        assert_eq!(board.rows().len(), BOARD_HEIGHT);
        assert!(board.rows().all(BoardRow::is_empty));
        assert_eq!(board.filled_cell_count(), 0);
    }

    #[test]
    fn test_block_out_of_bounds() {
        let board = Board::new();
        assert_eq!(board.block(0, 0), Some(Block::Empty));
        assert_eq!(board.block(BOARD_WIDTH, 0), None);
        assert_eq!(board.block(0, BOARD_HEIGHT), None);
        assert!(!board.is_empty_at(BOARD_WIDTH, 0));
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&["..T.......", "IIII#####."]).unwrap();
        assert_eq!(board.block(2, 18), Some(Block::Filled(ShapeKind::T)));
        assert_eq!(board.block(0, 19), Some(Block::Filled(ShapeKind::I)));
        assert_eq!(board.block(4, 19), Some(Block::Filled(ShapeKind::O)));
        assert_eq!(board.block(9, 19), Some(Block::Empty));
        assert_eq!(board.filled_cell_count(), 10);
    }

    #[test]
    fn test_from_rows_errors() {
        assert_eq!(
            Board::from_rows(&["...."]),
            Err(ParseBoardError::RowWidth {
                row: 0,
                expected: BOARD_WIDTH,
                got: 4
            })
        );
        assert_eq!(
            Board::from_rows(&["....x....."]),
            Err(ParseBoardError::InvalidCell {
                row: 0,
                col: 4,
                ch: 'x'
            })
        );
        let too_many = vec![".........."; BOARD_HEIGHT + 1];
        assert!(matches!(
            Board::from_rows(&too_many),
            Err(ParseBoardError::TooManyRows { .. })
        ));
    }

    #[test]
    fn test_lock_marks_cells() {
        let mut board = Board::new();
        let dropped = board.lock(ShapeKind::T, &ShapeKind::T.mask(), 3, 10);
        assert_eq!(dropped, 0);
        assert!(board.is_filled(4, 10));
        assert!(board.is_filled(3, 11));
        assert!(board.is_filled(4, 11));
        assert!(board.is_filled(5, 11));
        assert!(!board.is_filled(3, 10));
        assert_eq!(board.filled_cell_count(), 4);
    }

    #[test]
    fn test_lock_drops_cells_above_top() {
        let mut board = Board::new();
        let upright = ShapeKind::I.mask().rotated_clockwise();
        let dropped = board.lock(ShapeKind::I, &upright, 0, -2);
        assert_eq!(dropped, 2);
        assert!(board.is_filled(0, 0));
        assert!(board.is_filled(0, 1));
        assert_eq!(board.filled_cell_count(), 2);
    }

    #[test]
    fn test_clear_lines_bottom_row() {
        let mut board = Board::new();
        fill_row(&mut board, BOARD_HEIGHT - 1);
        board.set_block(3, BOARD_HEIGHT - 2, Block::Filled(ShapeKind::T));

        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board.rows().len(), BOARD_HEIGHT);
        assert!(board.is_filled(3, BOARD_HEIGHT - 1));
        assert_eq!(board.filled_cell_count(), 1);
        assert!(board.row(0).unwrap().is_empty());
    }

    #[test]
    fn test_clear_lines_adjacent_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 18);
        fill_row(&mut board, 19);
        board.set_block(0, 17, Block::Filled(ShapeKind::S));

        assert_eq!(board.clear_lines(), 2);
        assert!(board.is_filled(0, 19));
        assert_eq!(board.filled_cell_count(), 1);
        assert!(board.row(0).unwrap().is_empty());
        assert!(board.row(1).unwrap().is_empty());
    }

    #[test]
    fn test_clear_lines_non_adjacent_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 19);
        board.set_block(5, 18, Block::Filled(ShapeKind::Z));
        fill_row(&mut board, 17);
        board.set_block(7, 16, Block::Filled(ShapeKind::T));

        assert_eq!(board.clear_lines(), 2);
        assert!(board.is_filled(5, 19));
        assert!(board.is_filled(7, 18));
        assert_eq!(board.filled_cell_count(), 2);
    }

    #[test]
    fn test_clear_lines_partial_row_untouched() {
        let mut board = Board::from_rows(&["#########."]).unwrap();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board.filled_cell_count(), BOARD_WIDTH - 1);
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT {
            fill_row(&mut board, y);
        }
        assert_eq!(board.clear_lines(), BOARD_HEIGHT);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_display() {
        let board = Board::from_rows(&["ZZ......SS"]).unwrap();
        let text = board.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), BOARD_HEIGHT);
        assert_eq!(lines[0], "..........");
        assert_eq!(lines[BOARD_HEIGHT - 1], "ZZ......SS");
    }
}
