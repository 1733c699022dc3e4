use serde::Serialize;

use super::{
    board::Board,
    collision::can_place,
    shape::{ShapeKind, ShapeMask},
};

/// Column of a freshly spawned piece's top-left mask corner.
pub const SPAWN_X: i32 = 4;
/// Row of a freshly spawned piece's top-left mask corner.
pub const SPAWN_Y: i32 = 0;

/// The falling piece: a shape kind, its current mask and an anchor.
///
/// The anchor `(x, y)` locates the mask's top-left corner on the board.
/// Movement and rotation return new pieces, leaving `self` untouched, so the
/// engine can validate a candidate before committing it.
///
/// # Example
///
/// ```
/// use brickfall_engine::{ActivePiece, Board, ShapeKind};
///
/// let board = Board::new();
/// let piece = ActivePiece::spawn(ShapeKind::T);
/// assert!(piece.fits(&board));
///
/// let landed = piece.drop_position(&board);
/// assert_eq!(landed.y(), 18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivePiece {
    kind: ShapeKind,
    mask: ShapeMask,
    x: i32,
    y: i32,
}

impl ActivePiece {
    /// Creates a piece in spawn orientation at the spawn anchor.
    #[must_use]
    pub const fn spawn(kind: ShapeKind) -> Self {
        Self::new(kind, kind.mask(), SPAWN_X, SPAWN_Y)
    }

    #[must_use]
    pub const fn new(kind: ShapeKind, mask: ShapeMask, x: i32, y: i32) -> Self {
        Self { kind, mask, x, y }
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub const fn mask(&self) -> &ShapeMask {
        &self.mask
    }

    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Absolute `(x, y)` board coordinates of the occupied cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.mask
            .occupied_offsets()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    #[must_use]
    pub const fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    #[must_use]
    pub const fn left(self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        self.shifted(0, 1)
    }

    /// Same anchor, mask turned 90° clockwise. No offsets are tried.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        Self {
            mask: self.mask.rotated_clockwise(),
            ..self
        }
    }

    #[must_use]
    pub fn fits(&self, board: &Board) -> bool {
        can_place(board, &self.mask, self.x, self.y)
    }

    /// Returns the lowest position reachable by moving straight down.
    #[must_use]
    pub fn drop_position(self, board: &Board) -> Self {
        let mut dropped = self;
        while dropped.down().fits(board) {
            dropped = dropped.down();
        }
        dropped
    }

    /// Merges this piece into `board`; returns the count of cells dropped above the top.
    pub fn lock_into(&self, board: &mut Board) -> usize {
        board.lock(self.kind, &self.mask, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_anchor() {
        let piece = ActivePiece::spawn(ShapeKind::I);
        assert_eq!((piece.x(), piece.y()), (SPAWN_X, SPAWN_Y));
        let cells: Vec<_> = piece.occupied_positions().collect();
        assert_eq!(cells, vec![(4, 0), (5, 0), (6, 0), (7, 0)]);
    }

    #[test]
    fn test_moves_do_not_mutate() {
        let piece = ActivePiece::spawn(ShapeKind::S);
        let moved = piece.left().down().right().rotated_clockwise();
        assert_eq!(piece, ActivePiece::spawn(ShapeKind::S));
        assert_eq!((moved.x(), moved.y()), (4, 1));
        assert_eq!(moved.mask(), &ShapeKind::S.mask().rotated_clockwise());
    }

    #[test]
    fn test_drop_position_on_floor() {
        let board = Board::new();
        let piece = ActivePiece::spawn(ShapeKind::I).rotated_clockwise();
        assert_eq!(piece.drop_position(&board).y(), 16);
    }

    #[test]
    fn test_drop_position_on_stack() {
        let board = Board::from_rows(&["....#.....", "....#....."]).unwrap();
        let piece = ActivePiece::spawn(ShapeKind::O);
        // O covers columns 4-5, stops on top of the column at row 18.
        assert_eq!(piece.drop_position(&board).y(), 16);
    }

    #[test]
    fn test_lock_into() {
        let mut board = Board::new();
        let piece = ActivePiece::spawn(ShapeKind::Z).drop_position(&board);
        assert_eq!(piece.lock_into(&mut board), 0);
        assert!(board.is_filled(4, 18));
        assert!(board.is_filled(5, 18));
        assert!(board.is_filled(5, 19));
        assert!(board.is_filled(6, 19));
    }

    #[test]
    fn test_serialization() {
        let piece = ActivePiece::spawn(ShapeKind::T);
        let json = serde_json::to_value(piece).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": "T", "mask": [".#.", "###"], "x": 4, "y": 0 })
        );
    }
}
