use super::{
    board::{BOARD_HEIGHT, BOARD_WIDTH, Board},
    shape::ShapeMask,
};

/// Tests whether `mask` anchored at `(x, y)` fits on `board`.
///
/// A placement is rejected when any occupied mask cell lands left of column
/// 0, right of the last column, below the last row, or on a filled board
/// cell. Cells above row 0 are accepted and never compared against the board,
/// which has no storage there; this lets a piece hang partly off the top.
///
/// # Example
///
/// ```
/// use brickfall_engine::{Board, ShapeKind, can_place};
///
/// let board = Board::new();
/// let bar = ShapeKind::I.mask();
/// assert!(can_place(&board, &bar, 6, 19));
/// assert!(!can_place(&board, &bar, 7, 19));
/// assert!(can_place(&board, &bar.rotated_clockwise(), 0, -3));
/// ```
#[must_use]
pub fn can_place(board: &Board, mask: &ShapeMask, x: i32, y: i32) -> bool {
    mask.occupied_offsets().all(|(dx, dy)| {
        let Ok(col) = usize::try_from(x + dx) else {
            return false;
        };
        if col >= BOARD_WIDTH {
            return false;
        }
        match usize::try_from(y + dy) {
            Ok(row) => row < BOARD_HEIGHT && board.is_empty_at(col, row),
            // above the top edge
            Err(_) => true,
        }
    })
}
