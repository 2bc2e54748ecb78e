//! Landing preview for the current piece.

use crate::board::Board;
use crate::piece::Piece;

/// Copy of `piece` moved straight down to the lowest valid row.
///
/// Neither the piece nor the board is touched. A piece that is already invalid is
/// returned unchanged.
pub fn project(piece: &Piece, board: &Board) -> Piece {
    let mut ghost = piece.clone();
    if !board.is_valid(&ghost) {
        return ghost;
    }
    while board.is_valid(&ghost) {
        ghost.y += 1;
    }
    ghost.y -= 1;
    ghost
}
