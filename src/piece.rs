//! A piece in play: kind, grid origin and its own rotation matrix.

use crate::shape::{Matrix, ShapeKind};
use ratatui::style::Color;

/// Spawn row for new and swapped-in pieces.
pub const SPAWN_ROW: i32 = 0;

/// Spawn column for a board of the given width (3 on a 10-wide board).
pub fn spawn_column(width: usize) -> i32 {
    (width.saturating_sub(4) / 2) as i32
}

/// Piece with its top-left matrix cell at (`x`, `y`). Cloning deep-copies the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: ShapeKind,
    pub x: i32,
    pub y: i32,
    matrix: Matrix,
}

impl Piece {
    pub fn new(kind: ShapeKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            matrix: kind.matrix(),
        }
    }

    /// New piece at the spawn position for a board `width` columns wide.
    pub fn spawn(kind: ShapeKind, width: usize) -> Self {
        Self::new(kind, spawn_column(width), SPAWN_ROW)
    }

    /// Move back to the spawn position, keeping the current orientation.
    pub fn reset_origin(&mut self, width: usize) {
        self.x = spawn_column(width);
        self.y = SPAWN_ROW;
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn color(&self) -> Color {
        self.kind.color()
    }

    /// Rotate 90° clockwise: `new[i][j] = old[rows - 1 - j][i]`.
    pub fn rotate(&mut self) {
        let rows = self.matrix.len();
        let cols = self.matrix.first().map_or(0, Vec::len);
        self.matrix = (0..cols)
            .map(|i| (0..rows).map(|j| self.matrix[rows - 1 - j][i]).collect())
            .collect();
    }

    /// Inverse of [`Piece::rotate`]: `new[i][j] = old[j][cols - 1 - i]`.
    pub fn rotate_back(&mut self) {
        let rows = self.matrix.len();
        let cols = self.matrix.first().map_or(0, Vec::len);
        self.matrix = (0..cols)
            .map(|i| (0..rows).map(|j| self.matrix[j][cols - 1 - i]).collect())
            .collect();
    }

    /// Absolute (x, y) of every occupied matrix cell.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.matrix.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(col, _)| (self.x + col as i32, self.y + row as i32))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn cells(piece: &Piece) -> HashSet<(i32, i32)> {
        piece.occupied_cells().collect()
    }

    #[test]
    fn test_spawn_column_for_default_width() {
        assert_eq!(spawn_column(10), 3);
        assert_eq!(spawn_column(4), 0);
        let p = Piece::spawn(ShapeKind::T, 10);
        assert_eq!((p.x, p.y), (3, 0));
    }

    #[test]
    fn test_occupied_cells_offset_by_origin() {
        let p = Piece::new(ShapeKind::T, 3, 5);
        let expected: HashSet<_> = [(4, 5), (3, 6), (4, 6), (5, 6)].into_iter().collect();
        assert_eq!(cells(&p), expected);
    }

    #[test]
    fn test_rotate_i_turns_vertical() {
        let mut p = Piece::new(ShapeKind::I, 0, 0);
        p.rotate();
        assert_eq!(p.matrix().len(), 4);
        assert!(p.matrix().iter().all(|row| row == &vec![true]));
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let mut p = Piece::new(ShapeKind::T, 0, 0);
        p.rotate();
        let expected = vec![vec![true, false], vec![true, true], vec![true, false]];
        assert_eq!(p.matrix(), &expected);
    }

    #[test]
    fn test_four_rotations_restore_every_shape() {
        for kind in ShapeKind::ALL {
            let mut p = Piece::new(kind, 2, 2);
            for _ in 0..4 {
                p.rotate();
            }
            assert_eq!(p.matrix(), &kind.matrix(), "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_back_undoes_rotate() {
        for kind in ShapeKind::ALL {
            let mut p = Piece::new(kind, 0, 0);
            p.rotate();
            p.rotate();
            let before = p.matrix().clone();
            p.rotate();
            p.rotate_back();
            assert_eq!(p.matrix(), &before, "{kind:?}");
        }
    }

    #[test]
    fn test_clone_does_not_share_matrix() {
        let original = Piece::new(ShapeKind::L, 0, 0);
        let mut copy = original.clone();
        copy.rotate();
        assert_eq!(original.matrix(), &ShapeKind::L.matrix());
        assert_ne!(copy.matrix(), original.matrix());
    }

    #[test]
    fn test_reset_origin_keeps_orientation() {
        let mut p = Piece::new(ShapeKind::S, 7, 12);
        p.rotate();
        let rotated = p.matrix().clone();
        p.reset_origin(10);
        assert_eq!((p.x, p.y), (3, 0));
        assert_eq!(p.matrix(), &rotated);
    }
}
