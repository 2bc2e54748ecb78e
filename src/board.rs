//! Locked-cell grid: validity checks, locking, full-row clearing.

use crate::piece::Piece;
use crate::shape::ShapeKind;
use std::collections::VecDeque;

/// Default board size in cells.
pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;

/// Grid of locked cells. y=0 is the top row; each cell remembers the kind that filled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// rows[y][x]; rows[0] is the top.
    rows: VecDeque<Vec<Option<ShapeKind>>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: (0..height).map(|_| vec![None; width]).collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Locked kind at (x, y); `None` when empty or outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<ShapeKind> {
        let (x, y) = (usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        self.rows.get(y).and_then(|row| row.get(x)).copied().flatten()
    }

    #[inline]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some()
    }

    /// Fill a single cell. Out-of-grid coordinates are ignored and reported as `false`.
    pub fn set(&mut self, x: i32, y: i32, kind: ShapeKind) -> bool {
        let (Ok(ux), Ok(uy)) = (usize::try_from(x), usize::try_from(y)) else {
            return false;
        };
        match self.rows.get_mut(uy).and_then(|row| row.get_mut(ux)) {
            Some(cell) => {
                *cell = Some(kind);
                true
            }
            None => false,
        }
    }

    /// True if every piece cell is inside the side walls and above the floor, and every
    /// cell at y >= 0 is empty. Cells above the top row are never checked against the grid.
    pub fn is_valid(&self, piece: &Piece) -> bool {
        piece.occupied_cells().all(|(x, y)| {
            x >= 0
                && (x as usize) < self.width
                && y < self.height as i32
                && (y < 0 || !self.is_occupied(x, y))
        })
    }

    /// Write the piece's cells into the grid. Returns the number of cells that fell
    /// outside the grid (above the top row) and were dropped.
    pub fn lock(&mut self, piece: &Piece) -> usize {
        let kind = piece.kind;
        piece
            .occupied_cells()
            .filter(|&(x, y)| !self.set(x, y, kind))
            .count()
    }

    /// Remove every full row; rows above each cleared row move down by one per cleared
    /// row beneath them. Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !is_full(row));
        let cleared = before - self.rows.len();
        for _ in 0..cleared {
            self.rows.push_front(vec![None; self.width]);
        }
        cleared
    }

    /// All locked cells as (x, y, kind), top row first.
    pub fn locked_cells(&self) -> impl Iterator<Item = (i32, i32, ShapeKind)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|kind| (x as i32, y as i32, kind)))
        })
    }
}

#[inline]
fn is_full(row: &[Option<ShapeKind>]) -> bool {
    row.iter().all(Option::is_some)
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}
