//! Shape catalog: the seven tetromino kinds, their spawn matrices and colours.

use rand::Rng;
use ratatui::style::Color;

/// Occupancy matrix of a piece: `matrix[row][col]`, row 0 is the top.
pub type Matrix = Vec<Vec<bool>>;

/// Tetromino kinds (I, J, L, O, S, T, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl ShapeKind {
    pub const ALL: [Self; 7] = [Self::I, Self::J, Self::L, Self::O, Self::S, Self::T, Self::Z];

    /// Rows of the spawn orientation; 1 = occupied.
    fn rows(self) -> &'static [&'static [u8]] {
        match self {
            Self::I => &[&[1, 1, 1, 1]],
            Self::J => &[&[1, 0, 0], &[1, 1, 1]],
            Self::L => &[&[0, 0, 1], &[1, 1, 1]],
            Self::O => &[&[1, 1], &[1, 1]],
            Self::S => &[&[0, 1, 1], &[1, 1, 0]],
            Self::T => &[&[0, 1, 0], &[1, 1, 1]],
            Self::Z => &[&[1, 1, 0], &[0, 1, 1]],
        }
    }

    /// Fresh copy of the spawn-orientation matrix.
    pub fn matrix(self) -> Matrix {
        self.rows()
            .iter()
            .map(|row| row.iter().map(|&c| c != 0).collect())
            .collect()
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::I => (0, 255, 255),
            Self::J => (0, 0, 255),
            Self::L => (255, 165, 0),
            Self::O => (255, 255, 0),
            Self::S => (0, 255, 0),
            Self::T => (160, 32, 240),
            Self::Z => (255, 0, 0),
        }
    }

    #[inline]
    pub fn color(self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb(r, g, b)
    }

    /// Uniform pick over all seven kinds.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}
