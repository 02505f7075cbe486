//! Collision validator - the single source of truth for piece placement
//!
//! Every move, rotation, drop and lock decision goes through [`is_valid`].

use crate::grid::Grid;
use crate::pieces::Piece;

/// Candidate displacement of a piece: columns, rows and rotation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delta {
    pub cols: i8,
    pub rows: i8,
    pub rotation: i8,
}

impl Delta {
    pub const NONE: Delta = Delta {
        cols: 0,
        rows: 0,
        rotation: 0,
    };

    pub const DOWN: Delta = Delta::rows(1);

    pub const fn cols(cols: i8) -> Self {
        Self {
            cols,
            rows: 0,
            rotation: 0,
        }
    }

    pub const fn rows(rows: i8) -> Self {
        Self {
            cols: 0,
            rows,
            rotation: 0,
        }
    }

    pub const fn rotate(rotation: i8) -> Self {
        Self {
            cols: 0,
            rows: 0,
            rotation,
        }
    }

    /// Apply the delta to a piece (rotation wraps per kind)
    pub fn apply(&self, piece: &Piece) -> Piece {
        piece.moved(self.cols, self.rows, self.rotation)
    }
}

/// Is `piece` displaced by `delta` a legal placement on `grid`?
///
/// Illegal when any block is outside the side walls, at or below the floor,
/// or overlapping a locked block. Blocks above the top row are always fine.
pub fn is_valid(piece: &Piece, grid: &Grid, delta: Delta) -> bool {
    delta
        .apply(piece)
        .cells()
        .iter()
        .all(|&(row, col)| !grid.is_occupied(row, col))
}

/// A piece is resting when it cannot move down one row
pub fn is_resting(piece: &Piece, grid: &Grid) -> bool {
    !is_valid(piece, grid, Delta::DOWN)
}

/// Number of rows the piece can fall before it rests
pub fn drop_distance(piece: &Piece, grid: &Grid) -> u8 {
    let mut distance: u8 = 0;
    while is_valid(piece, grid, Delta::rows(distance as i8 + 1)) {
        distance += 1;
    }
    distance
}
