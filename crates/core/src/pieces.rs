//! Pieces module - tetromino shape tables and the falling piece
//!
//! Every kind has a fixed list of rotation states; each state is four
//! `(row, col)` offsets applied to the piece anchor. The square has one
//! state, every other kind has four. Rotation is "try the next state, keep
//! the old one if it collides": there is no kick search.

use crate::types::{BlockColor, PieceKind, SPAWN_COL, SPAWN_ROW};

/// Offset of a single block relative to the piece anchor, as `(row, col)`
pub type BlockOffset = (i8, i8);

/// Shape of a piece in one rotation state - 4 block offsets
pub type PieceShape = [BlockOffset; 4];

const I_STATES: [PieceShape; 4] = [
    [(1, 0), (1, 1), (1, 2), (1, 3)],
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
    [(0, 1), (1, 1), (2, 1), (3, 1)],
];

const O_STATES: [PieceShape; 1] = [[(0, 1), (0, 2), (1, 1), (1, 2)]];

const T_STATES: [PieceShape; 4] = [
    [(0, 1), (1, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (1, 2), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 1)],
    [(0, 1), (1, 0), (1, 1), (2, 1)],
];

const S_STATES: [PieceShape; 4] = [
    [(0, 1), (0, 2), (1, 0), (1, 1)],
    [(0, 1), (1, 1), (1, 2), (2, 2)],
    [(2, 0), (2, 1), (1, 1), (1, 2)],
    [(0, 0), (1, 0), (1, 1), (2, 1)],
];

const Z_STATES: [PieceShape; 4] = [
    [(0, 0), (0, 1), (1, 1), (1, 2)],
    [(0, 2), (1, 1), (1, 2), (2, 1)],
    [(2, 1), (2, 2), (1, 0), (1, 1)],
    [(0, 1), (1, 0), (1, 1), (2, 0)],
];

const J_STATES: [PieceShape; 4] = [
    [(0, 0), (1, 0), (1, 1), (1, 2)],
    [(0, 1), (0, 2), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 0), (2, 1)],
];

const L_STATES: [PieceShape; 4] = [
    [(0, 2), (1, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (1, 2), (2, 0)],
    [(0, 0), (0, 1), (1, 1), (2, 1)],
];

/// All rotation states of a kind
pub fn rotation_states(kind: PieceKind) -> &'static [PieceShape] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
    }
}

/// Get the block offsets for a kind and rotation (taken modulo the state count)
pub fn get_shape(kind: PieceKind, rotation: u8) -> PieceShape {
    let states = rotation_states(kind);
    states[rotation as usize % states.len()]
}

/// Check the static tables: the right number of states per kind, four
/// distinct blocks per state, every offset inside a 4x4 box.
///
/// Returns a description of the first problem found.
pub fn check_shape_tables() -> Result<(), String> {
    for kind in PieceKind::ALL {
        let states = rotation_states(kind);
        if states.len() != kind.rotation_count() as usize {
            return Err(format!(
                "{:?}: {} rotation states, expected {}",
                kind,
                states.len(),
                kind.rotation_count()
            ));
        }
        for (rotation, shape) in states.iter().enumerate() {
            for (i, &(dr, dc)) in shape.iter().enumerate() {
                if !(0..4).contains(&dr) || !(0..4).contains(&dc) {
                    return Err(format!("{kind:?}/{rotation}: offset ({dr}, {dc}) outside 4x4"));
                }
                if shape[..i].contains(&(dr, dc)) {
                    return Err(format!("{kind:?}/{rotation}: duplicate block ({dr}, {dc})"));
                }
            }
        }
    }
    Ok(())
}

/// A piece on (or above) the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    /// Rotation state index, always `< kind.rotation_count()`
    pub rotation: u8,
    /// Anchor row (authoritative for collision and locking)
    pub row: i8,
    /// Anchor column
    pub col: i8,
}

impl Piece {
    /// Create a new piece at the standard spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        Self::spawn_at_row(kind, SPAWN_ROW)
    }

    /// Create a new piece at the spawn column and the given anchor row
    pub fn spawn_at_row(kind: PieceKind, row: i8) -> Self {
        Self {
            kind,
            rotation: 0,
            row,
            col: SPAWN_COL,
        }
    }

    /// Block offsets for the current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute `(row, col)` of each block
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape()
            .map(|(dr, dc)| (self.row + dr, self.col + dc))
    }

    /// Color pair for the blocks of this piece
    pub fn color(&self) -> BlockColor {
        self.kind.color()
    }

    /// Copy of this piece shifted and rotated by the given amounts.
    ///
    /// The rotation wraps modulo the kind's state count, so negative deltas
    /// rotate counter-clockwise.
    pub fn moved(&self, d_col: i8, d_row: i8, d_rot: i8) -> Self {
        let count = self.kind.rotation_count() as i16;
        let rotation = (self.rotation as i16 + d_rot as i16).rem_euclid(count) as u8;
        Self {
            rotation,
            row: self.row + d_row,
            col: self.col + d_col,
            ..*self
        }
    }
}
