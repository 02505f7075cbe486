//! Read-only view of the engine after a step
//!
//! Snapshots are plain data: a renderer, a replay runner or a test reads
//! them without touching the engine.

use serde::{Deserialize, Serialize};

use crate::engine::GameState;
use crate::pieces::Piece;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

pub type GridRows = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// What happened at the last lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub line_clear_score: u32,
    pub level_up: bool,
    /// The lock left a block above the grid and ended the game
    pub overflow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub row: i8,
    pub col: i8,
    /// Anchor row plus fall progress, for smooth rendering
    pub render_row: f32,
    pub cells: [(i8, i8); 4],
    pub resting: bool,
}

impl ActiveSnapshot {
    pub fn new(piece: &Piece, progress: f32, resting: bool) -> Self {
        Self {
            kind: piece.kind,
            rotation: piece.rotation,
            row: piece.row,
            col: piece.col,
            render_row: piece.row as f32 + progress,
            cells: piece.cells(),
            resting,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub grid: GridRows,
    pub current: Option<ActiveSnapshot>,
    pub next: Option<PieceKind>,
    /// Anchor row the current piece would land on
    pub ghost_row: Option<i8>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub state: GameState,
    /// Clock time at which the game ended
    pub game_over_at_ms: Option<u64>,
    pub clock_ms: u64,
    /// Set only on the step in which a lock happened
    pub last_event: Option<LockEvent>,
    pub quit_requested: bool,
}

impl GameSnapshot {
    /// Cell at `(row, col)`, `None` outside the grid
    pub fn cell(&self, row: i8, col: i8) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.grid
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    pub fn occupied_count(&self) -> usize {
        self.grid.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn playable(&self) -> bool {
        self.state == GameState::Playing
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            grid: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            current: None,
            next: None,
            ghost_row: None,
            score: 0,
            level: 1,
            lines: 0,
            state: GameState::Start,
            game_over_at_ms: None,
            clock_ms: 0,
            last_event: None,
            quit_requested: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_bounds() {
        let mut snap = GameSnapshot::default();
        snap.grid[19][9] = Some(PieceKind::I.color());
        assert_eq!(snap.cell(19, 9), Some(Some(PieceKind::I.color())));
        assert_eq!(snap.cell(0, 0), Some(None));
        assert_eq!(snap.cell(-1, 0), None);
        assert_eq!(snap.cell(20, 0), None);
        assert_eq!(snap.cell(0, 10), None);
        assert_eq!(snap.occupied_count(), 1);
    }

    #[test]
    fn test_active_render_row() {
        let piece = Piece::spawn(PieceKind::L);
        let active = ActiveSnapshot::new(&piece, 0.25, false);
        assert_eq!(active.render_row, 0.25);
        assert_eq!(active.cells, piece.cells());
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(GameSnapshot::default()).unwrap();
        assert_eq!(json["state"], "start");
        assert_eq!(json["level"], 1);
        assert!(json["grid"][0][0].is_null());
    }
}
