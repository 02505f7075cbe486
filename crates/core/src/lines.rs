//! Line resolver - commits locked pieces and clears full rows

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::pieces::Piece;
use crate::types::BOARD_HEIGHT;

/// Blocks of a locked piece that sit above the visible grid
pub type HiddenBlocks = ArrayVec<(i8, i8), 4>;

/// Write the visible blocks of `piece` into the grid.
///
/// Blocks above row 0 cannot be stored; they are returned so the caller can
/// place them once line clears have shifted the stack (or declare overflow).
pub fn commit(piece: &Piece, grid: &mut Grid) -> HiddenBlocks {
    let color = piece.color();
    let mut hidden = HiddenBlocks::new();
    for (row, col) in piece.cells() {
        if row < 0 {
            hidden.push((row, col));
        } else {
            grid.lock_cell(row, col, color);
        }
    }
    hidden
}

/// Rows that are currently full, bottom to top
pub fn full_rows(grid: &Grid) -> ArrayVec<usize, { BOARD_HEIGHT as usize }> {
    (0..BOARD_HEIGHT as usize)
        .rev()
        .filter(|&row| grid.is_row_full(row))
        .collect()
}

/// Clear every full row and compact the grid; returns the number cleared.
///
/// A grid without full rows is left untouched.
pub fn resolve(grid: &mut Grid) -> usize {
    let full = full_rows(grid);
    if full.is_empty() {
        return 0;
    }
    for &row in &full {
        grid.clear_row(row);
    }
    grid.compact(&full);
    full.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_rows(rows, PieceKind::S.color())
    }

    #[test]
    fn test_resolve_without_full_rows_is_noop() {
        let mut g = grid(&["x.x.x.x.x.", "xxxxxxxxx."]);
        let before = g.clone();
        assert_eq!(resolve(&mut g), 0);
        assert_eq!(g, before);
    }

    #[test]
    fn test_resolve_single_row() {
        let mut g = grid(&["x.........", "xxxxxxxxxx"]);
        assert_eq!(resolve(&mut g), 1);
        assert_eq!(g.occupied_count(), 1);
        assert!(g.is_occupied(19, 0));
    }

    #[test]
    fn test_full_rows_bottom_to_top() {
        let g = grid(&["xxxxxxxxxx", "x.........", "xxxxxxxxxx"]);
        assert_eq!(full_rows(&g).as_slice(), &[19, 17]);
    }

    #[test]
    fn test_resolve_four_rows() {
        let mut g = grid(&[
            "....x.....",
            "xxxxxxxxxx",
            "xxxxxxxxxx",
            "xxxxxxxxxx",
            "xxxxxxxxxx",
        ]);
        assert_eq!(resolve(&mut g), 4);
        assert_eq!(g.occupied_count(), 1);
        assert!(g.is_occupied(19, 4));
    }

    #[test]
    fn test_commit_returns_hidden_blocks() {
        let mut g = Grid::new();
        let piece = Piece::spawn_at_row(PieceKind::T, -1);
        let hidden = commit(&piece, &mut g);
        assert_eq!(hidden.as_slice(), &[(-1, 4)]);
        assert_eq!(g.occupied_count(), 3);
    }
}
