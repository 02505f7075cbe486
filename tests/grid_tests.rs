//! Grid and line resolver tests

use tetris_sim::core::grid::Grid;
use tetris_sim::core::lines;
use tetris_sim::core::Piece;
use tetris_sim::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

fn marker() -> Option<tetris_sim::types::BlockColor> {
    Some(PieceKind::T.color())
}

#[test]
fn test_new_grid_is_empty() {
    let grid = Grid::new();
    assert_eq!(grid.width(), BOARD_WIDTH);
    assert_eq!(grid.height(), BOARD_HEIGHT);
    assert_eq!(grid.occupied_count(), 0);
}

#[test]
fn test_walls_floor_and_sky() {
    let grid = Grid::new();
    assert!(grid.is_occupied(0, -1));
    assert!(grid.is_occupied(0, 10));
    assert!(grid.is_occupied(20, 0));
    assert!(!grid.is_occupied(-1, 0));
    assert!(!grid.is_occupied(-4, 5));
    assert!(!grid.is_occupied(19, 9));
}

#[test]
fn test_compaction_shifts_by_rows_removed_below() {
    let mut grid = Grid::new();
    let full = [2usize, 5, 7];
    for row in 0..BOARD_HEIGHT as i8 {
        if full.contains(&(row as usize)) {
            for col in 0..BOARD_WIDTH as i8 {
                grid.set_cell(row, col, marker());
            }
        } else {
            grid.set_cell(row, row % 10, marker());
        }
    }

    assert_eq!(lines::resolve(&mut grid), 3);
    assert_eq!(grid.occupied_count(), 17);

    for row in 0..BOARD_HEIGHT as i8 {
        let shift = match row {
            0 | 1 => 3,
            3 | 4 => 2,
            6 => 1,
            2 | 5 | 7 => continue,
            _ => 0,
        };
        assert!(
            grid.is_occupied(row + shift, row % 10),
            "row {row} should have moved down by {shift}"
        );
    }
    for row in 0..3 {
        assert!(grid.row(row).iter().all(|c| c.is_none()));
    }
}

#[test]
fn test_resolve_is_noop_without_full_rows() {
    let mut grid = Grid::from_rows(&["x.x.x.x.x.", ".xxxxxxxxx"], PieceKind::L.color());
    let before = grid.clone();
    assert_eq!(lines::resolve(&mut grid), 0);
    assert_eq!(grid, before);
}

#[test]
fn test_commit_writes_visible_blocks() {
    let mut grid = Grid::new();
    let mut piece = Piece::spawn(PieceKind::O);
    piece.row = 18;
    let hidden = lines::commit(&piece, &mut grid);
    assert!(hidden.is_empty());
    assert_eq!(grid.occupied_count(), 4);
    assert_eq!(grid.get(19, 4), Some(Some(PieceKind::O.color())));
}

#[test]
fn test_clear_keeps_row_colors() {
    let mut grid = Grid::new();
    grid.set_cell(18, 0, Some(PieceKind::Z.color()));
    for col in 0..10 {
        grid.set_cell(19, col, Some(PieceKind::I.color()));
    }
    lines::resolve(&mut grid);
    assert_eq!(grid.get(19, 0), Some(Some(PieceKind::Z.color())));
    assert_eq!(grid.occupied_count(), 1);
}
