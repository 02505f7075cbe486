//! Grid module - the locked-block playfield
//!
//! The grid is a 10x20 matrix where each cell is empty or holds the color pair
//! of the piece that locked there. Storage is a flat row-major array, so line
//! compaction is a series of `copy_within` calls and never allocates.
//!
//! Coordinates are `(row, col)`: rows grow downward from 0 at the top, columns
//! grow rightward from 0. Rows above the grid (negative) are open sky: they
//! are never occupied and can never be written.

use crate::types::{BlockColor, Cell, BOARD_HEIGHT, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Total number of cells on the grid
const GRID_SIZE: usize = WIDTH * HEIGHT;

/// The play grid - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Cell; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_SIZE],
        }
    }

    /// Flat index for an in-range `(row, col)`
    #[inline(always)]
    fn index(row: i8, col: i8) -> Option<usize> {
        if row < 0 || row >= BOARD_HEIGHT as i8 || col < 0 || col >= BOARD_WIDTH as i8 {
            return None;
        }
        Some((row as usize) * WIDTH + (col as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at `(row, col)`; `None` when out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Collision query used by the validator.
    ///
    /// Columns outside `[0, W)` and rows at or below the floor count as
    /// occupied. Rows above the grid are never occupied.
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        if col < 0 || col >= BOARD_WIDTH as i8 || row >= BOARD_HEIGHT as i8 {
            return true;
        }
        if row < 0 {
            return false;
        }
        matches!(self.get(row, col), Some(Some(_)))
    }

    /// Write a cell.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` lies outside the grid. Callers only ever write
    /// cells of a validated piece, so this is a broken invariant.
    pub fn set_cell(&mut self, row: i8, col: i8, cell: Cell) {
        match Self::index(row, col) {
            Some(idx) => self.cells[idx] = cell,
            None => panic!("grid write out of range: row {row}, col {col}"),
        }
    }

    /// Store a locked block
    pub fn lock_cell(&mut self, row: i8, col: i8, color: BlockColor) {
        debug_assert!(
            !self.is_occupied(row, col),
            "locking over an occupied cell at ({row}, {col})"
        );
        self.set_cell(row, col, Some(color));
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= HEIGHT {
            return false;
        }
        self.row(row).iter().all(|cell| cell.is_some())
    }

    /// Borrow one row of cells.
    ///
    /// # Panics
    ///
    /// Panics if `row >= BOARD_HEIGHT`.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * WIDTH;
        &self.cells[start..start + WIDTH]
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Empty every cell of one row without moving anything else.
    ///
    /// # Panics
    ///
    /// Panics if `row >= BOARD_HEIGHT`.
    pub fn clear_row(&mut self, row: usize) {
        assert!(row < HEIGHT, "clear_row out of range: {row}");
        let start = row * WIDTH;
        for cell in &mut self.cells[start..start + WIDTH] {
            *cell = None;
        }
    }

    /// Remove `removed` rows and pack the rest toward the floor.
    ///
    /// Each surviving row moves down by the number of removed rows below it
    /// (greater row index), so the relative order of survivors is unchanged.
    /// Vacated rows at the top end up empty. `removed` may be in any order;
    /// out-of-range entries are a broken invariant and panic.
    pub fn compact(&mut self, removed: &[usize]) {
        if removed.is_empty() {
            return;
        }
        assert!(
            removed.iter().all(|&row| row < HEIGHT),
            "compact: removed row out of range: {removed:?}"
        );

        // Two-pointer scan from the floor up; survivors are copied into place.
        let mut write_row = HEIGHT;
        for read_row in (0..HEIGHT).rev() {
            if removed.contains(&read_row) {
                continue;
            }
            write_row -= 1;
            if write_row != read_row {
                let src = read_row * WIDTH;
                self.cells.copy_within(src..src + WIDTH, write_row * WIDTH);
            }
        }

        for row in 0..write_row {
            self.clear_row(row);
        }
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the grid into a row-major 2D array (snapshot layout)
    pub fn write_rows(&self, out: &mut [[Cell; WIDTH]; HEIGHT]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Build a grid from text rows, bottom-aligned.
    ///
    /// Each string is one row; `.` or space is empty, anything else is a
    /// block of `color`. Fewer than 20 rows fill the bottom of the grid.
    ///
    /// # Panics
    ///
    /// Panics if more than 20 rows are given or a row is wider than 10.
    pub fn from_rows(rows: &[&str], color: BlockColor) -> Self {
        assert!(rows.len() <= HEIGHT, "too many rows: {}", rows.len());
        let mut grid = Self::new();
        let top = HEIGHT - rows.len();
        for (i, line) in rows.iter().enumerate() {
            assert!(line.chars().count() <= WIDTH, "row too wide: {line:?}");
            for (col, ch) in line.chars().enumerate() {
                if ch != '.' && ch != ' ' {
                    grid.set_cell((top + i) as i8, col as i8, Some(color));
                }
            }
        }
        grid
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn block() -> BlockColor {
        PieceKind::T.color()
    }

    #[test]
    fn test_grid_index_calculation() {
        assert_eq!(Grid::index(0, 0), Some(0));
        assert_eq!(Grid::index(0, 9), Some(9));
        assert_eq!(Grid::index(1, 0), Some(10));
        assert_eq!(Grid::index(19, 9), Some(199));
        assert_eq!(Grid::index(0, -1), None);
        assert_eq!(Grid::index(0, 10), None);
        assert_eq!(Grid::index(20, 0), None);
        assert_eq!(Grid::index(-1, 0), None);
    }

    #[test]
    fn test_out_of_bounds_occupancy() {
        let grid = Grid::new();
        assert!(grid.is_occupied(0, -1));
        assert!(grid.is_occupied(0, 10));
        assert!(grid.is_occupied(20, 4));
        assert!(!grid.is_occupied(-1, 4));
        assert!(!grid.is_occupied(-5, 0));
        assert!(!grid.is_occupied(19, 9));
    }

    #[test]
    fn test_sky_above_walls_is_still_wall() {
        let grid = Grid::new();
        assert!(grid.is_occupied(-1, -1));
        assert!(grid.is_occupied(-1, 10));
    }

    #[test]
    fn test_set_and_clear_row() {
        let mut grid = Grid::new();
        for col in 0..10 {
            grid.set_cell(7, col, Some(block()));
        }
        assert!(grid.is_row_full(7));
        grid.clear_row(7);
        assert!(!grid.is_row_full(7));
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    #[should_panic(expected = "grid write out of range")]
    fn test_set_cell_out_of_range_panics() {
        let mut grid = Grid::new();
        grid.set_cell(-1, 0, Some(block()));
    }

    #[test]
    fn test_compact_single_row() {
        let mut grid = Grid::from_rows(&["x.........", "xxxxxxxxxx"], block());
        grid.compact(&[19]);
        assert!(grid.get(19, 0).flatten().is_some());
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_compact_unsorted_input() {
        let mut a = Grid::from_rows(
            &["...x......", "xxxxxxxxxx", ".x........", "xxxxxxxxxx"],
            block(),
        );
        let mut b = a.clone();
        a.compact(&[17, 19]);
        b.compact(&[19, 17]);
        assert_eq!(a, b);
        assert!(a.get(18, 3).flatten().is_some());
        assert!(a.get(19, 1).flatten().is_some());
    }

    #[test]
    fn test_from_rows_bottom_aligned() {
        let grid = Grid::from_rows(&["x........x"], block());
        assert!(grid.is_occupied(19, 0));
        assert!(grid.is_occupied(19, 9));
        assert!(!grid.is_occupied(18, 0));
    }
}
