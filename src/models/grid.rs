//! Fixed-size grid of braille cells.

use serde::{Deserialize, Serialize};

use super::Cell;

/// Position in grid coordinates (0-based, row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Row, counted top to bottom
    pub row: usize,
    /// Column, counted left to right
    pub col: usize,
}

impl Position {
    /// Creates a new Position with the given row and column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The grid origin (0, 0).
    #[must_use]
    pub const fn origin() -> Self {
        Self { row: 0, col: 0 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangular matrix of cells.
///
/// Every position always holds a cell; the dimensions are fixed at
/// construction. Scrolling drops rows from the top and appends empty rows
/// at the bottom, so the row count never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Creates a `rows` x `cols` grid filled with empty cells.
    ///
    /// Zero dimensions are bumped to 1 so a cursor position always exists.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            cells: vec![vec![Cell::EMPTY; cols]; rows],
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Whether `pos` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Returns a copy of the cell at `pos`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }

    /// Overwrites the cell at `pos`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(slot) = self
            .cells
            .get_mut(pos.row)
            .and_then(|row| row.get_mut(pos.col))
        {
            *slot = cell;
        }
    }

    /// Resets every cell to empty.
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::EMPTY);
        }
    }

    /// Scrolls the contents up by `lines` rows.
    ///
    /// The top rows are dropped and empty rows appended at the bottom.
    /// Scrolling by the row count or more leaves an empty grid.
    pub fn scroll_up(&mut self, lines: usize) {
        let lines = lines.min(self.rows);
        let cols = self.cols;
        self.cells.drain(..lines);
        self.cells
            .extend(std::iter::repeat_with(|| vec![Cell::EMPTY; cols]).take(lines));
    }

    /// Iterates rows top to bottom.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Whether every cell is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(Cell::is_empty)
    }

    /// Owned copy of all cells, row-major.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.cells.clone()
    }
}
