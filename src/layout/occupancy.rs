use crate::geometry::{Position, Span};

/// Cell occupancy for one layout pass.
///
/// The column count is fixed when the pass starts; rows grow on demand as
/// spans are marked. A cell is occupied iff some item or filler covers it,
/// and spans never overlap within a pass.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    columns: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(columns: usize) -> Self {
        debug_assert!(columns >= 1, "grid needs at least one column");
        Self {
            columns,
            cells: Vec::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows touched so far. Cells below are implicitly free.
    pub fn rows(&self) -> usize {
        self.cells.len() / self.columns
    }

    pub fn is_occupied(&self, column: usize, row: usize) -> bool {
        debug_assert!(column < self.columns, "column {column} out of range");
        self.cells
            .get(row * self.columns + column)
            .copied()
            .unwrap_or(false)
    }

    pub fn is_free_rect(&self, origin: Position, span: Span) -> bool {
        for row in origin.row..origin.row + span.rows {
            for column in origin.column..origin.column + span.columns {
                if self.is_occupied(column, row) {
                    return false;
                }
            }
        }
        true
    }

    /// Mark a rectangle occupied, growing the row storage as needed.
    pub fn occupy(&mut self, origin: Position, span: Span) {
        let needed_rows = origin.row + span.rows;
        if needed_rows > self.rows() {
            self.cells.resize(needed_rows * self.columns, false);
        }
        for row in origin.row..origin.row + span.rows {
            for column in origin.column..origin.column + span.columns {
                let index = row * self.columns + column;
                debug_assert!(!self.cells[index], "overlapping span at ({column},{row})");
                self.cells[index] = true;
            }
        }
    }

    /// True when every cell in `[0, columns) x [0, max_row)` is occupied.
    pub fn is_filled_through(&self, max_row: usize) -> bool {
        (0..max_row).all(|row| (0..self.columns).all(|column| self.is_occupied(column, row)))
    }
}
