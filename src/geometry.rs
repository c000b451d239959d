/// Cell coordinate within the column grid, zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

impl Position {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Manhattan distance to another cell, measured in grid steps.
    pub fn manhattan_distance(&self, other: &Self) -> usize {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Rectangular extent of a placed element, in whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub columns: usize,
    pub rows: usize,
}

impl Span {
    pub const fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    pub const fn single() -> Self {
        Self::new(1, 1)
    }
}

/// Screen-space rectangle used by terminal surfaces, in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}
