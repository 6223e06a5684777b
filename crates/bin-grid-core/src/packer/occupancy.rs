use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{GridPackError, Result};

/// Rows reserved up front by [`OccupancyGrid::new`].
pub const DEFAULT_ROW_CAPACITY: usize = 16;

/// Boolean occupancy over `(row, col)` with a fixed column count, growing downward.
///
/// Cells live in one row-major buffer; `cells.len() == height * columns` at all times.
/// Rows are only ever appended at the bottom, except when a [`Checkpoint`] is rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct OccupancyGrid {
    columns: usize,
    height: usize,
    cells: Vec<bool>,
}

/// Wire shape of [`OccupancyGrid`], checked before it becomes a grid.
#[derive(Deserialize)]
struct RawGrid {
    columns: usize,
    height: usize,
    cells: Vec<bool>,
}

impl TryFrom<RawGrid> for OccupancyGrid {
    type Error = GridPackError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        if raw.columns == 0 {
            return Err(GridPackError::InvalidConfiguration(
                "column count must be at least 1".into(),
            ));
        }
        let expected = raw.height.checked_mul(raw.columns);
        if expected != Some(raw.cells.len()) {
            return Err(GridPackError::InvalidConfiguration(format!(
                "grid of {} rows x {} columns carries {} cells",
                raw.height,
                raw.columns,
                raw.cells.len()
            )));
        }
        Ok(Self {
            columns: raw.columns,
            height: raw.height,
            cells: raw.cells,
        })
    }
}

/// Why an in-place [`OccupancyGrid::place`] was refused. The grid is unchanged in both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Conflict {
    #[error("span {col}+{width} overflows {columns} columns")]
    OutOfColumns {
        col: usize,
        width: usize,
        columns: usize,
    },
    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
}

/// Saved state of a row range, restorable with [`OccupancyGrid::rollback`].
#[derive(Debug, Clone)]
pub struct Checkpoint {
    height: usize,
    first_row: usize,
    saved: Vec<bool>,
}

impl Checkpoint {
    /// Grid height when the checkpoint was taken.
    pub fn height(&self) -> usize {
        self.height
    }
}

impl OccupancyGrid {
    pub fn new(columns: usize) -> Self {
        Self::with_row_capacity(columns, DEFAULT_ROW_CAPACITY)
    }

    pub fn with_row_capacity(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            height: 0,
            cells: Vec::with_capacity(columns.saturating_mul(rows)),
        }
    }

    /// Builds a grid from an explicit matrix. Every row must be `columns` long.
    pub fn from_rows(columns: usize, rows: &[Vec<bool>]) -> Result<Self> {
        if columns == 0 {
            return Err(GridPackError::InvalidConfiguration(
                "column count must be at least 1".into(),
            ));
        }
        let mut grid = Self::with_row_capacity(columns, rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(GridPackError::InvalidConfiguration(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    columns
                )));
            }
            grid.cells.extend_from_slice(row);
            grid.height += 1;
        }
        Ok(grid)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows currently in the grid.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// Cells outside the grid (below the bottom row or right of the last column) read as free.
    #[inline]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.columns && self.cells[row * self.columns + col]
    }

    pub fn row(&self, row: usize) -> Option<&[bool]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.columns;
        Some(&self.cells[start..start + self.columns])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks_exact(self.columns.max(1))
    }

    pub fn used_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Appends one row of free cells at the bottom.
    pub fn push_row(&mut self) {
        self.cells.resize(self.cells.len() + self.columns, false);
        self.height += 1;
    }

    fn grow_to(&mut self, rows: usize) {
        if rows > self.height {
            self.cells.resize(rows * self.columns, false);
            self.height = rows;
        }
    }

    /// Checks whether a `height x width` rectangle anchored at `(row, col)` fits, without
    /// touching the grid. Rows below the current bottom count as free.
    ///
    /// Returns the grid height the placement would produce.
    pub fn probe(&self, row: usize, col: usize, height: usize, width: usize) -> Option<usize> {
        if col + width > self.columns {
            return None;
        }
        let last = (row + height).min(self.height);
        for r in row..last {
            let start = r * self.columns + col;
            if self.cells[start..start + width].iter().any(|&c| c) {
                return None;
            }
        }
        Some(self.height.max(row + height))
    }

    /// Copy-on-write attempt: returns a new grid with the rectangle marked, or `None` if it
    /// does not fit. `self` is left untouched either way.
    pub fn try_place(&self, row: usize, col: usize, height: usize, width: usize) -> Option<Self> {
        self.probe(row, col, height, width)?;
        let mut next = self.clone();
        next.grow_to(row + height);
        next.fill(row, col, height, width);
        Some(next)
    }

    /// Marks the rectangle occupied in place, growing the grid as needed.
    ///
    /// On conflict the touched rows and the height are restored before returning.
    pub fn place(
        &mut self,
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    ) -> std::result::Result<(), Conflict> {
        if col + width > self.columns {
            return Err(Conflict::OutOfColumns {
                col,
                width,
                columns: self.columns,
            });
        }
        let checkpoint = self.checkpoint(row..row + height);
        self.grow_to(row + height);
        for r in row..row + height {
            for c in col..col + width {
                let idx = r * self.columns + c;
                if self.cells[idx] {
                    self.rollback(checkpoint);
                    return Err(Conflict::Occupied { row: r, col: c });
                }
                self.cells[idx] = true;
            }
        }
        Ok(())
    }

    /// Saves the existing rows of `rows` (rows past the bottom need no saving) and the height.
    pub fn checkpoint(&self, rows: Range<usize>) -> Checkpoint {
        let first_row = rows.start.min(self.height);
        let end = rows.end.min(self.height).max(first_row);
        Checkpoint {
            height: self.height,
            first_row,
            saved: self.cells[first_row * self.columns..end * self.columns].to_vec(),
        }
    }

    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.cells.truncate(checkpoint.height * self.columns);
        self.height = checkpoint.height;
        let start = checkpoint.first_row * self.columns;
        self.cells[start..start + checkpoint.saved.len()].copy_from_slice(&checkpoint.saved);
    }

    fn fill(&mut self, row: usize, col: usize, height: usize, width: usize) {
        for r in row..row + height {
            let start = r * self.columns + col;
            self.cells[start..start + width].fill(true);
        }
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for &cell in row {
                f.write_str(if cell { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
