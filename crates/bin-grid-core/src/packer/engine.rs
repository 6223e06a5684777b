use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::occupancy::OccupancyGrid;
use crate::error::{GridPackError, Result};
use crate::model::CellPos;

/// How an item was fitted into the grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Fits at an anchor inside the existing rows without growing the grid.
    Anchored,
    /// Anchored in an existing row but reaches below the current bottom.
    Extended,
    /// Nothing fit; placed at column 0 of a new bottom row.
    Overflow,
}

/// A feasible anchor found while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub row: usize,
    pub col: usize,
    /// Grid height after committing this candidate.
    pub resulting_height: usize,
}

impl Candidate {
    /// Lower ranks first: fewer rows, then higher on the grid, then further right.
    fn rank(&self) -> (usize, usize, Reverse<usize>) {
        (self.resulting_height, self.row, Reverse(self.col))
    }
}

/// Picks the winning candidate: fewest resulting rows, then smallest row, then largest column.
pub fn select_candidate(candidates: &[Candidate]) -> Option<Candidate> {
    candidates.iter().copied().min_by_key(Candidate::rank)
}

/// Greedy online packer over a fixed column count.
///
/// Items are fitted one by one in the order they are pushed; earlier placements never move.
pub struct GridPacker {
    columns: u32,
    grid: OccupancyGrid,
    candidates: Vec<Candidate>,
    pushed: usize,
}

impl GridPacker {
    pub fn new(columns: u32) -> Self {
        Self::from_grid(OccupancyGrid::new(columns as usize))
    }

    pub fn with_row_capacity(columns: u32, rows: usize) -> Self {
        Self::from_grid(OccupancyGrid::with_row_capacity(columns as usize, rows))
    }

    /// Continues packing on top of an existing grid.
    pub fn from_grid(grid: OccupancyGrid) -> Self {
        Self {
            columns: grid.columns() as u32,
            grid,
            candidates: Vec::new(),
            pushed: 0,
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn into_grid(self) -> OccupancyGrid {
        self.grid
    }

    /// All candidates for a `width x height` item against the current grid, top row first.
    ///
    /// A row contributes at most one candidate: its first free column where the item fits.
    pub fn candidates(&self, width: u32, height: u32) -> Vec<Candidate> {
        let mut out = Vec::new();
        self.scan_into(width as usize, height as usize, &mut out);
        out
    }

    fn scan_into(&self, width: usize, height: usize, out: &mut Vec<Candidate>) {
        out.clear();
        let columns = self.grid.columns();
        for row in 0..self.grid.height() {
            for col in 0..columns {
                if col + width > columns {
                    break;
                }
                if self.grid.is_occupied(row, col) {
                    continue;
                }
                if let Some(resulting_height) = self.grid.probe(row, col, height, width) {
                    out.push(Candidate {
                        row,
                        col,
                        resulting_height,
                    });
                    break;
                }
            }
        }
    }

    /// Fits the next item and returns its top-left cell.
    pub fn push(&mut self, width: u32, height: u32) -> Result<(CellPos, Outcome)> {
        let index = self.pushed;
        if width == 0 || height == 0 {
            return Err(GridPackError::InvalidConfiguration(format!(
                "item {} has a zero dimension ({}x{})",
                index, width, height
            )));
        }
        let (w, h) = (width as usize, height as usize);

        let mut candidates = std::mem::take(&mut self.candidates);
        self.scan_into(w, h, &mut candidates);
        let winner = select_candidate(&candidates);
        self.candidates = candidates;

        let before = self.grid.height();
        let (row, col, outcome) = match winner {
            Some(c) => {
                let outcome = if c.resulting_height > before {
                    Outcome::Extended
                } else {
                    Outcome::Anchored
                };
                (c.row, c.col, outcome)
            }
            None => (before, 0, Outcome::Overflow),
        };
        self.grid
            .place(row, col, h, w)
            .map_err(|_| GridPackError::ItemTooWide {
                index,
                width,
                columns: self.columns,
            })?;
        self.pushed += 1;

        trace!(
            index,
            row,
            col,
            ?outcome,
            candidates = self.candidates.len(),
            height = self.grid.height(),
            "item placed"
        );
        Ok((CellPos::new(row as u32, col as u32), outcome))
    }
}
