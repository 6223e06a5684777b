use serde::{Deserialize, Serialize};

use crate::packer::occupancy::OccupancyGrid;

/// An item to pack, sized in grid cells. `key` is handed back untouched in the placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item<K = String> {
    pub key: K,
    /// Span in columns.
    pub width: u32,
    /// Span in rows.
    pub height: u32,
}

impl<K> Item<K> {
    pub fn new(key: K, width: u32, height: u32) -> Self {
        Self { key, width, height }
    }
    pub fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }
}

/// A cell coordinate. Ordering is row-major (row first, then column).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    /// True if `r` lies entirely within `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
}

/// Where an item ended up, in cell units. `(row, col)` is the top-left cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<K = String> {
    pub key: K,
    pub row: u32,
    pub col: u32,
    pub width: u32,
    pub height: u32,
}

impl<K> Placement<K> {
    pub fn anchor(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }
    /// Exclusive bottom row (`row + height`).
    pub fn row_end(&self) -> u32 {
        self.row + self.height
    }
    /// Exclusive right column (`col + width`).
    pub fn col_end(&self) -> u32 {
        self.col + self.width
    }
    pub fn overlaps<J>(&self, other: &Placement<J>) -> bool {
        !(self.col >= other.col_end()
            || other.col >= self.col_end()
            || self.row >= other.row_end()
            || other.row >= self.row_end())
    }
    pub fn contains_cell(&self, cell: CellPos) -> bool {
        (self.row..self.row_end()).contains(&cell.row)
            && (self.col..self.col_end()).contains(&cell.col)
    }
}

/// Result of one packing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackResult<K = String> {
    /// One placement per input item, in input order.
    pub placements: Vec<Placement<K>>,
    /// Final grid height in rows.
    pub grid_height: u32,
    pub columns: u32,
    /// Final occupancy, kept for filler detection and rendering.
    pub grid: OccupancyGrid,
}

impl<K> PackResult<K> {
    /// Enclosed free cells of the final grid, row-major.
    pub fn fillers(&self) -> Vec<CellPos> {
        crate::fillers::detect_fillers(&self.grid)
    }

    pub fn meta(&self) -> Meta {
        Meta {
            schema_version: "1".into(),
            app: "bin-grid".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            columns: self.columns,
            grid_height: self.grid_height,
        }
    }

    /// Computes packing statistics for this result.
    pub fn stats(&self) -> PackStats {
        let total_cells = (self.columns as u64) * (self.grid_height as u64);
        let used_cells: u64 = self
            .placements
            .iter()
            .map(|p| (p.width as u64) * (p.height as u64))
            .sum();
        let occupancy = if total_cells > 0 {
            used_cells as f64 / total_cells as f64
        } else {
            0.0
        };
        PackStats {
            num_items: self.placements.len(),
            columns: self.columns,
            grid_height: self.grid_height,
            total_cells,
            used_cells,
            occupancy,
            num_fillers: self.fillers().len(),
        }
    }
}

/// Export-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meta {
    /// Schema version of the JSON export; current: "1".
    pub schema_version: String,
    pub app: String,
    pub version: String,
    pub columns: u32,
    pub grid_height: u32,
}

/// Statistics about grid packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    pub num_items: usize,
    pub columns: u32,
    pub grid_height: u32,
    /// `columns * grid_height`.
    pub total_cells: u64,
    /// Sum of item areas.
    pub used_cells: u64,
    /// used_cells / total_cells (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
    /// Enclosed gaps a renderer would fill.
    pub num_fillers: usize,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Items: {}, Grid: {}x{}, Occupancy: {:.2}%, Used: {} cells, Fillers: {}",
            self.num_items,
            self.columns,
            self.grid_height,
            self.occupancy * 100.0,
            self.used_cells,
            self.num_fillers,
        )
    }

    /// Returns free cells inside the grid.
    pub fn wasted_cells(&self) -> u64 {
        self.total_cells.saturating_sub(self.used_cells)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_cells > 0 {
            (self.wasted_cells() as f64 / self.total_cells as f64) * 100.0
        } else {
            0.0
        }
    }
}
