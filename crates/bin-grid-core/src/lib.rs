//! Core library for packing cell-sized items onto a fixed-column grid.
//!
//! - Packer: greedy, input-ordered placement over a growable occupancy grid
//! - Fillers: enclosed free cells of the final grid, for renderers that paint gaps
//! - Layout: pixel boxes for a host with a cell size, a gutter and an available width
//! - Data model is serde-serializable; JSON and text exporters are provided.
//!
//! Quick example:
//! ```
//! use bin_grid_core::{Item, pack};
//! # fn main() -> bin_grid_core::Result<()> {
//! let items = vec![Item::new("wide", 4, 1), Item::new("a", 2, 2), Item::new("b", 1, 1)];
//! let out = pack(items, 4)?;
//! assert_eq!(out.grid_height, 3);
//! println!("{}", bin_grid_core::to_ascii(&out));
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod fillers;
pub mod layout;
pub mod model;
pub mod packer;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use fillers::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `bin_grid_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{ExportFormat, GridConfig, GridConfigBuilder};
    pub use crate::error::{GridPackError, Result};
    pub use crate::fillers::{detect_fillers, detect_fillers_in};
    pub use crate::layout::{ConfigField, GridLayout, LayoutBox, LayoutItem, LayoutOutput};
    pub use crate::model::{CellPos, Item, PackResult, PackStats, Placement, Rect};
    pub use crate::packer::{Candidate, GridPacker, OccupancyGrid, Outcome};
    pub use crate::{SweepEntry, pack, pack_layout, pack_sweep};
}
