use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{GridPackError, Result};

/// Output formats understood by the exporters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// `{ placements: [...], fillers, meta }`, placements in input order.
    Json,
    /// `{ items: { key: {...} }, fillers, meta }`, keyed by item.
    JsonHash,
    /// Pixel boxes for a renderer (cell size and gutter applied).
    Pixels,
    /// Text drawing of the grid.
    Ascii,
}

impl FromStr for ExportFormat {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "json-array" => Ok(Self::Json),
            "json-hash" | "hash" => Ok(Self::JsonHash),
            "pixels" | "px" => Ok(Self::Pixels),
            "ascii" | "text" => Ok(Self::Ascii),
            _ => Err(()),
        }
    }
}

/// Grid geometry as seen by the layout host.
///
/// Pixel values only matter when converting placements into boxes; packing itself only needs a
/// column count, which is either fixed (`columns`) or derived from `container_width`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridConfig {
    /// Side of one cell in pixels.
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    /// Space between adjacent cells in pixels.
    #[serde(default = "default_gutter_size")]
    pub gutter_size: u32,
    /// Fixed column count. Overrides `container_width` when set.
    #[serde(default)]
    pub columns: Option<u32>,
    /// Available width in pixels, used to derive the column count.
    #[serde(default)]
    pub container_width: Option<u32>,
    /// Emit filler boxes for enclosed gaps.
    #[serde(default = "default_fillers")]
    pub fillers: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            gutter_size: default_gutter_size(),
            columns: None,
            container_width: None,
            fillers: default_fillers(),
        }
    }
}

impl GridConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(GridPackError::InvalidConfiguration(
                "cell_size must be at least 1 pixel".into(),
            ));
        }
        if self.columns == Some(0) {
            return Err(GridPackError::InvalidConfiguration(
                "columns must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Distance between the origins of two adjacent cells.
    pub fn stride(&self) -> u32 {
        self.cell_size.saturating_add(self.gutter_size)
    }

    /// Columns that fit in `width_px`, never fewer than `widest` (the widest item span).
    pub fn columns_for_width(&self, width_px: u32, widest: u32) -> u32 {
        let fit = width_px / self.stride().max(1);
        fit.max(widest)
    }

    /// Column count for a pack whose widest item spans `widest` columns.
    pub fn resolve_columns(&self, widest: u32) -> Result<u32> {
        let columns = match (self.columns, self.container_width) {
            (Some(c), _) => c,
            (None, Some(w)) => self.columns_for_width(w, widest),
            (None, None) => {
                return Err(GridPackError::InvalidConfiguration(
                    "either columns or container_width must be set".into(),
                ));
            }
        };
        if columns == 0 {
            return Err(GridPackError::InvalidConfiguration(
                "resolved column count is 0".into(),
            ));
        }
        Ok(columns)
    }

    /// Pixel length of a span of `cells` cells (`cells * stride - gutter`).
    pub fn span_px(&self, cells: u32) -> u32 {
        if cells == 0 {
            return 0;
        }
        cells
            .saturating_mul(self.stride())
            .saturating_sub(self.gutter_size)
    }

    /// Pixel offset of cell index `cells`.
    pub fn offset_px(&self, cells: u32) -> u32 {
        cells.saturating_mul(self.stride())
    }
}

fn default_cell_size() -> u32 {
    100
}
fn default_gutter_size() -> u32 {
    5
}
fn default_fillers() -> bool {
    true
}

/// Builder for `GridConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct GridConfigBuilder {
    cfg: GridConfig,
}

impl GridConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: GridConfig::default(),
        }
    }
    pub fn cell_size(mut self, v: u32) -> Self {
        self.cfg.cell_size = v;
        self
    }
    pub fn gutter_size(mut self, v: u32) -> Self {
        self.cfg.gutter_size = v;
        self
    }
    pub fn columns(mut self, v: u32) -> Self {
        self.cfg.columns = Some(v);
        self
    }
    pub fn container_width(mut self, v: u32) -> Self {
        self.cfg.container_width = Some(v);
        self
    }
    pub fn fillers(mut self, v: bool) -> Self {
        self.cfg.fillers = v;
        self
    }
    pub fn build(self) -> GridConfig {
        self.cfg
    }
}

impl GridConfig {
    /// Create a fluent builder for `GridConfig`.
    pub fn builder() -> GridConfigBuilder {
        GridConfigBuilder::new()
    }
}
