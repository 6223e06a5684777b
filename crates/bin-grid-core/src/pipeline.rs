use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::GridConfig;
use crate::error::{GridPackError, Result};
use crate::model::{Item, PackResult, Placement};
use crate::packer::GridPacker;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Rejects bad input before anything is placed: a zero column count, a zero item dimension, or
/// an item wider than the grid.
pub fn validate_items<K>(items: &[Item<K>], columns: u32) -> Result<()> {
    if columns == 0 {
        return Err(GridPackError::InvalidConfiguration(
            "column count must be at least 1".into(),
        ));
    }
    for (index, item) in items.iter().enumerate() {
        if item.width == 0 || item.height == 0 {
            return Err(GridPackError::InvalidConfiguration(format!(
                "item {} has a zero dimension ({}x{})",
                index, item.width, item.height
            )));
        }
    }
    if let Some((index, item)) = items.iter().enumerate().find(|(_, it)| it.width > columns) {
        return Err(GridPackError::ItemTooWide {
            index,
            width: item.width,
            columns,
        });
    }
    Ok(())
}

#[instrument(skip_all, fields(items = items.len(), columns = columns))]
/// Packs `items` in input order onto a grid of `columns` columns.
///
/// Either every item receives a placement or the call fails; nothing partial is returned.
pub fn pack<K>(items: Vec<Item<K>>, columns: u32) -> Result<PackResult<K>> {
    validate_items(&items, columns)?;

    // Rough row estimate so the buffer rarely reallocates.
    let area: u64 = items.iter().map(Item::area).sum();
    let rows_hint = (area / columns as u64) as usize + 1;
    let mut packer = GridPacker::with_row_capacity(columns, rows_hint);

    let mut placements = Vec::with_capacity(items.len());
    for item in items {
        let (pos, _) = packer.push(item.width, item.height)?;
        placements.push(Placement {
            key: item.key,
            row: pos.row,
            col: pos.col,
            width: item.width,
            height: item.height,
        });
    }

    let grid = packer.into_grid();
    let grid_height = grid.height() as u32;
    debug!(
        placed = placements.len(),
        grid_height,
        used = grid.used_cells(),
        "pack finished"
    );
    Ok(PackResult {
        placements,
        grid_height,
        columns,
        grid,
    })
}

/// Packs `(key, width, height)` tuples with the column count resolved from `cfg`.
pub fn pack_layout<K: Into<String>>(
    items: Vec<(K, u32, u32)>,
    cfg: &GridConfig,
) -> Result<PackResult<String>> {
    cfg.validate()?;
    let items: Vec<Item<String>> = items
        .into_iter()
        .map(|(k, w, h)| Item::new(k.into(), w, h))
        .collect();
    let widest = items.iter().map(|it| it.width).max().unwrap_or(0);
    let columns = cfg.resolve_columns(widest)?;
    pack(items, columns)
}

/// Summary of one run in a column sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepEntry {
    pub columns: u32,
    pub grid_height: u32,
    pub occupancy: f64,
    pub fillers: usize,
}

impl<K> From<&PackResult<K>> for SweepEntry {
    fn from(r: &PackResult<K>) -> Self {
        let stats = r.stats();
        Self {
            columns: r.columns,
            grid_height: r.grid_height,
            occupancy: stats.occupancy,
            fillers: stats.num_fillers,
        }
    }
}

#[instrument(skip_all, fields(items = items.len()))]
/// Packs the same items once per column count in `columns`, each run on its own grid.
///
/// With the `parallel` feature the runs are evaluated on the rayon pool; output order always
/// follows the range.
pub fn pack_sweep<K>(items: &[Item<K>], columns: RangeInclusive<u32>) -> Result<Vec<SweepEntry>>
where
    K: Clone + Send + Sync,
{
    let run = |c: u32| pack(items.to_vec(), c).map(|r| SweepEntry::from(&r));

    #[cfg(feature = "parallel")]
    let entries: Result<Vec<SweepEntry>> = columns.into_par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let entries: Result<Vec<SweepEntry>> = columns.map(run).collect();

    let entries = entries?;
    debug!(runs = entries.len(), "sweep finished");
    Ok(entries)
}
