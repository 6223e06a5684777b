use crate::error::Result;
use crate::model::CellPos;
use crate::packer::occupancy::OccupancyGrid;

/// Finds free cells that sit above an occupied cell in the same column.
///
/// Walks the grid bottom-up keeping one "open to the bottom" flag per column. The first occupied
/// cell met in a column closes it; every free cell above that point is a filler. Free runs that
/// reach the bottom row are trailing space and are not reported.
///
/// Result is row-major.
pub fn detect_fillers(grid: &OccupancyGrid) -> Vec<CellPos> {
    let columns = grid.columns();
    let mut open = vec![true; columns];
    let mut fillers = Vec::new();
    for row in (0..grid.height()).rev() {
        for (col, is_open) in open.iter_mut().enumerate() {
            if grid.is_occupied(row, col) {
                *is_open = false;
            } else if !*is_open {
                fillers.push(CellPos::new(row as u32, col as u32));
            }
        }
    }
    fillers.sort_unstable();
    fillers
}

/// [`detect_fillers`] over a caller-owned matrix (`true` = occupied).
pub fn detect_fillers_in(rows: &[Vec<bool>], columns: u32) -> Result<Vec<CellPos>> {
    let grid = OccupancyGrid::from_rows(columns as usize, rows)?;
    Ok(detect_fillers(&grid))
}
