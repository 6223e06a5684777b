use bin_grid_core::model::{CellPos, Item};
use bin_grid_core::packer::OccupancyGrid;
use bin_grid_core::{detect_fillers, detect_fillers_in, pack};

fn grid_from(rows: &[&str]) -> OccupancyGrid {
    let matrix: Vec<Vec<bool>> = rows
        .iter()
        .map(|r| r.chars().map(|c| c == '#').collect())
        .collect();
    OccupancyGrid::from_rows(rows[0].len(), &matrix).unwrap()
}

#[test]
fn free_cell_above_occupied_is_a_filler() {
    let g = grid_from(&["###.", "####"]);
    assert_eq!(detect_fillers(&g), vec![CellPos::new(0, 3)]);
}

#[test]
fn free_cell_in_bottom_row_is_open() {
    let g = grid_from(&["###."]);
    assert!(detect_fillers(&g).is_empty());

    let g = grid_from(&["####", "###."]);
    assert!(detect_fillers(&g).is_empty());
}

#[test]
fn trailing_run_below_last_item_is_open() {
    // column 1 is occupied on top and free all the way down
    let g = grid_from(&["##", "#.", "#."]);
    assert!(detect_fillers(&g).is_empty());
}

#[test]
fn occupied_cell_closes_the_column_for_everything_above() {
    let g = grid_from(&["..#", "..#", "#..", "#.#"]);
    // column 0: rows 0-1 sit above the item at row 2
    // column 1: free to the bottom
    // column 2: row 2 sits above the item at row 3
    assert_eq!(
        detect_fillers(&g),
        vec![CellPos::new(0, 0), CellPos::new(1, 0), CellPos::new(2, 2)]
    );
}

#[test]
fn matrix_entry_point_validates_shape() {
    let rows = vec![vec![false, true], vec![true, true]];
    assert_eq!(
        detect_fillers_in(&rows, 2).unwrap(),
        vec![CellPos::new(0, 0)]
    );
    assert!(detect_fillers_in(&rows, 3).is_err());
    assert!(detect_fillers_in(&rows, 0).is_err());
}

#[test]
fn fillers_of_a_packed_layout() {
    let items = vec![
        Item::new("a", 3, 1),
        Item::new("b", 4, 2),
        Item::new("c", 2, 1),
    ];
    let out = pack(items, 4).unwrap();
    // a: (0,0); b: overflow to (1,0); c: row 0 has one free cell, so it lands on row 3
    assert_eq!(out.grid.to_string(), "###.\n####\n####\n##..\n");
    assert_eq!(out.fillers(), vec![CellPos::new(0, 3)]);
    assert_eq!(out.stats().num_fillers, 1);
}
