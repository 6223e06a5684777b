use bin_grid_core::packer::{Conflict, OccupancyGrid};

fn grid_from(rows: &[&str]) -> OccupancyGrid {
    let columns = rows[0].len();
    let matrix: Vec<Vec<bool>> = rows
        .iter()
        .map(|r| r.chars().map(|c| c == '#').collect())
        .collect();
    OccupancyGrid::from_rows(columns, &matrix).expect("valid matrix")
}

#[test]
fn push_row_appends_free_cells() {
    let mut g = OccupancyGrid::new(5);
    assert!(g.is_empty());
    g.push_row();
    g.push_row();
    assert_eq!(g.height(), 2);
    assert_eq!(g.row(1), Some(&[false; 5][..]));
    assert_eq!(g.used_cells(), 0);
    assert_eq!(g.row(2), None);
}

#[test]
fn try_place_leaves_original_untouched() {
    let g = grid_from(&["#...", "...."]);
    let before = g.clone();
    let next = g.try_place(0, 1, 3, 2).expect("fits");
    assert_eq!(g, before);
    assert_eq!(next.height(), 3);
    assert_eq!(next.to_string(), "###.\n.##.\n.##.\n");
}

#[test]
fn try_place_rejects_column_overflow_and_occupied_cells() {
    let g = grid_from(&["#...", "..#."]);
    assert!(g.try_place(0, 3, 1, 2).is_none());
    assert!(g.try_place(0, 0, 1, 1).is_none());
    assert!(g.try_place(0, 1, 2, 2).is_none());
    assert!(g.try_place(0, 1, 1, 3).is_some());
}

#[test]
fn probe_reports_resulting_height() {
    let g = grid_from(&["##..", "...."]);
    assert_eq!(g.probe(0, 2, 1, 2), Some(2));
    assert_eq!(g.probe(1, 0, 3, 4), Some(4));
    assert_eq!(g.probe(0, 1, 1, 1), None);
    // anchors below the bottom row are free space
    assert_eq!(g.probe(5, 0, 1, 1), Some(6));
}

#[test]
fn probe_agrees_with_try_place() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let columns = 6;
    let matrix: Vec<Vec<bool>> = (0..5)
        .map(|_| (0..columns).map(|_| rng.gen_bool(0.35)).collect())
        .collect();
    let g = OccupancyGrid::from_rows(columns, &matrix).unwrap();
    for row in 0..6 {
        for col in 0..columns {
            for h in 1..=3 {
                for w in 1..=3 {
                    let probed = g.probe(row, col, h, w);
                    let placed = g.try_place(row, col, h, w);
                    assert_eq!(probed, placed.as_ref().map(|p| p.height()));
                }
            }
        }
    }
}

#[test]
fn place_rolls_back_on_conflict() {
    let mut g = grid_from(&["....", "...#"]);
    let before = g.clone();
    // reaches row 3 and collides at (1, 3) after growing and marking earlier cells
    let err = g.place(0, 2, 4, 2).unwrap_err();
    assert_eq!(err, Conflict::Occupied { row: 1, col: 3 });
    assert_eq!(g, before);
    assert_eq!(g.height(), 2);
}

#[test]
fn place_rejects_overflow_without_growing() {
    let mut g = OccupancyGrid::new(3);
    let err = g.place(0, 0, 2, 4).unwrap_err();
    assert!(matches!(err, Conflict::OutOfColumns { columns: 3, .. }));
    assert!(g.is_empty());
}

#[test]
fn checkpoint_restores_only_saved_rows() {
    let mut g = grid_from(&["#...", "....", "...."]);
    let cp = g.checkpoint(1..4);
    assert_eq!(cp.height(), 3);
    g.place(1, 0, 3, 2).unwrap();
    assert_eq!(g.height(), 4);
    g.rollback(cp);
    assert_eq!(g.to_string(), "#...\n....\n....\n");
}

#[test]
fn from_rows_validates_shape() {
    assert!(OccupancyGrid::from_rows(0, &[]).is_err());
    assert!(OccupancyGrid::from_rows(3, &[vec![false; 3], vec![false; 2]]).is_err());
}

#[test]
fn grid_survives_a_json_trip() {
    let g = grid_from(&["##.", ".#."]);
    let text = serde_json::to_string(&g).unwrap();
    let back: OccupancyGrid = serde_json::from_str(&text).unwrap();
    assert_eq!(back, g);
    assert_eq!(back.to_string(), "##.\n.#.\n");
}

#[test]
fn malformed_grid_is_rejected_on_load() {
    // three rows of four need twelve cells
    let short = r#"{"columns":4,"height":3,"cells":[false,false]}"#;
    let err = serde_json::from_str::<OccupancyGrid>(short).unwrap_err();
    assert!(err.to_string().contains("3 rows x 4 columns"), "{}", err);

    let zero_columns = r#"{"columns":0,"height":0,"cells":[]}"#;
    assert!(serde_json::from_str::<OccupancyGrid>(zero_columns).is_err());

    let overflow = format!(
        r#"{{"columns":{},"height":2,"cells":[]}}"#,
        usize::MAX
    );
    assert!(serde_json::from_str::<OccupancyGrid>(&overflow).is_err());
}

#[test]
fn malformed_pack_result_is_rejected_on_load() {
    let out = bin_grid_core::pack(vec![bin_grid_core::model::Item::new("a", 2, 2)], 3).unwrap();
    let mut v = serde_json::to_value(&out).unwrap();
    v["grid"]["cells"] = serde_json::json!([true, true]);
    assert!(serde_json::from_value::<bin_grid_core::model::PackResult>(v).is_err());
}
