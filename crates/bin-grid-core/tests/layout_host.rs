use std::cell::RefCell;
use std::rc::Rc;

use bin_grid_core::config::GridConfig;
use bin_grid_core::error::GridPackError;
use bin_grid_core::layout::{ConfigField, GridLayout, LayoutItem};
use bin_grid_core::model::{CellPos, Rect};

fn layout_with(items: Vec<LayoutItem<&'static str>>) -> GridLayout<&'static str> {
    let mut layout = GridLayout::new(GridConfig::default());
    layout.set_items(items);
    layout
}

#[test]
fn columns_follow_available_width() {
    let layout = layout_with(vec![LayoutItem::new("a", 1, 1)]);
    // stride is 100 + 5
    assert_eq!(layout.columns_for_width(430), 4);
    assert_eq!(layout.columns_for_width(419), 3);
    assert_eq!(layout.columns_for_width(420), 4);
}

#[test]
fn columns_never_drop_below_widest_visible_item() {
    let layout = layout_with(vec![
        LayoutItem::new("banner", 3, 1),
        LayoutItem::new("huge", 6, 1).hidden(true),
    ]);
    assert_eq!(layout.columns_for_width(150), 3);
    assert_eq!(layout.columns_for_width(2000), 19);
}

#[test]
fn reflow_positions_boxes_in_pixels() {
    let layout = layout_with(vec![
        LayoutItem::new("a", 2, 1),
        LayoutItem::new("b", 2, 1),
        LayoutItem::new("c", 1, 2),
    ]);
    let out = layout.reflow(430).unwrap();
    assert_eq!(out.columns, 4);
    assert_eq!(out.grid_height, 3);
    assert_eq!((out.width, out.height), (415, 310));

    assert_eq!(out.boxes[0].rect, Rect::new(0, 0, 205, 100));
    assert_eq!(out.boxes[1].rect, Rect::new(210, 0, 205, 100));
    assert_eq!(out.boxes[2].cell, CellPos::new(1, 0));
    assert_eq!(out.boxes[2].rect, Rect::new(0, 105, 100, 205));
    assert!(out.fillers.is_empty());
}

#[test]
fn hidden_items_take_no_space() {
    let layout = layout_with(vec![
        LayoutItem::new("a", 2, 1),
        LayoutItem::new("ghost", 2, 1).hidden(true),
        LayoutItem::new("b", 2, 1),
    ]);
    let out = layout.reflow(430).unwrap();
    let keys: Vec<&str> = out.boxes.iter().map(|b| b.key).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(out.boxes[1].cell, CellPos::new(0, 2));
    assert_eq!(out.grid_height, 1);
}

#[test]
fn fillers_become_one_cell_boxes() {
    let mut layout = layout_with(vec![
        LayoutItem::new("a", 3, 1),
        LayoutItem::new("b", 4, 1),
    ]);
    let out = layout.reflow(430).unwrap();
    assert_eq!(out.fillers, vec![Rect::new(315, 0, 100, 100)]);

    layout.set_fillers(false);
    let out = layout.reflow(430).unwrap();
    assert!(out.fillers.is_empty());
}

#[test]
fn fixed_columns_override_width() {
    let mut layout = layout_with(vec![LayoutItem::new("a", 1, 1)]);
    layout.set_columns(Some(2));
    let out = layout.reflow(5000).unwrap();
    assert_eq!(out.columns, 2);
    assert_eq!(out.width, 205);
}

#[test]
fn empty_host_with_no_room_is_an_error() {
    let layout = layout_with(vec![LayoutItem::new("ghost", 1, 1).hidden(true)]);
    assert_eq!(layout.reflow(50).unwrap_err(), GridPackError::Empty);

    let out = layout.reflow(430).unwrap();
    assert!(out.boxes.is_empty());
    assert_eq!((out.width, out.height), (415, 0));
}

#[test]
fn setters_notify_listeners_on_real_changes_only() {
    let seen: Rc<RefCell<Vec<(ConfigField, u32)>>> = Rc::new(RefCell::new(Vec::new()));
    let mut layout: GridLayout<String> = GridLayout::new(GridConfig::default());
    let sink = seen.clone();
    layout.on_change(move |field, cfg| sink.borrow_mut().push((field, cfg.stride())));

    layout.set_cell_size(50);
    layout.set_cell_size(50);
    layout.set_gutter_size(10);
    layout.set_fillers(true);
    layout.set_container_width(Some(300));

    assert_eq!(
        *seen.borrow(),
        vec![
            (ConfigField::CellSize, 55),
            (ConfigField::GutterSize, 60),
            (ConfigField::ContainerWidth, 60),
        ]
    );
    assert_eq!(layout.config().cell_size, 50);
}

#[test]
fn layout_uses_configured_container_width() {
    let mut layout = layout_with(vec![LayoutItem::new("a", 1, 1), LayoutItem::new("b", 1, 1)]);
    layout.set_container_width(Some(210));
    let out = layout.layout().unwrap();
    assert_eq!(out.columns, 2);
    assert_eq!(out.grid_height, 1);
}

#[test]
fn boxes_and_fillers_stay_inside_the_container() {
    let mut layout = layout_with(vec![
        LayoutItem::new("a", 3, 1),
        LayoutItem::new("b", 4, 2),
        LayoutItem::new("c", 1, 3),
        LayoutItem::new("d", 2, 1),
    ]);
    layout.set_gutter_size(7);
    let out = layout.reflow(430).unwrap();
    let bounds = out.bounds();
    assert_eq!(bounds, Rect::new(0, 0, out.width, out.height));
    assert!(!out.fillers.is_empty());
    for b in &out.boxes {
        assert!(bounds.contains(&b.rect), "{} at {:?}", b.key, b.rect);
    }
    for f in &out.fillers {
        assert!(bounds.contains(f));
    }
    // a box one pixel wider than the container is not contained
    let last = out.boxes.iter().map(|b| b.rect).max_by_key(|r| r.right()).unwrap();
    assert_eq!(last.right(), bounds.right());
    assert!(!bounds.contains(&Rect::new(last.x, last.y, last.w + 1, last.h)));
}
