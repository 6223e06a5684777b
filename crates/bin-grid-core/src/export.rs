use crate::layout::LayoutOutput;
use crate::model::PackResult;
use serde_json::{Value, json};

/// Serialize a pack as `{ placements, fillers, meta }` (array style, input order).
pub fn to_json<K: ToString>(result: &PackResult<K>) -> Value {
    let placements = result
        .placements
        .iter()
        .map(|p| {
            json!({
                "key": p.key.to_string(),
                "row": p.row,
                "col": p.col,
                "width": p.width,
                "height": p.height,
            })
        })
        .collect::<Vec<_>>();
    let fillers = result
        .fillers()
        .iter()
        .map(|c| json!({"row": c.row, "col": c.col}))
        .collect::<Vec<_>>();
    json!({
        "placements": placements,
        "gridHeight": result.grid_height,
        "columns": result.columns,
        "fillers": fillers,
        "meta": result.meta(),
    })
}

/// Placements keyed by item name: `{ items: { name: { row, col, width, height, order } }, ... }`.
/// Later duplicates of a key overwrite earlier ones.
pub fn to_json_hash<K: ToString>(result: &PackResult<K>) -> Value {
    let mut items = serde_json::Map::new();
    for (order, p) in result.placements.iter().enumerate() {
        items.insert(
            p.key.to_string(),
            json!({
                "row": p.row,
                "col": p.col,
                "width": p.width,
                "height": p.height,
                "order": order,
            }),
        );
    }
    let fillers = result
        .fillers()
        .iter()
        .map(|c| json!([c.row, c.col]))
        .collect::<Vec<_>>();
    json!({
        "items": items,
        "gridHeight": result.grid_height,
        "columns": result.columns,
        "fillers": fillers,
        "meta": result.meta(),
    })
}

/// Pixel boxes for a renderer: `{ size, boxes: [{ key, frame }], fillers: [frame] }`.
pub fn layout_to_json<K: ToString>(layout: &LayoutOutput<K>) -> Value {
    let boxes = layout
        .boxes
        .iter()
        .map(|b| {
            json!({
                "key": b.key.to_string(),
                "frame": {"x": b.rect.x, "y": b.rect.y, "w": b.rect.w, "h": b.rect.h},
                "cell": {"row": b.cell.row, "col": b.cell.col},
            })
        })
        .collect::<Vec<_>>();
    let fillers = layout
        .fillers
        .iter()
        .map(|r| json!({"x": r.x, "y": r.y, "w": r.w, "h": r.h}))
        .collect::<Vec<_>>();
    json!({
        "size": {"w": layout.width, "h": layout.height},
        "columns": layout.columns,
        "gridHeight": layout.grid_height,
        "boxes": boxes,
        "fillers": fillers,
    })
}

const GLYPHS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Empties the `fillers` array of a [`to_json`], [`to_json_hash`] or [`layout_to_json`] value.
pub fn drop_fillers(value: &mut Value) {
    if let Some(fillers) = value.get_mut("fillers") {
        *fillers = Value::Array(Vec::new());
    }
}

/// Draws the grid as text: each item gets a glyph by input order (cycling after 62),
/// fillers are `+`, other free cells `.`.
pub fn to_ascii<K>(result: &PackResult<K>) -> String {
    to_ascii_with(result, true)
}

/// [`to_ascii`], drawing fillers as plain free cells when `fillers` is false.
pub fn to_ascii_with<K>(result: &PackResult<K>, fillers: bool) -> String {
    let columns = result.columns as usize;
    let rows = result.grid_height as usize;
    let mut canvas = vec![b'.'; columns * rows];
    let mut paint = |row: u32, col: u32, glyph: u8| {
        let (row, col) = (row as usize, col as usize);
        if row < rows && col < columns {
            canvas[row * columns + col] = glyph;
        }
    };
    if fillers {
        for c in result.fillers() {
            paint(c.row, c.col, b'+');
        }
    }
    for (i, p) in result.placements.iter().enumerate() {
        let glyph = GLYPHS[i % GLYPHS.len()];
        for r in p.row..p.row_end() {
            for c in p.col..p.col_end() {
                paint(r, c, glyph);
            }
        }
    }
    let mut s = String::with_capacity((columns + 1) * rows);
    for line in canvas.chunks(columns.max(1)) {
        s.push_str(&String::from_utf8_lossy(line));
        s.push('\n');
    }
    s
}
