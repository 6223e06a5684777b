//! Pixel layout on top of the cell packer.
//!
//! `GridLayout` stands in for the component that owns the grid on screen: it keeps the item list
//! and the [`GridConfig`], derives a column count from the available width, and turns cell
//! placements into pixel boxes. Config changes go through setters and are broadcast to listeners
//! registered with [`GridLayout::on_change`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GridConfig;
use crate::error::{GridPackError, Result};
use crate::model::{CellPos, Item, Rect};
use crate::pipeline::pack;

/// An item as declared by the host, spans in cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutItem<K = String> {
    pub key: K,
    pub cols: u32,
    pub rows: u32,
    /// Hidden items take no space and receive no box.
    #[serde(default)]
    pub hidden: bool,
}

impl<K> LayoutItem<K> {
    pub fn new(key: K, cols: u32, rows: u32) -> Self {
        Self {
            key,
            cols,
            rows,
            hidden: false,
        }
    }
    pub fn hidden(mut self, v: bool) -> Self {
        self.hidden = v;
        self
    }
}

/// Which config field a listener is being told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    CellSize,
    GutterSize,
    Columns,
    ContainerWidth,
    Fillers,
}

pub type ChangeListener = Box<dyn FnMut(ConfigField, &GridConfig)>;

/// A positioned item box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutBox<K = String> {
    pub key: K,
    pub cell: CellPos,
    pub rect: Rect,
}

/// Everything a renderer needs after one reflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutOutput<K = String> {
    pub columns: u32,
    pub grid_height: u32,
    /// Container size in pixels.
    pub width: u32,
    pub height: u32,
    /// Visible items only, in declaration order.
    pub boxes: Vec<LayoutBox<K>>,
    /// One-cell boxes covering enclosed gaps. Empty when fillers are disabled.
    pub fillers: Vec<Rect>,
}

impl<K> LayoutOutput<K> {
    /// The container as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

pub struct GridLayout<K = String> {
    config: GridConfig,
    items: Vec<LayoutItem<K>>,
    listeners: Vec<ChangeListener>,
}

impl<K: Clone> GridLayout<K> {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn items(&self) -> &[LayoutItem<K>] {
        &self.items
    }

    pub fn push_item(&mut self, item: LayoutItem<K>) {
        self.items.push(item);
    }

    pub fn set_items(&mut self, items: Vec<LayoutItem<K>>) {
        self.items = items;
    }

    pub fn on_change(&mut self, listener: impl FnMut(ConfigField, &GridConfig) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn set_cell_size(&mut self, v: u32) {
        if self.config.cell_size != v {
            self.config.cell_size = v;
            self.notify(ConfigField::CellSize);
        }
    }

    pub fn set_gutter_size(&mut self, v: u32) {
        if self.config.gutter_size != v {
            self.config.gutter_size = v;
            self.notify(ConfigField::GutterSize);
        }
    }

    pub fn set_columns(&mut self, v: Option<u32>) {
        if self.config.columns != v {
            self.config.columns = v;
            self.notify(ConfigField::Columns);
        }
    }

    pub fn set_container_width(&mut self, v: Option<u32>) {
        if self.config.container_width != v {
            self.config.container_width = v;
            self.notify(ConfigField::ContainerWidth);
        }
    }

    pub fn set_fillers(&mut self, v: bool) {
        if self.config.fillers != v {
            self.config.fillers = v;
            self.notify(ConfigField::Fillers);
        }
    }

    fn notify(&mut self, field: ConfigField) {
        for listener in &mut self.listeners {
            listener(field, &self.config);
        }
    }

    fn widest_visible(&self) -> u32 {
        self.items
            .iter()
            .filter(|it| !it.hidden)
            .map(|it| it.cols)
            .max()
            .unwrap_or(0)
    }

    /// Columns for a container `width_px` wide, at least as many as the widest visible item.
    pub fn columns_for_width(&self, width_px: u32) -> u32 {
        self.config
            .columns_for_width(width_px, self.widest_visible())
    }

    /// Packs the visible items for the configured container width.
    pub fn layout(&self) -> Result<LayoutOutput<K>> {
        let width = self.config.container_width.unwrap_or(0);
        self.reflow(width)
    }

    /// Packs the visible items for a container `width_px` wide and converts the result to pixels.
    ///
    /// A fixed `columns` in the config wins over the width.
    pub fn reflow(&self, width_px: u32) -> Result<LayoutOutput<K>> {
        self.config.validate()?;
        let columns = match self.config.columns {
            Some(c) => c,
            None => self.columns_for_width(width_px),
        };
        if columns == 0 {
            return Err(GridPackError::Empty);
        }

        let items: Vec<Item<K>> = self
            .items
            .iter()
            .filter(|it| !it.hidden)
            .map(|it| Item::new(it.key.clone(), it.cols, it.rows))
            .collect();
        let result = pack(items, columns)?;

        let cfg = &self.config;
        let boxes = result
            .placements
            .iter()
            .map(|p| LayoutBox {
                key: p.key.clone(),
                cell: p.anchor(),
                rect: Rect::new(
                    cfg.offset_px(p.col),
                    cfg.offset_px(p.row),
                    cfg.span_px(p.width),
                    cfg.span_px(p.height),
                ),
            })
            .collect();
        let fillers = if cfg.fillers {
            result
                .fillers()
                .into_iter()
                .map(|c| {
                    Rect::new(
                        cfg.offset_px(c.col),
                        cfg.offset_px(c.row),
                        cfg.cell_size,
                        cfg.cell_size,
                    )
                })
                .collect()
        } else {
            Vec::new()
        };

        let out = LayoutOutput {
            columns,
            grid_height: result.grid_height,
            width: cfg.span_px(columns),
            height: cfg.span_px(result.grid_height),
            boxes,
            fillers,
        };
        debug!(
            width_px,
            columns,
            rows = out.grid_height,
            fillers = out.fillers.len(),
            "reflow"
        );
        Ok(out)
    }
}
