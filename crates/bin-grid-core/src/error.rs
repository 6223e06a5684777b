use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridPackError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Item {index} is {width} cells wide but the grid only has {columns} columns")]
    ItemTooWide {
        index: usize,
        width: u32,
        columns: u32,
    },
    #[error("Nothing to lay out")]
    Empty,
}

pub type Result<T> = std::result::Result<T, GridPackError>;
