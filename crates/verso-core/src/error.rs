use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("matrix dimension {matrix} does not match catalog size {rows}")]
    DimensionMismatch { rows: usize, matrix: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("{} is a database but not a verso store; refusing to modify it", .0.display())]
    ForeignDatabase(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
