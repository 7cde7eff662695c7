//! Error types for ingestion and the build pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading the source table or building a
/// library from it.
#[derive(Debug, Error)]
pub enum EtlError {
    /// The source table could not be opened or parsed.
    #[error("failed to read {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// A required column is absent from the header row.
    #[error("missing column '{column}' in {} (available: {available})", .path.display())]
    MissingColumn {
        column: &'static str,
        path: PathBuf,
        available: String,
    },

    /// A record is missing a field the header promised.
    #[error("malformed record at line {line}: {message}")]
    Record { line: u64, message: String },

    /// The source table has a header but no songs.
    #[error("no songs found in {}", .0.display())]
    EmptySource(PathBuf),

    /// An error propagated from the store.
    #[error("store error: {0}")]
    Store(#[from] verso_core::Error),

    /// An error propagated from vectorization or search.
    #[error("search error: {0}")]
    Search(#[from] verso_search::SearchError),
}

/// Convenience alias for pipeline results.
pub type EtlResult<T> = std::result::Result<T, EtlError>;
