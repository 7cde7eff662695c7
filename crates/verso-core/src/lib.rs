//! Core domain model for verso.
//!
//! This crate defines the song catalog, the dense similarity matrix that
//! is aligned with it, and the single-file SQLite store that persists the
//! two together.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod schema;

pub use error::{Error, Result};
pub use model::{Catalog, SimilarityMatrix, Song};
pub use schema::{BuildParams, SourceFingerprint, Store, StoreMeta, FORMAT_VERSION};
