//! Catalog ingestion and build pipeline for verso.
//!
//! Reads the source song table, samples it, runs the similarity pipeline
//! and keeps the result in a single-file store so later runs can skip the
//! expensive part.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;

pub use cache::{load_or_build, rebuild, Library, Origin};
pub use config::Config;
pub use error::{EtlError, EtlResult};
pub use pipeline::{build_from_source, build_recommender};
