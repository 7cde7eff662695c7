//! The on-disk store: one SQLite file holding a catalog, its similarity
//! matrix, and the metadata describing how they were built.

pub mod meta;
pub mod migrations;
pub mod store;

pub use meta::{BuildParams, SourceFingerprint, StoreMeta, FORMAT_VERSION};
pub use store::Store;
