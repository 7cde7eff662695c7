use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Bumped whenever the meaning of stored data changes (normalization,
/// weighting, encoding), so that older stores are rebuilt.
pub const FORMAT_VERSION: u32 = 2;

/// The knobs that determine the contents of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildParams {
    /// Number of rows sampled from the source; `None` keeps every row.
    pub sample_size: Option<usize>,
    pub seed: u64,
    pub max_features: usize,
}

/// Identifies the source table a store was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl SourceFingerprint {
    /// Fingerprint the file at `path` from its size and modification time.
    pub fn of(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            len: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    /// Whether `other` describes the same file contents. Paths are not
    /// compared, so a moved source still matches.
    #[must_use]
    pub fn same_contents(&self, other: &Self) -> bool {
        self.len == other.len && self.modified == other.modified
    }
}

/// Metadata stored alongside a catalog and its matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMeta {
    pub format_version: u32,
    pub params: BuildParams,
    pub source: SourceFingerprint,
    pub rows: usize,
    pub built_at: DateTime<Utc>,
}

impl StoreMeta {
    #[must_use]
    pub fn new(params: BuildParams, source: SourceFingerprint, rows: usize) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            params,
            source,
            rows,
            built_at: Utc::now(),
        }
    }

    /// Whether a store carrying this metadata can serve a build with
    /// `params` from `source`.
    #[must_use]
    pub fn is_compatible(&self, params: &BuildParams, source: Option<&SourceFingerprint>) -> bool {
        self.format_version == FORMAT_VERSION
            && &self.params == params
            && source.map_or(true, |s| self.source.same_contents(s))
    }
}
