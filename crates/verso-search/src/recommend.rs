//! Title lookup and ranking against a precomputed similarity matrix.

use serde::Serialize;
use verso_core::{Catalog, SimilarityMatrix};

use crate::error::SearchResult;

/// Number of recommendations returned when the caller does not ask for
/// a specific count.
pub const DEFAULT_TOP_N: usize = 5;

/// One ranked result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// 1-based position in the result list.
    pub rank: usize,
    pub artist: String,
    pub title: String,
    pub score: f32,
}

/// An immutable catalog paired with its similarity matrix.
///
/// Built once at start-up, either from a freshly computed pipeline or from
/// a store, and only read afterwards.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    similarities: SimilarityMatrix,
}

impl Recommender {
    /// Pair `catalog` with `similarities`. Fails unless the matrix has
    /// exactly one row per song.
    pub fn new(catalog: Catalog, similarities: SimilarityMatrix) -> SearchResult<Self> {
        if catalog.len() != similarities.dim() {
            return Err(verso_core::Error::DimensionMismatch {
                rows: catalog.len(),
                matrix: similarities.dim(),
            }
            .into());
        }
        Ok(Self {
            catalog,
            similarities,
        })
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn similarities(&self) -> &SimilarityMatrix {
        &self.similarities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Songs most similar to the song titled `title` (case-insensitive).
    ///
    /// Returns `None` when no song has that title. When several songs
    /// share it, the first one in catalog order is used. The queried song
    /// never appears in its own results.
    pub fn recommend(&self, title: &str, top_n: usize) -> Option<Vec<Recommendation>> {
        log::info!("Recommending songs for: '{}'", title);

        let Some(idx) = self.catalog.position_of_title(title) else {
            log::warn!("Song not found in catalog: '{}'", title);
            return None;
        };

        let results = self.recommend_for_index(idx, top_n)?;
        log::info!("Top {} recommendations ready", results.len());
        Some(results)
    }

    /// Songs most similar to the song at row `idx`.
    ///
    /// Ranking is by descending score; equal scores keep catalog order.
    pub fn recommend_for_index(&self, idx: usize, top_n: usize) -> Option<Vec<Recommendation>> {
        let row = self.similarities.row(idx)?;

        let mut scored: Vec<(usize, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(j, _)| j != idx)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let results = scored
            .into_iter()
            .take(top_n)
            .enumerate()
            .filter_map(|(pos, (j, score))| {
                self.catalog.get(j).map(|song| Recommendation {
                    rank: pos + 1,
                    artist: song.artist.clone(),
                    title: song.title.clone(),
                    score,
                })
            })
            .collect();

        Some(results)
    }
}
