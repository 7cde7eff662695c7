//! Error types for the similarity pipeline.

use thiserror::Error;

/// Errors that can occur while vectorizing or searching a catalog.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The vectorizer was asked to fit an empty set of documents.
    #[error("cannot fit a vectorizer on an empty corpus")]
    EmptyCorpus,

    /// No document contained a usable term, so there is nothing to weight.
    #[error("empty vocabulary: documents contain no usable terms")]
    EmptyVocabulary,

    /// `transform` was called before `fit`.
    #[error("vectorizer has not been fitted")]
    NotFitted,

    /// An error propagated from the core domain layer.
    #[error(transparent)]
    Core(#[from] verso_core::Error),
}

/// Convenience alias for search results.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
