//! Lyric similarity search for verso.
//!
//! Turns raw lyrics into normalized text, weights the text with TF-IDF,
//! computes the all-pairs cosine similarity matrix, and serves
//! "songs like this one" queries against it.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod recommend;
pub mod similarity;
pub mod text;
pub mod vectorize;

pub use error::{SearchError, SearchResult};
pub use recommend::{Recommendation, Recommender, DEFAULT_TOP_N};
pub use similarity::cosine_similarity_matrix;
pub use text::{normalize, Normalizer};
pub use vectorize::{TfidfMatrix, TfidfVectorizer, DEFAULT_MAX_FEATURES};
