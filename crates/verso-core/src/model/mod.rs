pub mod catalog;
pub mod matrix;
pub mod song;

pub use catalog::Catalog;
pub use matrix::SimilarityMatrix;
pub use song::Song;
