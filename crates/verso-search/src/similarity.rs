//! All-pairs cosine similarity over TF-IDF rows.

use verso_core::SimilarityMatrix;

use crate::vectorize::TfidfMatrix;

/// Compute the dense cosine similarity matrix of `features`.
///
/// Rows are expected to be L2-normalized (as produced by
/// [`TfidfVectorizer`](crate::TfidfVectorizer)), so cosine similarity is a
/// plain dot product. Only pairs that share at least one term are
/// visited, via per-feature posting lists, and each pair is computed once
/// and mirrored. Scores are clamped to `[0, 1]` and every diagonal entry
/// is `1.0`, including for documents with no terms.
pub fn cosine_similarity_matrix(features: &TfidfMatrix) -> SimilarityMatrix {
    let n = features.n_rows();
    let mut matrix = SimilarityMatrix::identity(n);

    // Posting lists are filled in row order, so each is sorted by row.
    let mut postings: Vec<Vec<(usize, f32)>> = vec![Vec::new(); features.n_features()];
    for (row_idx, row) in features.rows().enumerate() {
        for &(feature, weight) in row {
            postings[feature as usize].push((row_idx, weight));
        }
    }

    let mut acc = vec![0.0_f64; n];
    for i in 0..n {
        for &(feature, weight) in features.row(i) {
            let posting = &postings[feature as usize];
            let start = posting.partition_point(|&(j, _)| j <= i);
            for &(j, other) in &posting[start..] {
                acc[j] += f64::from(weight) * f64::from(other);
            }
        }

        for (j, score) in acc.iter_mut().enumerate().skip(i + 1) {
            if *score != 0.0 {
                matrix.set_pair(i, j, score.clamp(0.0, 1.0) as f32);
                *score = 0.0;
            }
        }
    }

    log::debug!("Computed {}x{} cosine similarity matrix", n, n);
    matrix
}
