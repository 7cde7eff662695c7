//! TF-IDF vectorization of normalized lyrics.
//!
//! ```text
//! tfidf(t, d) = count(t, d) × idf(t)
//! idf(t)      = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! Each document vector is then scaled to unit L2 length, so the dot
//! product of two rows is their cosine similarity.

use std::collections::{HashMap, HashSet};

use crate::error::{SearchError, SearchResult};

/// Vocabulary cap used when none is configured.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Sparse TF-IDF rows, one per document.
///
/// Each row lists `(feature, weight)` pairs sorted by feature index, with
/// zero weights omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfMatrix {
    n_features: usize,
    rows: Vec<Vec<(u32, f32)>>,
}

impl TfidfMatrix {
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub const fn n_features(&self) -> usize {
        self.n_features
    }

    /// `(rows, features)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_features)
    }

    #[must_use]
    pub fn row(&self, i: usize) -> &[(u32, f32)] {
        &self.rows[i]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[(u32, f32)]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Number of stored (non-zero) weights.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// Learns a capped vocabulary and IDF weights from a corpus, then turns
/// documents into [`TfidfMatrix`] rows.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: Option<usize>,
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfidfVectorizer {
    /// A vectorizer capped at [`DEFAULT_MAX_FEATURES`] terms.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_features: Some(DEFAULT_MAX_FEATURES),
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
        }
    }

    /// Keep only the `max_features` terms with the highest total count
    /// across the corpus.
    #[must_use]
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Keep every term seen during fitting.
    #[must_use]
    pub fn without_feature_limit(mut self) -> Self {
        self.max_features = None;
        self
    }

    /// Learn the vocabulary and IDF weights.
    ///
    /// Vocabulary selection ranks terms by total count, breaking ties
    /// alphabetically; the kept terms are then indexed alphabetically.
    pub fn fit<S: AsRef<str>>(&mut self, documents: &[S]) -> SearchResult<()> {
        if documents.is_empty() {
            return Err(SearchError::EmptyCorpus);
        }

        let mut term_count: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();

        for doc in documents {
            let mut seen = HashSet::new();
            for token in tokens(doc.as_ref()) {
                *term_count.entry(token).or_insert(0) += 1;
                if seen.insert(token) {
                    *doc_freq.entry(token).or_insert(0) += 1;
                }
            }
        }

        if term_count.is_empty() {
            return Err(SearchError::EmptyVocabulary);
        }

        let mut ranked: Vec<(&str, usize)> = term_count.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if let Some(limit) = self.max_features {
            ranked.truncate(limit);
        }

        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        let n_docs = documents.len() as f64;
        self.idf = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.terms = kept.iter().map(|t| (*t).to_string()).collect();
        self.vocabulary = self
            .terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        log::debug!(
            "Fitted TF-IDF vocabulary: {} terms from {} documents",
            self.terms.len(),
            documents.len()
        );

        Ok(())
    }

    /// Weight `documents` with the fitted vocabulary. Terms outside the
    /// vocabulary are ignored.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> SearchResult<TfidfMatrix> {
        if self.terms.is_empty() {
            return Err(SearchError::NotFitted);
        }

        let rows = documents
            .iter()
            .map(|doc| self.weigh(doc.as_ref()))
            .collect();

        Ok(TfidfMatrix {
            n_features: self.terms.len(),
            rows,
        })
    }

    /// Fit on `documents` and transform them.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> SearchResult<TfidfMatrix> {
        self.fit(documents)?;
        self.transform(documents)
    }

    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Fitted terms in feature-index order.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[must_use]
    pub fn feature_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    #[must_use]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.feature_index(term).map(|idx| self.idf[idx])
    }

    fn weigh(&self, doc: &str) -> Vec<(u32, f32)> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in tokens(doc) {
            if let Some(&idx) = self.vocabulary.get(token) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let mut weights: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, count as f64 * self.idf[idx]))
            .collect();
        weights.sort_unstable_by_key(|&(idx, _)| idx);

        let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Vec::new();
        }

        weights
            .into_iter()
            .map(|(idx, w)| (idx as u32, (w / norm) as f32))
            .collect()
    }
}

/// Split normalized text into terms of at least two characters.
fn tokens(doc: &str) -> impl Iterator<Item = &str> {
    doc.split_whitespace().filter(|t| t.chars().nth(1).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(row: &[(u32, f32)]) -> f32 {
        row.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    #[test]
    fn test_fit_empty_corpus() {
        let mut vectorizer = TfidfVectorizer::new();
        let docs: Vec<&str> = Vec::new();
        assert!(matches!(
            vectorizer.fit(&docs),
            Err(SearchError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_fit_without_terms() {
        let mut vectorizer = TfidfVectorizer::new();
        assert!(matches!(
            vectorizer.fit(&["", "a b c"]),
            Err(SearchError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_transform_before_fit() {
        let vectorizer = TfidfVectorizer::new();
        assert!(matches!(
            vectorizer.transform(&["love"]),
            Err(SearchError::NotFitted)
        ));
    }

    #[test]
    fn test_vocabulary_is_alphabetical() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&["night day", "day light"]).unwrap();
        assert_eq!(vectorizer.terms(), &["day", "light", "night"]);
        assert_eq!(vectorizer.feature_index("light"), Some(1));
    }

    #[test]
    fn test_single_character_tokens_are_ignored() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&["x love y"]).unwrap();
        assert_eq!(vectorizer.terms(), &["love"]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let mut vectorizer = TfidfVectorizer::new().with_max_features(2);
        vectorizer
            .fit(&["love love love heart", "heart heart baby", "rain"])
            .unwrap();
        // love=3, heart=3, baby=1, rain=1
        assert_eq!(vectorizer.terms(), &["heart", "love"]);
    }

    #[test]
    fn test_max_features_ties_break_alphabetically() {
        let mut vectorizer = TfidfVectorizer::new().with_max_features(1);
        vectorizer.fit(&["zebra apple"]).unwrap();
        assert_eq!(vectorizer.terms(), &["apple"]);
    }

    #[test]
    fn test_smoothed_idf() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&["love rain", "love", "love"]).unwrap();
        // love: df=3, n=3 -> ln(4/4) + 1 = 1
        assert!((vectorizer.idf("love").unwrap() - 1.0).abs() < 1e-12);
        // rain: df=1 -> ln(4/2) + 1
        let expected = 2.0_f64.ln() + 1.0;
        assert!((vectorizer.idf("rain").unwrap() - expected).abs() < 1e-12);
        assert_eq!(vectorizer.idf("sun"), None);
    }

    #[test]
    fn test_rows_are_unit_length_and_sorted() {
        let mut vectorizer = TfidfVectorizer::new();
        let matrix = vectorizer
            .fit_transform(&["night sky stars night", "sky blue", "stars"])
            .unwrap();

        assert_eq!(matrix.shape(), (3, 4));
        for row in matrix.rows() {
            assert!((norm(row) - 1.0).abs() < 1e-6);
            assert!(row.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }

    #[test]
    fn test_document_without_known_terms_is_empty_row() {
        let mut vectorizer = TfidfVectorizer::new();
        vectorizer.fit(&["love song"]).unwrap();
        let matrix = vectorizer.transform(&["", "unknown words"]).unwrap();
        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.nnz(), 0);
    }

    #[test]
    fn test_term_weights_reflect_counts_and_rarity() {
        let mut vectorizer = TfidfVectorizer::new();
        let matrix = vectorizer
            .fit_transform(&["love love rain", "love", "love"])
            .unwrap();
        let row = matrix.row(0);
        let love = row[vectorizer.feature_index("love").unwrap()].1;
        let rain = row[vectorizer.feature_index("rain").unwrap()].1;

        // love: 2 * 1.0, rain: 1 * (ln 2 + 1) ~= 1.693
        let expected_ratio = 2.0 / (2.0_f32.ln() + 1.0);
        assert!((love / rain - expected_ratio).abs() < 1e-5);
    }
}
