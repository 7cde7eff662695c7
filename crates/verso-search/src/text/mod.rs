//! Lyric normalization.
//!
//! Cleaning keeps only ASCII letters and whitespace, lowercases, splits on
//! whitespace, breaks up the fused forms in [`FUSED`] and drops stopwords.
//! There is no stemming, so "loving" and "love" remain different terms.

pub mod stopwords;

use std::collections::HashSet;
use std::sync::LazyLock;

/// Fused words split into two tokens before stopword filtering, matching
/// the Penn Treebank tokenizer rules that survive letter-only cleaning.
pub const FUSED: &[(&str, &str, &str)] = &[
    ("cannot", "can", "not"),
    ("gimme", "gim", "me"),
    ("gonna", "gon", "na"),
    ("gotta", "got", "ta"),
    ("lemme", "lem", "me"),
    ("wanna", "wan", "na"),
];

static ENGLISH: LazyLock<Normalizer> = LazyLock::new(Normalizer::english);

/// Normalize `raw` with the English stopword list.
pub fn normalize(raw: &str) -> String {
    ENGLISH.normalize(raw)
}

/// Cleans raw lyrics into space-separated lowercase tokens.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
}

impl Normalizer {
    #[must_use]
    pub fn english() -> Self {
        Self::with_stopwords(stopwords::ENGLISH.iter().copied())
    }

    /// A normalizer with a custom stopword set. Words are lowercased.
    pub fn with_stopwords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn normalize(&self, raw: &str) -> String {
        let stripped: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        stripped
            .split_whitespace()
            .flat_map(split_fused)
            .filter(|token| !self.is_stopword(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn split_fused(token: &str) -> Vec<&str> {
    FUSED
        .iter()
        .find(|(word, _, _)| *word == token)
        .map_or_else(|| vec![token], |&(_, head, tail)| vec![head, tail])
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english()
    }
}
