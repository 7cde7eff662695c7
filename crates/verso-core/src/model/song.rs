use serde::{Deserialize, Serialize};

/// One catalog row: a song and its lyrics.
///
/// A song has no declared key. Its identity is its position in the
/// [`Catalog`](crate::model::Catalog), which is also its row and column
/// in the similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub artist: String,

    /// The song title (the `song` column of the source table).
    pub title: String,

    /// Raw lyrics as read from the source.
    pub text: String,

    /// Normalized lyrics: lowercase tokens with stopwords removed,
    /// joined by single spaces. Empty until the text has been cleaned.
    pub cleaned_text: String,
}

impl Song {
    #[must_use]
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            text: text.into(),
            cleaned_text: String::new(),
        }
    }

    #[must_use]
    pub fn with_cleaned_text(mut self, cleaned: impl Into<String>) -> Self {
        self.cleaned_text = cleaned.into();
        self
    }
}
