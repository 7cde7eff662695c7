use std::collections::HashMap;

use crate::model::Song;

/// The fixed, ordered set of songs a library was built from.
///
/// Titles are indexed case-insensitively. When several songs share a
/// title, lookups resolve to the first one in catalog order; later
/// duplicates are still present in the catalog and can be recommended,
/// they just cannot be addressed by title.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Song>,
    by_title: HashMap<String, usize>,
}

impl Catalog {
    #[must_use]
    pub fn new(songs: Vec<Song>) -> Self {
        let mut by_title = HashMap::with_capacity(songs.len());
        for (idx, song) in songs.iter().enumerate() {
            by_title.entry(title_key(&song.title)).or_insert(idx);
        }
        Self { songs, by_title }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Song> {
        self.songs.get(idx)
    }

    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Row position of the first song whose title matches `title`,
    /// ignoring case.
    #[must_use]
    pub fn position_of_title(&self, title: &str) -> Option<usize> {
        self.by_title.get(&title_key(title)).copied()
    }

    /// Number of distinct titles (after case folding).
    #[must_use]
    pub fn distinct_titles(&self) -> usize {
        self.by_title.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }
}

fn title_key(title: &str) -> String {
    title.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Song::new("Queen", "Bohemian Rhapsody", "is this the real life"),
            Song::new("Beatles", "Yesterday", "all my troubles seemed so far away"),
            Song::new("Boyz II Men", "Yesterday", "a different song"),
        ])
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = catalog();
        assert_eq!(catalog.position_of_title("bohemian rhapsody"), Some(0));
        assert_eq!(catalog.position_of_title("BOHEMIAN RHAPSODY"), Some(0));
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first() {
        let catalog = catalog();
        assert_eq!(catalog.position_of_title("yesterday"), Some(1));
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.distinct_titles(), 2);
    }

    #[test]
    fn test_missing_title() {
        assert_eq!(catalog().position_of_title("Imagine"), None);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.get(0).is_none());
    }
}
