//! The build pipeline: source table to a ready [`Recommender`].

use verso_core::{Catalog, Song, SourceFingerprint};
use verso_search::{cosine_similarity_matrix, Normalizer, Recommender, TfidfVectorizer};

use crate::config::Config;
use crate::error::EtlResult;
use crate::ingest;

/// Clean, vectorize and compare `songs`, in catalog order.
pub fn build_recommender(songs: Vec<Song>, max_features: usize) -> EtlResult<Recommender> {
    log::info!("Cleaning text...");
    let normalizer = Normalizer::english();
    let songs: Vec<Song> = songs
        .into_iter()
        .map(|song| {
            let cleaned = normalizer.normalize(&song.text);
            song.with_cleaned_text(cleaned)
        })
        .collect();
    log::info!("Text cleaned");

    log::info!("Vectorizing using TF-IDF...");
    let documents: Vec<&str> = songs.iter().map(|s| s.cleaned_text.as_str()).collect();
    let features = TfidfVectorizer::new()
        .with_max_features(max_features)
        .fit_transform(&documents)?;
    let (rows, cols) = features.shape();
    log::info!("TF-IDF matrix shape: ({}, {})", rows, cols);

    log::info!("Calculating cosine similarity...");
    let similarities = cosine_similarity_matrix(&features);
    log::info!("Cosine similarity matrix generated");

    Ok(Recommender::new(Catalog::new(songs), similarities)?)
}

/// Run the whole pipeline against the configured source table.
///
/// Returns the recommender along with a fingerprint of the source it was
/// built from.
pub fn build_from_source(config: &Config) -> EtlResult<(Recommender, SourceFingerprint)> {
    log::info!("Starting preprocessing of {}", config.dataset_path.display());

    let params = config.build_params();
    let songs = ingest::load_songs(&config.dataset_path, params.sample_size, params.seed)?;
    let fingerprint = SourceFingerprint::of(&config.dataset_path)?;
    let recommender = build_recommender(songs, params.max_features)?;

    log::info!("Preprocessing complete");
    Ok((recommender, fingerprint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use verso_search::SearchError;

    use crate::error::EtlError;

    #[test]
    fn test_build_recommender_cleans_text() {
        let songs = vec![
            Song::new("A", "One", "The RAIN falls, 1-2-3!"),
            Song::new("B", "Two", "Rain and thunder"),
        ];
        let rec = build_recommender(songs, 5000).unwrap();
        assert_eq!(rec.catalog().songs()[0].cleaned_text, "rain falls");
        assert_eq!(rec.catalog().songs()[1].cleaned_text, "rain thunder");
        assert_eq!(rec.similarities().dim(), 2);
    }

    #[test]
    fn test_build_recommender_without_lyrics_fails() {
        let songs = vec![Song::new("A", "Silence", "...")];
        assert!(matches!(
            build_recommender(songs, 5000),
            Err(EtlError::Search(SearchError::EmptyVocabulary))
        ));
    }

    #[test]
    fn test_build_from_missing_source_fails() {
        let config = Config {
            dataset_path: "/nonexistent/songs.csv".into(),
            ..Config::default()
        };
        assert!(matches!(
            build_from_source(&config),
            Err(EtlError::Csv { .. })
        ));
    }
}
