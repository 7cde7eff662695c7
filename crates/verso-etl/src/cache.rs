//! Load a built library from its store, or build and store it.
//!
//! A store is reused only when it opens cleanly, its metadata matches the
//! current build parameters, and (when the source table is present) the
//! source has not changed since the build. Anything else, including a
//! corrupt file, leads to a rebuild; only a failed rebuild is fatal. An
//! unrelated SQLite database at the store path is an error, never replaced.

use verso_core::{Error as CoreError, SourceFingerprint, Store, StoreMeta};
use verso_search::Recommender;

use crate::config::Config;
use crate::error::EtlResult;
use crate::pipeline;

/// Where a [`Library`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Loaded from an existing store.
    Store,
    /// Built from the source table (and written to the store).
    Built,
}

/// A ready-to-query recommender together with its build metadata.
#[derive(Debug)]
pub struct Library {
    pub recommender: Recommender,
    pub meta: StoreMeta,
    pub origin: Origin,
}

/// Load the library from the configured store, rebuilding it if the store
/// is missing, stale or unreadable.
pub fn load_or_build(config: &Config) -> EtlResult<Library> {
    if let Some(library) = try_load(config)? {
        return Ok(library);
    }
    rebuild(config)
}

/// Build the library from the source table and replace the store.
pub fn rebuild(config: &Config) -> EtlResult<Library> {
    let (recommender, source) = pipeline::build_from_source(config)?;
    let meta = StoreMeta::new(config.build_params(), source, recommender.len());

    Store::create(
        &config.store_path,
        recommender.catalog(),
        recommender.similarities(),
        &meta,
    )?;
    log::info!("Data saved to {}", config.store_path.display());

    Ok(Library {
        recommender,
        meta,
        origin: Origin::Built,
    })
}

fn try_load(config: &Config) -> EtlResult<Option<Library>> {
    let path = &config.store_path;
    if !path.exists() {
        log::info!("Cached data not found at {}; running preprocessing", path.display());
        return Ok(None);
    }

    log::info!("Loading cached data from {}", path.display());
    let store = match Store::open(path) {
        Ok(store) => store,
        Err(e @ CoreError::ForeignDatabase(_)) => return Err(e.into()),
        Err(e) => {
            log::warn!("Cannot open store {}: {}; rebuilding", path.display(), e);
            return Ok(None);
        }
    };

    let meta = match store.meta() {
        Ok(meta) => meta,
        Err(e) => {
            log::warn!("Store {} has no readable metadata: {}; rebuilding", path.display(), e);
            return Ok(None);
        }
    };

    let source = match SourceFingerprint::of(&config.dataset_path) {
        Ok(fp) => Some(fp),
        Err(_) => {
            log::debug!(
                "Source {} unavailable; trusting store as-is",
                config.dataset_path.display()
            );
            None
        }
    };
    if !meta.is_compatible(&config.build_params(), source.as_ref()) {
        log::info!("Cached data is out of date; rebuilding");
        return Ok(None);
    }

    let recommender = match store.load() {
        Ok((catalog, matrix)) => Recommender::new(catalog, matrix),
        Err(e) => {
            log::warn!("Store {} is damaged: {}; rebuilding", path.display(), e);
            return Ok(None);
        }
    };

    match recommender {
        Ok(recommender) => {
            log::info!("Data loaded successfully: {} songs", recommender.len());
            Ok(Some(Library {
                recommender,
                meta,
                origin: Origin::Store,
            }))
        }
        Err(e) => {
            log::warn!("Store {} is inconsistent: {}; rebuilding", path.display(), e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::error::EtlError;

    const SONGS: &str = "artist,song,link,text\n\
        A,Summer Nights,/a,summer nights dancing under the sky\n\
        B,Winter Cold,/b,cold winter nights alone in the snow\n\
        C,Dance All Night,/c,dancing all night under disco lights\n\
        D,Snowfall,/d,snow falling on a cold winter morning\n";

    fn setup() -> (TempDir, Config) {
        let temp_dir = TempDir::new().unwrap();
        let dataset_path = temp_dir.path().join("songs.csv");
        std::fs::write(&dataset_path, SONGS).unwrap();
        let config = Config {
            dataset_path,
            store_path: temp_dir.path().join("store").join("verso.db"),
            sample_size: 0,
            ..Config::default()
        };
        (temp_dir, config)
    }

    #[test]
    fn test_builds_when_store_missing() {
        let (_dir, config) = setup();
        let library = load_or_build(&config).unwrap();
        assert_eq!(library.origin, Origin::Built);
        assert_eq!(library.recommender.len(), 4);
        assert!(config.store_path.exists());
    }

    #[test]
    fn test_reuses_existing_store() {
        let (_dir, config) = setup();
        let built = load_or_build(&config).unwrap();
        let loaded = load_or_build(&config).unwrap();

        assert_eq!(loaded.origin, Origin::Store);
        assert_eq!(loaded.meta, built.meta);
        assert_eq!(
            loaded.recommender.similarities(),
            built.recommender.similarities()
        );
        assert_eq!(
            loaded.recommender.recommend("winter cold", 2),
            built.recommender.recommend("winter cold", 2)
        );
    }

    #[test]
    fn test_store_used_when_source_removed() {
        let (_dir, config) = setup();
        load_or_build(&config).unwrap();
        std::fs::remove_file(&config.dataset_path).unwrap();

        let library = load_or_build(&config).unwrap();
        assert_eq!(library.origin, Origin::Store);
    }

    #[test]
    fn test_rebuilds_when_params_change() {
        let (_dir, mut config) = setup();
        load_or_build(&config).unwrap();

        config.max_features = 3;
        let library = load_or_build(&config).unwrap();
        assert_eq!(library.origin, Origin::Built);
        assert_eq!(library.meta.params.max_features, 3);
    }

    #[test]
    fn test_rebuilds_when_source_changes() {
        let (_dir, config) = setup();
        load_or_build(&config).unwrap();

        let mut grown = SONGS.to_string();
        grown.push_str("E,Desert Road,/e,driving down the desert road\n");
        std::fs::write(&config.dataset_path, grown).unwrap();

        let library = load_or_build(&config).unwrap();
        assert_eq!(library.origin, Origin::Built);
        assert_eq!(library.recommender.len(), 5);
    }

    #[test]
    fn test_rebuilds_corrupt_store() {
        let (_dir, config) = setup();
        std::fs::create_dir_all(config.store_path.parent().unwrap()).unwrap();
        std::fs::write(&config.store_path, b"this is not a database at all, sorry").unwrap();

        let library = load_or_build(&config).unwrap();
        assert_eq!(library.origin, Origin::Built);
        assert_eq!(library.recommender.len(), 4);
    }

    #[test]
    fn test_refuses_to_replace_foreign_database() {
        let (_dir, config) = setup();
        std::fs::create_dir_all(config.store_path.parent().unwrap()).unwrap();
        let conn = rusqlite::Connection::open(&config.store_path).unwrap();
        conn.execute_batch("CREATE TABLE invoices (id INTEGER PRIMARY KEY, total REAL);")
            .unwrap();
        drop(conn);

        assert!(matches!(
            load_or_build(&config),
            Err(EtlError::Store(CoreError::ForeignDatabase(_)))
        ));
        assert!(matches!(
            rebuild(&config),
            Err(EtlError::Store(CoreError::ForeignDatabase(_)))
        ));

        let conn = rusqlite::Connection::open(&config.store_path).unwrap();
        let tables: i64 = conn
            .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_missing_source_and_store_is_fatal() {
        let (_dir, mut config) = setup();
        config.dataset_path = config.dataset_path.with_file_name("missing.csv");
        assert!(matches!(
            load_or_build(&config),
            Err(EtlError::Csv { .. })
        ));
    }

    #[test]
    fn test_rebuild_forces_pipeline() {
        let (_dir, config) = setup();
        load_or_build(&config).unwrap();
        let library = rebuild(&config).unwrap();
        assert_eq!(library.origin, Origin::Built);
    }
}
