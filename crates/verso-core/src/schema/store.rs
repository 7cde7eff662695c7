use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Catalog, SimilarityMatrix, Song};

use super::meta::StoreMeta;
use super::migrations::MIGRATIONS;

const META_KEY: &str = "build";

/// A built library on disk: catalog rows, similarity rows and build
/// metadata in a single SQLite file.
///
/// Stores are written once by [`Store::create`] and only read afterwards.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Open an existing store. Never creates a file, and never touches an
    /// SQLite database that holds other tables but no store metadata.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if is_foreign_database(path) {
            return Err(Error::ForeignDatabase(path.to_path_buf()));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        apply_migrations(&conn)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Write `catalog`, `matrix` and `meta` to a new store at `path`,
    /// replacing any existing file.
    ///
    /// Everything is written to a temporary sibling in one transaction and
    /// renamed into place, so readers see either the old store or the
    /// complete new one. A foreign database at `path` is left alone.
    pub fn create(
        path: impl AsRef<Path>,
        catalog: &Catalog,
        matrix: &SimilarityMatrix,
        meta: &StoreMeta,
    ) -> Result<Self> {
        let path = path.as_ref();
        if is_foreign_database(path) {
            return Err(Error::ForeignDatabase(path.to_path_buf()));
        }
        if catalog.len() != matrix.dim() {
            return Err(Error::DimensionMismatch {
                rows: catalog.len(),
                matrix: matrix.dim(),
            });
        }
        if catalog.len() != meta.rows {
            return Err(Error::InvalidData(format!(
                "metadata records {} rows for a catalog of {}",
                meta.rows,
                catalog.len()
            )));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = temp_path(path);
        if tmp_path.exists() {
            std::fs::remove_file(&tmp_path)?;
        }

        {
            let mut conn = Connection::open(&tmp_path)?;
            apply_migrations(&conn)?;
            write_contents(&mut conn, catalog, matrix, meta)?;
        }

        std::fs::rename(&tmp_path, path)?;
        log::info!("Wrote store with {} songs to {}", catalog.len(), path.display());

        Self::open(path)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Build metadata recorded when the store was created.
    pub fn meta(&self) -> Result<StoreMeta> {
        let json: String = self.conn.query_row(
            "SELECT value FROM store_meta WHERE key = ?1",
            [META_KEY],
            |row| row.get(0),
        )?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load all songs in row order.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let mut stmt = self.conn.prepare(
            "SELECT row_index, artist, title, text, cleaned_text
             FROM songs ORDER BY row_index",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Song {
                    artist: row.get(1)?,
                    title: row.get(2)?,
                    text: row.get(3)?,
                    cleaned_text: row.get(4)?,
                },
            ))
        })?;

        let mut songs = Vec::new();
        for row in rows {
            let (row_index, song) = row?;
            check_row_index(row_index, songs.len(), "songs")?;
            songs.push(song);
        }
        Ok(Catalog::new(songs))
    }

    /// Load the similarity matrix.
    pub fn load_matrix(&self) -> Result<SimilarityMatrix> {
        let mut stmt = self
            .conn
            .prepare("SELECT row_index, scores FROM similarity_rows ORDER BY row_index")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut decoded = Vec::new();
        for row in rows {
            let (row_index, blob) = row?;
            check_row_index(row_index, decoded.len(), "similarity_rows")?;
            let scores: Vec<f32> = bincode::deserialize(&blob)?;
            decoded.push(scores);
        }
        SimilarityMatrix::from_rows(decoded)
    }

    /// Load the catalog and matrix together, checking that they line up
    /// with each other and with the recorded metadata.
    pub fn load(&self) -> Result<(Catalog, SimilarityMatrix)> {
        let meta = self.meta()?;
        let catalog = self.load_catalog()?;
        let matrix = self.load_matrix()?;

        if catalog.len() != matrix.dim() {
            return Err(Error::DimensionMismatch {
                rows: catalog.len(),
                matrix: matrix.dim(),
            });
        }
        if catalog.len() != meta.rows {
            return Err(Error::InvalidData(format!(
                "store records {} rows but holds {}",
                meta.rows,
                catalog.len()
            )));
        }

        Ok((catalog, matrix))
    }
}

/// Whether `path` is a readable SQLite database that has tables but no
/// `store_meta`. Missing, empty and unreadable files are not foreign.
fn is_foreign_database(path: &Path) -> bool {
    let Ok(conn) = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    ) else {
        return false;
    };
    table_names(&conn)
        .is_ok_and(|tables| !tables.is_empty() && !tables.iter().any(|t| t == "store_meta"))
}

fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

fn apply_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let applied: Vec<u32> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for migration in MIGRATIONS {
        if !applied.contains(&migration.version) {
            log::debug!(
                "Applying migration {} ({})",
                migration.version,
                migration.name
            );
            conn.execute_batch(migration.sql)?;
            conn.execute(
                "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                rusqlite::params![migration.version, migration.name],
            )?;
        }
    }

    Ok(())
}

fn write_contents(
    conn: &mut Connection,
    catalog: &Catalog,
    matrix: &SimilarityMatrix,
    meta: &StoreMeta,
) -> Result<()> {
    let tx = conn.transaction()?;
    {
        tx.execute(
            "INSERT INTO store_meta (key, value) VALUES (?1, ?2)",
            rusqlite::params![META_KEY, serde_json::to_string(meta)?],
        )?;

        let mut insert_song = tx.prepare(
            "INSERT INTO songs (row_index, artist, title, text, cleaned_text)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (idx, song) in catalog.iter().enumerate() {
            insert_song.execute(rusqlite::params![
                idx as i64,
                song.artist,
                song.title,
                song.text,
                song.cleaned_text,
            ])?;
        }

        let mut insert_row =
            tx.prepare("INSERT INTO similarity_rows (row_index, scores) VALUES (?1, ?2)")?;
        for (idx, scores) in matrix.rows().enumerate() {
            let blob = bincode::serialize(scores)?;
            insert_row.execute(rusqlite::params![idx as i64, blob])?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn check_row_index(found: i64, expected: usize, table: &str) -> Result<()> {
    if found == expected as i64 {
        Ok(())
    } else {
        Err(Error::InvalidData(format!(
            "{table}: expected row {expected}, found {found}"
        )))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::meta::{BuildParams, SourceFingerprint};
    use tempfile::TempDir;

    fn sample() -> (Catalog, SimilarityMatrix, StoreMeta) {
        let catalog = Catalog::new(vec![
            Song::new("Adele", "Hello", "hello from the other side").with_cleaned_text("hello side"),
            Song::new("Lionel Richie", "Hello", "hello is it me").with_cleaned_text("hello"),
            Song::new("Oasis", "Wonderwall", "today is gonna be the day")
                .with_cleaned_text("today gon na day"),
        ]);
        let mut matrix = SimilarityMatrix::identity(3);
        matrix.set_pair(0, 1, 0.6);
        matrix.set_pair(0, 2, 0.1);
        let meta = StoreMeta::new(
            BuildParams {
                sample_size: None,
                seed: 42,
                max_features: 5000,
            },
            SourceFingerprint {
                path: PathBuf::from("songs.csv"),
                len: 10,
                modified: None,
            },
            3,
        );
        (catalog, matrix, meta)
    }

    #[test]
    fn test_create_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("verso.db");
        let (catalog, matrix, meta) = sample();

        Store::create(&path, &catalog, &matrix, &meta).unwrap();
        assert!(!temp_path(&path).exists());

        let store = Store::open(&path).unwrap();
        let (loaded_catalog, loaded_matrix) = store.load().unwrap();
        assert_eq!(loaded_catalog.songs(), catalog.songs());
        assert_eq!(loaded_matrix, matrix);
        assert_eq!(store.meta().unwrap(), meta);
    }

    #[test]
    fn test_create_replaces_existing_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("verso.db");
        let (catalog, matrix, meta) = sample();
        Store::create(&path, &catalog, &matrix, &meta).unwrap();

        let smaller = Catalog::new(vec![catalog.songs()[2].clone()]);
        let mut smaller_meta = meta.clone();
        smaller_meta.rows = 1;
        Store::create(&path, &smaller, &SimilarityMatrix::identity(1), &smaller_meta).unwrap();

        let (loaded, _) = Store::open(&path).unwrap().load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.songs()[0].title, "Wonderwall");
    }

    #[test]
    fn test_create_rejects_misaligned_matrix() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("verso.db");
        let (catalog, _, meta) = sample();

        let result = Store::create(&path, &catalog, &SimilarityMatrix::identity(2), &meta);
        assert!(matches!(
            result,
            Err(Error::DimensionMismatch { rows: 3, matrix: 2 })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_open_missing_store_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.db");
        assert!(Store::open(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_open_corrupt_store_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("corrupt.db");
        std::fs::write(&path, b"definitely not a sqlite database, just some bytes").unwrap();
        assert!(Store::open(&path).is_err());
    }

    fn write_playlist_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE playlists (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             INSERT INTO playlists (name) VALUES ('road trip');",
        )
        .unwrap();
    }

    #[test]
    fn test_foreign_database_is_left_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("playlists.db");
        write_playlist_db(&path);
        let (catalog, matrix, meta) = sample();

        assert!(matches!(Store::open(&path), Err(Error::ForeignDatabase(_))));
        assert!(matches!(
            Store::create(&path, &catalog, &matrix, &meta),
            Err(Error::ForeignDatabase(_))
        ));

        let conn = Connection::open(&path).unwrap();
        assert_eq!(table_names(&conn).unwrap(), vec!["playlists".to_string()]);
    }

    #[test]
    fn test_empty_file_is_not_foreign() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("verso.db");
        std::fs::write(&path, b"").unwrap();
        assert!(!is_foreign_database(&path));

        let (catalog, matrix, meta) = sample();
        Store::create(&path, &catalog, &matrix, &meta).unwrap();
        assert!(!is_foreign_database(&path));
    }

    #[test]
    fn test_load_detects_missing_similarity_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("verso.db");
        let (catalog, matrix, meta) = sample();
        let store = Store::create(&path, &catalog, &matrix, &meta).unwrap();

        store
            .conn()
            .execute("DELETE FROM similarity_rows WHERE row_index = 2", [])
            .unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let path = Path::new("/data/verso/verso.db");
        assert_eq!(temp_path(path), PathBuf::from("/data/verso/verso.db.tmp"));
    }
}
