/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Build metadata, one JSON document per key
CREATE TABLE IF NOT EXISTS store_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Catalog rows; row_index is the song's identity and its matrix row
CREATE TABLE IF NOT EXISTS songs (
    row_index INTEGER PRIMARY KEY,
    artist TEXT NOT NULL,
    title TEXT NOT NULL,
    text TEXT NOT NULL,
    cleaned_text TEXT NOT NULL
);

-- One similarity row per song, bincode-encoded Vec<f32>
CREATE TABLE IF NOT EXISTS similarity_rows (
    row_index INTEGER PRIMARY KEY REFERENCES songs(row_index),
    scores BLOB NOT NULL
);
"#;

/// All migrations in order.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
