//! Reading and sampling the source song table.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use std::path::Path;
use verso_core::Song;

use crate::error::{EtlError, EtlResult};

const ARTIST: &str = "artist";
const TITLE: &str = "song";
const TEXT: &str = "text";

/// Read every song from a CSV table with `artist`, `song` and `text`
/// columns. Other columns (such as `link`) are ignored.
///
/// Records may have extra trailing fields, but a record too short to hold
/// a required column is rejected with its line number.
pub fn read_songs(path: &Path) -> EtlResult<Vec<Song>> {
    let csv_err = |source: csv::Error| EtlError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| EtlError::MissingColumn {
                column: name,
                path: path.to_path_buf(),
                available: headers.iter().collect::<Vec<_>>().join(", "),
            })
    };
    let artist_idx = column(ARTIST)?;
    let title_idx = column(TITLE)?;
    let text_idx = column(TEXT)?;

    let mut songs = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let field = |idx: usize, name: &str| {
            record.get(idx).ok_or_else(|| EtlError::Record {
                line: record.position().map_or(0, |p| p.line()),
                message: format!("missing '{name}' field"),
            })
        };
        songs.push(Song::new(
            field(artist_idx, ARTIST)?,
            field(title_idx, TITLE)?,
            field(text_idx, TEXT)?,
        ));
    }

    log::debug!("Read {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

/// Draw `sample_size` distinct songs uniformly at random, seeded by `seed`.
///
/// The sampled order becomes catalog order. With no sample size, or one
/// at least as large as the input, every song is kept in its original
/// order.
pub fn sample(songs: Vec<Song>, sample_size: Option<usize>, seed: u64) -> Vec<Song> {
    let total = songs.len();
    let amount = match sample_size {
        Some(n) if n < total => n,
        Some(n) => {
            log::warn!(
                "Requested sample of {} but source has only {} songs; keeping all",
                n,
                total
            );
            return songs;
        }
        None => return songs,
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let picked = index::sample(&mut rng, total, amount);

    let mut slots: Vec<Option<Song>> = songs.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}

/// Read the source table and sample it.
pub fn load_songs(path: &Path, sample_size: Option<usize>, seed: u64) -> EtlResult<Vec<Song>> {
    let songs = read_songs(path)?;
    if songs.is_empty() {
        return Err(EtlError::EmptySource(path.to_path_buf()));
    }
    let read = songs.len();
    let songs = sample(songs, sample_size, seed);
    log::info!("Dataset loaded and sampled: {} of {} rows", songs.len(), read);
    Ok(songs)
}
