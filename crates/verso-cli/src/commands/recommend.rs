use anyhow::Result;
use verso_etl::{load_or_build, Config};
use verso_search::Recommendation;

pub fn run_recommend(config: &Config, title: &str, top_n: usize, json: bool) -> Result<()> {
    let library = load_or_build(config)?;

    let Some(results) = library.recommender.recommend(title, top_n) else {
        println!("Song not found in catalog: '{}'", title);
        println!("\nTitles are matched exactly, ignoring case.");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No recommendations requested.");
        return Ok(());
    }

    println!("\n🎵 Songs like '{}'\n", title);
    print!("{}", render_table(&results));

    Ok(())
}

/// Render results as a numbered `S.No. | Artist | Song` table.
fn render_table(results: &[Recommendation]) -> String {
    const NO: &str = "S.No.";
    const ARTIST: &str = "Artist";
    const SONG: &str = "Song";

    let artist_width = results
        .iter()
        .map(|r| r.artist.chars().count())
        .chain(std::iter::once(ARTIST.len()))
        .max()
        .unwrap_or(ARTIST.len());

    let header = format!("  {NO:>5}  {ARTIST:<artist_width$}  {SONG}\n");
    let rows = results.iter().map(|r| {
        format!(
            "  {:>5}  {:<artist_width$}  {}\n",
            r.rank, r.artist, r.title
        )
    });
    std::iter::once(header).chain(rows).collect()
}
