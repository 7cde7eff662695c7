use anyhow::Result;
use verso_etl::{rebuild, Config};

pub fn run_build(config: &Config) -> Result<()> {
    log::info!("Rebuilding library from {}", config.dataset_path.display());

    let library = rebuild(config)?;

    println!("\n✓ Build complete");
    println!("  Songs: {}", library.recommender.len());
    println!(
        "  Distinct titles: {}",
        library.recommender.catalog().distinct_titles()
    );
    println!("  Store: {}", config.store_path.display());
    Ok(())
}
