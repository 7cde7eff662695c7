use anyhow::Result;
use verso_core::{BuildParams, SourceFingerprint, Store, StoreMeta, FORMAT_VERSION};
use verso_etl::Config;

pub fn show_status(config: &Config) -> Result<()> {
    let path = &config.store_path;

    println!("\n📊 Verso Status\n");
    println!("  Store: {}", path.display());

    if !path.exists() {
        println!("  Library: not built");
        println!("\n  Run `verso build` (or any `verso recommend`) to build it");
        return Ok(());
    }

    let store = Store::open(path)?;
    let meta = store.meta()?;

    println!("  Songs: {}", meta.rows);
    println!("  Built: {}", meta.built_at.to_rfc3339());
    println!("  Source: {} ({} bytes)", meta.source.path.display(), meta.source.len);
    match meta.params.sample_size {
        Some(n) => println!("  Sample: {} songs (seed {})", n, meta.params.seed),
        None => println!("  Sample: all songs"),
    }
    println!("  Vocabulary cap: {}", meta.params.max_features);

    // Same decision as the cache manager: a missing source does not count
    // as a change.
    let source = SourceFingerprint::of(&config.dataset_path).ok();
    if let Some(reason) = rebuild_reason(&meta, &config.build_params(), source.as_ref()) {
        println!("\n  {reason}; it will be rebuilt on next use");
    }

    Ok(())
}

/// Why a store with `meta` would be rebuilt, if it would be.
fn rebuild_reason(
    meta: &StoreMeta,
    params: &BuildParams,
    source: Option<&SourceFingerprint>,
) -> Option<String> {
    if meta.format_version != FORMAT_VERSION {
        return Some(format!(
            "Store format {} is outdated (current {})",
            meta.format_version, FORMAT_VERSION
        ));
    }
    if &meta.params != params {
        return Some("Build settings changed since this store was built".to_string());
    }
    if !meta.is_compatible(params, source) {
        return Some(format!(
            "Source {} changed since this store was built",
            source.map_or(&meta.source.path, |s| &s.path).display()
        ));
    }
    None
}
