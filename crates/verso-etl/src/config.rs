use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::Deserialize;
use std::path::PathBuf;
use verso_core::BuildParams;
use verso_search::{DEFAULT_MAX_FEATURES, DEFAULT_TOP_N};

/// Configuration for verso.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (VERSO_* prefix)
/// 3. Config file (~/.config/verso/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the source song table (CSV with artist, song, text columns).
    ///
    /// Can be set via:
    /// - CLI: --dataset /path/to/songs.csv
    /// - ENV: VERSO_DATASET_PATH
    /// - Config: dataset_path = "/path/to/songs.csv"
    /// - Default: ./spotify_millsongdata.csv
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Path to the built library store.
    ///
    /// Can be set via:
    /// - CLI: --store /path/to/verso.db
    /// - ENV: VERSO_STORE_PATH
    /// - Config: store_path = "/path/to/verso.db"
    /// - Default: ~/.local/share/verso/verso.db
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Number of songs sampled from the source. 0 keeps every song.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Seed for sampling, so the same source always yields the same catalog.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Vocabulary cap for TF-IDF weighting.
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Number of recommendations shown when none is requested.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Logger settings.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            store_path: default_store_path(),
            sample_size: default_sample_size(),
            seed: default_seed(),
            max_features: default_max_features(),
            top_n: default_top_n(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/verso/config.toml
    /// Reads environment variables with VERSO_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("verso");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration, then apply the paths given on the command line.
    pub fn load_with_overrides(
        store_path: Option<PathBuf>,
        dataset_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config = Self::load()?;
        Ok(config.with_overrides(store_path, dataset_path))
    }

    #[must_use]
    pub fn with_overrides(
        mut self,
        store_path: Option<PathBuf>,
        dataset_path: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = store_path {
            self.store_path = path;
        }
        if let Some(path) = dataset_path {
            self.dataset_path = path;
        }
        self
    }

    /// The parameters recorded in, and checked against, a store.
    #[must_use]
    pub fn build_params(&self) -> BuildParams {
        BuildParams {
            sample_size: (self.sample_size > 0).then_some(self.sample_size),
            seed: self.seed,
            max_features: self.max_features,
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("spotify_millsongdata.csv")
}

/// Get the default store path.
///
/// Returns: ~/.local/share/verso/verso.db (or platform equivalent)
fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("verso")
        .join("verso.db")
}

const fn default_sample_size() -> usize {
    10_000
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_features() -> usize {
    DEFAULT_MAX_FEATURES
}

const fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/verso/config.toml
/// - macOS: ~/Library/Application Support/verso/config.toml
/// - Windows: %APPDATA%\verso\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("verso")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Verso Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (VERSO_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Source song table: CSV with artist, song and text columns
#
# Can also be set via:
# - CLI: verso --dataset /path/to/songs.csv build
# - Environment: VERSO_DATASET_PATH=/path/to/songs.csv
dataset_path = "spotify_millsongdata.csv"

# Where the built library (catalog + similarity matrix) is stored
#
# Default: Platform-specific data directory
#store_path = "/path/to/custom/verso.db"

# Number of songs sampled from the source (0 keeps every song).
# The similarity matrix grows with the square of this number.
sample_size = 10000

# Sampling seed
seed = 42

# Vocabulary size for TF-IDF weighting
max_features = 5000

# Recommendations shown when --top is not given
top_n = 5

[logging]
coloured = true
level = "info"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
