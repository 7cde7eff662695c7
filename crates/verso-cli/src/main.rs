use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use verso_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "verso", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the library store (default: ~/.local/share/verso/verso.db)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Path to the source song table (default: ./spotify_millsongdata.csv)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend songs with lyrics similar to the given song
    ///
    /// Looks the title up in the catalog, ignoring case. When several songs
    /// share a title the first one in the catalog is used. The first run
    /// builds the library from the source table, which can take a while;
    /// later runs load it from the store.
    ///
    /// Output is a numbered table of artist and song, most similar first.
    /// An unknown title prints a message and is not treated as an error.
    Recommend {
        /// Song title to find similar songs for
        title: String,

        /// Number of recommendations (default from config, normally 5)
        #[arg(short = 'n', long = "top")]
        top: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rebuild the library from the source table
    ///
    /// Samples the source, cleans the lyrics, computes TF-IDF weights and
    /// the full similarity matrix, then replaces the store in one step.
    Build,
    /// Show what is in the library store
    Status,
    /// Inspect or initialise configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults if it does not exist
    Init,
    /// Print one config value, or the whole config file
    Get {
        /// Config key (dataset_path, store_path, sample_size, seed, max_features, top_n)
        key: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with_overrides(cli.store, cli.dataset)?;

    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Failed to set up logging: {e}");
    }

    match cli.command {
        Commands::Recommend { title, top, json } => {
            let top_n = top.unwrap_or(config.top_n);
            commands::run_recommend(&config, &title, top_n, json)?;
        }
        Commands::Build => {
            commands::run_build(&config)?;
        }
        Commands::Status => {
            commands::show_status(&config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
            ConfigAction::Get { key } => commands::config::get_config(&config, key)?,
        },
    }

    Ok(())
}
