use anyhow::{Context, Result};
use verso_etl::{config, Config};

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  dataset_path: {}", config.dataset_path.display());
    println!("  store_path: {}", config.store_path.display());
    println!("  sample_size: {}", describe_sample(config.sample_size));
    println!("  seed: {}", config.seed);
    println!("  max_features: {}", config.max_features);
    println!("  top_n: {}", config.top_n);

    println!("\nPriority: CLI args > ENV vars (VERSO_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole config file.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        println!("{}", config_value(config, &key)?);
    } else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'verso config init' to create it.");
        }
    }

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure verso.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

const VALID_KEYS: &str = "dataset_path, store_path, sample_size, seed, max_features, top_n";

fn config_value(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "dataset_path" => config.dataset_path.display().to_string(),
        "store_path" => config.store_path.display().to_string(),
        "sample_size" => config.sample_size.to_string(),
        "seed" => config.seed.to_string(),
        "max_features" => config.max_features.to_string(),
        "top_n" => config.top_n.to_string(),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    };
    Ok(value)
}

fn describe_sample(sample_size: usize) -> String {
    if sample_size == 0 {
        String::from("all songs")
    } else {
        sample_size.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_value() {
        let config = Config::default();
        assert_eq!(config_value(&config, "seed").unwrap(), "42");
        assert_eq!(config_value(&config, "top_n").unwrap(), "5");
    }

    #[test]
    fn test_unknown_config_key() {
        let err = config_value(&Config::default(), "database_path").unwrap_err();
        assert!(err.to_string().contains("Valid keys"));
    }

    #[test]
    fn test_describe_sample() {
        assert_eq!(describe_sample(0), "all songs");
        assert_eq!(describe_sample(10_000), "10000");
    }
}
