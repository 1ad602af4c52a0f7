//! Config command implementation.
//!
//! Manages CLI configuration.

use anyhow::Result;
use opgraph_usage::Config;

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("gpt Configuration");
    println!("{:-<40}", "");

    println!("Tool Name:           {}", config.tool_name);
    println!("Target Path:         {}", config.default_target_path);
    println!("Format:              {}", config.default_format_name);
    println!("Tile Cache Size:     {} MB", config.tile_cache_size_mb);
    println!("Parallelism:         {}", config.tile_scheduler_parallelism);
    println!(
        "Usage Pattern:       {}",
        config
            .usage_pattern_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(bundled)".to_string())
    );
    println!(
        "Operator Catalog:    {}",
        config
            .catalog_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(bundled)".to_string())
    );

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    if !Config::keys().contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}. Valid keys: {}",
            key,
            Config::keys().join(", ")
        );
    }

    config.set(key, value)?;
    config.save()?;
    println!("Set {} to: {}", key, value);
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    if !Config::keys().contains(&key) {
        anyhow::bail!("Unknown config key: {}", key);
    }

    let value = config.get(key).unwrap_or_else(|| "(not set)".to_string());
    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
