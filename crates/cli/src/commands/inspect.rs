use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use demevo_sim::simulation::Configuration;

use crate::printing::print_configuration_summary;

/// Validate a configuration file and print its summary.
pub fn inspect_config(config_path: &Path) -> Result<()> {
    println!("🧬 Demevo - Configuration Inspection");
    println!("============================================\n");

    let json = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read configuration {}", config_path.display()))?;
    let config: Configuration =
        serde_json::from_str(&json).context("Failed to parse configuration")?;

    match config.validate() {
        Ok(()) => println!("✓ Configuration is valid.\n"),
        Err(e) => {
            println!("❌ Configuration is invalid: {e}\n");
            anyhow::bail!("validation failed");
        }
    }

    print_configuration_summary(&config);
    Ok(())
}
