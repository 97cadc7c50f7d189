use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use demevo_sim::evolution::MagnitudeModel;
use demevo_sim::simulation::{SimulationBuilder, SpeciesConfig, TopologyConfig};

/// Write a starter configuration for a small line-topology world.
pub fn init_config(
    output: &Path,
    nodes: usize,
    generations: u64,
    seed: u64,
    diploid: bool,
) -> Result<()> {
    println!("🧬 Demevo - New Configuration");
    println!("============================================\n");

    let config = SimulationBuilder::new(TopologyConfig::Line { nodes })
        .species(starter_species(nodes, diploid))
        .uniform_capacity(100.0)
        .generations(generations)
        .seed(seed)
        .configuration();

    config
        .validate()
        .context("Generated configuration failed validation")?;

    let json = serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?;
    fs::write(output, json)
        .with_context(|| format!("Failed to write configuration to {}", output.display()))?;

    println!("✓ Wrote configuration to {}", output.display());
    println!("  Topology: line with {nodes} nodes");
    println!(
        "  Species: 1 ({})",
        if diploid { "diploid" } else { "haploid" }
    );
    println!("  Generations: {generations}, seed: {seed}");
    println!("\n💡 Edit the file, then run 'demevo run -c {}'", output.display());

    Ok(())
}

/// One species with gentle selection, slow mutation, and nearest-neighbor
/// migration. Eight genes keeps the matrices readable in the JSON.
fn starter_species(nodes: usize, diploid: bool) -> SpeciesConfig {
    let mut species = SpeciesConfig::neutral("alpha", 8, 2, nodes, 20);
    species.ploidy = if diploid { 2 } else { 1 };
    species.selection_coefficient = 0.1;
    species.optimum = vec![4.0, 4.0];
    species.noise_std = 0.05;
    species.growth_rate = 0.2;
    species.founder.expression = vec![0.5; 8];

    species.mutation.expression_probability = 0.05;
    species.mutation.expression_magnitude = MagnitudeModel::Normal {
        mean: 0.0,
        std_dev: 0.05,
    };
    species.mutation.pleiotropy_probability = 0.01;
    species.mutation.pleiotropy_flip_probability = 0.02;
    species.mutation.epistasis_probability = 0.02;
    species.mutation.epistasis_magnitude = MagnitudeModel::Normal {
        mean: 0.0,
        std_dev: 0.02,
    };

    // Nearest-neighbor migration on the line, light pressure to move.
    let mut rates = vec![vec![0.0; nodes]; nodes];
    for origin in 0..nodes {
        rates[origin][origin] = 1.0;
        if origin > 0 {
            rates[origin - 1][origin] = 0.05;
        }
        if origin + 1 < nodes {
            rates[origin + 1][origin] = 0.05;
        }
    }
    species.migration = Some(rates);

    species
}
