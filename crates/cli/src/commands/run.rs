use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use demevo_sim::simulation::{Configuration, Simulation};
use indicatif::{ProgressBar, ProgressStyle};

use crate::printing::{print_census, print_configuration_summary};

pub fn run_simulation(
    config_path: &Path,
    generations_override: Option<u64>,
    seed_override: Option<u64>,
    report_every: Option<u64>,
    show_progress: bool,
) -> Result<()> {
    println!("🧬 Demevo - Running Simulation");
    println!("============================================\n");

    let json = fs::read_to_string(config_path).with_context(|| {
        format!(
            "Failed to read configuration {}. Did you run 'demevo init' first?",
            config_path.display()
        )
    })?;
    let mut config: Configuration =
        serde_json::from_str(&json).context("Failed to parse configuration")?;

    if let Some(generations) = generations_override {
        config.generations = generations;
    }
    if let Some(seed) = seed_override {
        config.seed = seed;
    }
    let total_generations = config.generations;

    print_configuration_summary(&config);

    let mut sim = Simulation::new(config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize simulation: {e}"))?;

    println!("Running {total_generations} generations...");

    let pb = if show_progress {
        let pb = ProgressBar::new(total_generations);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    for generation in 1..=total_generations {
        sim.step()
            .map_err(|e| anyhow::anyhow!("Generation {generation}: {e}"))?;

        if let Some(every) = report_every {
            if every > 0 && generation % every == 0 {
                if let Some(pb) = &pb {
                    pb.suspend(|| print_census(&sim));
                } else {
                    print_census(&sim);
                }
            }
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }

        if sim.world().total_population() == 0 {
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }
            println!("\n⚠️  World went extinct at generation {generation}.");
            return Ok(());
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    println!("\n✓ Simulation complete!");
    println!("  Final generation: {}", sim.generation());
    print_census(&sim);

    Ok(())
}
