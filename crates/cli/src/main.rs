mod commands;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{init, inspect, run};

/// Demevo: a multi-species spatial evolutionary dynamics simulator.
///
/// Populations of matrix-valued genotypes evolve on a spatial topology
/// under selection, mutation, recombination, and migration.
#[derive(Parser, Debug)]
#[command(name = "demevo")]
#[command(author, version, about = "Simulates multi-species evolution on a spatial topology", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter configuration file.
    ///
    /// Produces a ready-to-edit JSON configuration for a small world.
    Init {
        /// Output path for the configuration
        #[arg(short, long, default_value = "demevo.json")]
        output: PathBuf,

        /// Number of nodes in the line topology
        #[arg(long, default_value = "4")]
        nodes: usize,

        /// Generations to configure
        #[arg(short, long, default_value = "500")]
        generations: u64,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Configure a diploid (sexually reproducing) species
        #[arg(long)]
        diploid: bool,
    },

    /// Run a simulation from a configuration file.
    Run {
        /// Configuration path
        #[arg(short, long, default_value = "demevo.json")]
        config: PathBuf,

        /// Override the configured generation count
        #[arg(short, long)]
        generations: Option<u64>,

        /// Override the configured random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Print a census every N generations
        #[arg(long)]
        report_every: Option<u64>,

        /// Show progress bar
        #[arg(long, default_value = "true")]
        progress: bool,
    },

    /// Validate a configuration and show its summary.
    Inspect {
        /// Configuration path
        #[arg(short, long, default_value = "demevo.json")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init {
            output,
            nodes,
            generations,
            seed,
            diploid,
        } => {
            init::init_config(&output, nodes, generations, seed, diploid)?;
        }
        Commands::Run {
            config,
            generations,
            seed,
            report_every,
            progress,
        } => {
            run::run_simulation(&config, generations, seed, report_every, progress)?;
        }
        Commands::Inspect { config } => {
            inspect::inspect_config(&config)?;
        }
    }

    Ok(())
}
