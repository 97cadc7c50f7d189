//! Console reporting helpers.

use demevo_sim::base::{NodeId, SpeciesId};
use demevo_sim::simulation::{Configuration, Simulation, TopologyConfig};

pub fn print_configuration_summary(config: &Configuration) {
    println!("Configuration:");
    println!("  Topology: {}", describe_topology(&config.topology));
    println!("  Generations: {}", config.generations);
    println!("  Seed: {}", config.seed);
    println!(
        "  Competition: {}",
        if config.competition.is_some() {
            "inter-species matrix"
        } else {
            "none"
        }
    );
    println!(
        "  Retirement: {}",
        if config.retire_whole_node {
            "whole node"
        } else {
            "reproducing species only"
        }
    );
    println!("  Species ({}):", config.species.len());
    for (s, species) in config.species.iter().enumerate() {
        let founders: usize = species.founder.counts.iter().sum();
        println!(
            "    [{s}] {}: {} genes, {} phenotypes, {}, gamma={}, r={}, {} founders{}",
            species.name,
            species.genes,
            species.phenotypes,
            if species.ploidy == 2 {
                "diploid"
            } else {
                "haploid"
            },
            species.selection_coefficient,
            species.growth_rate,
            founders,
            if species.migration.is_some() {
                ", migrates"
            } else {
                ""
            },
        );
    }
    println!();
}

pub fn print_census(sim: &Simulation) {
    let world = sim.world();
    println!("Census at generation {}:", sim.generation());
    for node in 0..world.topology().node_count() {
        let counts: Vec<String> = world
            .species()
            .iter()
            .enumerate()
            .map(|(s, params)| {
                format!(
                    "{}={}",
                    params.name(),
                    world.population_of(NodeId(node), SpeciesId(s))
                )
            })
            .collect();
        println!("  node {node}: {}", counts.join(", "));
    }
    println!("  total: {}", world.total_population());
}

fn describe_topology(topology: &TopologyConfig) -> String {
    match topology {
        TopologyConfig::Line { nodes } => format!("line, {nodes} nodes"),
        TopologyConfig::Grid {
            rows,
            cols,
            periodic,
        } => format!(
            "{rows}x{cols} grid{}",
            if *periodic { " (periodic)" } else { "" }
        ),
        TopologyConfig::Graph { adjacency } => format!("graph, {} nodes", adjacency.len()),
    }
}
