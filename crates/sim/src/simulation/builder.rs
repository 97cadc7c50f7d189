//! Fluent construction of configurations and simulations.

use crate::errors::ConfigError;
use crate::simulation::engine::Simulation;
use crate::simulation::parameters::{Configuration, SpeciesConfig};
use crate::simulation::topology::TopologyConfig;

/// Builder for programmatic setup, mostly used by tests and generated
/// configs. `Configuration` itself remains the serde-facing type.
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    topology: TopologyConfig,
    species: Vec<SpeciesConfig>,
    capacities: Vec<Vec<f64>>,
    uniform_capacity: Option<f64>,
    competition: Option<Vec<Vec<f64>>>,
    generations: u64,
    seed: u64,
    retire_whole_node: bool,
}

impl SimulationBuilder {
    pub fn new(topology: TopologyConfig) -> Self {
        Self {
            topology,
            species: Vec::new(),
            capacities: Vec::new(),
            uniform_capacity: None,
            competition: None,
            generations: 100,
            seed: 0,
            retire_whole_node: true,
        }
    }

    pub fn species(mut self, species: SpeciesConfig) -> Self {
        self.species.push(species);
        self
    }

    /// Explicit capacity table, `capacities[node][species]`.
    pub fn capacities(mut self, capacities: Vec<Vec<f64>>) -> Self {
        self.capacities = capacities;
        self
    }

    /// One carrying capacity for every (node, species) pair.
    pub fn uniform_capacity(mut self, capacity: f64) -> Self {
        self.uniform_capacity = Some(capacity);
        self
    }

    pub fn competition(mut self, matrix: Vec<Vec<f64>>) -> Self {
        self.competition = Some(matrix);
        self
    }

    pub fn generations(mut self, generations: u64) -> Self {
        self.generations = generations;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn retire_whole_node(mut self, literal: bool) -> Self {
        self.retire_whole_node = literal;
        self
    }

    /// Assemble the configuration without validating it.
    pub fn configuration(self) -> Configuration {
        let capacities = match self.uniform_capacity {
            Some(k) if self.capacities.is_empty() => {
                vec![vec![k; self.species.len()]; self.topology.node_count()]
            }
            _ => self.capacities,
        };
        Configuration {
            topology: self.topology,
            species: self.species,
            capacities,
            competition: self.competition,
            generations: self.generations,
            seed: self.seed,
            retire_whole_node: self.retire_whole_node,
        }
    }

    /// Validate and build a ready-to-run simulation.
    pub fn build(self) -> Result<Simulation, ConfigError> {
        Simulation::new(self.configuration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_capacity_fills_the_table() {
        let config = SimulationBuilder::new(TopologyConfig::Line { nodes: 3 })
            .species(SpeciesConfig::neutral("a", 2, 1, 3, 5))
            .species(SpeciesConfig::neutral("b", 2, 1, 3, 5))
            .uniform_capacity(25.0)
            .configuration();
        assert_eq!(config.capacities, vec![vec![25.0, 25.0]; 3]);
        config.validate().unwrap();
    }

    #[test]
    fn test_build_runs_validation() {
        let result = SimulationBuilder::new(TopologyConfig::Line { nodes: 1 }).build();
        assert!(matches!(result, Err(ConfigError::NoSpecies)));
    }

    #[test]
    fn test_build_produces_seeded_world() {
        let sim = SimulationBuilder::new(TopologyConfig::Line { nodes: 2 })
            .species(SpeciesConfig::neutral("a", 2, 1, 2, 3))
            .uniform_capacity(10.0)
            .seed(7)
            .build()
            .unwrap();
        assert_eq!(sim.world().total_population(), 6);
    }
}
