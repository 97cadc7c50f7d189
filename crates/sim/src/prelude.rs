//! Convenience re-exports for downstream code and tests.

pub use crate::base::{Fitness, IndividualArena, IndividualId, NodeId, SpeciesId, MAX_FITNESS};
pub use crate::errors::{ConfigError, StepError};
pub use crate::evolution::{
    MagnitudeModel, MigrationModel, MutationModel, NoiseModel, SelectionSurface,
};
pub use crate::genome::Individual;
pub use crate::simulation::{
    Configuration, FounderConfig, MutationConfig, Ploidy, Simulation, SimulationBuilder,
    SpeciesConfig, Topology, TopologyConfig, World,
};
