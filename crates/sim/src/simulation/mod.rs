//! World state, configuration, and the generation scheduler.

pub mod builder;
pub mod engine;
pub mod initialization;
pub mod parameters;
pub mod topology;
pub mod world;

pub use builder::SimulationBuilder;
pub use engine::Simulation;
pub use parameters::{Configuration, FounderConfig, MutationConfig, Ploidy, SpeciesConfig};
pub use topology::{Node, Topology, TopologyConfig};
pub use world::{SpeciesParams, World};
