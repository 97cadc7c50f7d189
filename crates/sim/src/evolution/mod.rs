//! Evolutionary operators: selection, mutation, recombination, migration.

pub mod distributions;
pub mod migration;
pub mod mutation;
pub mod recombination;
pub mod selection;

pub use distributions::{MagnitudeModel, MagnitudeSampler, NoiseModel};
pub use migration::MigrationModel;
pub use mutation::MutationModel;
pub use recombination::{recombine, sample_locus_subset, RecombinantGenome};
pub use selection::SelectionSurface;
