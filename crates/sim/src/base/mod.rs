//! Foundational types: fitness values, identifiers, and the individual arena.

pub mod arena;
pub mod fitness;
pub mod ids;

pub use arena::IndividualArena;
pub use fitness::{Fitness, MAX_FITNESS};
pub use ids::{IndividualId, NodeId, SpeciesId};
