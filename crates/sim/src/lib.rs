//! Multi-species spatial evolutionary dynamics engine.
//!
//! Individuals carry matrix-valued genotypes (an epistasis matrix, a
//! boolean pleiotropy matrix, and a per-gene expression vector) mapped to
//! phenotypes and scored against per-species optima under a Gaussian
//! selection surface. Populations reproduce sexually (diploid species),
//! are regulated toward per-node carrying capacities by logistic sizing
//! plus fitness-weighted resampling, mutate through three independent
//! channels, and migrate across a spatial topology.
//!
//! Entry point: build a [`simulation::Configuration`] (JSON-serializable)
//! or use [`simulation::SimulationBuilder`], then drive
//! [`simulation::Simulation::step`] or `run`. Runs are deterministic for a
//! given configuration and seed.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod prelude;
pub mod simulation;
