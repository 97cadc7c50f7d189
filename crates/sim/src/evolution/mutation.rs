//! Mutation of per-individual genetic and regulatory state.
//!
//! Three independent channels, each gated by its own Bernoulli trigger per
//! individual per generation:
//!
//! - **Expression**: adds one magnitude draw per gene to the expression
//!   vector (models regulatory drift in expression levels).
//! - **Pleiotropy**: draws a Bernoulli mask over the pleiotropy matrix and
//!   flips the selected 0/1 entries (a gene gains or loses influence on a
//!   phenotype axis).
//! - **Epistasis**: adds an i.i.d. magnitude matrix to the epistasis matrix
//!   (interaction strengths between genes shift continuously).
//!
//! Fitness re-evaluation after mutation is the engine's responsibility and
//! is unconditional, so fitness drifts with the environmental-noise re-draw
//! even when no channel fires.

use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::errors::MutationError;
use crate::evolution::{MagnitudeModel, MagnitudeSampler};
use crate::genome::Individual;

/// Per-species mutation model with three independent channels.
#[derive(Debug, Clone)]
pub struct MutationModel {
    expression_gate: Bernoulli,
    expression_magnitude: MagnitudeSampler,
    pleiotropy_gate: Bernoulli,
    pleiotropy_mask: Bernoulli,
    epistasis_gate: Bernoulli,
    epistasis_magnitude: MagnitudeSampler,
}

fn gate(name: &'static str, probability: f64) -> Result<Bernoulli, MutationError> {
    Bernoulli::new(probability).map_err(|_| MutationError::InvalidProbability(name, probability))
}

impl MutationModel {
    /// Build a mutation model from channel probabilities and magnitudes.
    ///
    /// `pleiotropy_flip_probability` is the per-entry mask probability used
    /// once the pleiotropy channel fires.
    pub fn new(
        expression_probability: f64,
        expression_magnitude: &MagnitudeModel,
        pleiotropy_probability: f64,
        pleiotropy_flip_probability: f64,
        epistasis_probability: f64,
        epistasis_magnitude: &MagnitudeModel,
    ) -> Result<Self, MutationError> {
        Ok(Self {
            expression_gate: gate("expression", expression_probability)?,
            expression_magnitude: expression_magnitude.sampler()?,
            pleiotropy_gate: gate("pleiotropy", pleiotropy_probability)?,
            pleiotropy_mask: gate("pleiotropy_flip", pleiotropy_flip_probability)?,
            epistasis_gate: gate("epistasis", epistasis_probability)?,
            epistasis_magnitude: epistasis_magnitude.sampler()?,
        })
    }

    /// A model whose channels never fire.
    pub fn silent() -> Self {
        let zero = MagnitudeModel::zero();
        // All parameters are constants in range; construction cannot fail.
        Self::new(0.0, &zero, 0.0, 0.0, 0.0, &zero).expect("zero-probability model is valid")
    }

    /// Apply the three channels to an individual in place.
    ///
    /// Returns true if any channel fired. The caller must re-evaluate
    /// fitness afterwards regardless of the return value.
    pub fn mutate<R: Rng + ?Sized>(&self, individual: &mut Individual, rng: &mut R) -> bool {
        let mut fired = false;

        if self.expression_gate.sample(rng) {
            for level in individual.expression_mut().iter_mut() {
                *level += self.expression_magnitude.sample(rng);
            }
            fired = true;
        }

        if self.pleiotropy_gate.sample(rng) {
            for entry in individual.pleiotropy_mut().iter_mut() {
                if self.pleiotropy_mask.sample(rng) {
                    // Entries are boolean-valued 0/1; 1 - x is logical negation.
                    *entry = 1.0 - *entry;
                }
            }
            fired = true;
        }

        if self.epistasis_gate.sample(rng) {
            for weight in individual.epistasis_mut().iter_mut() {
                *weight += self.epistasis_magnitude.sample(rng);
            }
            fired = true;
        }

        fired
    }
}
