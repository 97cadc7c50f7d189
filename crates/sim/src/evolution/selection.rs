//! Selection surface and fitness evaluation.
//!
//! Fitness follows a multivariate Gaussian selection surface: an
//! individual's phenotype is compared to the species' optimal phenotype,
//! and the deviation is scored through a quadratic form shaped by the
//! inverse covariance matrix. This is the classic stabilizing-selection
//! landscape: fitness peaks at the optimum and falls off exponentially
//! with squared deviation, with the covariance structure controlling how
//! tolerant each phenotype axis (and combination of axes) is.

use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::base::Fitness;
use crate::errors::SelectionError;
use crate::evolution::NoiseModel;
use crate::genome::Individual;

/// Per-species selection surface: optimum, shape, strength, and noise.
#[derive(Debug, Clone)]
pub struct SelectionSurface {
    /// Selection coefficient (gamma). Zero means neutral evolution.
    coefficient: f64,
    /// Optimal phenotype vector (theta).
    optimum: DVector<f64>,
    /// Inverse covariance matrix of the surface (sigma^-1).
    precision: DMatrix<f64>,
    /// Environmental-noise distribution; one scalar draw per evaluation.
    noise: NoiseModel,
}

impl SelectionSurface {
    /// Create a selection surface.
    ///
    /// # Errors
    /// Returns an error if the precision matrix is not square with the
    /// optimum's dimension, or if the coefficient is non-finite.
    pub fn new(
        coefficient: f64,
        optimum: DVector<f64>,
        precision: DMatrix<f64>,
        noise: NoiseModel,
    ) -> Result<Self, SelectionError> {
        if !coefficient.is_finite() {
            return Err(SelectionError::InvalidParameter(
                "selection_coefficient",
                coefficient,
            ));
        }
        if precision.nrows() != optimum.len() || precision.ncols() != optimum.len() {
            return Err(SelectionError::DimensionMismatch {
                optimum: optimum.len(),
                rows: precision.nrows(),
                cols: precision.ncols(),
            });
        }
        Ok(Self {
            coefficient,
            optimum,
            precision,
            noise,
        })
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn optimum(&self) -> &DVector<f64> {
        &self.optimum
    }

    pub fn phenotype_count(&self) -> usize {
        self.optimum.len()
    }

    /// Phenotype of an individual under this surface:
    /// `z = P * (A * q) + noise`, with one scalar noise draw broadcast
    /// across the phenotype vector.
    pub fn phenotype<R: Rng + ?Sized>(&self, individual: &Individual, rng: &mut R) -> DVector<f64> {
        let noise = self.noise.draw(rng);
        individual.pleiotropy() * (individual.epistasis() * individual.expression())
            + DVector::from_element(self.optimum.len(), noise)
    }

    /// Evaluate fitness: `W = exp(-gamma * d' * sigma^-1 * d)` with
    /// `d = |z - theta|`, clamped into [0, 1e5].
    ///
    /// Never fails; numerical blow-up from a near-singular or indefinite
    /// precision matrix clamps at the cap, NaN clamps to zero.
    pub fn evaluate<R: Rng + ?Sized>(&self, individual: &Individual, rng: &mut R) -> Fitness {
        let deviation = (self.phenotype(individual, rng) - &self.optimum).abs();
        let quad = deviation.dot(&(&self.precision * &deviation));
        Fitness::new((-self.coefficient * quad).exp())
    }
}
