//! Stochastic relocation of individuals between topology nodes.
//!
//! Each species may carry a migration-rate matrix with rows indexing
//! destination nodes and columns indexing origin nodes. An individual's
//! current node selects a column, which is read as unnormalized weights
//! over destinations; one weighted draw decides where the individual goes.
//! Species without a matrix never move.

use nalgebra::DMatrix;
use rand::Rng;

use crate::base::NodeId;
use crate::errors::MigrationError;

/// Per-species migration model over a fixed node set.
#[derive(Debug, Clone)]
pub struct MigrationModel {
    /// Rate matrix: rows = destination, columns = origin.
    rates: DMatrix<f64>,
}

impl MigrationModel {
    /// Create a migration model from a square, non-negative rate matrix.
    pub fn new(rates: DMatrix<f64>) -> Result<Self, MigrationError> {
        if rates.nrows() != rates.ncols() {
            return Err(MigrationError::NotSquare {
                rows: rates.nrows(),
                cols: rates.ncols(),
            });
        }
        for row in 0..rates.nrows() {
            for col in 0..rates.ncols() {
                let value = rates[(row, col)];
                if !value.is_finite() || value < 0.0 {
                    return Err(MigrationError::InvalidWeight { row, col, value });
                }
            }
        }
        Ok(Self { rates })
    }

    pub fn node_count(&self) -> usize {
        self.rates.nrows()
    }

    /// Draw a destination for an individual currently at `origin`.
    ///
    /// The origin's column is the unnormalized weight vector over
    /// destinations. A column with zero total weight keeps the individual
    /// where it is.
    pub fn sample_destination<R: Rng + ?Sized>(&self, origin: NodeId, rng: &mut R) -> NodeId {
        let weights = self.rates.column(origin.index());
        let total: f64 = weights.sum();
        if total <= 0.0 {
            return origin;
        }

        let mut draw = rng.random_range(0.0..total);
        let mut last_positive = origin;
        for (node, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            if draw < weight {
                return NodeId(node);
            }
            draw -= weight;
            last_positive = NodeId(node);
        }
        // Floating-point fallthrough: land on the last weighted node.
        last_positive
    }
}
