use nalgebra::{DMatrix, DVector};

use crate::base::{Fitness, IndividualId, NodeId, SpeciesId};

/// A single agent in the simulation.
///
/// The genotype is matrix-valued: the epistasis matrix maps genotype
/// columns to an intermediate representation, the pleiotropy matrix maps
/// that representation to phenotype space, and the expression vector holds
/// per-gene expression levels. Pleiotropy entries are boolean-valued
/// (stored as 0.0/1.0 so the phenotype stays a plain matrix product).
///
/// Fitness is a cache, not ground truth: it is re-derived from the current
/// matrices plus one environmental-noise draw on creation and after every
/// mutation step.
#[derive(Debug, Clone)]
pub struct Individual {
    id: IndividualId,
    species: SpeciesId,
    node: NodeId,
    fitness: Fitness,
    epistasis: DMatrix<f64>,
    pleiotropy: DMatrix<f64>,
    expression: DVector<f64>,
}

impl Individual {
    /// Create a new individual with provisional (neutral) fitness.
    pub fn new(
        id: IndividualId,
        species: SpeciesId,
        node: NodeId,
        epistasis: DMatrix<f64>,
        pleiotropy: DMatrix<f64>,
        expression: DVector<f64>,
    ) -> Self {
        debug_assert_eq!(epistasis.ncols(), expression.len());
        debug_assert_eq!(pleiotropy.ncols(), epistasis.nrows());
        Self {
            id,
            species,
            node,
            fitness: Fitness::default(),
            epistasis,
            pleiotropy,
            expression,
        }
    }

    /// Deep copy with a fresh identity, used for resampling duplicates.
    ///
    /// The cached fitness is carried over; the duplicate's matrices are
    /// identical so a re-evaluation would only differ by the noise draw.
    pub fn clone_as(&self, id: IndividualId) -> Self {
        let mut copy = self.clone();
        copy.id = id;
        copy
    }

    pub fn id(&self) -> IndividualId {
        self.id
    }

    pub fn species(&self) -> SpeciesId {
        self.species
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn set_node(&mut self, node: NodeId) {
        self.node = node;
    }

    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: Fitness) {
        self.fitness = fitness;
    }

    /// Number of genes (columns of the epistasis matrix).
    pub fn gene_count(&self) -> usize {
        self.expression.len()
    }

    /// Number of phenotype dimensions (rows of the pleiotropy matrix).
    pub fn phenotype_count(&self) -> usize {
        self.pleiotropy.nrows()
    }

    pub fn epistasis(&self) -> &DMatrix<f64> {
        &self.epistasis
    }

    pub fn epistasis_mut(&mut self) -> &mut DMatrix<f64> {
        &mut self.epistasis
    }

    pub fn pleiotropy(&self) -> &DMatrix<f64> {
        &self.pleiotropy
    }

    pub fn pleiotropy_mut(&mut self) -> &mut DMatrix<f64> {
        &mut self.pleiotropy
    }

    pub fn expression(&self) -> &DVector<f64> {
        &self.expression
    }

    pub fn expression_mut(&mut self) -> &mut DVector<f64> {
        &mut self.expression
    }
}
