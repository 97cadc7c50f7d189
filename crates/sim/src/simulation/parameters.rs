//! Run configuration: serde-facing parameter types and validation.
//!
//! A `Configuration` is the complete, serializable description of a run.
//! `validate()` front-loads every structural check so the engine can assume
//! shapes agree; nothing here mutates state or draws randomness.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::evolution::{MagnitudeModel, MigrationModel, MutationModel, NoiseModel, SelectionSurface};
use crate::simulation::topology::TopologyConfig;

/// Number of genome copies a species carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ploidy {
    Haploid,
    Diploid,
}

impl Ploidy {
    /// Convert a configured copy number (1 or 2).
    pub fn from_copies(species: usize, copies: usize) -> Result<Self, ConfigError> {
        match copies {
            1 => Ok(Self::Haploid),
            2 => Ok(Self::Diploid),
            other => Err(ConfigError::InvalidPloidy {
                species,
                ploidy: other,
            }),
        }
    }

    pub fn copies(&self) -> usize {
        match self {
            Self::Haploid => 1,
            Self::Diploid => 2,
        }
    }

    pub fn is_diploid(&self) -> bool {
        matches!(self, Self::Diploid)
    }
}

/// Mutation parameters for one species, three independent channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    pub expression_probability: f64,
    pub expression_magnitude: MagnitudeModel,
    pub pleiotropy_probability: f64,
    /// Per-entry flip probability used once the pleiotropy channel fires.
    pub pleiotropy_flip_probability: f64,
    pub epistasis_probability: f64,
    pub epistasis_magnitude: MagnitudeModel,
}

impl MutationConfig {
    /// All channels off.
    pub fn silent() -> Self {
        Self {
            expression_probability: 0.0,
            expression_magnitude: MagnitudeModel::zero(),
            pleiotropy_probability: 0.0,
            pleiotropy_flip_probability: 0.0,
            epistasis_probability: 0.0,
            epistasis_magnitude: MagnitudeModel::zero(),
        }
    }

    pub fn build(&self) -> Result<MutationModel, crate::errors::MutationError> {
        MutationModel::new(
            self.expression_probability,
            &self.expression_magnitude,
            self.pleiotropy_probability,
            self.pleiotropy_flip_probability,
            self.epistasis_probability,
            &self.epistasis_magnitude,
        )
    }
}

/// Founder genotype and per-node seeding counts for one species.
///
/// Every founder of the species starts from the same matrices; divergence
/// comes from mutation and recombination after generation zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FounderConfig {
    /// Row-major `genes x genes` epistasis matrix.
    pub epistasis: Vec<Vec<f64>>,
    /// Row-major `phenotypes x genes` pleiotropy matrix (0/1 entries).
    pub pleiotropy: Vec<Vec<f64>>,
    /// Per-gene expression levels, length `genes`.
    pub expression: Vec<f64>,
    /// Individuals seeded at each topology node, length = node count.
    pub counts: Vec<usize>,
}

/// Full parameter set for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    pub genes: usize,
    pub phenotypes: usize,
    /// Genome copies: 1 (haploid, clonal) or 2 (diploid, sexual).
    pub ploidy: usize,
    /// Selection coefficient gamma; zero means neutral evolution.
    pub selection_coefficient: f64,
    /// Optimal phenotype, length `phenotypes`.
    pub optimum: Vec<f64>,
    /// Row-major inverse covariance matrix, `phenotypes x phenotypes`.
    pub precision: Vec<Vec<f64>>,
    /// Standard deviation of the environmental noise draw.
    pub noise_std: f64,
    /// Intrinsic logistic growth rate.
    pub growth_rate: f64,
    pub mutation: MutationConfig,
    /// Migration rate matrix (rows = destination, columns = origin),
    /// `nodes x nodes`. Absent means the species never migrates.
    #[serde(default)]
    pub migration: Option<Vec<Vec<f64>>>,
    pub founder: FounderConfig,
}

impl SpeciesConfig {
    /// A neutral, non-migrating haploid species with identity genetics,
    /// seeded with `count` founders at every node. Baseline for tests and
    /// generated configs.
    pub fn neutral(name: &str, genes: usize, phenotypes: usize, nodes: usize, count: usize) -> Self {
        let identity = (0..genes)
            .map(|r| (0..genes).map(|c| if r == c { 1.0 } else { 0.0 }).collect())
            .collect();
        let precision = (0..phenotypes)
            .map(|r| {
                (0..phenotypes)
                    .map(|c| if r == c { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect();
        Self {
            name: name.to_string(),
            genes,
            phenotypes,
            ploidy: 1,
            selection_coefficient: 0.0,
            optimum: vec![0.0; phenotypes],
            precision,
            noise_std: 0.0,
            growth_rate: 0.0,
            mutation: MutationConfig::silent(),
            migration: None,
            founder: FounderConfig {
                epistasis: identity,
                pleiotropy: vec![vec![1.0; genes]; phenotypes],
                expression: vec![0.0; genes],
                counts: vec![count; nodes],
            },
        }
    }

    pub fn ploidy(&self, species: usize) -> Result<Ploidy, ConfigError> {
        Ploidy::from_copies(species, self.ploidy)
    }

    /// Build the selection surface from the raw parameters.
    pub fn surface(&self) -> Result<SelectionSurface, crate::errors::SelectionError> {
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(crate::errors::SelectionError::InvalidParameter(
                "noise_std",
                self.noise_std,
            ));
        }
        let noise = NoiseModel::new(self.noise_std).map_err(|_| {
            crate::errors::SelectionError::InvalidParameter("noise_std", self.noise_std)
        })?;
        SelectionSurface::new(
            self.selection_coefficient,
            DVector::from_vec(self.optimum.clone()),
            matrix_from_rows(&self.precision),
            noise,
        )
    }

    /// Build the migration model, if the species migrates.
    pub fn migration_model(&self) -> Result<Option<MigrationModel>, crate::errors::MigrationError> {
        match &self.migration {
            Some(rows) => Ok(Some(MigrationModel::new(matrix_from_rows(rows))?)),
            None => Ok(None),
        }
    }
}

fn default_retire_whole_node() -> bool {
    true
}

/// Complete, serializable run description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub topology: TopologyConfig,
    pub species: Vec<SpeciesConfig>,
    /// Carrying capacities, `capacities[node][species]`.
    pub capacities: Vec<Vec<f64>>,
    /// Inter-species competition matrix, `species x species` row-major.
    /// Absent means no cross-species crowding.
    #[serde(default)]
    pub competition: Option<Vec<Vec<f64>>>,
    /// Generations to run.
    pub generations: u64,
    /// Master RNG seed; identical configurations replay identically.
    pub seed: u64,
    /// After reproduction at a node, retire every pre-reproduction occupant
    /// of that node (haploid bystanders included) rather than only members
    /// of the species that reproduced. On by default; mirrors the original
    /// system's literal parental-retirement behavior.
    #[serde(default = "default_retire_whole_node")]
    pub retire_whole_node: bool,
}

impl Configuration {
    /// Check every structural invariant. Cheap, no randomness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.species.is_empty() {
            return Err(ConfigError::NoSpecies);
        }
        let nodes = self.topology.node_count();
        if nodes == 0 {
            return Err(ConfigError::EmptyTopology);
        }

        self.validate_capacities(nodes)?;

        if let Some(rows) = &self.competition {
            let n = self.species.len();
            let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
            if rows.len() != n || rows.iter().any(|r| r.len() != n) {
                return Err(ConfigError::CompetitionShape {
                    expected: n,
                    rows: rows.len(),
                    cols,
                });
            }
        }

        for (s, species) in self.species.iter().enumerate() {
            self.validate_species(s, species, nodes)?;
        }
        Ok(())
    }

    fn validate_capacities(&self, nodes: usize) -> Result<(), ConfigError> {
        if self.capacities.len() != nodes {
            return Err(ConfigError::CapacityTable {
                expected: nodes,
                found: self.capacities.len(),
            });
        }
        for (node, row) in self.capacities.iter().enumerate() {
            if row.len() != self.species.len() {
                return Err(ConfigError::CapacityRow {
                    node,
                    expected: self.species.len(),
                    found: row.len(),
                });
            }
            for (species, &value) in row.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidCapacity {
                        node,
                        species,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_species(
        &self,
        s: usize,
        species: &SpeciesConfig,
        nodes: usize,
    ) -> Result<(), ConfigError> {
        let ploidy = species.ploidy(s)?;
        if ploidy.is_diploid() && species.genes % 2 != 0 {
            return Err(ConfigError::OddDiploidGeneCount {
                species: s,
                genes: species.genes,
            });
        }

        let shape = |field: &'static str, expected: usize, found: usize| {
            if expected == found {
                Ok(())
            } else {
                Err(ConfigError::ShapeMismatch {
                    species: s,
                    field,
                    expected,
                    found,
                })
            }
        };

        shape("optimum", species.phenotypes, species.optimum.len())?;
        shape("precision rows", species.phenotypes, species.precision.len())?;
        for row in &species.precision {
            shape("precision row", species.phenotypes, row.len())?;
        }

        let founder = &species.founder;
        shape("founder epistasis rows", species.genes, founder.epistasis.len())?;
        for row in &founder.epistasis {
            shape("founder epistasis row", species.genes, row.len())?;
        }
        shape(
            "founder pleiotropy rows",
            species.phenotypes,
            founder.pleiotropy.len(),
        )?;
        for row in &founder.pleiotropy {
            shape("founder pleiotropy row", species.genes, row.len())?;
        }
        shape("founder expression", species.genes, founder.expression.len())?;
        if founder.counts.len() != nodes {
            return Err(ConfigError::FounderTable {
                species: s,
                expected: nodes,
                found: founder.counts.len(),
            });
        }

        if !species.growth_rate.is_finite() {
            return Err(ConfigError::InvalidGrowthRate {
                species: s,
                value: species.growth_rate,
            });
        }

        species.surface().map_err(|source| ConfigError::Selection {
            species: s,
            source,
        })?;
        species
            .mutation
            .build()
            .map_err(|source| ConfigError::Mutation {
                species: s,
                source,
            })?;

        if let Some(rows) = &species.migration {
            let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
            if rows.len() != nodes || rows.iter().any(|r| r.len() != nodes) {
                return Err(ConfigError::MigrationShape {
                    species: s,
                    expected: nodes,
                    rows: rows.len(),
                    cols,
                });
            }
            species
                .migration_model()
                .map_err(|source| ConfigError::Migration {
                    species: s,
                    source,
                })?;
        }
        Ok(())
    }
}

/// Dense matrix from row-major nested vectors. Shape must be validated
/// beforehand; ragged input would panic.
pub(crate) fn matrix_from_rows(rows: &[Vec<f64>]) -> DMatrix<f64> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    DMatrix::from_row_iterator(nrows, ncols, rows.iter().flatten().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Configuration {
        Configuration {
            topology: TopologyConfig::Line { nodes: 2 },
            species: vec![SpeciesConfig::neutral("a", 4, 2, 2, 10)],
            capacities: vec![vec![50.0], vec![50.0]],
            competition: None,
            generations: 10,
            seed: 42,
            retire_whole_node: true,
        }
    }

    #[test]
    fn test_neutral_config_validates() {
        base_config().validate().unwrap();
    }

    #[test]
    fn test_no_species_rejected() {
        let mut config = base_config();
        config.species.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoSpecies));
    }

    #[test]
    fn test_odd_diploid_gene_count_rejected() {
        let mut config = base_config();
        config.species[0].ploidy = 2;
        config.species[0].genes = 5;
        // Founder shapes still use the old gene count; ploidy is checked first.
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OddDiploidGeneCount { species: 0, genes: 5 })
        ));
    }

    #[test]
    fn test_invalid_ploidy_rejected() {
        let mut config = base_config();
        config.species[0].ploidy = 3;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPloidy { species: 0, ploidy: 3 })
        ));
    }

    #[test]
    fn test_capacity_row_width_checked() {
        let mut config = base_config();
        config.capacities[1] = vec![50.0, 50.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityRow { node: 1, .. })
        ));
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let mut config = base_config();
        config.capacities[0][0] = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCapacity { node: 0, species: 0, .. })
        ));
    }

    #[test]
    fn test_optimum_shape_checked() {
        let mut config = base_config();
        config.species[0].optimum = vec![0.0; 3];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ShapeMismatch {
                field: "optimum",
                ..
            })
        ));
    }

    #[test]
    fn test_founder_table_must_cover_nodes() {
        let mut config = base_config();
        config.species[0].founder.counts = vec![10];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FounderTable { species: 0, .. })
        ));
    }

    #[test]
    fn test_competition_shape_checked() {
        let mut config = base_config();
        config.competition = Some(vec![vec![1.0, 0.5]]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CompetitionShape { expected: 1, .. })
        ));
    }

    #[test]
    fn test_migration_shape_checked() {
        let mut config = base_config();
        config.species[0].migration = Some(vec![vec![0.0; 3]; 3]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MigrationShape { species: 0, .. })
        ));
    }

    #[test]
    fn test_bad_mutation_probability_carries_species_index() {
        let mut config = base_config();
        config.species[0].mutation.expression_probability = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Mutation { species: 0, .. })
        ));
    }

    #[test]
    fn test_retire_whole_node_defaults_on() {
        let json = serde_json::to_value(base_config()).unwrap();
        let mut map = json.as_object().unwrap().clone();
        map.remove("retire_whole_node");
        let config: Configuration =
            serde_json::from_value(serde_json::Value::Object(map)).unwrap();
        assert!(config.retire_whole_node);
    }

    #[test]
    fn test_configuration_serde_roundtrip() {
        let config = base_config();
        let json = serde_json::to_string(&config).unwrap();
        let back: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_matrix_from_rows_row_major() {
        let m = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 3.0);
    }
}
