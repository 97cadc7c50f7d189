use std::error;
use std::fmt;

/// Errors from constructing a magnitude or noise distribution.
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    /// A distribution parameter was outside its valid range.
    InvalidParameter(&'static str, f64),
    /// A uniform range was empty or reversed.
    EmptyRange { low: f64, high: f64 },
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(name, val) => {
                write!(f, "Invalid distribution parameter {name}: {val}")
            }
            Self::EmptyRange { low, high } => {
                write!(f, "Empty uniform range [{low}, {high})")
            }
        }
    }
}

impl error::Error for DistributionError {}

/// Errors from constructing a selection surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Optimum length and precision matrix dimensions disagree.
    DimensionMismatch {
        optimum: usize,
        rows: usize,
        cols: usize,
    },
    /// A scalar parameter was invalid (non-finite coefficient, negative noise).
    InvalidParameter(&'static str, f64),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch {
                optimum,
                rows,
                cols,
            } => write!(
                f,
                "Selection surface shape mismatch: optimum has {optimum} phenotypes, \
                 precision matrix is {rows}x{cols}"
            ),
            Self::InvalidParameter(name, val) => {
                write!(f, "Invalid selection parameter {name}: {val}")
            }
        }
    }
}

impl error::Error for SelectionError {}

/// Errors from constructing a mutation model.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationError {
    /// A trigger or mask probability was outside [0, 1].
    InvalidProbability(&'static str, f64),
    /// A magnitude distribution was invalid.
    Magnitude(DistributionError),
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidProbability(name, val) => {
                write!(
                    f,
                    "Invalid mutation probability for {name}: {val} (must be between 0.0 and 1.0)"
                )
            }
            Self::Magnitude(e) => write!(f, "Invalid mutation magnitude: {e}"),
        }
    }
}

impl error::Error for MutationError {}

impl From<DistributionError> for MutationError {
    fn from(e: DistributionError) -> Self {
        Self::Magnitude(e)
    }
}

/// Errors from constructing a migration model.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationError {
    /// The rate matrix was not square.
    NotSquare { rows: usize, cols: usize },
    /// A rate entry was negative or non-finite.
    InvalidWeight { row: usize, col: usize, value: f64 },
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSquare { rows, cols } => {
                write!(f, "Migration rate matrix must be square, got {rows}x{cols}")
            }
            Self::InvalidWeight { row, col, value } => {
                write!(f, "Invalid migration weight at ({row}, {col}): {value}")
            }
        }
    }
}

impl error::Error for MigrationError {}

/// Configuration errors, all fatal at setup time.
///
/// These are surfaced before a world is constructed; the simulation never
/// starts on an invalid configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No species were configured.
    NoSpecies,
    /// The topology has no nodes.
    EmptyTopology,
    /// Ploidy must be 1 or 2.
    InvalidPloidy { species: usize, ploidy: usize },
    /// A diploid species must have an even gene count.
    OddDiploidGeneCount { species: usize, genes: usize },
    /// A per-species vector or matrix had the wrong shape.
    ShapeMismatch {
        species: usize,
        field: &'static str,
        expected: usize,
        found: usize,
    },
    /// The carrying-capacity table does not cover every topology node.
    CapacityTable { expected: usize, found: usize },
    /// A carrying-capacity row has the wrong species count.
    CapacityRow {
        node: usize,
        expected: usize,
        found: usize,
    },
    /// A carrying capacity was negative or non-finite.
    InvalidCapacity {
        node: usize,
        species: usize,
        value: f64,
    },
    /// The inter-species competition matrix has the wrong shape.
    CompetitionShape {
        expected: usize,
        rows: usize,
        cols: usize,
    },
    /// A species migration matrix does not match the node count.
    MigrationShape {
        species: usize,
        expected: usize,
        rows: usize,
        cols: usize,
    },
    /// The founder population table does not cover every topology node.
    FounderTable {
        species: usize,
        expected: usize,
        found: usize,
    },
    /// A species growth rate was non-finite.
    InvalidGrowthRate { species: usize, value: f64 },
    /// A species selection surface was invalid.
    Selection {
        species: usize,
        source: SelectionError,
    },
    /// A species mutation model was invalid.
    Mutation {
        species: usize,
        source: MutationError,
    },
    /// A species migration model was invalid.
    Migration {
        species: usize,
        source: MigrationError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpecies => write!(f, "Configuration contains no species"),
            Self::EmptyTopology => write!(f, "Topology contains no nodes"),
            Self::InvalidPloidy { species, ploidy } => {
                write!(f, "Species {species}: ploidy must be 1 or 2, got {ploidy}")
            }
            Self::OddDiploidGeneCount { species, genes } => write!(
                f,
                "Species {species}: diploid gene count must be even, got {genes}"
            ),
            Self::ShapeMismatch {
                species,
                field,
                expected,
                found,
            } => write!(
                f,
                "Species {species}: {field} has length {found}, expected {expected}"
            ),
            Self::CapacityTable { expected, found } => write!(
                f,
                "Carrying-capacity table covers {found} nodes, topology has {expected}"
            ),
            Self::CapacityRow {
                node,
                expected,
                found,
            } => write!(
                f,
                "Carrying-capacity row for node {node} has {found} entries, expected {expected}"
            ),
            Self::InvalidCapacity {
                node,
                species,
                value,
            } => write!(
                f,
                "Invalid carrying capacity for node {node}, species {species}: {value}"
            ),
            Self::CompetitionShape {
                expected,
                rows,
                cols,
            } => write!(
                f,
                "Competition matrix is {rows}x{cols}, expected {expected}x{expected}"
            ),
            Self::MigrationShape {
                species,
                expected,
                rows,
                cols,
            } => write!(
                f,
                "Species {species}: migration matrix is {rows}x{cols}, expected {expected}x{expected}"
            ),
            Self::FounderTable {
                species,
                expected,
                found,
            } => write!(
                f,
                "Species {species}: founder counts cover {found} nodes, topology has {expected}"
            ),
            Self::InvalidGrowthRate { species, value } => {
                write!(f, "Species {species}: invalid growth rate {value}")
            }
            Self::Selection { species, source } => {
                write!(f, "Species {species}: {source}")
            }
            Self::Mutation { species, source } => {
                write!(f, "Species {species}: {source}")
            }
            Self::Migration { species, source } => {
                write!(f, "Species {species}: {source}")
            }
        }
    }
}

impl error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Selection { source, .. } => Some(source),
            Self::Mutation { source, .. } => Some(source),
            Self::Migration { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Runtime errors raised while advancing a generation.
///
/// These abort the run; no stage is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum StepError {
    /// A diploid species had exactly one individual at a node, so no
    /// distinct mate exists. Recombination is undefined for this state.
    DegenerateMatingPool { node: usize, species: usize },
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateMatingPool { node, species } => write!(
                f,
                "Degenerate mating pool: species {species} has a single individual at node {node}"
            ),
        }
    }
}

impl error::Error for StepError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::OddDiploidGeneCount {
            species: 2,
            genes: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("Species 2"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_step_error_display() {
        let err = StepError::DegenerateMatingPool {
            node: 3,
            species: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("node 3"));
        assert!(msg.contains("species 1"));
    }

    #[test]
    fn test_config_error_source_chain() {
        use std::error::Error;
        let err = ConfigError::Mutation {
            species: 0,
            source: MutationError::InvalidProbability("expression", 1.5),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("expression"));
    }
}
