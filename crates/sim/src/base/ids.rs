use std::fmt;

use serde::{Deserialize, Serialize};

/// Globally unique individual identifier.
///
/// Ids are allocated monotonically by the arena and never reused, even
/// after the individual dies.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct IndividualId(pub u64);

impl IndividualId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ind_{}", self.0)
    }
}

/// Index into the world's species table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SpeciesId(pub usize);

impl SpeciesId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sp_{}", self.0)
    }
}

/// Index of a node in the spatial topology.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(IndividualId(7).to_string(), "ind_7");
        assert_eq!(SpeciesId(0).to_string(), "sp_0");
        assert_eq!(NodeId(3).to_string(), "node_3");
    }

    #[test]
    fn test_id_ordering() {
        assert!(IndividualId(1) < IndividualId(2));
        assert_eq!(IndividualId(5).index(), 5);
    }
}
