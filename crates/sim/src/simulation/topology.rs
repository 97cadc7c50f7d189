//! Spatial topology: nodes, adjacency, capacities, and membership.

use serde::{Deserialize, Serialize};

use crate::base::{IndividualId, NodeId};
use crate::errors::ConfigError;

/// Serde-facing topology description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyConfig {
    /// A 1-D chain of nodes, each adjacent to its neighbors.
    Line { nodes: usize },
    /// A 2-D grid in row-major order, 4-neighborhood, optionally periodic
    /// (wrapping at the edges).
    Grid {
        rows: usize,
        cols: usize,
        periodic: bool,
    },
    /// Explicit adjacency lists, one per node.
    Graph { adjacency: Vec<Vec<usize>> },
}

impl TopologyConfig {
    pub fn node_count(&self) -> usize {
        match self {
            Self::Line { nodes } => *nodes,
            Self::Grid { rows, cols, .. } => rows * cols,
            Self::Graph { adjacency } => adjacency.len(),
        }
    }
}

/// A position in the spatial topology.
///
/// Holds the mutable membership list for the individuals currently at this
/// node and the per-species carrying capacities.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    neighbors: Vec<NodeId>,
    capacities: Vec<f64>,
    members: Vec<IndividualId>,
}

impl Node {
    fn new(id: NodeId, neighbors: Vec<NodeId>, capacities: Vec<f64>) -> Self {
        Self {
            id,
            neighbors,
            capacities,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Carrying capacity for a species at this node.
    pub fn capacity(&self, species: usize) -> f64 {
        self.capacities[species]
    }

    pub fn members(&self) -> &[IndividualId] {
        &self.members
    }

    pub fn add_member(&mut self, id: IndividualId) {
        self.members.push(id);
    }

    /// Remove a member, preserving insertion order. Returns whether the
    /// id was present.
    pub fn remove_member(&mut self, id: IndividualId) -> bool {
        match self.members.iter().position(|&m| m == id) {
            Some(pos) => {
                self.members.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The full node set with adjacency and capacities.
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<Node>,
}

impl Topology {
    /// Build a topology from its config and the per-node capacity table
    /// (`capacities[node][species]`).
    pub fn build(config: &TopologyConfig, capacities: &[Vec<f64>]) -> Result<Self, ConfigError> {
        let count = config.node_count();
        if count == 0 {
            return Err(ConfigError::EmptyTopology);
        }
        if capacities.len() != count {
            return Err(ConfigError::CapacityTable {
                expected: count,
                found: capacities.len(),
            });
        }

        let adjacency = match config {
            TopologyConfig::Line { nodes } => line_adjacency(*nodes),
            TopologyConfig::Grid {
                rows,
                cols,
                periodic,
            } => grid_adjacency(*rows, *cols, *periodic),
            TopologyConfig::Graph { adjacency } => adjacency
                .iter()
                .map(|ns| ns.iter().map(|&n| NodeId(n)).collect())
                .collect(),
        };

        let nodes = adjacency
            .into_iter()
            .zip(capacities.iter())
            .enumerate()
            .map(|(i, (neighbors, caps))| Node::new(NodeId(i), neighbors, caps.clone()))
            .collect();

        Ok(Self { nodes })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Move an individual's membership between two nodes atomically.
    pub fn move_member(&mut self, id: IndividualId, from: NodeId, to: NodeId) {
        if from == to {
            return;
        }
        let removed = self.nodes[from.index()].remove_member(id);
        debug_assert!(removed, "moving id not present at origin node");
        self.nodes[to.index()].add_member(id);
    }
}

fn line_adjacency(nodes: usize) -> Vec<Vec<NodeId>> {
    (0..nodes)
        .map(|i| {
            let mut neighbors = Vec::with_capacity(2);
            if i > 0 {
                neighbors.push(NodeId(i - 1));
            }
            if i + 1 < nodes {
                neighbors.push(NodeId(i + 1));
            }
            neighbors
        })
        .collect()
}

fn grid_adjacency(rows: usize, cols: usize, periodic: bool) -> Vec<Vec<NodeId>> {
    let mut adjacency = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let mut neighbors = Vec::with_capacity(4);
            let mut push = |rr: isize, cc: isize| {
                let (rr, cc) = if periodic {
                    (
                        rr.rem_euclid(rows as isize) as usize,
                        cc.rem_euclid(cols as isize) as usize,
                    )
                } else {
                    if rr < 0 || cc < 0 || rr >= rows as isize || cc >= cols as isize {
                        return;
                    }
                    (rr as usize, cc as usize)
                };
                let id = NodeId(rr * cols + cc);
                if id.index() != r * cols + c && !neighbors.contains(&id) {
                    neighbors.push(id);
                }
            };
            push(r as isize - 1, c as isize);
            push(r as isize + 1, c as isize);
            push(r as isize, c as isize - 1);
            push(r as isize, c as isize + 1);
            adjacency.push(neighbors);
        }
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(nodes: usize, species: usize) -> Vec<Vec<f64>> {
        vec![vec![100.0; species]; nodes]
    }

    #[test]
    fn test_line_adjacency() {
        let topo = Topology::build(&TopologyConfig::Line { nodes: 3 }, &caps(3, 1)).unwrap();
        assert_eq!(topo.node(NodeId(0)).neighbors(), &[NodeId(1)]);
        assert_eq!(topo.node(NodeId(1)).neighbors(), &[NodeId(0), NodeId(2)]);
        assert_eq!(topo.node(NodeId(2)).neighbors(), &[NodeId(1)]);
    }

    #[test]
    fn test_grid_bounded_corner_has_two_neighbors() {
        let config = TopologyConfig::Grid {
            rows: 3,
            cols: 3,
            periodic: false,
        };
        let topo = Topology::build(&config, &caps(9, 1)).unwrap();
        assert_eq!(topo.node(NodeId(0)).neighbors().len(), 2);
        assert_eq!(topo.node(NodeId(4)).neighbors().len(), 4);
    }

    #[test]
    fn test_grid_periodic_all_nodes_have_four_neighbors() {
        let config = TopologyConfig::Grid {
            rows: 3,
            cols: 3,
            periodic: true,
        };
        let topo = Topology::build(&config, &caps(9, 1)).unwrap();
        for node in topo.nodes() {
            assert_eq!(node.neighbors().len(), 4, "node {}", node.id());
        }
    }

    #[test]
    fn test_capacity_table_must_cover_all_nodes() {
        let result = Topology::build(&TopologyConfig::Line { nodes: 4 }, &caps(3, 1));
        assert!(matches!(result, Err(ConfigError::CapacityTable { .. })));
    }

    #[test]
    fn test_empty_topology_rejected() {
        let result = Topology::build(&TopologyConfig::Line { nodes: 0 }, &[]);
        assert!(matches!(result, Err(ConfigError::EmptyTopology)));
    }

    #[test]
    fn test_membership_add_remove() {
        let mut topo = Topology::build(&TopologyConfig::Line { nodes: 2 }, &caps(2, 1)).unwrap();
        topo.node_mut(NodeId(0)).add_member(IndividualId(7));
        assert_eq!(topo.node(NodeId(0)).members(), &[IndividualId(7)]);

        topo.move_member(IndividualId(7), NodeId(0), NodeId(1));
        assert!(topo.node(NodeId(0)).is_empty());
        assert_eq!(topo.node(NodeId(1)).members(), &[IndividualId(7)]);

        assert!(topo.node_mut(NodeId(1)).remove_member(IndividualId(7)));
        assert!(!topo.node_mut(NodeId(1)).remove_member(IndividualId(7)));
    }
}
