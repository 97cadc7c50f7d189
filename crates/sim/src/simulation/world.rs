//! World state: the arena, the topology, and per-species parameters.

use nalgebra::DMatrix;

use crate::base::{IndividualArena, IndividualId, NodeId, SpeciesId};
use crate::errors::ConfigError;
use crate::evolution::{MigrationModel, MutationModel, SelectionSurface};
use crate::genome::Individual;
use crate::simulation::parameters::{matrix_from_rows, Configuration, Ploidy};
use crate::simulation::topology::Topology;

/// Immutable per-species runtime parameters, built once from the
/// configuration.
#[derive(Debug, Clone)]
pub struct SpeciesParams {
    id: SpeciesId,
    name: String,
    genes: usize,
    phenotypes: usize,
    ploidy: Ploidy,
    growth_rate: f64,
    surface: SelectionSurface,
    mutation: MutationModel,
    migration: Option<MigrationModel>,
}

impl SpeciesParams {
    pub fn id(&self) -> SpeciesId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn genes(&self) -> usize {
        self.genes
    }

    pub fn phenotypes(&self) -> usize {
        self.phenotypes
    }

    pub fn ploidy(&self) -> Ploidy {
        self.ploidy
    }

    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    pub fn surface(&self) -> &SelectionSurface {
        &self.surface
    }

    pub fn mutation(&self) -> &MutationModel {
        &self.mutation
    }

    pub fn migration(&self) -> Option<&MigrationModel> {
        self.migration.as_ref()
    }
}

/// Mutable simulation state shared by all engine stages.
///
/// The arena owns every individual record; nodes hold ordered id lists.
/// The two views must stay consistent, so all create/destroy/move traffic
/// goes through the methods here.
#[derive(Debug)]
pub struct World {
    arena: IndividualArena,
    topology: Topology,
    species: Vec<SpeciesParams>,
    competition: Option<DMatrix<f64>>,
    generation: u64,
    retire_whole_node: bool,
}

impl World {
    /// Build an empty world (no individuals yet) from a validated
    /// configuration.
    pub fn build(config: &Configuration) -> Result<Self, ConfigError> {
        config.validate()?;

        let topology = Topology::build(&config.topology, &config.capacities)?;

        let mut species = Vec::with_capacity(config.species.len());
        for (s, sc) in config.species.iter().enumerate() {
            let surface = sc
                .surface()
                .map_err(|source| ConfigError::Selection { species: s, source })?;
            let mutation = sc
                .mutation
                .build()
                .map_err(|source| ConfigError::Mutation { species: s, source })?;
            let migration = sc
                .migration_model()
                .map_err(|source| ConfigError::Migration { species: s, source })?;
            species.push(SpeciesParams {
                id: SpeciesId(s),
                name: sc.name.clone(),
                genes: sc.genes,
                phenotypes: sc.phenotypes,
                ploidy: sc.ploidy(s)?,
                growth_rate: sc.growth_rate,
                surface,
                mutation,
                migration,
            });
        }

        let competition = config.competition.as_ref().map(|rows| matrix_from_rows(rows));

        Ok(Self {
            arena: IndividualArena::new(),
            topology,
            species,
            competition,
            generation: 0,
            retire_whole_node: config.retire_whole_node,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn advance_generation(&mut self) {
        self.generation += 1;
    }

    pub fn retire_whole_node(&self) -> bool {
        self.retire_whole_node
    }

    pub fn arena(&self) -> &IndividualArena {
        &self.arena
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn species(&self) -> &[SpeciesParams] {
        &self.species
    }

    pub fn species_params(&self, id: SpeciesId) -> &SpeciesParams {
        &self.species[id.index()]
    }

    pub fn competition(&self) -> Option<&DMatrix<f64>> {
        self.competition.as_ref()
    }

    /// Disjoint mutable borrows for stages that insert into the arena while
    /// reading species parameters.
    pub(crate) fn split_mut(
        &mut self,
    ) -> (&mut IndividualArena, &mut Topology, &[SpeciesParams]) {
        (&mut self.arena, &mut self.topology, &self.species)
    }

    /// Insert a new individual and register it at its node.
    pub fn spawn(&mut self, build: impl FnOnce(IndividualId) -> Individual) -> IndividualId {
        let id = self.arena.insert(build);
        // Arena access right after insert cannot fail.
        let node = self.arena.get(id).map(Individual::node);
        debug_assert!(node.is_some());
        if let Some(node) = node {
            self.topology.node_mut(node).add_member(id);
        }
        id
    }

    /// Remove an individual from the arena and its node. Returns the record.
    pub fn kill(&mut self, id: IndividualId) -> Option<Individual> {
        let removed = self.arena.remove(id)?;
        self.topology.node_mut(removed.node()).remove_member(id);
        Some(removed)
    }

    /// Relocate an individual, keeping arena record and membership in sync.
    pub fn relocate(&mut self, id: IndividualId, to: NodeId) {
        let Some(individual) = self.arena.get_mut(id) else {
            return;
        };
        let from = individual.node();
        if from == to {
            return;
        }
        individual.set_node(to);
        self.topology.move_member(id, from, to);
    }

    /// Live ids of one species at one node, in membership order.
    pub fn members_of(&self, node: NodeId, species: SpeciesId) -> Vec<IndividualId> {
        self.topology
            .node(node)
            .members()
            .iter()
            .copied()
            .filter(|&id| {
                self.arena
                    .get(id)
                    .is_some_and(|ind| ind.species() == species)
            })
            .collect()
    }

    /// Live count of one species at one node.
    pub fn population_of(&self, node: NodeId, species: SpeciesId) -> usize {
        self.topology
            .node(node)
            .members()
            .iter()
            .filter(|&&id| {
                self.arena
                    .get(id)
                    .is_some_and(|ind| ind.species() == species)
            })
            .count()
    }

    /// Per-species population totals across the whole world.
    pub fn species_totals(&self) -> Vec<usize> {
        let mut totals = vec![0; self.species.len()];
        for ind in self.arena.iter() {
            totals[ind.species().index()] += 1;
        }
        totals
    }

    /// Total live population.
    pub fn total_population(&self) -> usize {
        self.arena.live_count()
    }

    pub(crate) fn arena_mut(&mut self) -> &mut IndividualArena {
        &mut self.arena
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::parameters::SpeciesConfig;
    use crate::simulation::topology::TopologyConfig;
    use nalgebra::{DMatrix, DVector};

    fn two_node_world() -> World {
        let config = Configuration {
            topology: TopologyConfig::Line { nodes: 2 },
            species: vec![SpeciesConfig::neutral("a", 2, 1, 2, 0)],
            capacities: vec![vec![10.0], vec![10.0]],
            competition: None,
            generations: 1,
            seed: 0,
            retire_whole_node: true,
        };
        World::build(&config).unwrap()
    }

    fn spawn_at(world: &mut World, node: NodeId) -> IndividualId {
        world.spawn(|id| {
            Individual::new(
                id,
                SpeciesId(0),
                node,
                DMatrix::identity(2, 2),
                DMatrix::from_element(1, 2, 1.0),
                DVector::from_element(2, 1.0),
            )
        })
    }

    #[test]
    fn test_spawn_registers_membership() {
        let mut world = two_node_world();
        let id = spawn_at(&mut world, NodeId(0));
        assert_eq!(world.members_of(NodeId(0), SpeciesId(0)), vec![id]);
        assert_eq!(world.total_population(), 1);
    }

    #[test]
    fn test_kill_clears_membership() {
        let mut world = two_node_world();
        let id = spawn_at(&mut world, NodeId(0));
        assert!(world.kill(id).is_some());
        assert!(world.members_of(NodeId(0), SpeciesId(0)).is_empty());
        assert_eq!(world.total_population(), 0);
        assert!(world.kill(id).is_none());
    }

    #[test]
    fn test_relocate_moves_record_and_membership() {
        let mut world = two_node_world();
        let id = spawn_at(&mut world, NodeId(0));
        world.relocate(id, NodeId(1));
        assert!(world.members_of(NodeId(0), SpeciesId(0)).is_empty());
        assert_eq!(world.members_of(NodeId(1), SpeciesId(0)), vec![id]);
        assert_eq!(world.arena().get(id).unwrap().node(), NodeId(1));
    }

    #[test]
    fn test_species_totals() {
        let mut world = two_node_world();
        spawn_at(&mut world, NodeId(0));
        spawn_at(&mut world, NodeId(1));
        assert_eq!(world.species_totals(), vec![2]);
    }
}
