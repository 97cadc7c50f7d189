//! The generation scheduler.
//!
//! A generation is four stages in fixed order: sexual reproduction (diploid
//! species only), density-dependent regulation with fitness-weighted
//! resampling, then one pass over every survivor applying mutation and
//! migration. Reproduction and regulation are serial over nodes; the
//! survivor pass is data-parallel with per-individual RNGs reseeded from
//! the master stream, so thread scheduling never changes the outcome.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use crate::base::{IndividualId, NodeId, SpeciesId};
use crate::errors::{ConfigError, StepError};
use crate::evolution::{recombine, RecombinantGenome};
use crate::genome::Individual;
use crate::simulation::initialization;
use crate::simulation::parameters::Configuration;
use crate::simulation::world::World;

/// A configured, running simulation.
pub struct Simulation {
    world: World,
    rng: Xoshiro256PlusPlus,
    total_generations: u64,
}

impl Simulation {
    /// Validate the configuration, build the world, and seed the founders.
    pub fn new(config: Configuration) -> Result<Self, ConfigError> {
        let mut world = World::build(&config)?;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        initialization::populate(&mut world, &config, &mut rng);
        Ok(Self {
            world,
            rng,
            total_generations: config.generations,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn generation(&self) -> u64 {
        self.world.generation()
    }

    pub fn total_generations(&self) -> u64 {
        self.total_generations
    }

    /// Advance one generation.
    pub fn step(&mut self) -> Result<(), StepError> {
        if self
            .world
            .species()
            .iter()
            .any(|s| s.ploidy().is_diploid())
        {
            self.apply_reproduction()?;
        }
        self.apply_regulation();
        self.apply_mutation_and_migration();
        self.world.advance_generation();
        Ok(())
    }

    /// Advance `generations` generations.
    pub fn run_for(&mut self, generations: u64) -> Result<(), StepError> {
        for _ in 0..generations {
            self.step()?;
        }
        Ok(())
    }

    /// Run the configured number of generations.
    pub fn run(&mut self) -> Result<(), StepError> {
        self.run_for(self.total_generations)
    }

    /// Sexual reproduction, node by node.
    ///
    /// Each diploid individual acts as a focal parent once, with a mate
    /// drawn uniformly among the other pool members via an index shift.
    /// After a node produces offspring, its pre-reproduction occupants are
    /// retired: the whole node by default (haploid bystanders included), or
    /// only the reproducing species when `retire_whole_node` is off.
    fn apply_reproduction(&mut self) -> Result<(), StepError> {
        for n in 0..self.world.topology().node_count() {
            let node = NodeId(n);
            let mut broods: Vec<(SpeciesId, RecombinantGenome)> = Vec::new();
            let mut reproduced: Vec<SpeciesId> = Vec::new();

            for s in 0..self.world.species().len() {
                let species = SpeciesId(s);
                if !self.world.species_params(species).ploidy().is_diploid() {
                    continue;
                }
                let pool = self.world.members_of(node, species);
                match pool.len() {
                    0 => continue,
                    1 => return Err(StepError::DegenerateMatingPool { node: n, species: s }),
                    _ => {}
                }
                for (k, &focal_id) in pool.iter().enumerate() {
                    let shift = 1 + self.rng.random_range(0..pool.len() - 1);
                    let mate_id = pool[(k + shift) % pool.len()];
                    let Some(focal) = self.world.arena().get(focal_id) else {
                        continue;
                    };
                    let Some(mate) = self.world.arena().get(mate_id) else {
                        continue;
                    };
                    broods.push((species, recombine(focal, mate, &mut self.rng)));
                }
                reproduced.push(species);
            }

            if broods.is_empty() {
                continue;
            }

            // Snapshot occupants before any offspring joins the node.
            let retiring: Vec<IndividualId> = if self.world.retire_whole_node() {
                self.world.topology().node(node).members().to_vec()
            } else {
                reproduced
                    .iter()
                    .flat_map(|&s| self.world.members_of(node, s))
                    .collect()
            };

            let mut newborn = Vec::with_capacity(broods.len());
            for (species, genome) in broods {
                let id = self.world.spawn(|id| {
                    Individual::new(
                        id,
                        species,
                        node,
                        genome.epistasis,
                        genome.pleiotropy,
                        genome.expression,
                    )
                });
                newborn.push(id);
            }
            for id in newborn {
                self.evaluate_fitness(id);
            }

            for id in retiring {
                self.world.kill(id);
            }
        }
        Ok(())
    }

    /// Density-dependent sizing plus fitness-weighted resampling, per
    /// (node, species).
    ///
    /// Counts are snapshotted per node before its memberships change, so a
    /// species' crowding load reflects the pre-regulation state.
    fn apply_regulation(&mut self) {
        let species_count = self.world.species().len();
        for n in 0..self.world.topology().node_count() {
            let node = NodeId(n);
            let counts: Vec<f64> = (0..species_count)
                .map(|s| self.world.population_of(node, SpeciesId(s)) as f64)
                .collect();

            for s in 0..species_count {
                let species = SpeciesId(s);
                let size = counts[s];
                if size == 0.0 {
                    continue;
                }
                let capacity = self.world.topology().node(node).capacity(s);
                let rate = self.world.species_params(species).growth_rate();
                let load = match self.world.competition() {
                    Some(c) => {
                        (0..species_count)
                            .map(|j| c[(j, s)] * counts[j])
                            .sum::<f64>()
                            - c[(s, s)] * size
                    }
                    None => 0.0,
                };
                let target = (size + rate * size * (1.0 - (size + load) / capacity)).round();

                let members = self.world.members_of(node, species);
                if !target.is_finite() || target < 1.0 {
                    // Shrunk to nothing, or a degenerate target (NaN or
                    // infinity from a zero capacity): quiet local extinction.
                    for id in members {
                        self.world.kill(id);
                    }
                    continue;
                }

                let weights: Vec<f64> = members
                    .iter()
                    .map(|&id| {
                        self.world
                            .arena()
                            .get(id)
                            .map_or(0.0, |ind| ind.fitness().get())
                    })
                    .collect();
                let draws = resample_counts(&weights, target as usize, &mut self.rng);

                for (idx, &count) in draws.iter().enumerate() {
                    let id = members[idx];
                    if count == 0 {
                        self.world.kill(id);
                        continue;
                    }
                    let Some(parent) = self.world.arena().get(id).cloned() else {
                        continue;
                    };
                    for _ in 1..count {
                        self.world.spawn(|new_id| parent.clone_as(new_id));
                    }
                }
            }
        }
    }

    /// Mutation then migration for every survivor, in one parallel pass.
    ///
    /// Seeds are pre-drawn from the master stream, one per arena slot, so
    /// each individual gets an independent deterministic RNG. Fitness is
    /// re-evaluated unconditionally after mutation. Destinations are only
    /// computed here; the moves are applied serially afterwards through
    /// `World::relocate` to keep records and memberships consistent.
    fn apply_mutation_and_migration(&mut self) {
        let slot_count = self.world.arena().slots().len();
        let seeds: Vec<u64> = (0..slot_count).map(|_| self.rng.random()).collect();

        let (arena, _, species) = self.world.split_mut();

        let moves: Vec<(IndividualId, NodeId)> = arena
            .slots_mut()
            .par_iter_mut()
            .enumerate()
            .filter_map(|(slot, entry)| {
                let individual = entry.as_mut()?;
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seeds[slot]);
                let params = &species[individual.species().index()];

                params.mutation().mutate(individual, &mut rng);
                let fitness = params.surface().evaluate(individual, &mut rng);
                individual.set_fitness(fitness);

                let origin = individual.node();
                let destination = params.migration()?.sample_destination(origin, &mut rng);
                if destination == origin {
                    return None;
                }
                Some((individual.id(), destination))
            })
            .collect();

        for (id, to) in moves {
            self.world.relocate(id, to);
        }
    }

    fn evaluate_fitness(&mut self, id: IndividualId) {
        let Some(individual) = self.world.arena().get(id) else {
            return;
        };
        let species = individual.species();
        let fitness = self
            .world
            .species_params(species)
            .surface()
            .evaluate(individual, &mut self.rng);
        if let Some(individual) = self.world.arena_mut().get_mut(id) {
            individual.set_fitness(fitness);
        }
    }
}

/// Weighted resampling with replacement: `draws` cumulative-scan draws over
/// `weights`, returning per-index hit counts. All-zero (or non-finite)
/// weight totals fall back to a uniform draw.
fn resample_counts<R: Rng + ?Sized>(weights: &[f64], draws: usize, rng: &mut R) -> Vec<usize> {
    let mut counts = vec![0usize; weights.len()];
    if weights.is_empty() {
        return counts;
    }
    let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();

    for _ in 0..draws {
        let chosen = if total > 0.0 {
            let mut draw = rng.random_range(0.0..total);
            let mut last_positive = 0;
            let mut hit = None;
            for (i, &w) in weights.iter().enumerate() {
                if !w.is_finite() || w <= 0.0 {
                    continue;
                }
                if draw < w {
                    hit = Some(i);
                    break;
                }
                draw -= w;
                last_positive = i;
            }
            // Floating-point fallthrough lands on the last weighted index.
            hit.unwrap_or(last_positive)
        } else {
            rng.random_range(0..weights.len())
        };
        counts[chosen] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::parameters::{Configuration, SpeciesConfig};
    use crate::simulation::topology::TopologyConfig;

    fn config_with(species: Vec<SpeciesConfig>, nodes: usize, capacity: f64) -> Configuration {
        Configuration {
            topology: TopologyConfig::Line { nodes },
            species: species.clone(),
            capacities: vec![vec![capacity; species.len()]; nodes],
            competition: None,
            generations: 5,
            seed: 99,
            retire_whole_node: true,
        }
    }

    #[test]
    fn test_resample_counts_total_matches_draws() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let counts = resample_counts(&[1.0, 2.0, 3.0], 50, &mut rng);
        assert_eq!(counts.iter().sum::<usize>(), 50);
    }

    #[test]
    fn test_resample_counts_zero_weights_uniform_fallback() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let counts = resample_counts(&[0.0, 0.0, 0.0], 3000, &mut rng);
        assert_eq!(counts.iter().sum::<usize>(), 3000);
        // Uniform fallback: every index drawn a fair share.
        for &c in &counts {
            assert!((800..1200).contains(&c), "count was {c}");
        }
    }

    #[test]
    fn test_resample_counts_skips_zero_weight_entries() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let counts = resample_counts(&[0.0, 5.0, 0.0], 100, &mut rng);
        assert_eq!(counts, vec![0, 100, 0]);
    }

    #[test]
    fn test_neutral_haploid_world_is_static() {
        // r = 0, no mutation, no migration: nothing changes the counts.
        let mut sim =
            Simulation::new(config_with(vec![SpeciesConfig::neutral("a", 2, 1, 2, 8)], 2, 8.0))
                .unwrap();
        sim.run_for(5).unwrap();
        assert_eq!(sim.generation(), 5);
        assert_eq!(sim.world().population_of(NodeId(0), SpeciesId(0)), 8);
        assert_eq!(sim.world().population_of(NodeId(1), SpeciesId(0)), 8);
    }

    #[test]
    fn test_growth_toward_capacity() {
        let mut species = SpeciesConfig::neutral("a", 2, 1, 1, 4);
        species.growth_rate = 0.5;
        let mut sim = Simulation::new(config_with(vec![species], 1, 40.0)).unwrap();
        sim.run_for(30).unwrap();
        // Rounding makes the discrete fixed point sit just under K.
        let size = sim.world().population_of(NodeId(0), SpeciesId(0));
        assert!((38..=40).contains(&size), "size was {size}");
    }

    #[test]
    fn test_negative_growth_on_zero_capacity_is_extinction() {
        // K = 0 with r < 0 drives the logistic target to +inf; the
        // regulator must treat that as local extinction, not a huge
        // resampling request.
        let mut species = SpeciesConfig::neutral("a", 2, 1, 1, 5);
        species.growth_rate = -0.5;
        let mut sim = Simulation::new(config_with(vec![species], 1, 0.0)).unwrap();
        sim.step().unwrap();
        assert_eq!(sim.world().population_of(NodeId(0), SpeciesId(0)), 0);
    }

    #[test]
    fn test_single_diploid_is_fatal() {
        let mut species = SpeciesConfig::neutral("a", 4, 1, 1, 1);
        species.ploidy = 2;
        let mut sim = Simulation::new(config_with(vec![species], 1, 10.0)).unwrap();
        assert_eq!(
            sim.step(),
            Err(StepError::DegenerateMatingPool {
                node: 0,
                species: 0
            })
        );
    }

    #[test]
    fn test_diploid_reproduction_keeps_size_before_regulation_growth() {
        // Each of the 6 parents produces one offspring and then retires,
        // so with r = 0 the census is unchanged.
        let mut species = SpeciesConfig::neutral("a", 4, 1, 1, 6);
        species.ploidy = 2;
        let mut sim = Simulation::new(config_with(vec![species], 1, 6.0)).unwrap();
        sim.step().unwrap();
        assert_eq!(sim.world().population_of(NodeId(0), SpeciesId(0)), 6);
    }

    #[test]
    fn test_whole_node_retirement_takes_haploid_bystanders() {
        let mut diploid = SpeciesConfig::neutral("d", 4, 1, 1, 4);
        diploid.ploidy = 2;
        let haploid = SpeciesConfig::neutral("h", 2, 1, 1, 5);
        let mut config = config_with(vec![diploid, haploid], 1, 50.0);
        config.retire_whole_node = true;

        let mut sim = Simulation::new(config).unwrap();
        sim.step().unwrap();
        assert_eq!(sim.world().population_of(NodeId(0), SpeciesId(1)), 0);
    }

    #[test]
    fn test_species_scoped_retirement_spares_bystanders() {
        let mut diploid = SpeciesConfig::neutral("d", 4, 1, 1, 4);
        diploid.ploidy = 2;
        let haploid = SpeciesConfig::neutral("h", 2, 1, 1, 5);
        let mut config = config_with(vec![diploid, haploid], 1, 50.0);
        config.retire_whole_node = false;

        let mut sim = Simulation::new(config).unwrap();
        sim.step().unwrap();
        assert_eq!(sim.world().population_of(NodeId(0), SpeciesId(1)), 5);
    }

    #[test]
    fn test_identical_seeds_replay_identically() {
        let make = || {
            let mut species = SpeciesConfig::neutral("a", 2, 1, 2, 10);
            species.growth_rate = 0.3;
            species.mutation.expression_probability = 0.5;
            species.mutation.expression_magnitude = crate::evolution::MagnitudeModel::Normal {
                mean: 0.0,
                std_dev: 0.1,
            };
            species.migration = Some(vec![vec![1.0, 1.0], vec![1.0, 1.0]]);
            Simulation::new(config_with(vec![species], 2, 20.0)).unwrap()
        };
        let mut a = make();
        let mut b = make();
        a.run_for(10).unwrap();
        b.run_for(10).unwrap();
        assert_eq!(a.world().species_totals(), b.world().species_totals());
        assert_eq!(
            a.world().population_of(NodeId(0), SpeciesId(0)),
            b.world().population_of(NodeId(0), SpeciesId(0))
        );
    }
}
