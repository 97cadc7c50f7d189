//! Founder-population instantiation.
//!
//! Every founder of a species starts from the species' configured matrices;
//! fitness is evaluated on creation so generation zero already carries a
//! coherent cache.

use nalgebra::DVector;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::base::{NodeId, SpeciesId};
use crate::genome::Individual;
use crate::simulation::parameters::{matrix_from_rows, Configuration};
use crate::simulation::world::World;

/// Seed the world with founders according to the per-node counts.
pub(crate) fn populate(world: &mut World, config: &Configuration, rng: &mut Xoshiro256PlusPlus) {
    for (s, sc) in config.species.iter().enumerate() {
        let species = SpeciesId(s);
        let epistasis = matrix_from_rows(&sc.founder.epistasis);
        let pleiotropy = matrix_from_rows(&sc.founder.pleiotropy);
        let expression = DVector::from_vec(sc.founder.expression.clone());

        for (n, &count) in sc.founder.counts.iter().enumerate() {
            let node = NodeId(n);
            for _ in 0..count {
                let id = world.spawn(|id| {
                    Individual::new(
                        id,
                        species,
                        node,
                        epistasis.clone(),
                        pleiotropy.clone(),
                        expression.clone(),
                    )
                });
                let Some(founder) = world.arena().get(id) else {
                    continue;
                };
                let fitness = world.species_params(species).surface().evaluate(founder, rng);
                if let Some(founder) = world.arena_mut().get_mut(id) {
                    founder.set_fitness(fitness);
                }
            }
        }
    }
}
