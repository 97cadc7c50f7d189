//! Diploid recombination with independent locus assortment.
//!
//! A diploid genome carries two homologous halves: gene columns `0..L` and
//! `L..2L` where `L = genes / 2` is the haploid locus count. Recombination
//! picks a random half of the haploid loci and mirrors the choice onto both
//! homologs, so each locus assorts independently rather than by linked
//! crossover. The offspring starts as a copy of the mate's state and takes
//! the focal parent's columns/entries at the chosen loci.

use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::genome::Individual;

/// Genotype produced by a recombination event, before fitness evaluation.
#[derive(Debug, Clone)]
pub struct RecombinantGenome {
    pub epistasis: DMatrix<f64>,
    pub pleiotropy: DMatrix<f64>,
    pub expression: DVector<f64>,
}

/// Sample `count` distinct locus indices from `0..loci` without
/// replacement (partial Fisher-Yates shuffle).
pub fn sample_locus_subset<R: Rng + ?Sized>(
    loci: usize,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count <= loci);
    let mut pool: Vec<usize> = (0..loci).collect();
    for i in 0..count {
        let j = rng.random_range(i..loci);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

/// Recombine two same-species diploid parents into an offspring genotype.
///
/// The offspring copies the mate's epistasis/pleiotropy/expression state,
/// then overwrites the columns (and expression entries) at the diploid
/// index set `S + (S + L)` with the focal parent's data, where `S` is a
/// random subset of `ceil(L / 2)` haploid loci.
pub fn recombine<R: Rng + ?Sized>(
    focal: &Individual,
    mate: &Individual,
    rng: &mut R,
) -> RecombinantGenome {
    let genes = focal.gene_count();
    let haploid = genes / 2;
    let subset = sample_locus_subset(haploid, haploid.div_ceil(2), rng);

    let mut epistasis = mate.epistasis().clone();
    let mut pleiotropy = mate.pleiotropy().clone();
    let mut expression = mate.expression().clone();

    for &locus in &subset {
        // Mirror the locus choice onto both homologous halves.
        for column in [locus, locus + haploid] {
            epistasis.set_column(column, &focal.epistasis().column(column));
            pleiotropy.set_column(column, &focal.pleiotropy().column(column));
            expression[column] = focal.expression()[column];
        }
    }

    RecombinantGenome {
        epistasis,
        pleiotropy,
        expression,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{IndividualId, NodeId, SpeciesId};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    /// Individual whose every matrix entry equals `fill`, easy to trace.
    fn filled_individual(genes: usize, fill: f64) -> Individual {
        Individual::new(
            IndividualId(0),
            SpeciesId(0),
            NodeId(0),
            DMatrix::from_element(genes, genes, fill),
            DMatrix::from_element(3, genes, fill),
            DVector::from_element(genes, fill),
        )
    }

    #[test]
    fn test_sample_locus_subset_distinct_and_in_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        for _ in 0..20 {
            let mut subset = sample_locus_subset(10, 5, &mut rng);
            subset.sort_unstable();
            subset.dedup();
            assert_eq!(subset.len(), 5);
            assert!(subset.iter().all(|&l| l < 10));
        }
    }

    #[test]
    fn test_sample_locus_subset_full_draw() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let mut subset = sample_locus_subset(4, 4, &mut rng);
        subset.sort_unstable();
        assert_eq!(subset, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_recombinant_columns_come_from_exactly_one_parent() {
        let focal = filled_individual(8, 1.0);
        let mate = filled_individual(8, 2.0);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);

        let child = recombine(&focal, &mate, &mut rng);

        // Every column is uniformly from one parent, and the two homologous
        // halves mirror each other.
        let haploid = 4;
        let mut from_focal = 0;
        for locus in 0..haploid {
            let first = child.expression[locus];
            assert_eq!(first, child.expression[locus + haploid]);
            assert!(first == 1.0 || first == 2.0);
            for column in [locus, locus + haploid] {
                for row in 0..8 {
                    assert_eq!(child.epistasis[(row, column)], first);
                }
                for row in 0..3 {
                    assert_eq!(child.pleiotropy[(row, column)], first);
                }
            }
            if first == 1.0 {
                from_focal += 1;
            }
        }
        // ceil(4 / 2) = 2 haploid loci from the focal parent.
        assert_eq!(from_focal, 2);
    }

    #[test]
    fn test_recombine_identical_parents_is_identity() {
        let focal = filled_individual(6, 3.0);
        let mate = focal.clone_as(IndividualId(1));
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);

        let child = recombine(&focal, &mate, &mut rng);
        assert_eq!(&child.epistasis, focal.epistasis());
        assert_eq!(&child.pleiotropy, focal.pleiotropy());
        assert_eq!(&child.expression, focal.expression());
    }
}
