//! Binary-chromosome crossover and mutation.
//!
//! # Crossover
//!
//! [`crossover`] shuffles the intermediate pool, pairs consecutive
//! chromosomes, and with probability `p_cross` per pair cuts both at the
//! same uniformly random bit position and swaps their tails. Pairs that are
//! not crossed pass through unchanged, as does the last chromosome of an
//! odd-sized pool.
//!
//! # Mutation
//!
//! [`mutate`] flips every bit independently with probability `p_mut`.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

use crate::codec::Chromosome;
use crate::random::shuffle;
use rand::Rng;

// ============================================================================
// Crossover
// ============================================================================

/// Single-point crossover over a shuffled pool, in place.
pub fn crossover<R: Rng + ?Sized>(pool: &mut [Chromosome], rate: f64, rng: &mut R) {
    shuffle(pool, rng);
    for pair in pool.chunks_exact_mut(2) {
        if rng.random_range(0.0..1.0) < rate {
            let (first, second) = pair.split_at_mut(1);
            let cut = rng.random_range(0..=first[0].len());
            first[0].swap_tail(&mut second[0], cut);
        }
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// Independent per-bit flip mutation, in place.
pub fn mutate<R: Rng + ?Sized>(pool: &mut [Chromosome], rate: f64, rng: &mut R) {
    if rate <= 0.0 {
        return;
    }
    for chrom in pool.iter_mut() {
        for i in 0..chrom.len() {
            if rng.random_bool(rate) {
                chrom.flip(i);
            }
        }
    }
}
