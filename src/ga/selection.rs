//! Rank-based breeding probabilities and roulette-wheel selection.
//!
//! The breeding table depends only on the population size and the fitness
//! differential, never on likelihood magnitudes: the solution of rank `i`
//! (0 = best) breeds with probability
//!
//! ```text
//! P(i) = 1/n + fdif · (n + 1 - 2(i + 1)) / (n (n + 1))
//! ```
//!
//! which sums to one and decreases linearly with rank.
//!
//! # References
//!
//! - Baker (1985), "Adaptive Selection Methods for Genetic Algorithms"
//! - Charbonneau (1995), "Genetic Algorithms in Astronomy and Astrophysics"

use rand::Rng;

/// Fixed breeding distribution over ranks.
#[derive(Debug, Clone, PartialEq)]
pub struct BreedingTable {
    probabilities: Vec<f64>,
    total: f64,
}

impl BreedingTable {
    /// Builds the table for `n` ranks.
    ///
    /// # Panics
    /// Panics if `n == 0`.
    pub fn new(n: usize, fitness_diff: f64) -> Self {
        assert!(n > 0, "breeding table needs at least one rank");
        let nf = n as f64;
        let probabilities: Vec<f64> = (0..n)
            .map(|i| 1.0 / nf + fitness_diff * (nf + 1.0 - 2.0 * (i as f64 + 1.0)) / (nf * (nf + 1.0)))
            .collect();
        let total = probabilities.iter().sum();
        Self {
            probabilities,
            total,
        }
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Draws one rank (roulette wheel).
    ///
    /// A uniform draw in `[0, total)` is compared against the cumulative
    /// sum; if rounding leaves no bucket reaching the draw, the last rank is
    /// returned.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let threshold = rng.random_range(0.0..self.total);
        let mut cumulative = 0.0;
        for (i, &p) in self.probabilities.iter().enumerate() {
            cumulative += p;
            if cumulative >= threshold {
                return i;
            }
        }
        self.probabilities.len() - 1 // floating-point fallback
    }
}
