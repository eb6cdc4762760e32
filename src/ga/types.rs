//! Evaluated candidates and generations.

use crate::grid::ParameterVector;
use serde::Serialize;

/// A parameter vector with its (sanitized) likelihood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub vector: ParameterVector,
    pub likelihood: f64,
}

/// Candidates ordered by likelihood, best (smallest) first.
///
/// The ordering is stable: candidates with equal likelihood keep the
/// order in which they were evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    members: Vec<Candidate>,
}

impl Generation {
    /// Sorts evaluated candidates into a generation.
    pub fn from_evaluated(mut candidates: Vec<Candidate>) -> Self {
        candidates.sort_by(|a, b| a.likelihood.total_cmp(&b.likelihood));
        Self {
            members: candidates,
        }
    }

    /// Extinction/Immigration: the survivor first, then the sorted immigrants.
    ///
    /// The survivor keeps rank 0 even if an immigrant scores better.
    pub fn with_survivor(survivor: Candidate, immigrants: Vec<Candidate>) -> Self {
        let immigrants = Self::from_evaluated(immigrants);
        let mut members = Vec::with_capacity(immigrants.len() + 1);
        members.push(survivor);
        members.extend(immigrants.members);
        Self { members }
    }

    /// Rank-0 candidate.
    ///
    /// # Panics
    /// Panics if the generation is empty.
    pub fn best(&self) -> &Candidate {
        &self.members[0]
    }

    pub fn members(&self) -> &[Candidate] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Mean likelihood over the generation.
    pub fn mean_likelihood(&self) -> f64 {
        self.members.iter().map(|c| c.likelihood).sum::<f64>() / self.members.len() as f64
    }
}

impl std::ops::Index<usize> for Generation {
    type Output = Candidate;

    fn index(&self, rank: usize) -> &Candidate {
        &self.members[rank]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(i: usize, l: f64) -> Candidate {
        Candidate {
            vector: ParameterVector::from_indices(vec![i]),
            likelihood: l,
        }
    }

    #[test]
    fn test_sorted_and_stable() {
        let g = Generation::from_evaluated(vec![cand(0, 3.0), cand(1, 1.0), cand(2, 3.0), cand(3, 1.0)]);
        let order: Vec<usize> = g.members().iter().map(|c| c.vector.index(0)).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert_eq!(g.best().likelihood, 1.0);
        assert!((g.mean_likelihood() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_survivor_keeps_rank_zero() {
        let g = Generation::with_survivor(cand(9, 5.0), vec![cand(1, 7.0), cand(2, 0.5)]);
        assert_eq!(g.len(), 3);
        assert_eq!(g[0].vector.index(0), 9);
        assert_eq!(g[1].vector.index(0), 2);
        assert_eq!(g[2].vector.index(0), 1);
    }
}
