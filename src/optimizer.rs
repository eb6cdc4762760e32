//! The optimizer seam between orchestration and search.
//!
//! [`fit`](crate::fit::fit) and the bootstrap estimator only need "find the
//! grid point with the lowest likelihood"; [`Optimizer`] lets the search
//! strategy be swapped without touching either.

use crate::error::FitResult;
use crate::ga::{GaConfig, GaRunner, GenerationStats, Termination};
use crate::grid::{ParameterSpace, ParameterVector};
use crate::likelihood::Likelihood;
use crate::obs::ObservedCluster;
use crate::random::FitRng;

/// What every optimizer reports back.
#[derive(Debug, Clone)]
pub struct OptimizerOutput {
    pub best: ParameterVector,
    pub likelihood: f64,
    /// Per-generation (or per-iteration) trace, initial state first.
    pub trace: Vec<GenerationStats>,
    pub termination: Termination,
}

/// Searches a parameter space for the point minimizing a likelihood.
///
/// Implementations must draw all randomness from `rng` so that a run is
/// reproducible from its seed.
pub trait Optimizer: Send + Sync {
    fn optimize(
        &self,
        space: &ParameterSpace,
        observed: &ObservedCluster,
        likelihood: &dyn Likelihood,
        rng: &mut FitRng,
    ) -> FitResult<OptimizerOutput>;
}

/// [`Optimizer`] backed by the binary-chromosome GA.
#[derive(Debug, Clone, Default)]
pub struct GeneticOptimizer {
    pub config: GaConfig,
}

impl GeneticOptimizer {
    pub fn new(config: GaConfig) -> Self {
        Self { config }
    }
}

impl Optimizer for GeneticOptimizer {
    fn optimize(
        &self,
        space: &ParameterSpace,
        observed: &ObservedCluster,
        likelihood: &dyn Likelihood,
        rng: &mut FitRng,
    ) -> FitResult<OptimizerOutput> {
        let result = GaRunner::run_with_rng(space, observed, likelihood, &self.config, rng)?;
        Ok(OptimizerOutput {
            best: result.best,
            likelihood: result.best_likelihood,
            trace: result.history,
            termination: result.termination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Axis, AxisKind, IsochroneGrid, ModelPoint};
    use crate::likelihood::LikelihoodMethod;
    use crate::obs::test_support::member;
    use crate::obs::{prepare, BinningRule};
    use crate::random::create_rng;

    fn space() -> ParameterSpace {
        let iso = IsochroneGrid::new(vec![0.01, 0.02], vec![8.0, 9.0]).unwrap();
        ParameterSpace::new(
            &iso,
            Axis::from_range(AxisKind::Extinction, 0.0, 0.5, 0.1).unwrap(),
            Axis::from_range(AxisKind::DistanceModulus, 10.0, 12.0, 0.5).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_genetic_optimizer_through_trait_object() {
        let space = space();
        let observed = prepare(
            &[member(0, 15.0, 0.5, 1.0)],
            LikelihoodMethod::Tolstoy,
            &BinningRule::Auto,
        )
        .unwrap();
        let distance = |p: &ModelPoint, _: &ObservedCluster| (p.distance_modulus - 11.5).abs();
        let optimizer: Box<dyn Optimizer> = Box::new(GeneticOptimizer::new(
            GaConfig::fast().with_parallel(false),
        ));

        let mut rng = create_rng(5);
        let out = optimizer
            .optimize(&space, &observed, &distance, &mut rng)
            .unwrap();

        assert_eq!(space.values(&out.best)[3], 11.5);
        assert_eq!(out.likelihood, 0.0);
        assert!(!out.trace.is_empty());
    }

    #[test]
    fn test_same_rng_state_same_output() {
        let space = space();
        let observed = prepare(
            &[member(0, 15.0, 0.5, 1.0)],
            LikelihoodMethod::Tolstoy,
            &BinningRule::Auto,
        )
        .unwrap();
        let f = |p: &ModelPoint, _: &ObservedCluster| p.age + p.extinction;
        let optimizer = GeneticOptimizer::new(GaConfig::fast());

        let a = optimizer
            .optimize(&space, &observed, &f, &mut create_rng(9))
            .unwrap();
        let b = optimizer
            .optimize(&space, &observed, &f, &mut create_rng(9))
            .unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.trace, b.trace);
    }
}
