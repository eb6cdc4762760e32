//! Resampling and the bootstrap estimation loop.

use super::config::{BootstrapConfig, ResampleWeighting};
use crate::error::{DataError, FitResult};
use crate::grid::ParameterSpace;
use crate::likelihood::{Likelihood, LikelihoodMethod};
use crate::obs::{prepare, BinningRule, Member};
use crate::optimizer::Optimizer;
use crate::random::{create_rng, derive_seed};
use crate::stats::{percentile, std_dev};
use log::{debug, info};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

/// Spread of one parameter across the resampled best fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpread {
    pub std_dev: f64,
    /// 16th percentile (lower 1σ bound for a normal spread).
    pub p16: f64,
    /// 84th percentile.
    pub p84: f64,
}

/// Uncertainty of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Uncertainty {
    /// Not estimated: bootstrap skipped, or the axis is constant.
    Undefined,
    Estimated(ParameterSpread),
}

impl Uncertainty {
    /// The standard deviation, if estimated.
    pub fn std_dev(&self) -> Option<f64> {
        match self {
            Uncertainty::Undefined => None,
            Uncertainty::Estimated(s) => Some(s.std_dev),
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Uncertainty::Estimated(_))
    }
}

/// Output of a bootstrap run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapResult {
    /// One entry per parameter dimension.
    pub uncertainties: Vec<Uncertainty>,
    /// Best-fit parameter values of each resample, in resample order.
    pub samples: Vec<Vec<f64>>,
}

impl BootstrapResult {
    fn undefined(dimensions: usize) -> Self {
        Self {
            uncertainties: vec![Uncertainty::Undefined; dimensions],
            samples: Vec::new(),
        }
    }
}

/// Draws `members.len()` stars with replacement.
///
/// With [`ResampleWeighting::Membership`] each draw picks a star with
/// probability proportional to its membership; negative memberships count
/// as zero. A list with no positive membership cannot be resampled this way
/// and yields [`DataError::ZeroMembership`].
pub fn resample<R: Rng + ?Sized>(
    members: &[Member],
    weighting: ResampleWeighting,
    rng: &mut R,
) -> Result<Vec<Member>, DataError> {
    if members.is_empty() {
        return Err(DataError::NoMembers);
    }
    let n = members.len();
    match weighting {
        ResampleWeighting::Uniform => Ok((0..n)
            .map(|_| members[rng.random_range(0..n)].clone())
            .collect()),
        ResampleWeighting::Membership => {
            let dist = WeightedIndex::new(members.iter().map(|m| m.membership.max(0.0)))
                .map_err(|_| DataError::ZeroMembership)?;
            Ok((0..n).map(|_| members[dist.sample(rng)].clone()).collect())
        }
    }
}

/// Runs the resample → preprocess → optimize loop.
pub struct BootstrapEstimator;

impl BootstrapEstimator {
    /// Estimates per-parameter uncertainties.
    ///
    /// With fewer than two resamples nothing is run and every uncertainty
    /// is [`Uncertainty::Undefined`]. Resample `i` draws all its randomness
    /// from a stream derived from the base seed and `i`, so a seeded
    /// estimate is identical whether run sequentially or in parallel.
    pub fn estimate<O: Optimizer + ?Sized>(
        config: &BootstrapConfig,
        space: &ParameterSpace,
        members: &[Member],
        method: LikelihoodMethod,
        binning: &BinningRule,
        likelihood: &dyn Likelihood,
        optimizer: &O,
    ) -> FitResult<BootstrapResult> {
        let dims = space.dimensions();
        if !config.is_enabled() {
            info!(
                "bootstrap skipped ({} resamples); uncertainties undefined",
                config.resamples
            );
            return Ok(BootstrapResult::undefined(dims));
        }

        let base = config.seed.unwrap_or_else(rand::random);
        let run_one = |i: usize| -> FitResult<Vec<f64>> {
            let mut rng = create_rng(derive_seed(base, i as u64));
            let drawn = resample(members, config.weighting, &mut rng)?;
            let observed = prepare(&drawn, method, binning)?;
            let out = optimizer.optimize(space, &observed, likelihood, &mut rng)?;
            debug!(
                "bootstrap resample {}/{}: likelihood {:.6}",
                i + 1,
                config.resamples,
                out.likelihood
            );
            Ok(space.values(&out.best))
        };

        let samples: Vec<Vec<f64>> = if config.parallel {
            (0..config.resamples)
                .into_par_iter()
                .map(run_one)
                .collect::<FitResult<_>>()?
        } else {
            (0..config.resamples)
                .map(run_one)
                .collect::<FitResult<_>>()?
        };

        let uncertainties = (0..dims)
            .map(|d| {
                if space.axis(d).is_constant() {
                    return Uncertainty::Undefined;
                }
                let column: Vec<f64> = samples.iter().map(|s| s[d]).collect();
                Uncertainty::Estimated(ParameterSpread {
                    std_dev: std_dev(&column),
                    p16: percentile(&column, 16.0),
                    p84: percentile(&column, 84.0),
                })
            })
            .collect();

        info!("bootstrap finished: {} resamples", samples.len());
        Ok(BootstrapResult {
            uncertainties,
            samples,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitError;
    use crate::ga::GaConfig;
    use crate::grid::{Axis, AxisKind, IsochroneGrid, ModelPoint};
    use crate::obs::test_support::member;
    use crate::obs::ObservedCluster;
    use crate::optimizer::GeneticOptimizer;

    fn space() -> ParameterSpace {
        let iso = IsochroneGrid::new(vec![0.01, 0.02], vec![8.0, 9.0]).unwrap();
        ParameterSpace::new(
            &iso,
            Axis::from_range(AxisKind::Extinction, 0.0, 0.5, 0.1).unwrap(),
            Axis::from_range(AxisKind::DistanceModulus, 10.0, 12.0, 0.5).unwrap(),
        )
        .unwrap()
    }

    fn cluster(n: usize) -> Vec<Member> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                member(i, 14.0 + 4.0 * t, 0.3 + 0.8 * t, 0.5 + 0.5 * t)
            })
            .collect()
    }

    /// Minimum at (0.02, 9.0, 0.2, 11.0), insensitive to the observation
    /// apart from a negligible mean-magnitude term.
    fn quiet(p: &ModelPoint, o: &ObservedCluster) -> f64 {
        let noise = match o {
            ObservedCluster::Points(c) => {
                c.photometry.iter().map(|s| s[0]).sum::<f64>() / c.photometry.len() as f64
            }
            ObservedCluster::Binned(_) => 0.0,
        };
        ((p.metallicity - 0.02) / 0.01).powi(2)
            + (p.age - 9.0).powi(2)
            + ((p.extinction - 0.2) / 0.1).powi(2)
            + ((p.distance_modulus - 11.0) / 0.5).powi(2)
            + 1e-9 * noise
    }

    fn optimizer() -> GeneticOptimizer {
        GeneticOptimizer::new(
            GaConfig::default()
                .with_population_size(20)
                .with_max_generations(60)
                .with_stagnation_generations(10)
                .with_parallel(false),
        )
    }

    // ---- resample ----

    #[test]
    fn test_uniform_resample_keeps_size() {
        let members = cluster(30);
        let mut rng = create_rng(1);
        let drawn = resample(&members, ResampleWeighting::Uniform, &mut rng).unwrap();
        assert_eq!(drawn.len(), 30);
        assert!(drawn.iter().all(|d| members.iter().any(|m| m.id == d.id)));
    }

    #[test]
    fn test_membership_resample_skips_zero_weight() {
        let mut members = cluster(10);
        for m in members.iter_mut().skip(1) {
            m.membership = 0.0;
        }
        let mut rng = create_rng(2);
        let drawn = resample(&members, ResampleWeighting::Membership, &mut rng).unwrap();
        assert_eq!(drawn.len(), 10);
        assert!(drawn.iter().all(|d| d.id == members[0].id));
    }

    #[test]
    fn test_membership_resample_is_proportional() {
        let mut members = cluster(2);
        members[0].membership = 0.9;
        members[1].membership = 0.3;
        let mut rng = create_rng(12);
        let mut first = 0usize;
        let rounds = 2_000;
        for _ in 0..rounds {
            let drawn = resample(&members, ResampleWeighting::Membership, &mut rng).unwrap();
            first += drawn.iter().filter(|d| d.id == members[0].id).count();
        }
        // Expected share 0.9 / 1.2 = 0.75 of 4000 draws.
        let share = first as f64 / (2 * rounds) as f64;
        assert!((share - 0.75).abs() < 0.03, "share {share}");
    }

    #[test]
    fn test_membership_resample_negative_counts_as_zero() {
        let mut members = cluster(3);
        members[1].membership = -0.5;
        members[2].membership = f64::NAN;
        let mut rng = create_rng(6);
        let drawn = resample(&members, ResampleWeighting::Membership, &mut rng).unwrap();
        assert!(drawn.iter().all(|d| d.id == members[0].id));
    }

    #[test]
    fn test_membership_resample_zero_total() {
        let mut members = cluster(4);
        for m in &mut members {
            m.membership = 0.0;
        }
        let mut rng = create_rng(3);
        assert_eq!(
            resample(&members, ResampleWeighting::Membership, &mut rng),
            Err(DataError::ZeroMembership)
        );
    }

    #[test]
    fn test_resample_empty() {
        let mut rng = create_rng(4);
        assert_eq!(
            resample(&[], ResampleWeighting::Uniform, &mut rng),
            Err(DataError::NoMembers)
        );
    }

    // ---- estimator ----

    fn estimate(config: &BootstrapConfig, members: &[Member]) -> FitResult<BootstrapResult> {
        BootstrapEstimator::estimate(
            config,
            &space(),
            members,
            LikelihoodMethod::Tolstoy,
            &BinningRule::Auto,
            &quiet,
            &optimizer(),
        )
    }

    #[test]
    fn test_fewer_than_two_resamples_is_undefined() {
        let members = cluster(20);
        for n in [0, 1] {
            let config = BootstrapConfig::default().with_resamples(n).with_seed(1);
            let result = estimate(&config, &members).unwrap();
            assert_eq!(result.uncertainties, vec![Uncertainty::Undefined; 4]);
            assert!(result.samples.is_empty());
        }
    }

    #[test]
    fn test_noise_free_spread_is_below_grid_step() {
        let members = cluster(100);
        let config = BootstrapConfig::default().with_resamples(50).with_seed(11);
        let result = estimate(&config, &members).unwrap();

        assert_eq!(result.samples.len(), 50);
        let steps = [0.01, 1.0, 0.1, 0.5];
        for (u, step) in result.uncertainties.iter().zip(steps) {
            let sd = u.std_dev().expect("every axis varies");
            assert!(sd < step, "spread {sd} not below grid step {step}");
        }
    }

    #[test]
    fn test_seeded_estimate_is_order_independent() {
        let members = cluster(25);
        let config = BootstrapConfig::default().with_resamples(4).with_seed(8);
        let par = estimate(&config, &members).unwrap();
        let seq = estimate(&config.clone().with_parallel(false), &members).unwrap();
        assert_eq!(par, seq);
    }

    #[test]
    fn test_constant_axis_is_undefined() {
        let iso = IsochroneGrid::new(vec![0.019], vec![8.0, 9.0]).unwrap();
        let space = ParameterSpace::new(
            &iso,
            Axis::constant(AxisKind::Extinction, 0.1),
            Axis::from_range(AxisKind::DistanceModulus, 10.0, 12.0, 0.5).unwrap(),
        )
        .unwrap();
        let config = BootstrapConfig::default().with_resamples(3).with_seed(2);
        let result = BootstrapEstimator::estimate(
            &config,
            &space,
            &cluster(10),
            LikelihoodMethod::Dolphin,
            &BinningRule::Sqrt,
            &quiet,
            &optimizer(),
        )
        .unwrap();

        assert!(!result.uncertainties[0].is_defined());
        assert!(result.uncertainties[1].is_defined());
        assert!(!result.uncertainties[2].is_defined());
        assert!(result.uncertainties[3].is_defined());
    }

    #[test]
    fn test_resample_errors_propagate() {
        let mut members = cluster(5);
        for m in &mut members {
            m.membership = 0.0;
        }
        let config = BootstrapConfig::default()
            .with_resamples(2)
            .with_weighting(ResampleWeighting::Membership)
            .with_seed(1);
        assert_eq!(
            estimate(&config, &members).unwrap_err(),
            FitError::Data(DataError::ZeroMembership)
        );
    }
}
