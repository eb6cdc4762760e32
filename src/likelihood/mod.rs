//! Likelihood contract and reference comparisons.
//!
//! The optimizer minimizes a [`Likelihood`]: any `Send + Sync` object (or
//! closure) mapping a resolved [`ModelPoint`] and the prepared
//! [`ObservedCluster`] to a scalar where smaller means a better fit.
//!
//! [`SyntheticLikelihood`] is the standard composition: an external
//! [`SyntheticClusterGenerator`] realizes a synthetic population at the
//! model point, and the population is compared with the observation by
//! [`tolstoy`] (point-based) or [`dolphin`] (binned), depending on how the
//! observation was prepared.
//!
//! # Degeneracy
//!
//! An empty synthetic cluster, or a comparison that is not finite, yields
//! [`LIKELIHOOD_PENALTY`] instead of an error: the candidate simply loses
//! selection pressure.
//!
//! # References
//!
//! - Tolstoy & Saha (1996), "The Interpretation of Color-Magnitude Diagrams
//!   through Numerical Simulation and Bayesian Inference"
//! - Dolphin (2002), "Numerical methods of star formation history
//!   measurement and applications to seven dwarf spheroidals"

mod compare;

pub use compare::{dolphin, tolstoy, EMPTY_BIN_EXPECTATION};

use crate::grid::ModelPoint;
use crate::obs::ObservedCluster;
use serde::{Deserialize, Serialize};

/// Value substituted for degenerate or non-finite evaluations.
pub const LIKELIHOOD_PENALTY: f64 = 1.0e9;

/// How the observed cluster is represented and compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikelihoodMethod {
    /// Point-based: every observed star weighted individually.
    Tolstoy,
    /// Binned: Poisson likelihood ratio over a Hess diagram.
    #[default]
    Dolphin,
}

/// Goodness of fit between a model point and the observation.
///
/// Lower is better. Implementations should return [`LIKELIHOOD_PENALTY`]
/// rather than panic on pathological inputs; the optimizer also maps any
/// non-finite return value to the penalty.
///
/// Evaluations of different candidates may run concurrently.
pub trait Likelihood: Send + Sync {
    fn evaluate(&self, point: &ModelPoint, observed: &ObservedCluster) -> f64;
}

impl<F> Likelihood for F
where
    F: Fn(&ModelPoint, &ObservedCluster) -> f64 + Send + Sync,
{
    fn evaluate(&self, point: &ModelPoint, observed: &ObservedCluster) -> f64 {
        self(point, observed)
    }
}

/// Replaces a non-finite likelihood with [`LIKELIHOOD_PENALTY`].
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        LIKELIHOOD_PENALTY
    }
}

/// Synthetic stellar population realized at one model point.
///
/// Each star is a photometric vector laid out like the observed members
/// (magnitudes followed by colors), with photometric errors already
/// injected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntheticCluster {
    pub stars: Vec<Vec<f64>>,
}

impl SyntheticCluster {
    pub fn new(stars: Vec<Vec<f64>>) -> Self {
        Self { stars }
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

/// External generator of synthetic clusters.
///
/// Must behave as a pure function of the model point: the isochrone
/// store, mass function, completeness and error model are owned by the
/// implementation and never mutated during a search.
pub trait SyntheticClusterGenerator: Send + Sync {
    fn generate(&self, point: &ModelPoint) -> SyntheticCluster;
}

/// Likelihood built from a synthetic-cluster generator.
#[derive(Debug, Clone)]
pub struct SyntheticLikelihood<G> {
    generator: G,
}

impl<G: SyntheticClusterGenerator> SyntheticLikelihood<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Realizes the synthetic cluster at `point`, e.g. for the best fit.
    pub fn realize(&self, point: &ModelPoint) -> SyntheticCluster {
        self.generator.generate(point)
    }
}

impl<G: SyntheticClusterGenerator> Likelihood for SyntheticLikelihood<G> {
    fn evaluate(&self, point: &ModelPoint, observed: &ObservedCluster) -> f64 {
        let synth = self.generator.generate(point);
        if synth.is_empty() {
            return LIKELIHOOD_PENALTY;
        }
        let value = match observed {
            ObservedCluster::Points(p) => tolstoy(p, &synth),
            ObservedCluster::Binned(b) => dolphin(b, &synth),
        };
        sanitize(value)
    }
}
