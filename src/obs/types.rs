//! Observed members and the prepared observed-cluster representations.

use serde::{Deserialize, Serialize};

/// One accepted cluster member, as produced by the photometry pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub magnitudes: Vec<f64>,
    pub magnitude_errors: Vec<f64>,
    pub colors: Vec<f64>,
    pub color_errors: Vec<f64>,
    /// Membership probability in `[0, 1]`.
    pub membership: f64,
}

impl Member {
    /// Number of photometric dimensions (magnitudes followed by colors).
    pub fn dimensions(&self) -> usize {
        self.magnitudes.len() + self.colors.len()
    }

    /// Magnitudes followed by colors.
    pub fn photometry(&self) -> Vec<f64> {
        self.magnitudes.iter().chain(&self.colors).copied().collect()
    }

    /// Squared errors, in the same order as [`photometry`](Self::photometry).
    pub fn squared_errors(&self) -> Vec<f64> {
        self.magnitude_errors
            .iter()
            .chain(&self.color_errors)
            .map(|e| e * e)
            .collect()
    }
}

/// Floor for squared errors so a zero-error star cannot divide by zero.
pub const MIN_SQUARED_ERROR: f64 = 1e-12;

/// Per-star representation used by point-based likelihoods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointCluster {
    /// One photometric vector per star.
    pub photometry: Vec<Vec<f64>>,
    /// Squared errors floored at [`MIN_SQUARED_ERROR`], parallel to
    /// `photometry`.
    pub squared_errors: Vec<Vec<f64>>,
    /// Gaussian kernel normalisation `1 / sqrt(Π_k σ²_k)` per star.
    pub norms: Vec<f64>,
    /// Membership probabilities, parallel to `photometry`.
    pub membership: Vec<f64>,
}

impl PointCluster {
    /// Floors the squared errors and precomputes each star's kernel
    /// normalisation, so evaluations only touch the synthetic stars.
    pub fn new(
        photometry: Vec<Vec<f64>>,
        squared_errors: Vec<Vec<f64>>,
        membership: Vec<f64>,
    ) -> Self {
        let squared_errors: Vec<Vec<f64>> = squared_errors
            .into_iter()
            .map(|s2| s2.into_iter().map(|v| v.max(MIN_SQUARED_ERROR)).collect())
            .collect();
        let norms = squared_errors
            .iter()
            .map(|s2| s2.iter().product::<f64>().sqrt().recip())
            .collect();
        Self {
            photometry,
            squared_errors,
            norms,
            membership,
        }
    }
}

/// Histogram representation used by binned likelihoods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedCluster {
    /// Bin edges per photometric dimension.
    pub edges: Vec<Vec<f64>>,
    /// Full flattened histogram, zero bins included (Hess diagram).
    pub histogram: Vec<f64>,
    /// Flat indices of the non-empty bins.
    pub occupied: Vec<usize>,
    /// Counts of the non-empty bins, parallel to `occupied`.
    pub counts: Vec<f64>,
}

/// Observed cluster prepared once per optimizer run.
///
/// Immutable after construction; shared read-only by every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ObservedCluster {
    Points(PointCluster),
    Binned(BinnedCluster),
}

impl ObservedCluster {
    /// Number of photometric dimensions.
    pub fn dimensions(&self) -> usize {
        match self {
            ObservedCluster::Points(p) => p.photometry.first().map_or(0, Vec::len),
            ObservedCluster::Binned(b) => b.edges.len(),
        }
    }

    /// Number of observed stars represented.
    pub fn star_count(&self) -> usize {
        match self {
            ObservedCluster::Points(p) => p.photometry.len(),
            ObservedCluster::Binned(b) => b.counts.iter().sum::<f64>() as usize,
        }
    }
}
