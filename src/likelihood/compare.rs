//! Observed-versus-synthetic comparisons.

use super::SyntheticCluster;
use crate::obs::{histogram, BinnedCluster, PointCluster};

/// Expected count assigned to an occupied bin the model leaves empty.
///
/// Keeps `n ln(n / m)` finite while still costing the model heavily.
pub const EMPTY_BIN_EXPECTATION: f64 = 0.1;

/// Point-based (Tolstoy-Saha) negative log-likelihood.
///
/// For every observed star `i`, the probability of being drawn from the
/// synthetic population is the mean over synthetic stars `j` of a Gaussian
/// kernel with the star's own photometric errors:
///
/// ```text
/// L_i = (1/N_s) Σ_j exp(-½ Σ_k (x_ik - y_jk)² / σ²_ik) / sqrt(Π_k σ²_ik)
/// ```
///
/// The result is `-Σ_i p_i ln L_i`, with `p_i` the membership probability.
/// Constant normalisation factors are dropped, so values are only
/// comparable for the same observation.
pub fn tolstoy(observed: &PointCluster, synth: &SyntheticCluster) -> f64 {
    let n_synth = synth.len() as f64;
    let mut total = 0.0;

    for (((x, s2), &norm), &p) in observed
        .photometry
        .iter()
        .zip(&observed.squared_errors)
        .zip(&observed.norms)
        .zip(&observed.membership)
    {
        let mut sum = 0.0;
        for y in &synth.stars {
            let chi2: f64 = x
                .iter()
                .zip(y)
                .zip(s2)
                .map(|((a, b), e)| (a - b) * (a - b) / e)
                .sum();
            sum += (-0.5 * chi2).exp();
        }

        let l_i = (norm * sum / n_synth).max(f64::MIN_POSITIVE);
        total -= p * l_i.ln();
    }

    total
}

/// Binned Poisson likelihood ratio (Dolphin 2002).
///
/// The synthetic population is histogrammed on the observed bin edges
/// (`m_i`) and compared with the observed counts (`n_i`):
///
/// ```text
/// 2 Σ_i [ m_i - n_i + n_i ln(n_i / m_i) ]
/// ```
///
/// Bins with `n_i = 0` were pruned from the observation and contribute
/// `m_i` alone. Occupied bins the model leaves empty use
/// [`EMPTY_BIN_EXPECTATION`]. The statistic is non-negative and zero only
/// for identical histograms.
pub fn dolphin(observed: &BinnedCluster, synth: &SyntheticCluster) -> f64 {
    let model = histogram(synth.stars.iter().map(Vec::as_slice), &observed.edges);

    let model_total: f64 = model.iter().sum();
    let mut occupied_model = 0.0;
    let mut stat = 0.0;

    for (&bin, &n) in observed.occupied.iter().zip(&observed.counts) {
        occupied_model += model[bin];
        let m = if model[bin] > 0.0 {
            model[bin]
        } else {
            EMPTY_BIN_EXPECTATION
        };
        stat += m - n + n * (n / m).ln();
    }
    // Bins the observation left empty.
    stat += model_total - occupied_model;

    2.0 * stat
}
