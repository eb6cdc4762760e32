//! Bootstrap configuration.

use serde::{Deserialize, Serialize};

/// How stars are drawn when resampling the member list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleWeighting {
    /// Every star equally likely.
    #[default]
    Uniform,
    /// Stars drawn proportionally to their membership probability.
    Membership,
}

/// Configuration for the bootstrap error estimator.
///
/// ```
/// use u_isofit::bootstrap::{BootstrapConfig, ResampleWeighting};
///
/// let config = BootstrapConfig::default()
///     .with_resamples(50)
///     .with_weighting(ResampleWeighting::Membership)
///     .with_seed(3);
/// assert!(config.is_enabled());
/// assert!(!BootstrapConfig::default().is_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of resample-and-refit runs (`N_b`). Below 2 the estimator is
    /// skipped and every uncertainty is reported as undefined.
    pub resamples: usize,

    pub weighting: ResampleWeighting,

    /// Whether to run resamples in parallel using rayon.
    pub parallel: bool,

    /// Base seed; each resample derives its own stream from it.
    ///
    /// `None` uses a random base seed.
    pub seed: Option<u64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: 0,
            weighting: ResampleWeighting::Uniform,
            parallel: true,
            seed: None,
        }
    }
}

impl BootstrapConfig {
    pub fn with_resamples(mut self, n: usize) -> Self {
        self.resamples = n;
        self
    }

    pub fn with_weighting(mut self, weighting: ResampleWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `true` when enough resamples are configured to estimate a spread.
    pub fn is_enabled(&self) -> bool {
        self.resamples >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_skip_bootstrap() {
        let c = BootstrapConfig::default();
        assert_eq!(c.resamples, 0);
        assert_eq!(c.weighting, ResampleWeighting::Uniform);
        assert!(!c.is_enabled());
        assert!(!c.clone().with_resamples(1).is_enabled());
        assert!(c.with_resamples(2).is_enabled());
    }

    #[test]
    fn test_deserialize_partial() {
        let c: BootstrapConfig =
            serde_json::from_str(r#"{"resamples": 25, "weighting": "membership"}"#).unwrap();
        assert_eq!(c.resamples, 25);
        assert_eq!(c.weighting, ResampleWeighting::Membership);
        assert!(c.parallel);
        assert_eq!(c.seed, None);
    }
}
