//! Fit orchestration.
//!
//! [`fit`] runs the optimizer on the prepared observation, estimates
//! uncertainties with the bootstrap, and rounds every reported parameter to
//! the precision its uncertainty supports.
//!
//! ```ignore
//! let config = FitConfig::default()
//!     .with_ga(GaConfig::fast().with_seed(1))
//!     .with_bootstrap(BootstrapConfig::default().with_resamples(20).with_seed(2));
//! let outcome = fit(&config, &space, &members, &likelihood)?;
//! for p in &outcome.reported {
//!     println!("{}: {} ± {:?}", p.kind, p.value, p.error);
//! }
//! ```

use crate::bootstrap::{BootstrapConfig, BootstrapEstimator, Uncertainty};
use crate::error::{ConfigError, FitResult};
use crate::ga::{GaConfig, GenerationStats, Termination};
use crate::grid::{AxisKind, ModelPoint, ParameterSpace, ParameterVector};
use crate::likelihood::{Likelihood, LikelihoodMethod};
use crate::obs::{prepare, BinningRule, Member};
use crate::optimizer::{GeneticOptimizer, Optimizer};
use crate::random::rng_from_option;
use log::info;
use serde::{Deserialize, Serialize};

/// Everything a fit needs besides the data and the likelihood.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    pub ga: GaConfig,
    pub bootstrap: BootstrapConfig,
    pub likelihood_method: LikelihoodMethod,
    pub binning: BinningRule,
}

impl FitConfig {
    pub fn with_ga(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: BootstrapConfig) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_likelihood_method(mut self, method: LikelihoodMethod) -> Self {
        self.likelihood_method = method;
        self
    }

    pub fn with_binning(mut self, binning: BinningRule) -> Self {
        self.binning = binning;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ga.validate()?;
        self.binning.validate()
    }
}

/// One parameter as it should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportedParameter {
    pub kind: AxisKind,
    /// Rounded to the decimal of the error's significant figure when the
    /// error is defined; the raw grid value otherwise.
    pub value: f64,
    /// Standard deviation rounded to one significant figure.
    pub error: Option<f64>,
}

/// Result of a full fit.
#[derive(Debug, Clone, Serialize)]
pub struct FitOutcome {
    pub best: ParameterVector,
    pub likelihood: f64,
    /// Best fit in physical coordinates, for plotting collaborators.
    pub point: ModelPoint,
    /// Unrounded best-fit value per dimension.
    pub values: Vec<f64>,
    pub uncertainties: Vec<Uncertainty>,
    pub reported: Vec<ReportedParameter>,
    pub trace: Vec<GenerationStats>,
    pub termination: Termination,
}

/// Fits with the GA configured in `config.ga`.
pub fn fit(
    config: &FitConfig,
    space: &ParameterSpace,
    members: &[Member],
    likelihood: &dyn Likelihood,
) -> FitResult<FitOutcome> {
    let optimizer = GeneticOptimizer::new(config.ga.clone());
    fit_with(config, space, members, likelihood, &optimizer)
}

/// Fits with an arbitrary optimizer; `config.ga.seed` still seeds the
/// main run.
pub fn fit_with<O: Optimizer + ?Sized>(
    config: &FitConfig,
    space: &ParameterSpace,
    members: &[Member],
    likelihood: &dyn Likelihood,
    optimizer: &O,
) -> FitResult<FitOutcome> {
    config.validate()?;
    let observed = prepare(members, config.likelihood_method, &config.binning)?;
    info!(
        "fitting {} members over {} grid points ({:?} likelihood)",
        observed.star_count(),
        space.cardinality(),
        config.likelihood_method
    );

    let mut rng = rng_from_option(config.ga.seed);
    let out = optimizer.optimize(space, &observed, likelihood, &mut rng)?;
    let values = space.values(&out.best);
    info!("best fit {:?} (likelihood {:.6})", values, out.likelihood);

    let bootstrap = BootstrapEstimator::estimate(
        &config.bootstrap,
        space,
        members,
        config.likelihood_method,
        &config.binning,
        likelihood,
        optimizer,
    )?;

    let reported = space
        .axes()
        .iter()
        .zip(&values)
        .zip(&bootstrap.uncertainties)
        .map(|((axis, &value), u)| match u.std_dev() {
            Some(sd) => {
                let (value, error) = round_sig_fig(value, sd);
                ReportedParameter {
                    kind: axis.kind(),
                    value,
                    error: Some(error),
                }
            }
            None => ReportedParameter {
                kind: axis.kind(),
                value,
                error: None,
            },
        })
        .collect();

    Ok(FitOutcome {
        point: space.model_point(&out.best),
        best: out.best,
        likelihood: out.likelihood,
        values,
        uncertainties: bootstrap.uncertainties,
        reported,
        trace: out.trace,
        termination: out.termination,
    })
}

/// Rounds `error` to one significant figure and `value` to the same
/// decimal position.
///
/// A zero or non-finite error leaves both untouched.
///
/// ```
/// use u_isofit::fit::round_sig_fig;
///
/// assert_eq!(round_sig_fig(11.04, 0.23), (11.0, 0.2));
/// assert_eq!(round_sig_fig(8.96, 0.96), (9.0, 1.0));
/// ```
pub fn round_sig_fig(value: f64, error: f64) -> (f64, f64) {
    if !(error.is_finite() && error > 0.0) {
        return (value, error);
    }
    let mut exp = error.log10().floor() as i32;
    let mut rounded = round_at(error, exp);
    // 0.096 rounds up to 0.1: the significant figure moved one place left.
    if rounded >= 10f64.powi(exp + 1) {
        exp += 1;
        rounded = round_at(error, exp);
    }
    (round_at(value, exp), rounded)
}

/// Rounds `x` to a multiple of `10^exp`.
fn round_at(x: f64, exp: i32) -> f64 {
    if exp < 0 {
        let f = 10f64.powi(-exp);
        (x * f).round() / f
    } else {
        let f = 10f64.powi(exp);
        (x / f).round() * f
    }
}
