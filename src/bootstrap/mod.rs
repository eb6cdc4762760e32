//! Bootstrap error estimator.
//!
//! Re-fits the cluster on `N_b` member lists drawn with replacement from
//! the observation and reports the spread of the resampled best fits as
//! the per-parameter uncertainty.
//!
//! # Key Types
//!
//! - [`BootstrapConfig`]: resample count, weighting policy, seed
//! - [`BootstrapEstimator`]: runs the resample → preprocess → optimize loop
//! - [`Uncertainty`]: per-parameter spread, or [`Uncertainty::Undefined`]
//!
//! # References
//!
//! - Efron & Tibshirani (1993), *An Introduction to the Bootstrap*

mod config;
mod runner;

pub use config::{BootstrapConfig, ResampleWeighting};
pub use runner::{resample, BootstrapEstimator, BootstrapResult, ParameterSpread, Uncertainty};
