//! Error taxonomy for the parameter-search engine.
//!
//! Configuration and grid problems are fatal and surface before any
//! generation runs. Evaluation degeneracy (an empty synthetic cluster, a
//! non-finite likelihood) is never an error: it is absorbed by
//! [`LIKELIHOOD_PENALTY`](crate::likelihood::LIKELIHOOD_PENALTY).

use crate::grid::AxisKind;
use thiserror::Error;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population_size must be at least 2, got {0}")]
    PopulationTooSmall(usize),

    #[error("max_generations must be at least 1")]
    NoGenerations,

    #[error("{name} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("stagnation_generations (n_ei) must be at least 1")]
    NoStagnationWindow,

    #[error("extinction_repeats (n_es) must be at least 1")]
    NoExtinctionRepeats,

    #[error("time_limit_ms must be positive or None")]
    ZeroTimeLimit,

    #[error("binning rule is invalid: {0}")]
    Binning(String),
}

/// Invalid parameter axis or an unresolvable grid lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("{0} axis has no values")]
    EmptyAxis(AxisKind),

    #[error("{0} axis contains a non-finite value")]
    NonFinite(AxisKind),

    #[error("{0} axis values must be strictly increasing")]
    Unsorted(AxisKind),

    #[error("{kind} range is invalid: min={min}, max={max}, step={step}")]
    InvalidRange {
        kind: AxisKind,
        min: f64,
        max: f64,
        step: f64,
    },

    #[error("expected a {expected} axis, got {found}")]
    WrongAxis { expected: AxisKind, found: AxisKind },

    #[error("{kind} value {value} is not a grid value")]
    NotOnGrid { kind: AxisKind, value: f64 },

    #[error("{kind} index {index} is outside the axis (len {len})")]
    IndexOutOfRange {
        kind: AxisKind,
        index: usize,
        len: usize,
    },

    #[error("parameter vector has {found} components, space has {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("grid resolution needs {0} bits per gene (max 32)")]
    ResolutionTooFine(u32),
}

/// Observed photometry that cannot be turned into an observed cluster.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("observed member list is empty")]
    NoMembers,

    #[error("member {id} has {found} photometric dimensions, expected {expected}")]
    Dimensions {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("member {id} has a non-finite {field}")]
    NonFinite { id: String, field: &'static str },

    #[error("membership probabilities sum to zero")]
    ZeroMembership,
}

/// Top-level error for fitting runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

pub type FitResult<T> = Result<T, FitError>;
