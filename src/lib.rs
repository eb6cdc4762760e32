//! Star-cluster parameter search over discrete isochrone grids.
//!
//! Finds the metallicity, age, extinction and distance modulus (and,
//! optionally, total mass and binary fraction) whose synthetic cluster best
//! matches an observed member list, then estimates per-parameter
//! uncertainties by bootstrap resampling.
//!
//! - **Grid** ([`grid`]): discrete parameter axes and the isochrone grid;
//!   candidates are index vectors, so every candidate lies on the grid.
//! - **Codec** ([`codec`]): fixed-width binary chromosomes with one gene
//!   per non-constant axis.
//! - **Genetic Algorithm** ([`ga`]): rank-based breeding, single-point
//!   crossover, per-bit mutation, elitism, and extinction/immigration
//!   restarts.
//! - **Observation** ([`obs`]): point-based or binned preprocessing of the
//!   member list, done once per run.
//! - **Likelihood** ([`likelihood`]): the evaluation contract plus the
//!   Tolstoy point likelihood and the Dolphin binned Poisson likelihood.
//! - **Bootstrap** ([`bootstrap`]): resample → preprocess → refit loop.
//! - **Fit** ([`fit`]): orchestration and significant-figure rounding.
//!
//! # Architecture
//!
//! Search strategies sit behind the [`optimizer::Optimizer`] trait, so the
//! bootstrap and the orchestration never name the GA directly. All
//! randomness flows from explicitly seeded generators ([`random`]).
//! The crate logs through the `log` facade and never installs a logger.

pub mod bootstrap;
pub mod codec;
pub mod error;
pub mod fit;
pub mod ga;
pub mod grid;
pub mod likelihood;
pub mod obs;
pub mod optimizer;
pub mod random;
pub mod stats;

pub use error::{FitError, FitResult};
