//! Binary-chromosome Genetic Algorithm over a discrete parameter grid.
//!
//! Candidates are [`ParameterVector`](crate::grid::ParameterVector)s; the
//! genetic operators act on their binary encoding produced by
//! [`ChromosomeCodec`](crate::codec::ChromosomeCodec), and every decoded
//! offspring is snapped back onto the grid.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population, rates, restarts, presets)
//! - [`BreedingTable`]: Rank-based breeding probabilities
//! - [`Generation`]: Evaluated candidates sorted best-first
//! - [`GaRunner`]: Executes the evolutionary loop
//! - [`GaResult`]: Best solution, trace, and termination reason
//!
//! # Restarts
//!
//! When the best solution survives `stagnation_generations` generations
//! unchanged, the population goes extinct: the best solution is kept and
//! every other slot is refilled with random immigrants. The run stops once
//! `extinction_repeats` consecutive restarts end on the same solution.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Yao & Sethares (1994), *Nonlinear parameter estimation via the genetic algorithm*

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{GaResult, GaRunner, GenerationStats, Termination};
pub use selection::BreedingTable;
pub use types::{Candidate, Generation};
