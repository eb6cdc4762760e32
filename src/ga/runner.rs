//! GA evolutionary loop execution.
//!
//! [`GaRunner`] drives the search as a state machine:
//! initialization → evolving → (extinction/immigration)* → terminated.
//!
//! Each generation: rank-based selection → encoding → shuffled
//! single-point crossover → per-bit mutation → elitism → decoding →
//! evaluation → best-solution update → restart check.

use super::config::GaConfig;
use super::operators::{crossover, mutate};
use super::selection::BreedingTable;
use super::types::{Candidate, Generation};
use crate::codec::{Chromosome, ChromosomeCodec};
use crate::error::FitResult;
use crate::grid::{ModelPoint, ParameterSpace, ParameterVector};
use crate::likelihood::{sanitize, Likelihood};
use crate::obs::ObservedCluster;
use crate::random::rng_from_option;
use log::{debug, info, warn};
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Why a GA run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// `max_generations` generations were processed.
    GenerationLimit,
    /// `extinction_repeats` consecutive restarts returned the same best
    /// solution.
    ExtinctionExhausted,
    /// The cancellation flag was raised.
    Cancelled,
    /// The optional wall-clock ceiling was reached.
    TimeLimit,
}

/// Snapshot of one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStats {
    /// `0` for the initial random population.
    pub generation: usize,
    pub best_likelihood: f64,
    pub mean_likelihood: f64,
    pub population: usize,
    /// Stagnation counter after this generation.
    pub stagnation: usize,
    /// Whether the population was rebuilt by extinction/immigration.
    pub extinction: bool,
}

impl GenerationStats {
    fn of(generation: usize, g: &Generation, stagnation: usize, extinction: bool) -> Self {
        Self {
            generation,
            best_likelihood: g.best().likelihood,
            mean_likelihood: g.mean_likelihood(),
            population: g.len(),
            stagnation,
            extinction,
        }
    }
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Rank-0 solution of the final generation.
    pub best: ParameterVector,

    /// Likelihood of `best`.
    pub best_likelihood: f64,

    /// `best` resolved to physical coordinates.
    pub point: ModelPoint,

    /// Number of generations processed.
    pub generations: usize,

    /// Number of extinction/immigration events.
    pub extinctions: usize,

    pub termination: Termination,

    /// Initial population followed by one entry per generation.
    pub history: Vec<GenerationStats>,

    pub final_generation: Generation,
}

impl GaResult {
    /// Best likelihood after each generation (initial population first).
    pub fn likelihood_history(&self) -> Vec<f64> {
        self.history.iter().map(|s| s.best_likelihood).collect()
    }
}

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```ignore
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&space, &observed, &likelihood, &config)?;
/// println!("best: {:?} ({})", result.point, result.best_likelihood);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA with a generator seeded from `config.seed`.
    pub fn run<L: Likelihood + ?Sized>(
        space: &ParameterSpace,
        observed: &ObservedCluster,
        likelihood: &L,
        config: &GaConfig,
    ) -> FitResult<GaResult> {
        let mut rng = rng_from_option(config.seed);
        Self::run_with_rng(space, observed, likelihood, config, &mut rng)
    }

    /// Runs the GA drawing every random decision from `rng`.
    ///
    /// `config.seed` is ignored.
    pub fn run_with_rng<L: Likelihood + ?Sized, R: Rng + ?Sized>(
        space: &ParameterSpace,
        observed: &ObservedCluster,
        likelihood: &L,
        config: &GaConfig,
        rng: &mut R,
    ) -> FitResult<GaResult> {
        Self::run_with_cancel(space, observed, likelihood, config, rng, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before the next generation and returns the best solution so far.
    pub fn run_with_cancel<L: Likelihood + ?Sized, R: Rng + ?Sized>(
        space: &ParameterSpace,
        observed: &ObservedCluster,
        likelihood: &L,
        config: &GaConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> FitResult<GaResult> {
        config.validate()?;
        let codec = ChromosomeCodec::new(space)?;
        let breeding = BreedingTable::new(config.population_size, config.fitness_diff);
        let evaluator = Evaluator {
            space,
            observed,
            likelihood,
            parallel: config.parallel,
        };
        let n_pop = config.population_size;
        let started = Instant::now();

        info!(
            "GA start: {} solutions, up to {} generations, {} bits/gene ({} bits/chromosome)",
            n_pop,
            config.max_generations,
            codec.bits_per_gene(),
            codec.chromosome_len()
        );

        // 1. Initial random population
        let mut generation =
            Generation::from_evaluated(evaluator.evaluate(random_vectors(space, n_pop, rng)));
        let mut best = generation.best().clone();
        let mut history = Vec::with_capacity(config.max_generations + 1);
        history.push(GenerationStats::of(0, &generation, 0, false));

        let mut stagnation = 0usize;
        let mut checkpoint: Option<ParameterVector> = None;
        let mut repeats = 0usize;
        let mut extinctions = 0usize;
        let mut generations = 0usize;
        let mut termination = Termination::GenerationLimit;
        let report_every = (config.max_generations / 10).max(1);

        // 2. Evolutionary loop
        for step in 1..=config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    termination = Termination::Cancelled;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if started.elapsed().as_millis() >= u128::from(limit) {
                    termination = Termination::TimeLimit;
                    break;
                }
            }

            // Selection and encoding
            let mut pool: Vec<Chromosome> = (0..n_pop)
                .map(|_| codec.encode(&generation[breeding.select(rng)].vector))
                .collect();

            // Breeding
            crossover(&mut pool, config.crossover_rate, rng);
            mutate(&mut pool, config.mutation_rate, rng);

            // Elitism: the best solution re-enters unchanged.
            pool[0] = codec.encode(&best.vector);

            // Decode and evaluate
            let vectors = pool.iter().map(|c| codec.decode(c)).collect();
            generation = Generation::from_evaluated(evaluator.evaluate(vectors));
            generations = step;

            if generation.best().vector == best.vector {
                stagnation += 1;
            } else {
                best = generation.best().clone();
                stagnation = 0;
            }

            // Extinction/Immigration
            let mut extinction = false;
            if stagnation >= config.stagnation_generations {
                if checkpoint.as_ref() == Some(&best.vector) {
                    repeats += 1;
                    if repeats >= config.extinction_repeats {
                        history.push(GenerationStats::of(step, &generation, stagnation, false));
                        termination = Termination::ExtinctionExhausted;
                        break;
                    }
                } else {
                    checkpoint = Some(best.vector.clone());
                    repeats = 0;
                }

                let immigrants = evaluator.evaluate(random_vectors(space, n_pop - 1, rng));
                generation = Generation::with_survivor(best.clone(), immigrants);
                stagnation = 0;
                extinctions += 1;
                extinction = true;
                debug!(
                    "generation {step}: extinction/immigration #{extinctions} (repeat {repeats}), best {:.6}",
                    best.likelihood
                );
            }

            history.push(GenerationStats::of(step, &generation, stagnation, extinction));
            debug!(
                "generation {step}: best {:.6}, stagnation {stagnation}",
                best.likelihood
            );
            if step % report_every == 0 {
                info!(
                    "generation {step}/{} ({}%): best likelihood {:.6}",
                    config.max_generations,
                    step * 100 / config.max_generations,
                    best.likelihood
                );
            }
        }

        let winner = generation.best().clone();
        info!(
            "GA finished: {:?} after {} generations, {} restarts, best likelihood {:.6}",
            termination, generations, extinctions, winner.likelihood
        );

        Ok(GaResult {
            point: space.model_point(&winner.vector),
            best: winner.vector,
            best_likelihood: winner.likelihood,
            generations,
            extinctions,
            termination,
            history,
            final_generation: generation,
        })
    }
}

fn random_vectors<R: Rng + ?Sized>(
    space: &ParameterSpace,
    n: usize,
    rng: &mut R,
) -> Vec<ParameterVector> {
    (0..n).map(|_| space.random_vector(rng)).collect()
}

/// Evaluates candidates, optionally in parallel; output order matches input.
struct Evaluator<'a, L: ?Sized> {
    space: &'a ParameterSpace,
    observed: &'a ObservedCluster,
    likelihood: &'a L,
    parallel: bool,
}

impl<L: Likelihood + ?Sized> Evaluator<'_, L> {
    fn evaluate(&self, vectors: Vec<ParameterVector>) -> Vec<Candidate> {
        if self.parallel {
            vectors.into_par_iter().map(|v| self.candidate(v)).collect()
        } else {
            vectors.into_iter().map(|v| self.candidate(v)).collect()
        }
    }

    fn candidate(&self, vector: ParameterVector) -> Candidate {
        let raw = self
            .likelihood
            .evaluate(&self.space.model_point(&vector), self.observed);
        if !raw.is_finite() {
            warn!(
                "non-finite likelihood {raw} at {:?}; using penalty",
                vector.indices()
            );
        }
        Candidate {
            likelihood: sanitize(raw),
            vector,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
