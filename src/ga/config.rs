//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration for the binary-chromosome Genetic Algorithm.
///
/// # Defaults
///
/// ```
/// use u_isofit::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_isofit::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(50)
///     .with_crossover_rate(0.85)
///     .with_mutation_rate(0.01)
///     .with_stagnation_generations(20)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of solutions per generation (`n_pop`).
    pub population_size: usize,

    /// Generation ceiling (`n_gen`).
    pub max_generations: usize,

    /// Fitness differential in `[0, 1]`: selection pressure of the
    /// rank-based breeding table. `0` makes every rank equally likely.
    pub fitness_diff: f64,

    /// Probability that a chromosome pair is crossed over (`p_cross`).
    pub crossover_rate: f64,

    /// Independent per-bit flip probability (`p_mut`).
    pub mutation_rate: f64,

    /// Generations with an unchanged best solution before the
    /// Extinction/Immigration operator fires (`n_ei`).
    pub stagnation_generations: usize,

    /// Consecutive Extinction/Immigration events returning the same best
    /// solution before the run stops (`n_es`).
    pub extinction_repeats: usize,

    /// Whether to evaluate candidates in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock ceiling in milliseconds, checked once per
    /// generation. Not part of the convergence contract.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            fitness_diff: 1.0,
            crossover_rate: 0.85,
            mutation_rate: 0.05,
            stagnation_generations: 50,
            extinction_repeats: 2,
            parallel: true,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation ceiling.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the fitness differential.
    pub fn with_fitness_diff(mut self, fdif: f64) -> Self {
        self.fitness_diff = fdif.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-bit mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets `n_ei`.
    pub fn with_stagnation_generations(mut self, n: usize) -> Self {
        self.stagnation_generations = n;
        self
    }

    /// Sets `n_es`.
    pub fn with_extinction_repeats(mut self, n: usize) -> Self {
        self.extinction_repeats = n;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock ceiling in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Preset for quick exploratory fits.
    ///
    /// - Population: 40, Generations: 150
    /// - `n_ei`: 15, `n_es`: 2
    pub fn fast() -> Self {
        Self {
            population_size: 40,
            max_generations: 150,
            stagnation_generations: 15,
            ..Self::default()
        }
    }

    /// Preset for final fits on large isochrone grids.
    ///
    /// - Population: 200, Generations: 2000
    /// - `n_ei`: 100, `n_es`: 3
    pub fn thorough() -> Self {
        Self {
            population_size: 200,
            max_generations: 2000,
            stagnation_generations: 100,
            extinction_repeats: 3,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Fields set directly (or deserialized) bypass the builder clamps, so
    /// ranges are checked here too.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        for (name, value) in [
            ("fitness_diff", self.fitness_diff),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        if self.stagnation_generations == 0 {
            return Err(ConfigError::NoStagnationWindow);
        }
        if self.extinction_repeats == 0 {
            return Err(ConfigError::NoExtinctionRepeats);
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        Ok(())
    }
}
