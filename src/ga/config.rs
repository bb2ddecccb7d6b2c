//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use crate::error::{BnslError, Result};
use crate::oracle::Direction;

/// Configuration for the genetic structure search.
///
/// # Defaults
///
/// ```
/// use bn_structure::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 40);
/// assert_eq!(config.max_generations, 150);
/// assert_eq!(config.patience, 20);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use bn_structure::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(80)
///     .with_crossover_rate(0.8)
///     .with_patience(30)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of genomes kept after every generation.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Generations without a new best before stopping. 0 disables the
    /// stall check.
    pub patience: usize,

    /// Parent cap for the random DAGs that seed and refill the population.
    pub num_parents: usize,

    /// Probability that a retained genome produces a child (0.0–1.0).
    pub crossover_rate: f64,

    /// Children with `tr(e^A) - n` at or above this value are discarded.
    pub acyclicity_threshold: f64,

    pub direction: Direction,

    /// Whether to score new genomes in parallel using rayon.
    ///
    /// Has no effect without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            max_generations: 150,
            patience: 20,
            num_parents: 5,
            crossover_rate: 1.0,
            acyclicity_threshold: 1e-2,
            direction: Direction::Maximize,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the stall limit (0 to disable).
    pub fn with_patience(mut self, n: usize) -> Self {
        self.patience = n;
        self
    }

    pub fn with_num_parents(mut self, n: usize) -> Self {
        self.num_parents = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_acyclicity_threshold(mut self, threshold: f64) -> Self {
        self.acyclicity_threshold = threshold;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Enables or disables parallel scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(BnslError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(BnslError::InvalidConfig(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if self.acyclicity_threshold <= 0.0 || self.acyclicity_threshold.is_nan() {
            return Err(BnslError::InvalidConfig(
                "acyclicity_threshold must be positive".into(),
            ));
        }
        Ok(())
    }
}
