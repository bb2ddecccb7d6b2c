//! Hill-climbing configuration.

use crate::error::{BnslError, Result};
use crate::oracle::Direction;

/// Configuration for [`HillClimb`](super::HillClimb).
///
/// # Defaults
///
/// ```
/// use bn_structure::hill_climb::HillClimbConfig;
///
/// let config = HillClimbConfig::default();
/// assert_eq!(config.max_iter, 1000);
/// assert_eq!(config.restart, 1);
/// assert_eq!(config.explore_num, 5);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use bn_structure::hill_climb::HillClimbConfig;
/// use bn_structure::oracle::Direction;
///
/// let config = HillClimbConfig::default()
///     .with_max_iter(500)
///     .with_restart(4)
///     .with_direction(Direction::Minimize)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HillClimbConfig {
    /// Maximum applied operations per restart.
    pub max_iter: usize,

    /// Number of independent trials. The first starts from the caller's
    /// initial DAG (if any); the rest start from random DAGs.
    pub restart: usize,

    /// Variables sampled (with replacement) per iteration; only operations
    /// touching them are considered.
    ///
    /// Values above the variable count are allowed and only warn.
    pub explore_num: usize,

    /// Parent cap for randomly generated starting DAGs.
    pub num_parents: usize,

    /// Whether higher ("up") or lower ("down") scores are better.
    pub direction: Direction,

    /// Optional bound on the tabu list. `None` keeps every entry for the
    /// whole restart; `Some(k)` evicts the oldest beyond `k`.
    pub tabu_tenure: Option<usize>,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            restart: 1,
            explore_num: 5,
            num_parents: 5,
            direction: Direction::Maximize,
            tabu_tenure: None,
            seed: None,
        }
    }
}

impl HillClimbConfig {
    pub fn with_max_iter(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }

    pub fn with_restart(mut self, n: usize) -> Self {
        self.restart = n;
        self
    }

    pub fn with_explore_num(mut self, n: usize) -> Self {
        self.explore_num = n;
        self
    }

    pub fn with_num_parents(mut self, n: usize) -> Self {
        self.num_parents = n;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = Some(tenure);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.restart == 0 {
            return Err(BnslError::InvalidConfig("restart must be at least 1".into()));
        }
        if self.explore_num == 0 {
            return Err(BnslError::InvalidConfig(
                "explore_num must be at least 1".into(),
            ));
        }
        if self.tabu_tenure == Some(0) {
            return Err(BnslError::InvalidConfig(
                "tabu_tenure must be positive or None".into(),
            ));
        }
        Ok(())
    }
}
