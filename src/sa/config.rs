//! SA configuration and cooling schedules.

use crate::error::{BnslError, Result};
use crate::oracle::Direction;

/// Cooling schedule for temperature reduction.
///
/// # References
///
/// - Geometric: standard textbook approach
/// - Linear: fixed-duration cooling
/// - LundyMees: Lundy & Mees (1986), with convergence proof
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric (exponential) cooling: `T_{k+1} = alpha * T_k`.
    Geometric {
        /// Cooling factor in (0, 1). Higher = slower cooling.
        alpha: f64,
    },

    /// Linear cooling from the initial to the minimum temperature over the
    /// iteration budget: `T_k = T_0 - (k + 1) * (T_0 - T_min) / num_iterations`.
    Linear,

    /// Lundy-Mees cooling: `T_{k+1} = T_k / (1 + beta * T_k)`.
    LundyMees {
        /// Cooling parameter. Typically `(T_0 - T_min) / (num_iterations * T_0 * T_min)`.
        beta: f64,
    },
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.99 }
    }
}

impl CoolingSchedule {
    /// Temperature after `step` (zero-based) has completed.
    pub(crate) fn next(self, temperature: f64, step: usize, config: &SaConfig) -> f64 {
        match self {
            CoolingSchedule::Geometric { alpha } => temperature * alpha,
            CoolingSchedule::Linear => {
                let span = config.initial_temperature - config.min_temperature;
                let t = config.initial_temperature
                    - (step + 1) as f64 * span / config.num_iterations.max(1) as f64;
                t.max(config.min_temperature)
            }
            CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
        }
    }
}

/// Configuration for [`SaRunner`](super::SaRunner).
///
/// The run always performs exactly `num_iterations` steps (unless
/// cancelled); temperature only shapes acceptance.
///
/// # Examples
///
/// ```
/// use bn_structure::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.98 })
///     .with_num_iterations(5000)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Starting temperature. Higher values accept more worsening moves.
    pub initial_temperature: f64,

    /// Floor for the linear schedule. Not a stopping condition.
    pub min_temperature: f64,

    pub cooling: CoolingSchedule,

    /// Number of sampled operations.
    pub num_iterations: usize,

    /// Start from a random DAG instead of the empty one when no initial DAG
    /// is supplied.
    pub random_start: bool,

    /// Parent cap for the random start.
    pub num_parents: usize,

    pub direction: Direction,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            min_temperature: 1e-6,
            cooling: CoolingSchedule::default(),
            num_iterations: 1000,
            random_start: false,
            num_parents: 5,
            direction: Direction::Maximize,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_num_iterations(mut self, n: usize) -> Self {
        self.num_iterations = n;
        self
    }

    pub fn with_random_start(mut self, num_parents: usize) -> Self {
        self.random_start = true;
        self.num_parents = num_parents;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.initial_temperature <= 0.0 || self.initial_temperature.is_nan() {
            return Err(BnslError::InvalidConfig(
                "initial_temperature must be positive".into(),
            ));
        }
        if self.min_temperature <= 0.0
            || self.min_temperature.is_nan()
            || self.min_temperature >= self.initial_temperature
        {
            return Err(BnslError::InvalidConfig(
                "min_temperature must be in (0, initial_temperature)".into(),
            ));
        }
        match self.cooling {
            CoolingSchedule::Geometric { alpha }
                if alpha <= 0.0 || alpha >= 1.0 || alpha.is_nan() =>
            {
                Err(BnslError::InvalidConfig(format!(
                    "geometric alpha must be in (0, 1), got {alpha}"
                )))
            }
            CoolingSchedule::LundyMees { beta } if beta <= 0.0 || beta.is_nan() => {
                Err(BnslError::InvalidConfig(format!(
                    "lundy-mees beta must be positive, got {beta}"
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cooling, CoolingSchedule::Geometric { alpha: 0.99 });
        assert_eq!(config.num_iterations, 1000);
    }

    #[test]
    fn test_rejects_bad_alpha() {
        for alpha in [0.0, 1.0, 1.5, -0.1] {
            let config = SaConfig::default().with_cooling(CoolingSchedule::Geometric { alpha });
            assert!(config.validate().is_err(), "alpha {alpha} accepted");
        }
    }

    #[test]
    fn test_rejects_bad_temperatures() {
        assert!(SaConfig::default()
            .with_initial_temperature(0.0)
            .validate()
            .is_err());
        assert!(SaConfig::default()
            .with_initial_temperature(1.0)
            .with_min_temperature(2.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_schedules() {
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_min_temperature(1.0)
            .with_num_iterations(99);

        let t = CoolingSchedule::Geometric { alpha: 0.5 }.next(100.0, 0, &config);
        assert_eq!(t, 50.0);

        let t = CoolingSchedule::Linear.next(100.0, 0, &config);
        assert!((t - 99.0).abs() < 1e-12);
        let t = CoolingSchedule::Linear.next(1.0, 500, &config);
        assert_eq!(t, 1.0);

        let t = CoolingSchedule::LundyMees { beta: 0.01 }.next(100.0, 0, &config);
        assert!((t - 50.0).abs() < 1e-12);
    }
}
