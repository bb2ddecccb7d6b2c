//! K2 configuration.

use crate::error::{BnslError, Result};
use crate::oracle::Direction;

/// Configuration for [`K2`](super::K2).
///
/// ```
/// use bn_structure::k2::K2Config;
///
/// let config = K2Config::default().with_max_parents(2);
/// assert_eq!(config.max_parents, 2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct K2Config {
    /// Most parents any variable may take.
    pub max_parents: usize,

    pub direction: Direction,
}

impl Default for K2Config {
    fn default() -> Self {
        Self {
            max_parents: 3,
            direction: Direction::Maximize,
        }
    }
}

impl K2Config {
    pub fn with_max_parents(mut self, n: usize) -> Self {
        self.max_parents = n;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_parents == 0 {
            return Err(BnslError::InvalidConfig(
                "max_parents must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
