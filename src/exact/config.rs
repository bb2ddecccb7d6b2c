//! Exact search configuration.

use crate::error::{BnslError, Result};

/// Configuration for [`ExactSearch`](super::ExactSearch).
///
/// # Examples
///
/// ```
/// use bn_structure::exact::ExactConfig;
///
/// let config = ExactConfig::default().with_max_parents(3);
/// assert_eq!(config.max_parents, Some(3));
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExactConfig {
    /// Optional cap on each variable's parent count.
    ///
    /// `None` searches all parent sets. The lattices keep their full size;
    /// oversized sets are simply excluded from the optimum.
    pub max_parents: Option<usize>,
}

impl ExactConfig {
    pub fn with_max_parents(mut self, k: usize) -> Self {
        self.max_parents = Some(k);
        self
    }

    /// Validates the configuration.
    ///
    /// A zero parent cap is rejected; an edgeless result needs no search.
    pub fn validate(&self) -> Result<()> {
        if self.max_parents == Some(0) {
            return Err(BnslError::InvalidConfig(
                "max_parents must be positive or None".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uncapped() {
        let config = ExactConfig::default();
        assert!(config.max_parents.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let config = ExactConfig::default().with_max_parents(0);
        assert!(matches!(config.validate(), Err(BnslError::InvalidConfig(_))));
        assert!(ExactConfig::default().with_max_parents(1).validate().is_ok());
    }
}
