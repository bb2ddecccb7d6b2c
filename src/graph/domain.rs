//! The fixed variable set a structure is learned over.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{BnslError, Result};

/// An ordered, duplicate-free set of variable names.
///
/// Cloning is cheap: the names live behind an `Arc` and are shared by every
/// DAG built over the same domain.
#[derive(Debug, Clone)]
pub struct Domain {
    inner: Arc<DomainInner>,
}

#[derive(Debug)]
struct DomainInner {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Domain {
    /// Builds a domain, rejecting empty or duplicate names.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(BnslError::DegenerateDomain(format!(
                    "variable at position {i} has an empty name"
                )));
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(BnslError::DegenerateDomain(format!(
                    "variable `{name}` appears more than once"
                )));
            }
        }
        Ok(Self {
            inner: Arc::new(DomainInner { names, index }),
        })
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.inner.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.names.is_empty()
    }

    /// Names in index order.
    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    /// Name of the variable at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn name(&self, index: usize) -> &str {
        &self.inner.names[index]
    }

    /// Index of a variable by name.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.inner
            .index
            .get(name)
            .copied()
            .ok_or_else(|| BnslError::UnknownVariable(name.to_string()))
    }

    /// Fails unless the domain has at least two variables.
    ///
    /// Searches over zero or one variable have no structure to learn.
    pub fn ensure_searchable(&self) -> Result<()> {
        if self.len() < 2 {
            return Err(BnslError::DegenerateDomain(format!(
                "structure search needs at least two variables, got {}",
                self.len()
            )));
        }
        Ok(())
    }
}

impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.names == other.inner.names
    }
}

impl Eq for Domain {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let d = Domain::new(["a", "b", "c"]).unwrap();
        assert_eq!(d.len(), 3);
        assert_eq!(d.index_of("b").unwrap(), 1);
        assert_eq!(d.name(2), "c");
        assert!(matches!(d.index_of("z"), Err(BnslError::UnknownVariable(_))));
    }

    #[test]
    fn test_rejects_duplicates_and_empty_names() {
        assert!(matches!(
            Domain::new(["a", "a"]),
            Err(BnslError::DegenerateDomain(_))
        ));
        assert!(matches!(
            Domain::new(["a", ""]),
            Err(BnslError::DegenerateDomain(_))
        ));
    }

    #[test]
    fn test_equality_by_names() {
        let a = Domain::new(["x", "y"]).unwrap();
        let b = Domain::new(["x", "y"]).unwrap();
        let c = Domain::new(["y", "x"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_searchable_needs_two_variables() {
        assert!(Domain::new(["only"]).unwrap().ensure_searchable().is_err());
        assert!(Domain::new(Vec::<String>::new()).unwrap().ensure_searchable().is_err());
        assert!(Domain::new(["a", "b"]).unwrap().ensure_searchable().is_ok());
    }
}
