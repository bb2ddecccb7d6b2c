//! The scoring-oracle contract consumed by every search strategy.
//!
//! A structure score is decomposable: it is the sum over variables of a
//! local score that depends only on the variable and its parent set.
//! Concrete formulas (MDL, BIC, knowledge-fused variants) live outside this
//! crate and plug in by implementing [`ScoringOracle`].
//!
//! # Polarity
//!
//! The exact search always treats the oracle as a cost to minimize. The local
//! and genetic searches default to [`Direction::Maximize`] and take an
//! explicit [`Direction`] so one polarity is threaded through a whole run.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{BnslError, Result};

/// A canonical (sorted, duplicate-free) set of parent variable indices.
///
/// Two parent sets built from the same members in different order compare
/// and hash equal, so oracles always see sets rather than sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParentSet(Vec<usize>);

impl ParentSet {
    /// The empty parent set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Builds a canonical parent set from any iterator of indices.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut v: Vec<usize> = indices.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        Self(v)
    }

    /// Members in ascending order.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    /// Returns a copy with `index` added.
    pub fn with(&self, index: usize) -> Self {
        let mut v = self.0.clone();
        if let Err(pos) = v.binary_search(&index) {
            v.insert(pos, index);
        }
        Self(v)
    }

    /// Returns a copy with `index` removed.
    pub fn without(&self, index: usize) -> Self {
        let mut v = self.0.clone();
        if let Ok(pos) = v.binary_search(&index) {
            v.remove(pos);
        }
        Self(v)
    }
}

impl FromIterator<usize> for ParentSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::from_indices(iter)
    }
}

/// Computes local scores for a fixed variable domain.
///
/// Implementations must be pure: the same `(variable, parents)` pair always
/// yields the same value for a given oracle. Variables are addressed by their
/// position in [`variables`](ScoringOracle::variables).
///
/// # Examples
///
/// ```
/// use bn_structure::oracle::{ParentSet, ScoringOracle};
///
/// struct PreferFewParents {
///     names: Vec<String>,
/// }
///
/// impl ScoringOracle for PreferFewParents {
///     fn variables(&self) -> &[String] {
///         &self.names
///     }
///
///     fn local_score(&self, _variable: usize, parents: &ParentSet) -> f64 {
///         -(parents.len() as f64)
///     }
/// }
/// ```
pub trait ScoringOracle: Send + Sync {
    /// The variable names this oracle scores, in index order.
    fn variables(&self) -> &[String];

    /// The local score of `variable` given `parents`.
    fn local_score(&self, variable: usize, parents: &ParentSet) -> f64;
}

impl<O: ScoringOracle + ?Sized> ScoringOracle for &O {
    fn variables(&self) -> &[String] {
        (**self).variables()
    }

    fn local_score(&self, variable: usize, parents: &ParentSet) -> f64 {
        (**self).local_score(variable, parents)
    }
}

/// Optimization direction for the local and genetic searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Higher scores are better ("up").
    #[default]
    Maximize,
    /// Lower scores are better ("down").
    Minimize,
}

impl Direction {
    /// Maps a raw score delta to one where positive always means "better".
    pub fn gain(self, delta: f64) -> f64 {
        match self {
            Direction::Maximize => delta,
            Direction::Minimize => -delta,
        }
    }

    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Direction::Maximize => a > b,
            Direction::Minimize => a < b,
        }
    }

    /// Orders two scores so that the better one sorts first.
    pub fn best_first(self, a: f64, b: f64) -> std::cmp::Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal);
        match self {
            Direction::Maximize => ord.reverse(),
            Direction::Minimize => ord,
        }
    }

    /// The worst possible score in this direction.
    pub fn worst(self) -> f64 {
        match self {
            Direction::Maximize => f64::NEG_INFINITY,
            Direction::Minimize => f64::INFINITY,
        }
    }
}

/// Checks that an oracle scores exactly the variables in `names`.
pub fn ensure_compatible<O: ScoringOracle + ?Sized>(oracle: &O, names: &[String]) -> Result<()> {
    let vars = oracle.variables();
    if vars != names {
        return Err(BnslError::InvalidOracle(format!(
            "oracle scores variables {vars:?} but the search domain is {names:?}"
        )));
    }
    Ok(())
}

/// Calls the oracle and rejects NaN results.
pub(crate) fn checked_local_score<O: ScoringOracle + ?Sized>(
    oracle: &O,
    variable: usize,
    parents: &ParentSet,
) -> Result<f64> {
    let score = oracle.local_score(variable, parents);
    if score.is_nan() {
        return Err(BnslError::InvalidOracle(format!(
            "local score of variable {variable} given {:?} is NaN",
            parents.as_slice()
        )));
    }
    Ok(score)
}

/// An oracle backed by a closure.
///
/// Handy for tests and for wiring scoring formulas that are already plain
/// functions.
pub struct FnOracle<F> {
    names: Vec<String>,
    score: F,
}

impl<F> FnOracle<F>
where
    F: Fn(usize, &ParentSet) -> f64 + Send + Sync,
{
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>, score: F) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            score,
        }
    }
}

impl<F> ScoringOracle for FnOracle<F>
where
    F: Fn(usize, &ParentSet) -> f64 + Send + Sync,
{
    fn variables(&self) -> &[String] {
        &self.names
    }

    fn local_score(&self, variable: usize, parents: &ParentSet) -> f64 {
        (self.score)(variable, parents)
    }
}

/// Memoizes local scores of an inner oracle.
///
/// Local searches revisit the same `(variable, parents)` pairs many times;
/// caching turns repeat evaluations into map lookups. Safe to share across
/// threads.
pub struct CachedOracle<O> {
    inner: O,
    cache: RwLock<HashMap<(usize, ParentSet), f64>>,
}

impl<O: ScoringOracle> CachedOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of distinct entries computed so far.
    pub fn cached_entries(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: ScoringOracle> ScoringOracle for CachedOracle<O> {
    fn variables(&self) -> &[String] {
        self.inner.variables()
    }

    fn local_score(&self, variable: usize, parents: &ParentSet) -> f64 {
        let key = (variable, parents.clone());
        if let Ok(cache) = self.cache.read() {
            if let Some(&score) = cache.get(&key) {
                return score;
            }
        }
        let score = self.inner.local_score(variable, parents);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, score);
        }
        score
    }
}
