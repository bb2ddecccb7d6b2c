//! Per-variable lattice of candidate parent sets.
//!
//! The parent graph of a target variable `x` over a candidate universe `C`
//! has one state per subset of `C`, and an edge `P → P ∪ {p}` for every
//! `p ∈ C \ P`. An edge costs the oracle's local score of `x` given its
//! destination; the root state (empty parent set) carries the score of `x`
//! without parents.
//!
//! After [`ParentGraph::add_cost`], costs are propagated bottom-up so that
//! the optimal parent set restricted to any subset of `C` is a single lookup.

use super::varset::VarSet;
use crate::error::{BnslError, Result};
use crate::oracle::{checked_local_score, ScoringOracle};

/// An edge of the parent-graph lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParentEdge {
    pub from: VarSet,
    pub to: VarSet,
    /// The parent added along the edge.
    pub added: usize,
    /// Local score of the target given `to`; `None` before costing.
    pub cost: Option<f64>,
}

#[derive(Debug, Clone)]
struct Costs {
    /// Local score of each state, indexed by compressed state.
    local: Vec<f64>,
    /// Best `(score, compressed state)` over all subsets of each state.
    best: Vec<(f64, u32)>,
}

/// Lattice of candidate parent sets for one target variable.
#[derive(Debug, Clone)]
pub struct ParentGraph {
    target: usize,
    candidates: Vec<usize>,
    max_parents: Option<usize>,
    costs: Option<Costs>,
}

impl ParentGraph {
    /// Most candidates a single parent graph may enumerate.
    pub const MAX_CANDIDATES: usize = 31;

    /// Builds the lattice for `target` over `candidates` (the target itself
    /// is excluded if present).
    pub fn new(target: usize, candidates: VarSet) -> Result<Self> {
        let candidates: Vec<usize> = candidates.without(target).iter().collect();
        if candidates.len() > Self::MAX_CANDIDATES {
            return Err(BnslError::TooManyVariables {
                count: candidates.len(),
                max: Self::MAX_CANDIDATES,
            });
        }
        Ok(Self {
            target,
            candidates,
            max_parents: None,
            costs: None,
        })
    }

    /// Restricts parent sets to at most `k` members.
    pub fn with_max_parents(mut self, k: Option<usize>) -> Self {
        self.max_parents = k;
        self.costs = None;
        self
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// The candidate universe.
    pub fn candidates(&self) -> VarSet {
        self.candidates.iter().copied().collect()
    }

    /// Number of lattice states (2^|candidates|).
    pub fn state_count(&self) -> usize {
        1usize << self.candidates.len()
    }

    pub fn is_costed(&self) -> bool {
        self.costs.is_some()
    }

    /// All lattice edges, with costs once assigned.
    pub fn edges(&self) -> Vec<ParentEdge> {
        let m = self.candidates.len();
        let mut edges = Vec::with_capacity(m << m.saturating_sub(1));
        for state in 0..self.state_count() as u32 {
            for (bit, &p) in self.candidates.iter().enumerate() {
                if state & (1 << bit) != 0 {
                    continue;
                }
                let next = state | (1 << bit);
                edges.push(ParentEdge {
                    from: self.expand(state),
                    to: self.expand(next),
                    added: p,
                    cost: self.costs.as_ref().map(|c| c.local[next as usize]),
                });
            }
        }
        edges
    }

    /// Scores every state with `oracle` and propagates subset optima.
    pub fn add_cost<O: ScoringOracle + ?Sized>(&mut self, oracle: &O) -> Result<()> {
        let states = self.state_count();
        let mut local = Vec::with_capacity(states);
        for state in 0..states as u32 {
            let over_cap = self
                .max_parents
                .is_some_and(|k| state.count_ones() as usize > k);
            let score = if over_cap {
                f64::INFINITY
            } else {
                checked_local_score(oracle, self.target, &self.expand(state).to_parent_set())?
            };
            local.push(score);
        }

        let mut best: Vec<(f64, u32)> = Vec::with_capacity(states);
        for state in 0..states as u32 {
            let mut b = (local[state as usize], state);
            let mut rest = state;
            while rest != 0 {
                let bit = rest & rest.wrapping_neg();
                rest ^= bit;
                let sub = best[(state ^ bit) as usize];
                if sub.0 < b.0 || (sub.0 == b.0 && sub.1 < b.1) {
                    b = sub;
                }
            }
            best.push(b);
        }

        self.costs = Some(Costs { local, best });
        Ok(())
    }

    /// The minimum-cost parent set over the whole lattice.
    ///
    /// Fails with [`BnslError::NotReady`] before [`add_cost`](Self::add_cost).
    pub fn find_optimal_parents(&self) -> Result<(VarSet, f64)> {
        self.optimal_parents_within(self.candidates())
    }

    /// The minimum-cost parent set drawn only from `allowed`.
    pub fn optimal_parents_within(&self, allowed: VarSet) -> Result<(VarSet, f64)> {
        let costs = self
            .costs
            .as_ref()
            .ok_or(BnslError::NotReady("parent graph costs have not been assigned"))?;
        let (score, state) = costs.best[self.compress(allowed) as usize];
        Ok((self.expand(state), score))
    }

    fn expand(&self, state: u32) -> VarSet {
        self.candidates
            .iter()
            .enumerate()
            .filter(|&(bit, _)| state & (1 << bit) != 0)
            .map(|(_, &p)| p)
            .collect()
    }

    fn compress(&self, set: VarSet) -> u32 {
        self.candidates
            .iter()
            .enumerate()
            .filter(|&(_, &p)| set.contains(p))
            .fold(0u32, |acc, (bit, _)| acc | (1 << bit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{FnOracle, ParentSet};

    /// Prefers exactly the parent set {1, 2} for variable 0.
    fn oracle() -> impl ScoringOracle {
        FnOracle::new(["a", "b", "c", "d"], |v, p: &ParentSet| {
            if v == 0 {
                match p.as_slice() {
                    [1, 2] => 1.0,
                    [1] => 3.0,
                    [] => 5.0,
                    _ => 4.0 + p.len() as f64,
                }
            } else {
                0.0
            }
        })
    }

    #[test]
    fn test_lattice_shape() {
        let pg = ParentGraph::new(0, VarSet::full(4)).unwrap();
        assert_eq!(pg.candidates(), [1, 2, 3].into_iter().collect());
        assert_eq!(pg.state_count(), 8);
        // m * 2^(m-1) edges
        assert_eq!(pg.edges().len(), 12);
        assert!(pg.edges().iter().all(|e| e.cost.is_none()));
    }

    #[test]
    fn test_not_ready_before_costs() {
        let pg = ParentGraph::new(0, VarSet::full(4)).unwrap();
        assert!(matches!(
            pg.find_optimal_parents(),
            Err(BnslError::NotReady(_))
        ));
    }

    #[test]
    fn test_finds_global_optimum() {
        let mut pg = ParentGraph::new(0, VarSet::full(4)).unwrap();
        pg.add_cost(&oracle()).unwrap();
        let (parents, cost) = pg.find_optimal_parents().unwrap();
        assert_eq!(parents, [1, 2].into_iter().collect());
        assert_eq!(cost, 1.0);

        // The global optimum is also the cheapest costed edge.
        let min_edge = pg
            .edges()
            .into_iter()
            .min_by(|a, b| a.cost.unwrap().total_cmp(&b.cost.unwrap()))
            .unwrap();
        assert_eq!(min_edge.to, parents);
    }

    #[test]
    fn test_restricted_optimum() {
        let mut pg = ParentGraph::new(0, VarSet::full(4)).unwrap();
        pg.add_cost(&oracle()).unwrap();
        let (parents, cost) = pg.optimal_parents_within([1, 3].into_iter().collect()).unwrap();
        assert_eq!(parents, VarSet::singleton(1));
        assert_eq!(cost, 3.0);
        let (parents, cost) = pg.optimal_parents_within(VarSet::empty()).unwrap();
        assert_eq!(parents, VarSet::empty());
        assert_eq!(cost, 5.0);
    }

    #[test]
    fn test_max_parents_cap() {
        let mut pg = ParentGraph::new(0, VarSet::full(4))
            .unwrap()
            .with_max_parents(Some(1));
        pg.add_cost(&oracle()).unwrap();
        let (parents, cost) = pg.find_optimal_parents().unwrap();
        assert_eq!(parents, VarSet::singleton(1));
        assert_eq!(cost, 3.0);
    }
}
