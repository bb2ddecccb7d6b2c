//! Directed acyclic graph over a fixed variable domain.
//!
//! [`Dag`] wraps a generic `petgraph` [`DiGraphMap`] keyed by variable index
//! and enforces acyclicity on every insertion. The container never renumbers
//! nodes: index `i` always denotes `domain.name(i)`.
//!
//! # Invariants
//!
//! - Every variable of the domain is a node, edges or not.
//! - No self loops and no directed cycles, at any point a caller can observe.
//! - A rejected insertion leaves the edge set untouched.

use std::collections::VecDeque;

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction::{Incoming, Outgoing};

use super::domain::Domain;
use crate::error::{BnslError, Result};
use crate::oracle::{checked_local_score, ensure_compatible, ParentSet, ScoringOracle};

/// Edge-count breakdown of the structural Hamming-style distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuralDistance {
    /// Edges in `self` that are absent from the reference.
    pub false_positives: usize,
    /// Edges in the reference that are absent from `self`.
    pub false_negatives: usize,
}

impl StructuralDistance {
    pub fn total(&self) -> usize {
        self.false_positives + self.false_negatives
    }
}

/// Total score with the per-variable contributions that make it up.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreDetail {
    pub total: f64,
    /// `(variable, local score)` in domain order.
    pub local: Vec<(String, f64)>,
}

/// A mutable DAG whose edge relation is kept acyclic.
#[derive(Debug, Clone)]
pub struct Dag {
    domain: Domain,
    graph: DiGraphMap<usize, ()>,
}

impl Dag {
    /// A DAG with every variable of `domain` and no edges.
    pub fn empty(domain: Domain) -> Self {
        let mut graph = DiGraphMap::with_capacity(domain.len(), 0);
        for i in 0..domain.len() {
            graph.add_node(i);
        }
        Self { domain, graph }
    }

    /// Builds a DAG from `(source, target)` name pairs.
    ///
    /// Fails with [`BnslError::InvalidStructure`] on the first edge that
    /// closes a cycle, or [`BnslError::UnknownVariable`] on a foreign name.
    pub fn from_edges<S: AsRef<str>>(
        domain: Domain,
        edges: impl IntoIterator<Item = (S, S)>,
    ) -> Result<Self> {
        let mut dag = Self::empty(domain);
        for (u, v) in edges {
            dag.add_edge(u.as_ref(), v.as_ref())?;
        }
        Ok(dag)
    }

    /// Builds a DAG from `(source, target)` index pairs.
    pub fn from_arcs(
        domain: Domain,
        arcs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self> {
        let mut dag = Self::empty(domain);
        for (u, v) in arcs {
            dag.add_arc(u, v)?;
        }
        Ok(dag)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Number of variables (nodes).
    pub fn node_count(&self) -> usize {
        self.domain.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    // ---------------------------------------------------------------
    // Name-level API
    // ---------------------------------------------------------------

    /// Inserts `u → v`.
    ///
    /// Fails with [`BnslError::InvalidStructure`] if `u == v` or the edge
    /// would close a directed cycle; the DAG is left unchanged.
    pub fn add_edge(&mut self, u: &str, v: &str) -> Result<()> {
        let (ui, vi) = (self.domain.index_of(u)?, self.domain.index_of(v)?);
        self.add_arc(ui, vi)
    }

    /// Removes `u → v`. Returns whether the edge was present.
    pub fn remove_edge(&mut self, u: &str, v: &str) -> Result<bool> {
        let (ui, vi) = (self.domain.index_of(u)?, self.domain.index_of(v)?);
        Ok(self.remove_arc(ui, vi))
    }

    pub fn has_edge(&self, u: &str, v: &str) -> bool {
        match (self.domain.index_of(u), self.domain.index_of(v)) {
            (Ok(ui), Ok(vi)) => self.has_arc(ui, vi),
            _ => false,
        }
    }

    /// Parents of `v`, by name, in domain order.
    pub fn predecessors(&self, v: &str) -> Result<Vec<&str>> {
        let vi = self.domain.index_of(v)?;
        Ok(self
            .parents(vi)
            .as_slice()
            .iter()
            .map(|&p| self.domain.name(p))
            .collect())
    }

    /// Edge list of `(source, target)` names, sorted by index.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.arcs()
            .into_iter()
            .map(|(u, v)| (self.domain.name(u).to_string(), self.domain.name(v).to_string()))
            .collect()
    }

    // ---------------------------------------------------------------
    // Index-level API (used by the searches)
    // ---------------------------------------------------------------

    /// Inserts the arc `u → v` by index, rejecting loops and cycles.
    pub fn add_arc(&mut self, u: usize, v: usize) -> Result<()> {
        self.check_index(u)?;
        self.check_index(v)?;
        if u == v {
            let name = self.domain.name(u).to_string();
            return Err(BnslError::InvalidStructure {
                cycle: vec![(name.clone(), name)],
            });
        }
        if self.has_arc(u, v) {
            return Ok(());
        }
        if let Some(path) = self.find_path(v, u) {
            let named = |a: usize, b: usize| {
                (self.domain.name(a).to_string(), self.domain.name(b).to_string())
            };
            let mut cycle = vec![named(u, v)];
            cycle.extend(path.windows(2).map(|w| named(w[0], w[1])));
            return Err(BnslError::InvalidStructure { cycle });
        }
        self.graph.add_edge(u, v, ());
        Ok(())
    }

    /// Removes the arc `u → v`. Returns whether it was present.
    pub fn remove_arc(&mut self, u: usize, v: usize) -> bool {
        self.graph.remove_edge(u, v).is_some()
    }

    pub fn has_arc(&self, u: usize, v: usize) -> bool {
        self.graph.contains_edge(u, v)
    }

    /// Parent set of `v`.
    pub fn parents(&self, v: usize) -> ParentSet {
        self.graph.neighbors_directed(v, Incoming).collect()
    }

    /// Children of `v` in ascending index order.
    pub fn children(&self, v: usize) -> Vec<usize> {
        let mut c: Vec<usize> = self.graph.neighbors_directed(v, Outgoing).collect();
        c.sort_unstable();
        c
    }

    /// All arcs, sorted.
    pub fn arcs(&self) -> Vec<(usize, usize)> {
        let mut arcs: Vec<(usize, usize)> =
            self.graph.all_edges().map(|(u, v, _)| (u, v)).collect();
        arcs.sort_unstable();
        arcs
    }

    /// Returns `true` if a directed path leads from `from` to `to`.
    ///
    /// A node reaches itself through the empty path. Indices outside the
    /// domain reach nothing.
    pub fn has_path(&self, from: usize, to: usize) -> bool {
        self.find_path(from, to).is_some()
    }

    /// Returns `true` if some path from `u` to `v` other than the direct arc
    /// exists, i.e. a path of more than two nodes.
    ///
    /// Reversing `u → v` is only acyclicity-preserving when this is `false`.
    pub fn has_indirect_path(&self, u: usize, v: usize) -> bool {
        let n = self.domain.len();
        if u >= n || v >= n {
            return false;
        }
        let mut seen = vec![false; n];
        let mut stack: Vec<usize> = self
            .graph
            .neighbors_directed(u, Outgoing)
            .filter(|&c| c != v)
            .collect();
        while let Some(node) = stack.pop() {
            if node == v {
                return true;
            }
            if std::mem::replace(&mut seen[node], true) {
                continue;
            }
            stack.extend(self.graph.neighbors_directed(node, Outgoing));
        }
        false
    }

    /// Breadth-first path search returning the node sequence `from ..= to`.
    fn find_path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        let n = self.domain.len();
        if from >= n || to >= n {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }
        let mut prev: Vec<Option<usize>> = vec![None; n];
        let mut seen = vec![false; n];
        seen[from] = true;
        let mut queue = VecDeque::from([from]);

        while let Some(node) = queue.pop_front() {
            for next in self.graph.neighbors_directed(node, Outgoing) {
                if seen[next] {
                    continue;
                }
                seen[next] = true;
                prev[next] = Some(node);
                if next == to {
                    let mut path = vec![to];
                    let mut cur = to;
                    while let Some(p) = prev[cur] {
                        path.push(p);
                        cur = p;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.domain.len() {
            return Err(BnslError::UnknownVariable(format!("#{i}")));
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Scoring and comparison
    // ---------------------------------------------------------------

    /// Sum over all variables of the oracle's local score given the
    /// variable's current parents.
    ///
    /// Fails with [`BnslError::InvalidOracle`] if the oracle scores a
    /// different variable set or returns NaN.
    pub fn score<O: ScoringOracle + ?Sized>(&self, oracle: &O) -> Result<f64> {
        ensure_compatible(oracle, self.domain.names())?;
        self.score_unchecked(oracle)
    }

    /// Like [`score`](Self::score) but also returns each local term.
    pub fn score_detail<O: ScoringOracle + ?Sized>(&self, oracle: &O) -> Result<ScoreDetail> {
        ensure_compatible(oracle, self.domain.names())?;
        let mut local = Vec::with_capacity(self.domain.len());
        let mut total = 0.0;
        for v in 0..self.domain.len() {
            let s = checked_local_score(oracle, v, &self.parents(v))?;
            total += s;
            local.push((self.domain.name(v).to_string(), s));
        }
        Ok(ScoreDetail { total, local })
    }

    /// Scores without re-checking the oracle's domain. Runners check once at
    /// the start of a run.
    pub(crate) fn score_unchecked<O: ScoringOracle + ?Sized>(&self, oracle: &O) -> Result<f64> {
        (0..self.domain.len()).try_fold(0.0, |acc, v| {
            Ok(acc + checked_local_score(oracle, v, &self.parents(v))?)
        })
    }

    /// Structural Hamming-style distance to `other`: false positives plus
    /// false negatives.
    ///
    /// Fails with [`BnslError::IncomparableStructure`] if the domains differ.
    pub fn structural_distance(&self, other: &Dag) -> Result<usize> {
        Ok(self.distance_breakdown(other)?.total())
    }

    /// Structural distance split into its two directions.
    pub fn distance_breakdown(&self, other: &Dag) -> Result<StructuralDistance> {
        if self.domain != other.domain {
            return Err(BnslError::IncomparableStructure);
        }
        let false_positives = self
            .graph
            .all_edges()
            .filter(|&(u, v, _)| !other.has_arc(u, v))
            .count();
        let false_negatives = other
            .graph
            .all_edges()
            .filter(|&(u, v, _)| !self.has_arc(u, v))
            .count();
        Ok(StructuralDistance {
            false_positives,
            false_negatives,
        })
    }
}

impl PartialEq for Dag {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain && self.arcs() == other.arcs()
    }
}
