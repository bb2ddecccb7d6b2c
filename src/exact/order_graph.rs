//! Order-graph lattice and shortest-path search.
//!
//! One state per subset of the variables ("already placed"), one edge
//! `U → U ∪ {x}` per variable `x ∉ U`. An edge costs the best local score of
//! `x` with parents drawn from `U`. A shortest path from `∅` to the full set
//! is an optimal variable ordering together with each variable's optimal
//! parents under it, i.e. a globally optimal DAG.
//!
//! The lifecycle is explicit and each step checks the previous one ran:
//!
//! ```text
//! new → generate → add_cost → find_shortest_path → optimal_result
//! ```
//!
//! Reference: Yuan, Malone & Wu (2011), "Learning Optimal Bayesian Networks
//! Using A* Search"; Yuan & Malone (2013), "Learning Optimal Bayesian
//! Networks: A Shortest Path Perspective".

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, info, warn};

use super::parent_graph::ParentGraph;
use super::varset::VarSet;
use crate::error::{BnslError, Result};
use crate::graph::{Dag, Domain};
use crate::oracle::{ensure_compatible, ScoringOracle};

/// Hard ceiling on the number of variables for exact search.
pub const MAX_EXACT_VARIABLES: usize = 20;

/// Above this many variables the search still runs but warns.
const WARN_EXACT_VARIABLES: usize = 16;

/// An edge of the order graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderEdge {
    pub from: VarSet,
    pub to: VarSet,
    /// The variable placed along the edge.
    pub added: usize,
    /// Best local score of `added` given parents in `from`.
    pub cost: Option<f64>,
    /// The parent set achieving `cost`.
    pub optimal_parents: Option<VarSet>,
}

/// The order-graph lattice over a domain.
#[derive(Debug, Clone)]
pub struct OrderGraph {
    domain: Domain,
    max_parents: Option<usize>,
    edges: Vec<OrderEdge>,
    /// `edges[first_edge[s]..first_edge[s + 1]]` leave state `s`.
    first_edge: Vec<usize>,
    costed: bool,
    shortest_path: Option<Vec<usize>>,
}

impl OrderGraph {
    /// Creates an (ungenerated) order graph.
    ///
    /// Fails on fewer than two or more than [`MAX_EXACT_VARIABLES`]
    /// variables. The state count is 2^n, so exact search is exact but not
    /// scalable.
    pub fn new(domain: Domain) -> Result<Self> {
        domain.ensure_searchable()?;
        if domain.len() > MAX_EXACT_VARIABLES {
            return Err(BnslError::TooManyVariables {
                count: domain.len(),
                max: MAX_EXACT_VARIABLES,
            });
        }
        if domain.len() > WARN_EXACT_VARIABLES {
            warn!(
                variables = domain.len(),
                states = 1u64 << domain.len(),
                "exact search is exponential in the variable count"
            );
        }
        Ok(Self {
            domain,
            max_parents: None,
            edges: Vec::new(),
            first_edge: Vec::new(),
            costed: false,
            shortest_path: None,
        })
    }

    /// Caps every variable's parent count.
    pub fn with_max_parents(mut self, k: Option<usize>) -> Self {
        self.max_parents = k;
        self
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Number of lattice states (2^n).
    pub fn state_count(&self) -> usize {
        1usize << self.domain.len()
    }

    /// Edges generated so far, grouped by source state.
    pub fn edges(&self) -> &[OrderEdge] {
        &self.edges
    }

    /// Builds the lattice: every state and every single-variable extension.
    pub fn generate(&mut self) -> &mut Self {
        let n = self.domain.len();
        let states = self.state_count();
        let full = VarSet::full(n);

        self.edges = Vec::with_capacity(n << (n - 1));
        self.first_edge = Vec::with_capacity(states + 1);
        for bits in 0..states as u64 {
            let from = VarSet::from_bits(bits);
            self.first_edge.push(self.edges.len());
            for x in full.difference(from).iter() {
                self.edges.push(OrderEdge {
                    from,
                    to: from.with(x),
                    added: x,
                    cost: None,
                    optimal_parents: None,
                });
            }
        }
        self.first_edge.push(self.edges.len());
        self.costed = false;
        self.shortest_path = None;
        debug!(states, edges = self.edges.len(), "order graph generated");
        self
    }

    /// Costs every edge from per-variable parent graphs.
    ///
    /// Each variable's parent graph spans all other variables and is scored
    /// once; an edge `U → U ∪ {x}` then looks up the optimum of `x`'s
    /// lattice restricted to `U`. The first variable placed pays its
    /// empty-parent score.
    pub fn add_cost<O: ScoringOracle + ?Sized>(&mut self, oracle: &O) -> Result<()> {
        if self.edges.is_empty() {
            return Err(BnslError::NotReady("order graph has not been generated"));
        }
        ensure_compatible(oracle, self.domain.names())?;

        let n = self.domain.len();
        let full = VarSet::full(n);
        let mut parent_graphs = Vec::with_capacity(n);
        for x in 0..n {
            let mut pg = ParentGraph::new(x, full)?.with_max_parents(self.max_parents);
            pg.add_cost(oracle)?;
            debug!(variable = self.domain.name(x), "parent graph costed");
            parent_graphs.push(pg);
        }

        for edge in &mut self.edges {
            let (parents, cost) = parent_graphs[edge.added].optimal_parents_within(edge.from)?;
            edge.cost = Some(cost);
            edge.optimal_parents = Some(parents);
        }
        self.costed = true;
        self.shortest_path = None;
        Ok(())
    }

    /// Dijkstra from `∅` to the full set over edge costs.
    ///
    /// Every complete path has exactly n edges, so a uniform shift makes all
    /// weights non-negative without changing which path is shortest.
    pub fn find_shortest_path(&mut self) -> Result<Vec<VarSet>> {
        if !self.costed {
            return Err(BnslError::NotReady("order graph costs have not been assigned"));
        }

        let cost_of = |e: &OrderEdge| e.cost.unwrap_or(f64::INFINITY);
        let min_cost = self
            .edges
            .iter()
            .map(cost_of)
            .filter(|c| c.is_finite())
            .fold(f64::INFINITY, f64::min);
        let shift = if min_cost.is_finite() && min_cost < 0.0 {
            -min_cost
        } else {
            0.0
        };

        let states = self.state_count();
        let target = states - 1;
        let mut dist = vec![f64::INFINITY; states];
        let mut via: Vec<Option<usize>> = vec![None; states];
        let mut done = vec![false; states];
        let mut heap = BinaryHeap::new();
        dist[0] = 0.0;
        heap.push(Frontier { dist: 0.0, state: 0 });

        while let Some(Frontier { dist: d, state }) = heap.pop() {
            if std::mem::replace(&mut done[state], true) {
                continue;
            }
            if state == target {
                break;
            }
            for idx in self.first_edge[state]..self.first_edge[state + 1] {
                let edge = &self.edges[idx];
                let w = cost_of(edge);
                if !w.is_finite() {
                    continue;
                }
                let next = edge.to.bits() as usize;
                let nd = d + w + shift;
                if nd < dist[next] {
                    dist[next] = nd;
                    via[next] = Some(idx);
                    heap.push(Frontier { dist: nd, state: next });
                }
            }
        }

        let mut path_edges = Vec::with_capacity(self.domain.len());
        let mut cur = target;
        while let Some(idx) = via[cur] {
            path_edges.push(idx);
            cur = self.edges[idx].from.bits() as usize;
        }
        if cur != 0 {
            return Err(BnslError::InvalidOracle(
                "no finite-cost ordering exists under this oracle".into(),
            ));
        }
        path_edges.reverse();

        let mut path = vec![VarSet::empty()];
        path.extend(path_edges.iter().map(|&idx| self.edges[idx].to));
        info!(
            cost = self.path_cost(&path_edges),
            "order graph shortest path found"
        );
        self.shortest_path = Some(path_edges);
        Ok(path)
    }

    /// Total (unshifted) cost of the shortest path.
    pub fn shortest_path_cost(&self) -> Result<f64> {
        let path = self
            .shortest_path
            .as_ref()
            .ok_or(BnslError::NotReady("shortest path has not been computed"))?;
        Ok(self.path_cost(path))
    }

    /// Variables in the order the shortest path places them.
    pub fn optimal_order(&self) -> Result<Vec<usize>> {
        let path = self
            .shortest_path
            .as_ref()
            .ok_or(BnslError::NotReady("shortest path has not been computed"))?;
        Ok(path.iter().map(|&idx| self.edges[idx].added).collect())
    }

    /// Reconstructs the optimal DAG: each path edge contributes arcs from
    /// its optimal parents to the variable it places.
    pub fn optimal_result(&self) -> Result<Dag> {
        let path = self
            .shortest_path
            .as_ref()
            .ok_or(BnslError::NotReady("shortest path has not been computed"))?;
        let mut dag = Dag::empty(self.domain.clone());
        for &idx in path {
            let edge = &self.edges[idx];
            let parents = edge
                .optimal_parents
                .ok_or(BnslError::NotReady("order graph costs have not been assigned"))?;
            for p in parents.iter() {
                dag.add_arc(p, edge.added)?;
            }
        }
        Ok(dag)
    }

    fn path_cost(&self, path_edges: &[usize]) -> f64 {
        path_edges
            .iter()
            .map(|&idx| self.edges[idx].cost.unwrap_or(f64::INFINITY))
            .sum()
    }
}

/// Min-heap entry for Dijkstra; ties resolve to the smaller state.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    dist: f64,
    state: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` pops the smallest distance first.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.state.cmp(&self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{FnOracle, ParentSet};

    fn chain_oracle() -> impl ScoringOracle {
        // Cost: a alone, b | a, c | b are cheap; anything else is expensive.
        FnOracle::new(["a", "b", "c"], |v, p: &ParentSet| match (v, p.as_slice()) {
            (0, []) => 1.0,
            (1, [0]) => 1.0,
            (2, [1]) => 1.0,
            (_, ps) => 5.0 + ps.len() as f64,
        })
    }

    #[test]
    fn test_generate_shape() {
        let mut og = OrderGraph::new(Domain::new(["a", "b", "c"]).unwrap()).unwrap();
        og.generate();
        assert_eq!(og.state_count(), 8);
        // n * 2^(n-1)
        assert_eq!(og.edges().len(), 12);
        assert!(og.edges().iter().all(|e| e.to == e.from.with(e.added)));
    }

    #[test]
    fn test_lifecycle_not_ready() {
        let mut og = OrderGraph::new(Domain::new(["a", "b", "c"]).unwrap()).unwrap();
        assert!(matches!(
            og.add_cost(&chain_oracle()),
            Err(BnslError::NotReady(_))
        ));
        og.generate();
        assert!(matches!(og.find_shortest_path(), Err(BnslError::NotReady(_))));
        assert!(matches!(og.optimal_result(), Err(BnslError::NotReady(_))));
        og.add_cost(&chain_oracle()).unwrap();
        assert!(matches!(og.optimal_result(), Err(BnslError::NotReady(_))));
    }

    #[test]
    fn test_chain_recovered() {
        let domain = Domain::new(["a", "b", "c"]).unwrap();
        let mut og = OrderGraph::new(domain.clone()).unwrap();
        og.generate();
        og.add_cost(&chain_oracle()).unwrap();
        let path = og.find_shortest_path().unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], VarSet::empty());
        assert_eq!(path[3], VarSet::full(3));
        assert_eq!(og.optimal_order().unwrap(), vec![0, 1, 2]);
        assert_eq!(og.shortest_path_cost().unwrap(), 3.0);

        let dag = og.optimal_result().unwrap();
        let expected = Dag::from_edges(domain, [("a", "b"), ("b", "c")]).unwrap();
        assert_eq!(dag, expected);
    }

    #[test]
    fn test_negative_costs_are_shifted() {
        let oracle = FnOracle::new(["a", "b"], |v, p: &ParentSet| match (v, p.as_slice()) {
            (1, [0]) => -10.0,
            _ => -1.0,
        });
        let domain = Domain::new(["a", "b"]).unwrap();
        let mut og = OrderGraph::new(domain.clone()).unwrap();
        og.generate();
        og.add_cost(&oracle).unwrap();
        og.find_shortest_path().unwrap();
        assert_eq!(og.shortest_path_cost().unwrap(), -11.0);
        assert_eq!(
            og.optimal_result().unwrap(),
            Dag::from_edges(domain, [("a", "b")]).unwrap()
        );
    }

    #[test]
    fn test_rejects_degenerate_and_huge_domains() {
        assert!(matches!(
            OrderGraph::new(Domain::new(["a"]).unwrap()),
            Err(BnslError::DegenerateDomain(_))
        ));
        let big = Domain::new((0..MAX_EXACT_VARIABLES + 1).map(|i| format!("v{i}"))).unwrap();
        assert!(matches!(
            OrderGraph::new(big),
            Err(BnslError::TooManyVariables { .. })
        ));
    }

    #[test]
    fn test_rejects_foreign_oracle() {
        let mut og = OrderGraph::new(Domain::new(["a", "b", "c"]).unwrap()).unwrap();
        og.generate();
        let oracle = FnOracle::new(["x", "y", "z"], |_, _| 0.0);
        assert!(matches!(
            og.add_cost(&oracle),
            Err(BnslError::InvalidOracle(_))
        ));
    }
}
