//! Single-edge moves shared by the local searches.

use std::fmt;

use super::dag::Dag;
use crate::error::Result;
use crate::oracle::{checked_local_score, ScoringOracle};

/// A single-edge change to a [`Dag`], addressed by variable index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    /// Insert `u → v`.
    Add(usize, usize),
    /// Delete `u → v`.
    Remove(usize, usize),
    /// Replace `u → v` with `v → u`.
    Flip(usize, usize),
}

impl Operation {
    /// The operation that undoes this one.
    pub fn inverse(self) -> Operation {
        match self {
            Operation::Add(u, v) => Operation::Remove(u, v),
            Operation::Remove(u, v) => Operation::Add(u, v),
            Operation::Flip(u, v) => Operation::Flip(v, u),
        }
    }

    /// The `(u, v)` endpoints as written in the operation.
    pub fn endpoints(self) -> (usize, usize) {
        match self {
            Operation::Add(u, v) | Operation::Remove(u, v) | Operation::Flip(u, v) => (u, v),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add(u, v) => write!(f, "+({u},{v})"),
            Operation::Remove(u, v) => write!(f, "-({u},{v})"),
            Operation::Flip(u, v) => write!(f, "flip({u},{v})"),
        }
    }
}

impl Dag {
    /// Legal operations touching any variable in `nodes`.
    ///
    /// For each pair `(x, y)` with one endpoint in `nodes`:
    /// - an existing arc yields a removal, plus a flip when no other path
    ///   connects its endpoints;
    /// - a missing arc yields an addition when `y` cannot reach `x`.
    ///
    /// Duplicate entries in `nodes` are tolerated; the result is sorted and
    /// duplicate-free.
    pub fn legal_operations(&self, nodes: &[usize]) -> Vec<Operation> {
        let n = self.node_count();
        let mut ops = Vec::new();
        let mut visited = vec![false; n];
        for &node in nodes {
            if node >= n || std::mem::replace(&mut visited[node], true) {
                continue;
            }
            for other in (0..n).filter(|&o| o != node) {
                for (u, v) in [(node, other), (other, node)] {
                    if self.has_arc(u, v) {
                        ops.push(Operation::Remove(u, v));
                        if !self.has_indirect_path(u, v) {
                            ops.push(Operation::Flip(u, v));
                        }
                    } else if !self.has_arc(v, u) && !self.has_path(v, u) {
                        ops.push(Operation::Add(u, v));
                    }
                }
            }
        }
        ops.sort_unstable();
        ops.dedup();
        ops
    }

    /// Every legal operation on the DAG.
    pub fn all_legal_operations(&self) -> Vec<Operation> {
        let nodes: Vec<usize> = (0..self.node_count()).collect();
        self.legal_operations(&nodes)
    }

    /// Raw score change that applying `op` would cause.
    ///
    /// Only the endpoints' local scores change, so the delta is computed
    /// from at most four oracle calls instead of a full rescore.
    pub fn score_delta<O: ScoringOracle + ?Sized>(&self, op: Operation, oracle: &O) -> Result<f64> {
        match op {
            Operation::Add(u, v) => {
                let old = self.parents(v);
                let new = old.with(u);
                Ok(checked_local_score(oracle, v, &new)? - checked_local_score(oracle, v, &old)?)
            }
            Operation::Remove(u, v) => {
                let old = self.parents(v);
                let new = old.without(u);
                Ok(checked_local_score(oracle, v, &new)? - checked_local_score(oracle, v, &old)?)
            }
            Operation::Flip(u, v) => {
                let old_v = self.parents(v);
                let old_u = self.parents(u);
                let new_v = old_v.without(u);
                let new_u = old_u.with(v);
                Ok(checked_local_score(oracle, v, &new_v)? + checked_local_score(oracle, u, &new_u)?
                    - checked_local_score(oracle, v, &old_v)?
                    - checked_local_score(oracle, u, &old_u)?)
            }
        }
    }

    /// Applies `op` in place.
    ///
    /// A flip that would close a cycle is rolled back and reported as
    /// [`BnslError::InvalidStructure`](crate::error::BnslError::InvalidStructure).
    pub fn apply(&mut self, op: Operation) -> Result<()> {
        match op {
            Operation::Add(u, v) => self.add_arc(u, v),
            Operation::Remove(u, v) => {
                self.remove_arc(u, v);
                Ok(())
            }
            Operation::Flip(u, v) => {
                self.remove_arc(u, v);
                if let Err(e) = self.add_arc(v, u) {
                    // u → v was present a moment ago, re-adding cannot fail.
                    let _ = self.add_arc(u, v);
                    return Err(e);
                }
                Ok(())
            }
        }
    }
}
