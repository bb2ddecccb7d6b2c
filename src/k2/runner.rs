//! Greedy order-constrained parent selection.

use tracing::{debug, info};

use super::config::K2Config;
use crate::error::{BnslError, Result};
use crate::graph::{Dag, Domain};
use crate::oracle::{checked_local_score, ParentSet, ScoringOracle};

/// Result of a K2 run.
#[derive(Debug, Clone)]
pub struct K2Result {
    pub dag: Dag,
    pub score: f64,
    /// The variable order the parents were drawn from.
    pub order: Vec<String>,
}

/// K2 search.
///
/// Given a variable order, each variable starts with no parents and
/// repeatedly adopts the earlier variable whose addition improves its local
/// score the most, until nothing improves or the parent cap is reached.
/// Every arc points forward in the order, so the result is acyclic by
/// construction.
///
/// # References
///
/// Cooper & Herskovits (1992), "A Bayesian Method for the Induction of
/// Probabilistic Networks from Data"
pub struct K2;

impl K2 {
    /// Runs K2 with the oracle's own variable order.
    pub fn run<O: ScoringOracle + ?Sized>(oracle: &O, config: &K2Config) -> Result<K2Result> {
        let domain = Domain::new(oracle.variables().iter().cloned())?;
        let order: Vec<usize> = (0..domain.len()).collect();
        search(oracle, domain, order, config)
    }

    /// Runs K2 with an explicit order, which must name every variable
    /// exactly once.
    pub fn run_with_order<O: ScoringOracle + ?Sized, S: AsRef<str>>(
        oracle: &O,
        order: &[S],
        config: &K2Config,
    ) -> Result<K2Result> {
        let domain = Domain::new(oracle.variables().iter().cloned())?;
        let indices = order
            .iter()
            .map(|name| domain.index_of(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = vec![false; domain.len()];
        for &i in &indices {
            if std::mem::replace(&mut seen[i], true) {
                return Err(BnslError::InvalidConfig(format!(
                    "variable {} appears twice in the order",
                    domain.name(i)
                )));
            }
        }
        if indices.len() != domain.len() {
            return Err(BnslError::InvalidConfig(format!(
                "order names {} of {} variables",
                indices.len(),
                domain.len()
            )));
        }
        search(oracle, domain, indices, config)
    }
}

fn search<O: ScoringOracle + ?Sized>(
    oracle: &O,
    domain: Domain,
    order: Vec<usize>,
    config: &K2Config,
) -> Result<K2Result> {
    config.validate()?;
    domain.ensure_searchable()?;
    let direction = config.direction;
    let mut dag = Dag::empty(domain.clone());
    let mut total = 0.0;

    for (pos, &child) in order.iter().enumerate() {
        let mut parents = ParentSet::empty();
        let mut current = checked_local_score(oracle, child, &parents)?;

        while parents.len() < config.max_parents {
            let mut best: Option<(usize, f64)> = None;
            for &candidate in &order[..pos] {
                if parents.contains(candidate) {
                    continue;
                }
                let score = checked_local_score(oracle, child, &parents.with(candidate))?;
                let better = match best {
                    Some((_, b)) => direction.is_better(score, b),
                    None => true,
                };
                if better {
                    best = Some((candidate, score));
                }
            }
            match best {
                Some((parent, score)) if direction.is_better(score, current) => {
                    parents = parents.with(parent);
                    current = score;
                }
                _ => break,
            }
        }

        for &p in parents.as_slice() {
            dag.add_arc(p, child)?;
        }
        debug!(variable = domain.name(child), parents = ?parents.as_slice(), "parents chosen");
        total += current;
    }

    info!(score = total, edges = dag.edge_count(), "k2 finished");
    Ok(K2Result {
        dag,
        score: total,
        order: order.iter().map(|&i| domain.name(i).to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{Direction, FnOracle};

    /// Rewards a → b and b → c; every other parent costs.
    fn chain_oracle() -> impl ScoringOracle {
        FnOracle::new(["a", "b", "c"], |v, p: &ParentSet| match (v, p.as_slice()) {
            (1, [0]) => 10.0,
            (2, [1]) => 10.0,
            (_, ps) => -5.0 * ps.len() as f64,
        })
    }

    #[test]
    fn test_k2_recovers_chain_in_natural_order() {
        let result = K2::run(&chain_oracle(), &K2Config::default()).unwrap();
        assert_eq!(result.dag.arcs(), vec![(0, 1), (1, 2)]);
        assert_eq!(result.score, 20.0);
        assert_eq!(result.order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_k2_respects_order() {
        // With c first, nothing can precede it and b→c is impossible.
        let result = K2::run_with_order(&chain_oracle(), &["c", "a", "b"], &K2Config::default())
            .unwrap();
        assert_eq!(result.dag.arcs(), vec![(0, 1)]);
        assert_eq!(result.score, 10.0);
    }

    #[test]
    fn test_k2_parent_cap() {
        // Every extra parent helps; the cap bounds the count.
        let oracle = FnOracle::new(["a", "b", "c", "d"], |_, p: &ParentSet| p.len() as f64);
        let result = K2::run(&oracle, &K2Config::default().with_max_parents(1)).unwrap();
        for v in 0..4 {
            assert!(result.dag.parents(v).len() <= 1);
        }
        assert_eq!(result.dag.edge_count(), 3);
    }

    #[test]
    fn test_k2_minimize() {
        let oracle = FnOracle::new(["a", "b", "c"], |_, p: &ParentSet| p.len() as f64);
        let config = K2Config::default().with_direction(Direction::Minimize);
        let result = K2::run(&oracle, &config).unwrap();
        assert_eq!(result.dag.edge_count(), 0);
    }

    #[test]
    fn test_k2_rejects_bad_orders() {
        let oracle = chain_oracle();
        let config = K2Config::default();
        assert!(matches!(
            K2::run_with_order(&oracle, &["a", "b"], &config),
            Err(BnslError::InvalidConfig(_))
        ));
        assert!(matches!(
            K2::run_with_order(&oracle, &["a", "a", "b"], &config),
            Err(BnslError::InvalidConfig(_))
        ));
        assert!(matches!(
            K2::run_with_order(&oracle, &["a", "b", "z"], &config),
            Err(BnslError::UnknownVariable(_))
        ));
    }

    #[test]
    fn test_k2_rejects_zero_parent_cap() {
        let config = K2Config::default().with_max_parents(0);
        assert!(matches!(
            K2::run(&chain_oracle(), &config),
            Err(BnslError::InvalidConfig(_))
        ));
    }
}
