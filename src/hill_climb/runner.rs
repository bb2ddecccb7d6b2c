//! Hill-climbing execution loop.
//!
//! # Algorithm
//!
//! For each restart:
//! 1. Start from the caller's DAG (first restart) or a random DAG; clear
//!    the tabu list
//! 2. At each iteration:
//!    a. Sample `explore_num` variables with replacement
//!    b. Enumerate legal, non-tabu operations touching them, each with its
//!       incremental score delta
//!    c. Stop if the best delta goes the wrong way; otherwise apply it and,
//!       for removals and flips, make its inverse tabu
//! 3. Keep the best-scoring restart

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, trace, warn};

use super::config::HillClimbConfig;
use super::tabu::TabuList;
use crate::error::Result;
use crate::graph::{Dag, Domain, Operation};
use crate::oracle::{ensure_compatible, Direction, ScoringOracle};
use crate::parallel::best_of;
use crate::random::{choices, rng_from_seed};

/// Result of a hill-climbing run.
#[derive(Debug, Clone)]
pub struct HillClimbResult {
    /// The best DAG over all restarts.
    pub dag: Dag,

    /// Score of `dag` under the oracle.
    pub score: f64,

    /// Running score after each applied operation, one sequence per restart
    /// (the first entry is the starting score).
    pub history: Vec<Vec<f64>>,

    /// Operations applied, one sequence per restart.
    pub applied: Vec<Vec<Operation>>,

    /// Final score of each restart.
    pub restart_scores: Vec<f64>,

    /// Total operations applied over all restarts.
    pub iterations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

/// One finished restart.
struct Climb {
    dag: Dag,
    score: f64,
    history: Vec<f64>,
    applied: Vec<Operation>,
    cancelled: bool,
}

/// Greedy local search with tabu avoidance and random restarts.
///
/// # Usage
///
/// ```ignore
/// let config = HillClimbConfig::default().with_restart(5).with_seed(42);
/// let result = HillClimb::run(&oracle, None, &config)?;
/// println!("best score: {}", result.score);
/// ```
pub struct HillClimb;

impl HillClimb {
    /// Runs hill climbing, seeding the RNG from `config.seed`.
    pub fn run<O: ScoringOracle + ?Sized>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &HillClimbConfig,
    ) -> Result<HillClimbResult> {
        let mut rng = rng_from_seed(config.seed);
        Self::run_with_rng(oracle, initial, config, &mut rng)
    }

    /// Runs hill climbing with a caller-supplied random source.
    pub fn run_with_rng<O: ScoringOracle + ?Sized, R: Rng>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &HillClimbConfig,
        rng: &mut R,
    ) -> Result<HillClimbResult> {
        Self::search(oracle, initial, config, rng, None)
    }

    /// Runs hill climbing with an optional cancellation flag.
    ///
    /// The flag is checked once per iteration. When it is set the current
    /// restart stops, no further restarts begin, and the best DAG found so
    /// far is returned with `cancelled = true`.
    pub fn run_with_cancel<O: ScoringOracle + ?Sized>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &HillClimbConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<HillClimbResult> {
        let mut rng = rng_from_seed(config.seed);
        Self::search(oracle, initial, config, &mut rng, cancel.as_deref())
    }

    /// Runs `workers` independent instances and keeps the best.
    ///
    /// Worker `i` uses seed `base + i`, where `base` is `config.seed` or a
    /// random value. Instances share nothing; if any fails, the whole call
    /// fails.
    pub fn run_parallel<O: ScoringOracle + ?Sized>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &HillClimbConfig,
        workers: usize,
    ) -> Result<HillClimbResult> {
        config.validate()?;
        let base = config.seed.unwrap_or_else(rand::random);
        best_of(workers, config.direction, |i| {
            let worker_config = config.clone().with_seed(base.wrapping_add(i as u64));
            let result = Self::run(oracle, initial, &worker_config)?;
            debug!(worker = i, score = result.score, "hill climb worker finished");
            let score = result.score;
            Ok((result, score))
        })
    }

    fn search<O: ScoringOracle + ?Sized, R: Rng>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &HillClimbConfig,
        rng: &mut R,
        cancel: Option<&AtomicBool>,
    ) -> Result<HillClimbResult> {
        config.validate()?;
        let domain = Domain::new(oracle.variables().iter().cloned())?;
        domain.ensure_searchable()?;
        if let Some(dag) = initial {
            ensure_compatible(oracle, dag.domain().names())?;
        }
        if config.explore_num > domain.len() {
            warn!(
                explore_num = config.explore_num,
                variables = domain.len(),
                "explore number exceeds the variable count; sampled variables will repeat"
            );
        }

        let mut tabu = TabuList::new(config.tabu_tenure);
        let mut best: Option<(Dag, f64)> = None;
        let mut history = Vec::with_capacity(config.restart);
        let mut applied = Vec::with_capacity(config.restart);
        let mut restart_scores = Vec::with_capacity(config.restart);
        let mut cancelled = false;

        for restart in 0..config.restart {
            let start = match initial {
                Some(dag) if restart == 0 => dag.clone(),
                _ => Dag::random(domain.clone(), config.num_parents, rng),
            };
            tabu.clear();

            let climb = climb(oracle, start, config, &mut tabu, rng, cancel)?;
            info!(
                restart,
                score = climb.score,
                steps = climb.applied.len(),
                "hill climb restart finished"
            );

            let replace = match &best {
                Some((_, b)) => config.direction.is_better(climb.score, *b),
                None => true,
            };
            restart_scores.push(climb.score);
            history.push(climb.history);
            applied.push(climb.applied);
            if replace {
                best = Some((climb.dag, climb.score));
            }
            if climb.cancelled {
                cancelled = true;
                break;
            }
        }

        let iterations = applied.iter().map(Vec::len).sum();
        // restart >= 1 is validated, so at least one climb ran.
        let (dag, score) = best.unwrap_or_else(|| (Dag::empty(domain), config.direction.worst()));
        Ok(HillClimbResult {
            dag,
            score,
            history,
            applied,
            restart_scores,
            iterations,
            cancelled,
        })
    }
}

/// One restart of the greedy loop.
fn climb<O: ScoringOracle + ?Sized, R: Rng>(
    oracle: &O,
    mut dag: Dag,
    config: &HillClimbConfig,
    tabu: &mut TabuList,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<Climb> {
    let variables: Vec<usize> = (0..dag.node_count()).collect();
    let mut scores = vec![dag.score_unchecked(oracle)?];
    let mut applied = Vec::new();
    let mut cancelled = false;

    for iteration in 0..config.max_iter {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            cancelled = true;
            break;
        }

        let explore = choices(&variables, config.explore_num, rng);
        trace!(iteration, ?explore, "exploring");
        let Some((op, delta)) = best_operation(&dag, &explore, tabu, oracle, config.direction)?
        else {
            debug!(iteration, "no admissible operation");
            break;
        };
        if config.direction.gain(delta) < 0.0 {
            break;
        }

        debug!(iteration, operation = %op, delta, "applying best operation");
        dag.apply(op)?;
        tabu.record_applied(op);
        applied.push(op);
        let last = scores[scores.len() - 1];
        scores.push(last + delta);
    }

    let score = dag.score_unchecked(oracle)?;
    Ok(Climb {
        dag,
        score,
        history: scores,
        applied,
        cancelled,
    })
}

/// The non-tabu legal operation touching `explore` with the best gain.
///
/// Ties keep the first operation in the DAG's sorted enumeration.
pub(crate) fn best_operation<O: ScoringOracle + ?Sized>(
    dag: &Dag,
    explore: &[usize],
    tabu: &TabuList,
    oracle: &O,
    direction: Direction,
) -> Result<Option<(Operation, f64)>> {
    let mut best: Option<(Operation, f64)> = None;
    for op in dag.legal_operations(explore) {
        if tabu.contains(&op) {
            continue;
        }
        let delta = dag.score_delta(op, oracle)?;
        let better = match best {
            Some((_, b)) => direction.gain(delta) > direction.gain(b),
            None => true,
        };
        if better {
            best = Some((op, delta));
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{FnOracle, ParentSet};

    /// Rewards a → b and b → c, penalizes every other parent.
    fn chain_oracle() -> impl ScoringOracle {
        FnOracle::new(["a", "b", "c"], |v, p: &ParentSet| match (v, p.as_slice()) {
            (1, [0]) => 10.0,
            (2, [1]) => 10.0,
            (_, ps) => -5.0 * ps.len() as f64,
        })
    }

    #[test]
    fn test_best_operation_skips_tabu() {
        let oracle = chain_oracle();
        let dag = Dag::empty(Domain::new(["a", "b", "c"]).unwrap());
        let mut tabu = TabuList::new(None);

        let (op, delta) = best_operation(&dag, &[0, 1, 2], &tabu, &oracle, Direction::Maximize)
            .unwrap()
            .unwrap();
        assert_eq!(op, Operation::Add(0, 1));
        assert_eq!(delta, 10.0);

        tabu.push(Operation::Add(0, 1));
        let (op, _) = best_operation(&dag, &[0, 1, 2], &tabu, &oracle, Direction::Maximize)
            .unwrap()
            .unwrap();
        assert_eq!(op, Operation::Add(1, 2));
    }

    #[test]
    fn test_best_operation_minimize_picks_lowest_delta() {
        let oracle = chain_oracle();
        let dag = Dag::empty(Domain::new(["a", "b", "c"]).unwrap());
        let tabu = TabuList::new(None);
        let (_, delta) = best_operation(&dag, &[0, 1, 2], &tabu, &oracle, Direction::Minimize)
            .unwrap()
            .unwrap();
        assert_eq!(delta, -5.0);
    }

    #[test]
    fn test_climb_converges_to_chain() {
        let oracle = chain_oracle();
        let domain = Domain::new(["a", "b", "c"]).unwrap();
        let empty = Dag::empty(domain.clone());
        // A wide exploration sample keeps every variable in play each step.
        let config = HillClimbConfig::default()
            .with_restart(1)
            .with_max_iter(10)
            .with_explore_num(12)
            .with_seed(42);

        let result = HillClimb::run(&oracle, Some(&empty), &config).unwrap();
        let expected = Dag::from_edges(domain, [("a", "b"), ("b", "c")]).unwrap();
        assert_eq!(result.dag, expected);
        assert_eq!(result.score, 20.0);
        assert_eq!(result.history[0].first(), Some(&0.0));
        assert_eq!(result.history[0].last(), Some(&20.0));
    }

    #[test]
    fn test_history_non_decreasing_when_maximizing() {
        let oracle = chain_oracle();
        let config = HillClimbConfig::default()
            .with_restart(5)
            .with_max_iter(50)
            .with_explore_num(3)
            .with_num_parents(2)
            .with_seed(7);

        let result = HillClimb::run(&oracle, None, &config).unwrap();
        assert_eq!(result.history.len(), 5);
        for run in &result.history {
            for w in run.windows(2) {
                assert!(w[1] >= w[0], "score decreased: {} -> {}", w[0], w[1]);
            }
        }
    }

    #[test]
    fn test_best_restart_is_returned() {
        let oracle = chain_oracle();
        let config = HillClimbConfig::default()
            .with_restart(4)
            .with_max_iter(20)
            .with_seed(3);
        let result = HillClimb::run(&oracle, None, &config).unwrap();
        let max = result
            .restart_scores
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(result.score, max);
        assert_eq!(result.score, result.dag.score(&oracle).unwrap());
    }

    #[test]
    fn test_same_seed_same_result() {
        let oracle = chain_oracle();
        let config = HillClimbConfig::default().with_restart(3).with_seed(11);
        let a = HillClimb::run(&oracle, None, &config).unwrap();
        let b = HillClimb::run(&oracle, None, &config).unwrap();
        assert_eq!(a.dag, b.dag);
        assert_eq!(a.applied, b.applied);
    }

    #[test]
    fn test_cancellation() {
        let oracle = chain_oracle();
        let config = HillClimbConfig::default().with_restart(10).with_seed(42);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = HillClimb::run_with_cancel(&oracle, None, &config, Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.restart_scores.len(), 1);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_rejects_single_variable_domain() {
        let oracle = FnOracle::new(["only"], |_, _| 0.0);
        let res = HillClimb::run(&oracle, None, &HillClimbConfig::default());
        assert!(res.is_err());
    }

    #[test]
    fn test_rejects_initial_dag_over_other_domain() {
        let oracle = chain_oracle();
        let other = Dag::empty(Domain::new(["x", "y", "z"]).unwrap());
        let res = HillClimb::run(&oracle, Some(&other), &HillClimbConfig::default());
        assert!(res.is_err());
    }

    #[test]
    fn test_parallel_matches_best_single_run() {
        let oracle = chain_oracle();
        let config = HillClimbConfig::default()
            .with_restart(1)
            .with_max_iter(30)
            .with_explore_num(6)
            .with_seed(100);
        let parallel = HillClimb::run_parallel(&oracle, None, &config, 4).unwrap();

        let best_single = (0..4)
            .map(|i| {
                let c = config.clone().with_seed(100 + i);
                HillClimb::run(&oracle, None, &c).unwrap().score
            })
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(parallel.score, best_single);
    }
}
