//! SA execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info, trace};

use super::config::SaConfig;
use crate::error::Result;
use crate::graph::{Dag, Domain};
use crate::oracle::{ensure_compatible, ScoringOracle};
use crate::random::rng_from_seed;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The best DAG visited.
    pub dag: Dag,

    /// Score of `dag`.
    pub score: f64,

    /// The DAG held when the run stopped.
    pub last: Dag,

    /// Score of the current DAG after each step (the first entry is the
    /// starting score).
    pub history: Vec<f64>,

    /// Steps taken.
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of accepted moves that worsened the score.
    pub uphill_moves: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,
}

/// Stochastic local search over single-edge operations.
///
/// Each step samples one legal operation uniformly. Non-worsening moves are
/// always applied; worsening moves are applied with probability
/// `exp(gain / T)`, where `gain` is the delta signed so that positive means
/// better. There is no tabu list.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA, seeding the RNG from `config.seed`.
    pub fn run<O: ScoringOracle + ?Sized>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &SaConfig,
    ) -> Result<SaResult> {
        Self::run_with_cancel(oracle, initial, config, None)
    }

    /// Runs SA with a caller-supplied random source.
    pub fn run_with_rng<O: ScoringOracle + ?Sized, R: Rng>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult> {
        anneal(oracle, initial, config, rng, None)
    }

    /// Runs SA with an optional cancellation flag, checked once per step.
    pub fn run_with_cancel<O: ScoringOracle + ?Sized>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult> {
        let mut rng = rng_from_seed(config.seed);
        anneal(oracle, initial, config, &mut rng, cancel.as_deref())
    }
}

fn anneal<O: ScoringOracle + ?Sized, R: Rng>(
    oracle: &O,
    initial: Option<&Dag>,
    config: &SaConfig,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<SaResult> {
    config.validate()?;
    let domain = Domain::new(oracle.variables().iter().cloned())?;
    domain.ensure_searchable()?;

    let mut current = match initial {
        Some(dag) => {
            ensure_compatible(oracle, dag.domain().names())?;
            dag.clone()
        }
        None if config.random_start => Dag::random(domain, config.num_parents, rng),
        None => Dag::empty(domain),
    };
    let mut current_score = current.score_unchecked(oracle)?;
    let mut best = current.clone();
    let mut best_score = current_score;

    let direction = config.direction;
    let mut temperature = config.initial_temperature;
    let mut history = Vec::with_capacity(config.num_iterations + 1);
    history.push(current_score);
    let mut iterations = 0;
    let mut accepted_moves = 0;
    let mut uphill_moves = 0;
    let mut cancelled = false;

    for step in 0..config.num_iterations {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            cancelled = true;
            break;
        }

        let ops = current.all_legal_operations();
        let Some(&op) = ops.choose(rng) else {
            debug!(step, "no legal operation");
            break;
        };
        let delta = current.score_delta(op, oracle)?;
        let gain = direction.gain(delta);

        // Plateau moves are skipped.
        let accept =
            gain > 0.0 || (gain < 0.0 && rng.random::<f64>() < (gain / temperature).exp());
        if accept {
            current.apply(op)?;
            current_score += delta;
            accepted_moves += 1;
            if gain < 0.0 {
                uphill_moves += 1;
            }
            trace!(step, operation = %op, delta, temperature, "accepted");
            if direction.is_better(current_score, best_score) {
                best = current.clone();
                best_score = current_score;
            }
        }

        history.push(current_score);
        iterations += 1;
        temperature = config.cooling.next(temperature, step, config);
    }

    info!(
        iterations,
        accepted_moves,
        best_score,
        final_temperature = temperature,
        "simulated annealing finished"
    );

    // Running sums drift; report the exact score of the best DAG.
    let score = best.score_unchecked(oracle)?;
    Ok(SaResult {
        dag: best,
        score,
        last: current,
        history,
        iterations,
        accepted_moves,
        uphill_moves,
        final_temperature: temperature,
        cancelled,
    })
}
