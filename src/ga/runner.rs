//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the complete evolutionary process:
//! seeding → selection → crossover → regeneration → repeat, tracking the
//! best genome ever seen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use super::config::GaConfig;
use super::population::Population;
use super::types::Genome;
use crate::error::{BnslError, Result};
use crate::graph::{Dag, Domain};
use crate::oracle::{ensure_compatible, ScoringOracle};
use crate::random::rng_from_seed;

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best DAG found during the entire run.
    pub dag: Dag,

    /// Score of `dag`.
    pub score: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run stopped because the best score stalled for
    /// `patience` generations.
    pub stagnated: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Children discarded by the acyclicity test over the whole run.
    pub rejected_children: usize,

    /// Best score after seeding and after each generation.
    pub history: Vec<f64>,
}

/// Executes the genetic structure search.
///
/// # Usage
///
/// ```ignore
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&oracle, None, &config)?;
/// println!("best score: {}", result.score);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA, seeding the RNG from `config.seed`.
    pub fn run<O: ScoringOracle + ?Sized>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &GaConfig,
    ) -> Result<GaResult> {
        Self::run_with_cancel(oracle, initial, config, None)
    }

    /// Runs the GA with a caller-supplied random source.
    pub fn run_with_rng<O: ScoringOracle + ?Sized, R: Rng>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &GaConfig,
        rng: &mut R,
    ) -> Result<GaResult> {
        evolve(oracle, initial, config, rng, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// The flag is checked before each generation; when set, the best
    /// genome found so far is returned with `cancelled = true`.
    pub fn run_with_cancel<O: ScoringOracle + ?Sized>(
        oracle: &O,
        initial: Option<&Dag>,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        let mut rng = rng_from_seed(config.seed);
        evolve(oracle, initial, config, &mut rng, cancel.as_deref())
    }
}

fn evolve<O: ScoringOracle + ?Sized, R: Rng>(
    oracle: &O,
    initial: Option<&Dag>,
    config: &GaConfig,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<GaResult> {
    config.validate()?;
    let domain = Domain::new(oracle.variables().iter().cloned())?;
    domain.ensure_searchable()?;
    if let Some(dag) = initial {
        ensure_compatible(oracle, dag.domain().names())?;
    }

    let mut population = Population::seed(domain, initial, oracle, config, rng)?;
    let mut god: Genome = population
        .best()
        .cloned()
        .ok_or_else(|| BnslError::InvalidConfig("population is empty".into()))?;
    let mut history = Vec::with_capacity(config.max_generations + 1);
    history.push(god.score());

    let mut generations = 0;
    let mut stall = 0;
    let mut stagnated = false;
    let mut cancelled = false;
    let mut rejected_children = 0;

    for gen in 0..config.max_generations {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            cancelled = true;
            break;
        }

        let stats = population.evolve(oracle, config, rng)?;
        rejected_children += stats.rejected;
        generations += 1;

        match population.best() {
            Some(best) if config.direction.is_better(best.score(), god.score()) => {
                god = best.clone();
                stall = 0;
            }
            _ => stall += 1,
        }
        history.push(god.score());
        debug!(
            generation = gen + 1,
            best = god.score(),
            children = stats.children,
            rejected = stats.rejected,
            "generation finished"
        );

        if config.patience > 0 && stall >= config.patience {
            stagnated = true;
            break;
        }
    }

    info!(
        generations,
        score = god.score(),
        stagnated,
        cancelled,
        "genetic search finished"
    );

    let score = god.score();
    Ok(GaResult {
        dag: god.into_dag(),
        score,
        generations,
        stagnated,
        cancelled,
        rejected_children,
        history,
    })
}
