//! Population state and the per-generation operators.
//!
//! One generation:
//! 1. **Selection**: keep half the population, sampled without replacement
//!    with weight `N - (rank + 1)` (rank 0 is the best genome)
//! 2. **Crossover**: each retained genome may pair with a random retained
//!    mate; the child takes every gene uniformly from one of the two parents
//!    and is discarded unless it passes the acyclicity test
//! 3. **Regeneration**: random DAGs refill the population to its target size

use rand::Rng;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::GaConfig;
use super::types::Genome;
use crate::error::{BnslError, Result};
use crate::graph::acyclicity::is_acyclic_genome;
use crate::graph::{Dag, Domain};
use crate::oracle::{Direction, ScoringOracle};
use crate::random::weighted_sample_without_replacement;

/// Counts from one call to [`Population::evolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Genomes retained by selection.
    pub selected: usize,
    /// Children that passed the acyclicity test.
    pub children: usize,
    /// Children discarded as cyclic.
    pub rejected: usize,
    /// Random genomes added to restore the population size.
    pub regenerated: usize,
}

/// A fixed-size, best-first ordered set of genomes.
#[derive(Debug, Clone)]
pub struct Population {
    domain: Domain,
    direction: Direction,
    members: Vec<Genome>,
}

impl Population {
    /// Seeds a population of `config.population_size` genomes: `initial`
    /// (if given) followed by random DAGs.
    pub fn seed<O: ScoringOracle + ?Sized, R: Rng>(
        domain: Domain,
        initial: Option<&Dag>,
        oracle: &O,
        config: &GaConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let mut dags: Vec<Dag> = initial.into_iter().cloned().collect();
        while dags.len() < config.population_size {
            dags.push(Dag::random(domain.clone(), config.num_parents, rng));
        }
        let mut population = Self {
            domain,
            direction: config.direction,
            members: score_all(dags, oracle, config.parallel)?,
        };
        population.sort();
        Ok(population)
    }

    /// Members, best first.
    pub fn members(&self) -> &[Genome] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The best-scoring member.
    pub fn best(&self) -> Option<&Genome> {
        self.members.first()
    }

    /// Runs one generation in place. The population size is unchanged.
    pub fn evolve<O: ScoringOracle + ?Sized, R: Rng>(
        &mut self,
        oracle: &O,
        config: &GaConfig,
        rng: &mut R,
    ) -> Result<GenerationStats> {
        let target = self.members.len();
        let n = self.domain.len();

        // Selection
        let weights: Vec<f64> = (0..target).map(|i| (target - (i + 1)) as f64).collect();
        let keep = (target / 2).max(1);
        let picked = weighted_sample_without_replacement(&weights, keep, rng);
        let selected: Vec<Genome> = picked.iter().map(|&i| self.members[i].clone()).collect();

        // Crossover
        let mut fresh: Vec<Dag> = Vec::with_capacity(target);
        let mut rejected = 0;
        for parent in &selected {
            if rng.random::<f64>() >= config.crossover_rate {
                continue;
            }
            let mate = &selected[rng.random_range(0..selected.len())];
            let genes: Vec<u8> = parent
                .genes()
                .iter()
                .zip(mate.genes())
                .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
                .collect();

            if !is_acyclic_genome(&genes, n, config.acyclicity_threshold) {
                rejected += 1;
                continue;
            }
            // Long cycles can fall under the threshold; decoding is exact.
            match Dag::from_genome(self.domain.clone(), &genes) {
                Ok(child) => fresh.push(child),
                Err(BnslError::InvalidStructure { .. }) => {
                    trace!("child below threshold still cyclic");
                    rejected += 1;
                }
                Err(e) => return Err(e),
            }
        }
        let children = fresh.len();

        // Regeneration
        let selected_count = selected.len();
        let regenerated = target.saturating_sub(selected_count + children);
        for _ in 0..regenerated {
            fresh.push(Dag::random(self.domain.clone(), config.num_parents, rng));
        }

        let mut next = selected;
        next.extend(score_all(fresh, oracle, config.parallel)?);
        self.members = next;
        self.sort();
        self.members.truncate(target);

        Ok(GenerationStats {
            selected: selected_count,
            children,
            rejected,
            regenerated,
        })
    }

    fn sort(&mut self) {
        let direction = self.direction;
        self.members.sort_by(|a, b| direction.best_first(a.score(), b.score()));
    }
}

/// Scores a batch of DAGs, in parallel when enabled.
fn score_all<O: ScoringOracle + ?Sized>(
    dags: Vec<Dag>,
    oracle: &O,
    parallel: bool,
) -> Result<Vec<Genome>> {
    if parallel {
        return score_parallel(dags, oracle);
    }
    dags.into_iter().map(|dag| Genome::new(dag, oracle)).collect()
}

#[cfg(feature = "parallel")]
fn score_parallel<O: ScoringOracle + ?Sized>(dags: Vec<Dag>, oracle: &O) -> Result<Vec<Genome>> {
    dags.into_par_iter()
        .map(|dag| Genome::new(dag, oracle))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn score_parallel<O: ScoringOracle + ?Sized>(dags: Vec<Dag>, oracle: &O) -> Result<Vec<Genome>> {
    dags.into_iter().map(|dag| Genome::new(dag, oracle)).collect()
}
