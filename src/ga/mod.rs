//! Genetic search over flattened adjacency genomes.
//!
//! Each DAG is encoded as its row-major 0/1 adjacency vector. A generation
//! keeps half the population by rank-weighted sampling, breeds children by
//! uniform gene-wise crossover, discards children whose adjacency fails the
//! `tr(e^A) - n` acyclicity test, and refills with random DAGs in place of
//! mutation.
//!
//! # References
//!
//! - Larrañaga et al. (1996), "Structure Learning of Bayesian Networks by
//!   Genetic Algorithms"
//! - Zheng et al. (2018), "DAGs with NO TEARS: Continuous Optimization for
//!   Structure Learning"

mod config;
mod population;
mod runner;
mod types;

pub use config::GaConfig;
pub use population::{GenerationStats, Population};
pub use runner::{GaResult, GaRunner};
pub use types::Genome;
