//! Score-based Bayesian network structure learning.
//!
//! Searches for the directed acyclic graph (DAG) over a fixed variable set
//! that optimizes a decomposable score, supplied through the
//! [`ScoringOracle`](oracle::ScoringOracle) trait:
//!
//! - **Exact search**: shortest path over the order-graph lattice, with a
//!   parent-graph lattice per variable. Globally optimal, exponential in the
//!   variable count.
//! - **Hill climbing**: greedy single-edge moves with a tabu list, random
//!   restarts, and a parallel-restart mode.
//! - **Simulated Annealing (SA)**: random single-edge moves with
//!   temperature-controlled acceptance of worsening moves.
//! - **Genetic search (GA)**: rank selection and gene-wise crossover over
//!   flattened adjacency genomes, filtered by a matrix-exponential
//!   acyclicity test.
//! - **K2**: greedy parent selection under a fixed variable order.
//!
//! # Sign convention
//!
//! The exact search treats local scores as costs and minimizes them. Every
//! other search takes a [`Direction`](oracle::Direction), defaulting to
//! maximization.
//!
//! # Example
//!
//! ```
//! use bn_structure::exact::{ExactConfig, ExactSearch};
//! use bn_structure::hill_climb::{HillClimb, HillClimbConfig};
//! use bn_structure::oracle::{Direction, FnOracle, ParentSet};
//!
//! // Cost model preferring the chain a → b → c.
//! let oracle = FnOracle::new(["a", "b", "c"], |v, p: &ParentSet| match (v, p.as_slice()) {
//!     (1, [0]) | (2, [1]) => -10.0,
//!     (_, ps) => 5.0 * ps.len() as f64,
//! });
//!
//! let exact = ExactSearch::run(&oracle, &ExactConfig::default()).unwrap();
//! assert_eq!(exact.dag.edges().len(), 2);
//!
//! let config = HillClimbConfig::default()
//!     .with_direction(Direction::Minimize)
//!     .with_restart(3)
//!     .with_seed(42);
//! let local = HillClimb::run(&oracle, None, &config).unwrap();
//! assert!(local.score >= exact.cost);
//! ```

pub mod error;
pub mod exact;
pub mod ga;
pub mod graph;
pub mod hill_climb;
pub mod k2;
pub mod oracle;
pub mod parallel;
pub mod random;
pub mod sa;

pub use error::{BnslError, Result};
pub use graph::{Dag, Domain, Operation};
pub use oracle::{Direction, ParentSet, ScoringOracle};
