//! Graph types for structure learning.
//!
//! - [`Domain`]: the fixed, named variable set
//! - [`Dag`]: acyclicity-enforcing wrapper over a `petgraph` container
//! - [`Operation`]: single-edge moves used by the local searches
//! - [`acyclicity`]: matrix-exponential acyclicity measure for genomes

pub mod acyclicity;
mod dag;
mod domain;
mod generate;
mod operation;

pub use dag::{Dag, ScoreDetail, StructuralDistance};
pub use domain::Domain;
pub use operation::Operation;
