//! Simulated Annealing (SA) over DAG structures.
//!
//! Shares the operation universe of [`hill_climb`](crate::hill_climb) but
//! samples one legal operation per step instead of the best, and accepts
//! worsening moves with a probability that shrinks as the temperature cools.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Lundy & Mees (1986), "Convergence of an Annealing Algorithm"

mod config;
mod runner;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::{SaResult, SaRunner};
