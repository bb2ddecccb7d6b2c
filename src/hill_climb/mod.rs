//! Greedy hill climbing with tabu avoidance.
//!
//! Repeatedly applies the single-edge operation (add, remove, flip) with the
//! best score delta among those touching a random sample of variables, until
//! no operation improves the score. Undoing a removal or flip is made tabu
//! for the rest of the restart.
//!
//! # References
//!
//! - Heckerman, Geiger & Chickering (1995), "Learning Bayesian Networks:
//!   The Combination of Knowledge and Statistical Data"
//! - Glover (1989), "Tabu Search, Part I"

mod config;
mod runner;
mod tabu;

pub use config::HillClimbConfig;
pub use runner::{HillClimb, HillClimbResult};
pub use tabu::TabuList;
