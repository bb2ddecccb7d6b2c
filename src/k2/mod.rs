//! K2: greedy parent selection under a fixed variable order.

mod config;
mod runner;

pub use config::K2Config;
pub use runner::{K2Result, K2};
