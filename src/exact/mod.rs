//! Exact structure search over the order-graph lattice.
//!
//! Finds a DAG minimizing the sum of local costs by shortest-path search:
//!
//! ```text
//! OrderGraph
//!     |
//! generate lattice
//!     |                      |- ParentGraph per variable
//! add cost on edges ---------|- add cost on parent graph
//!     |                      |- optimal parents within U
//! shortest path (Dijkstra)
//!     |
//! reconstruct DAG
//! ```
//!
//! Runtime and memory are exponential in the variable count (2^n order
//! states, 2^(n-1) parent states per variable), so the search is capped at
//! [`MAX_EXACT_VARIABLES`].

mod config;
mod order_graph;
mod parent_graph;
mod runner;
mod varset;

pub use config::ExactConfig;
pub use order_graph::{OrderEdge, OrderGraph, MAX_EXACT_VARIABLES};
pub use parent_graph::{ParentEdge, ParentGraph};
pub use runner::{ExactResult, ExactSearch};
pub use varset::VarSet;
