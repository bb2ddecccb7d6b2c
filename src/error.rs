//! Crate-wide error type.

use thiserror::Error;

/// Errors raised by structure construction and the search strategies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BnslError {
    /// An edge insertion (or construction from an edge list) would have
    /// produced a directed cycle. `cycle` lists the edges of the loop,
    /// starting with the rejected edge.
    #[error("cycles are not allowed in a DAG; edges on the loop: {}", format_cycle(.cycle))]
    InvalidStructure { cycle: Vec<(String, String)> },

    /// Two DAGs over different variable domains were compared.
    #[error("cannot compare DAGs over different variable domains")]
    IncomparableStructure,

    /// A lattice result was requested before the step producing it ran.
    #[error("not ready: {0}")]
    NotReady(&'static str),

    /// The scoring oracle does not honor the scoring contract.
    #[error("invalid scoring oracle: {0}")]
    InvalidOracle(String),

    /// An edge or lookup referenced a name outside the domain.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// The variable domain cannot support a search.
    #[error("degenerate variable domain: {0}")]
    DegenerateDomain(String),

    /// Exact search was requested over more variables than it can handle.
    #[error("exact search supports at most {max} variables, got {count}")]
    TooManyVariables { count: usize, max: usize },

    /// A configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BnslError>;

fn format_cycle(cycle: &[(String, String)]) -> String {
    cycle
        .iter()
        .map(|(u, v)| format!("({u},{v})"))
        .collect::<Vec<_>>()
        .join(" ")
}
