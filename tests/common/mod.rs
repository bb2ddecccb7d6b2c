//! Toy oracles shared by the integration tests.

#![allow(dead_code)]

use bn_structure::oracle::{FnOracle, ParentSet, ScoringOracle};

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("x{i}")).collect()
}

/// Score over {a, b, c} whose unique maximum is the chain a → b → c.
///
/// `b | {a}` and `c | {b}` earn 10; every other parent costs 5.
pub fn chain_score() -> impl ScoringOracle {
    FnOracle::new(["a", "b", "c"], |v, p: &ParentSet| match (v, p.as_slice()) {
        (1, [0]) | (2, [1]) => 10.0,
        (_, ps) => -5.0 * ps.len() as f64,
    })
}

/// The negation of [`chain_score`], for the cost-minimizing exact search.
pub fn chain_cost() -> impl ScoringOracle {
    FnOracle::new(["a", "b", "c"], |v, p: &ParentSet| match (v, p.as_slice()) {
        (1, [0]) | (2, [1]) => -10.0,
        (_, ps) => 5.0 * ps.len() as f64,
    })
}

/// Deterministic pseudo-random local costs, distinct per (variable, set).
pub fn hashed_cost(n: usize, seed: u64) -> impl ScoringOracle {
    FnOracle::new(names(n), move |v, p: &ParentSet| {
        let bits = p.as_slice().iter().fold(0u64, |acc, &q| acc | (1 << q));
        let mut h = seed ^ ((v as u64) << 32) ^ bits;
        h = h.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        h ^= h >> 29;
        h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h ^= h >> 32;
        // Spread over [-4, 4) plus a mild per-parent penalty.
        (h % 8000) as f64 / 1000.0 - 4.0 + 0.5 * p.len() as f64
    })
}
