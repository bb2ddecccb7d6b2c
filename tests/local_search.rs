mod common;

use bn_structure::graph::Operation;
use bn_structure::hill_climb::{HillClimb, HillClimbConfig};
use bn_structure::oracle::{Direction, FnOracle, ParentSet};

/// Asserts that no undone removal or flip is applied again later in the
/// same restart.
fn assert_no_tabu_reversal(applied: &[Operation]) {
    for (i, op) in applied.iter().enumerate() {
        if matches!(op, Operation::Remove(..) | Operation::Flip(..)) {
            let inverse = op.inverse();
            assert!(
                !applied[i + 1..].contains(&inverse),
                "{op} at step {i} was reversed later in {applied:?}"
            );
        }
    }
}

#[test]
fn test_tabu_blocks_reversals() {
    common::init_tracing();
    let oracle = common::hashed_cost(6, 3);
    for direction in [Direction::Maximize, Direction::Minimize] {
        let config = HillClimbConfig::default()
            .with_restart(8)
            .with_explore_num(6)
            .with_num_parents(3)
            .with_direction(direction)
            .with_seed(21);
        let result = HillClimb::run(&oracle, None, &config).unwrap();
        assert_eq!(result.applied.len(), 8);
        for restart in &result.applied {
            assert_no_tabu_reversal(restart);
        }
    }
}

#[test]
fn test_running_score_monotone_per_restart() {
    let oracle = common::hashed_cost(5, 8);
    let config = HillClimbConfig::default()
        .with_restart(6)
        .with_explore_num(3)
        .with_seed(2);
    let result = HillClimb::run(&oracle, None, &config).unwrap();
    for run in &result.history {
        for w in run.windows(2) {
            assert!(w[1] >= w[0] - 1e-12);
        }
    }

    let config = config.with_direction(Direction::Minimize);
    let result = HillClimb::run(&oracle, None, &config).unwrap();
    for run in &result.history {
        for w in run.windows(2) {
            assert!(w[1] <= w[0] + 1e-12);
        }
    }
}

#[test]
fn test_running_score_matches_rescoring() {
    let oracle = common::hashed_cost(5, 4);
    let config = HillClimbConfig::default().with_restart(1).with_seed(9);
    let result = HillClimb::run(&oracle, None, &config).unwrap();
    let last = *result.history[0].last().unwrap();
    assert!((last - result.score).abs() < 1e-9);
}

#[test]
fn test_oversized_exploration_only_warns() {
    common::init_tracing();
    let oracle = FnOracle::new(["a", "b"], |v, p: &ParentSet| {
        if v == 1 && p.len() == 1 { 1.0 } else { 0.0 }
    });
    let config = HillClimbConfig::default().with_explore_num(50).with_seed(1);
    let result = HillClimb::run(&oracle, None, &config).unwrap();
    assert_eq!(result.score, 1.0);
}
