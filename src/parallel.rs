//! Fan-out of independent search instances.
//!
//! Each task runs a complete search with its own seed and shares no mutable
//! state with the others. Results are reduced by keeping the best score; a
//! single failed task fails the whole reduction.

use crate::error::{BnslError, Result};
use crate::oracle::Direction;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs `task(i)` for `i in 0..tasks` and returns the output with the best
/// score under `direction`. Ties go to the lowest task index.
///
/// Uses rayon when the `parallel` feature is enabled, otherwise runs the
/// tasks one after another.
pub fn best_of<T, F>(tasks: usize, direction: Direction, task: F) -> Result<T>
where
    T: Send,
    F: Fn(usize) -> Result<(T, f64)> + Sync + Send,
{
    if tasks == 0 {
        return Err(BnslError::InvalidConfig(
            "at least one worker is required".into(),
        ));
    }

    #[cfg(feature = "parallel")]
    let results: Vec<(T, f64)> = (0..tasks)
        .into_par_iter()
        .map(&task)
        .collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let results: Vec<(T, f64)> = (0..tasks).map(&task).collect::<Result<Vec<_>>>()?;

    let mut best: Option<(T, f64)> = None;
    for (value, score) in results {
        let replace = match &best {
            Some((_, b)) => direction.is_better(score, *b),
            None => true,
        };
        if replace {
            best = Some((value, score));
        }
    }
    best.map(|(value, _)| value)
        .ok_or_else(|| BnslError::InvalidConfig("no task produced a result".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_max_and_min() {
        let scores = [3.0, 9.0, 1.0, 9.0];
        let best = best_of(4, Direction::Maximize, |i| Ok((i, scores[i]))).unwrap();
        assert_eq!(best, 1, "tie resolves to the lowest index");
        let best = best_of(4, Direction::Minimize, |i| Ok((i, scores[i]))).unwrap();
        assert_eq!(best, 2);
    }

    #[test]
    fn test_any_failure_fails_reduction() {
        let res = best_of(4, Direction::Maximize, |i| {
            if i == 2 {
                Err(BnslError::InvalidOracle("boom".into()))
            } else {
                Ok((i, i as f64))
            }
        });
        assert!(matches!(res, Err(BnslError::InvalidOracle(_))));
    }

    #[test]
    fn test_zero_tasks_rejected() {
        let res = best_of(0, Direction::Maximize, |i| Ok((i, 0.0)));
        assert!(matches!(res, Err(BnslError::InvalidConfig(_))));
    }
}
