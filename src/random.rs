//! Seedable random sources and small sampling helpers.
//!
//! Every stochastic step in the searches draws from an RNG that is passed
//! in explicitly, so a fixed seed reproduces a run exactly.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Creates a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates an RNG from `seed`, or from fresh entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Samples `k` items uniformly **with** replacement.
///
/// Returns an empty vector when `items` is empty.
pub fn choices<T: Copy, R: Rng>(items: &[T], k: usize, rng: &mut R) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    (0..k)
        .map(|_| items[rng.random_range(0..items.len())])
        .collect()
}

/// Shuffles a slice in place (Fisher-Yates).
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Samples `k` distinct indices in `0..weights.len()` without replacement,
/// each draw proportional to the remaining weights.
///
/// When every remaining weight is zero the draw falls back to uniform over
/// the remaining indices. `k` is clamped to the number of items.
pub fn weighted_sample_without_replacement<R: Rng>(
    weights: &[f64],
    k: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut remaining: Vec<(usize, f64)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| (i, if w.is_finite() && w > 0.0 { w } else { 0.0 }))
        .collect();
    let k = k.min(remaining.len());
    let mut picked = Vec::with_capacity(k);

    for _ in 0..k {
        let total: f64 = remaining.iter().map(|&(_, w)| w).sum();
        let pos = if total > 0.0 {
            let threshold = rng.random_range(0.0..total);
            let mut cumulative = 0.0;
            let mut chosen = remaining.len() - 1; // floating-point fallback
            for (pos, &(_, w)) in remaining.iter().enumerate() {
                cumulative += w;
                if w > 0.0 && cumulative > threshold {
                    chosen = pos;
                    break;
                }
            }
            chosen
        } else {
            rng.random_range(0..remaining.len())
        };
        picked.push(remaining.swap_remove(pos).0);
    }

    picked
}
