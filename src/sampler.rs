// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple") - Degree and Neighbor Samplers

use rand::Rng;
use std::collections::HashSet;

use crate::binary_search::smallest_integer_satisfying;

// ---------------------------------------------------------------------------
// Degree sampler
// ---------------------------------------------------------------------------

/// Draw a degree from `cdf` by inverse-transform sampling.
pub fn sample_degree<R: Rng + ?Sized>(cdf: &[f64], rng: &mut R) -> u32 {
    let r: f64 = rng.gen();
    sample_degree_at(cdf, r)
}

/// Degree selected by the uniform draw `r` in `[0, 1)`.
///
/// Picks the first degree whose cumulative mass exceeds `r`. A draw landing
/// exactly on a threshold goes to the next degree that carries mass, so a
/// zero-probability degree is never returned.
pub fn sample_degree_at(cdf: &[f64], r: f64) -> u32 {
    debug_assert!(!cdf.is_empty(), "empty cdf");
    let last = cdf.len().saturating_sub(1);
    let index = smallest_integer_satisfying(0, cdf.len(), |i| cdf[i] > r).unwrap_or(last);
    index as u32 + 1
}

// ---------------------------------------------------------------------------
// Neighbor sampler
// ---------------------------------------------------------------------------

/// `k` distinct indices from `[0, n)`, uniform over all subsets of that size.
///
/// Floyd's algorithm: O(k) draws and memory regardless of `n`. `k` is
/// clamped to `[1, n]`; an empty domain yields an empty sample. Indices come
/// back in selection order.
pub fn sample_neighbors<R: Rng + ?Sized>(n: u32, k: u32, rng: &mut R) -> Vec<u32> {
    if n == 0 {
        return Vec::new();
    }
    let k = k.clamp(1, n);

    let mut chosen = HashSet::with_capacity(k as usize);
    let mut picks = Vec::with_capacity(k as usize);
    for j in (n - k)..n {
        let t = rng.gen_range(0..=j);
        let pick = if chosen.contains(&t) { j } else { t };
        chosen.insert(pick);
        picks.push(pick);
    }
    picks
}
