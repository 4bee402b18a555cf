// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple") - Binary Search

/// Smallest integer in `[from, to)` satisfying a monotone `condition`.
pub fn smallest_integer_satisfying(
    from: usize,
    to: usize,
    condition: impl Fn(usize) -> bool,
) -> Option<usize> {
    let mut lower = from;
    let mut upper = to;

    while lower < upper {
        let pivot = lower + (upper - lower) / 2;

        if condition(pivot) {
            // The answer lies in [lower, pivot].
            upper = pivot;
        } else {
            // The answer, if any, lies in [pivot + 1, upper].
            lower = pivot + 1;
        }
    }

    (upper < to).then_some(upper)
}
