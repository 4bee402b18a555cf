// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple") - Peeling Decoder
//
// Repeatedly consumes a check whose remaining degree is exactly one to solve
// its last unknown variable, then decrements every other check covering that
// variable. The ripple is the set of checks currently at degree one. Decoding
// succeeds when every variable is solved and stalls when the ripple runs dry.
//
// No randomness enters here: the same graph always peels the same way.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::graph::Graph;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckState {
    /// Degree two or more, not in the ripple.
    Unprocessed,
    /// Degree exactly one, waiting in the ripple queue.
    Queued,
    /// Consumed to solve a variable.
    Processed,
    /// Dropped to degree zero while queued, because its last variable was
    /// solved through another check first.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableState {
    Unknown,
    Solved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PeelOutcome {
    /// Every variable was recovered.
    Success,
    /// The ripple emptied with `at` variables solved.
    Stall { at: u32 },
}

impl PeelOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn stall_at(&self) -> Option<u32> {
        match self {
            Self::Success => None,
            Self::Stall { at } => Some(*at),
        }
    }
}

/// Result of a single call to [`PeelingState::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Solved { check: u32, variable: u32 },
    /// Degree bookkeeping said one, yet every neighbor was already solved.
    Inconsistent { check: u32 },
    Finished(PeelOutcome),
}

// ---------------------------------------------------------------------------
// RippleSeries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RippleSample {
    pub solved: u32,
    pub ripple: u32,
}

/// Ripple size sampled before peeling and after every step. Append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RippleSeries(Vec<RippleSample>);

impl RippleSeries {
    fn push(&mut self, solved: u32, ripple: u32) {
        self.0.push(RippleSample { solved, ripple });
    }

    pub fn samples(&self) -> &[RippleSample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of peeling steps recorded after the initial sample.
    pub fn steps(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn initial_ripple(&self) -> u32 {
        self.0.first().map_or(0, |s| s.ripple)
    }

    pub fn max_ripple(&self) -> u32 {
        self.0.iter().map(|s| s.ripple).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// PeelingState
// ---------------------------------------------------------------------------

/// Mutable decoder state over a borrowed graph.
///
/// Callers may stop stepping at any point and drop the state.
#[derive(Debug, Clone)]
pub struct PeelingState<'g> {
    graph: &'g Graph,
    remaining: Vec<u32>,
    check_state: Vec<CheckState>,
    variables: Vec<VariableState>,
    queue: VecDeque<u32>,
    ripple_size: u32,
    solved_count: u32,
    series: RippleSeries,
    stale_entries: u32,
    inconsistent_checks: u32,
    outcome: Option<PeelOutcome>,
}

impl<'g> PeelingState<'g> {
    /// Seed the ripple with every check of initial degree one and record the
    /// first sample.
    pub fn new(graph: &'g Graph) -> Self {
        let num_checks = graph.num_checks();
        let remaining: Vec<u32> = (0..num_checks).map(|j| graph.initial_degree(j)).collect();

        let mut check_state = vec![CheckState::Unprocessed; num_checks as usize];
        let mut queue = VecDeque::new();
        for (j, &degree) in remaining.iter().enumerate() {
            if degree == 1 {
                check_state[j] = CheckState::Queued;
                queue.push_back(j as u32);
            }
        }

        let ripple_size = queue.len() as u32;
        let mut series = RippleSeries::default();
        series.push(0, ripple_size);

        Self {
            graph,
            remaining,
            check_state,
            variables: vec![VariableState::Unknown; graph.num_variables() as usize],
            queue,
            ripple_size,
            solved_count: 0,
            series,
            stale_entries: 0,
            inconsistent_checks: 0,
            outcome: None,
        }
    }

    /// Advance by one peeling step.
    ///
    /// Stale queue entries (checks that already fell to degree zero) are
    /// skipped within the same call. Once finished, keeps returning the
    /// same outcome.
    pub fn step(&mut self) -> Step {
        if let Some(outcome) = self.outcome {
            return Step::Finished(outcome);
        }
        let graph = self.graph;
        if self.solved_count == graph.num_variables() {
            return self.finish(PeelOutcome::Success);
        }

        let check = loop {
            match self.queue.pop_front() {
                None => {
                    tracing::trace!(solved = self.solved_count, "ripple exhausted");
                    return self.finish(PeelOutcome::Stall {
                        at: self.solved_count,
                    });
                }
                Some(j) if self.remaining[j as usize] == 1 => break j,
                Some(_) => self.stale_entries += 1,
            }
        };

        let unknown = graph
            .check(check)
            .iter()
            .copied()
            .find(|&v| self.variables[v as usize] == VariableState::Unknown);

        debug_assert!(
            unknown.is_some(),
            "degree bookkeeping out of sync: check {check} has no unknown neighbor"
        );
        let Some(variable) = unknown else {
            return self.inconsistent(check);
        };

        self.check_state[check as usize] = CheckState::Processed;
        self.variables[variable as usize] = VariableState::Solved;
        self.solved_count += 1;

        for &c in graph.checks_of(variable) {
            let old = self.remaining[c as usize];
            if old == 0 {
                continue;
            }
            self.remaining[c as usize] = old - 1;
            match old {
                1 => {
                    self.ripple_size -= 1;
                    let state = &mut self.check_state[c as usize];
                    if *state == CheckState::Queued {
                        *state = CheckState::Exhausted;
                    }
                }
                2 => {
                    self.ripple_size += 1;
                    self.check_state[c as usize] = CheckState::Queued;
                    self.queue.push_back(c);
                }
                _ => {}
            }
        }

        self.series.push(self.solved_count, self.ripple_size);
        Step::Solved { check, variable }
    }

    fn inconsistent(&mut self, check: u32) -> Step {
        tracing::warn!(check, "degree-one check has no unknown neighbor");
        self.inconsistent_checks += 1;
        self.remaining[check as usize] = 0;
        self.check_state[check as usize] = CheckState::Exhausted;
        self.ripple_size = self.ripple_size.saturating_sub(1);
        self.series.push(self.solved_count, self.ripple_size);
        Step::Inconsistent { check }
    }

    fn finish(&mut self, outcome: PeelOutcome) -> Step {
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }

    /// Step until success or stall.
    pub fn run(mut self) -> PeelingRun {
        let outcome = loop {
            if let Step::Finished(outcome) = self.step() {
                break outcome;
            }
        };

        PeelingRun {
            num_variables: self.graph.num_variables(),
            outcome,
            solved_count: self.solved_count,
            series: self.series,
            stale_entries: self.stale_entries,
            inconsistent_checks: self.inconsistent_checks,
        }
    }

    pub fn solved_count(&self) -> u32 {
        self.solved_count
    }

    pub fn ripple_size(&self) -> u32 {
        self.ripple_size
    }

    pub fn remaining_degree(&self, check: u32) -> u32 {
        self.remaining[check as usize]
    }

    pub fn check_state(&self, check: u32) -> CheckState {
        self.check_state[check as usize]
    }

    pub fn variable_state(&self, variable: u32) -> VariableState {
        self.variables[variable as usize]
    }

    pub fn series(&self) -> &RippleSeries {
        &self.series
    }

    pub fn outcome(&self) -> Option<PeelOutcome> {
        self.outcome
    }
}

/// Convenience for `PeelingState::new(graph).run()`.
pub fn peel(graph: &Graph) -> PeelingRun {
    PeelingState::new(graph).run()
}

// ---------------------------------------------------------------------------
// PeelingRun
// ---------------------------------------------------------------------------

/// Final state of a completed peeling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeelingRun {
    pub num_variables: u32,
    pub outcome: PeelOutcome,
    pub solved_count: u32,
    pub series: RippleSeries,
    /// Queue entries skipped because the check had already dropped to zero.
    pub stale_entries: u32,
    /// Times the defensive branch fired. Zero unless bookkeeping is broken.
    pub inconsistent_checks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{compute_distribution, DistributionFamily, DistributionSpec};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn graph(k: u32, checks: &[&[u32]]) -> Graph {
        Graph::from_checks(k, checks.iter().map(|c| c.to_vec()).collect())
            .expect("test: valid graph")
    }

    fn sample(solved: u32, ripple: u32) -> RippleSample {
        RippleSample { solved, ripple }
    }

    #[test]
    fn chain_of_four_succeeds() {
        let g = graph(4, &[&[0], &[1], &[0, 2], &[2, 3]]);
        let mut state = PeelingState::new(&g);
        assert_eq!(state.ripple_size(), 2);

        assert_eq!(state.step(), Step::Solved { check: 0, variable: 0 });
        assert_eq!(state.check_state(2), CheckState::Queued);
        assert_eq!(state.step(), Step::Solved { check: 1, variable: 1 });
        assert_eq!(state.step(), Step::Solved { check: 2, variable: 2 });
        assert_eq!(state.step(), Step::Solved { check: 3, variable: 3 });
        assert_eq!(state.solved_count(), 4);
        assert_eq!(state.outcome(), None);
        assert_eq!(state.step(), Step::Finished(PeelOutcome::Success));
        assert_eq!(state.outcome(), Some(PeelOutcome::Success));
        assert_eq!(state.series().len(), 5);
        assert_eq!(state.step(), Step::Finished(PeelOutcome::Success));

        for j in 0..4 {
            assert_eq!(state.check_state(j), CheckState::Processed);
            assert_eq!(state.remaining_degree(j), 0);
            assert_eq!(state.variable_state(j), VariableState::Solved);
        }

        let run = state.run();
        assert_eq!(run.outcome, PeelOutcome::Success);
        assert_eq!(run.solved_count, 4);
        assert_eq!(run.series.steps(), 4);
        assert_eq!(
            run.series.samples(),
            &[sample(0, 2), sample(1, 2), sample(2, 1), sample(3, 1), sample(4, 0)]
        );
        assert_eq!(run.stale_entries, 0);
        assert_eq!(run.inconsistent_checks, 0);
    }

    #[test]
    fn no_degree_one_check_stalls_immediately() {
        let g = graph(3, &[&[0, 1], &[1, 2]]);
        let run = peel(&g);
        assert_eq!(run.outcome, PeelOutcome::Stall { at: 0 });
        assert_eq!(run.outcome.stall_at(), Some(0));
        assert_eq!(run.solved_count, 0);
        assert_eq!(run.series.samples(), &[sample(0, 0)]);
    }

    #[test]
    fn no_checks_stalls_immediately() {
        let g = graph(2, &[]);
        assert_eq!(peel(&g).outcome, PeelOutcome::Stall { at: 0 });
    }

    #[test]
    fn duplicate_cover_leaves_stale_entry() {
        // Both checks cover v0; the second is queued but exhausted by the first.
        let g = graph(2, &[&[0], &[0], &[0, 1]]);
        let mut state = PeelingState::new(&g);
        assert_eq!(state.step(), Step::Solved { check: 0, variable: 0 });
        assert_eq!(state.check_state(1), CheckState::Exhausted);
        assert_eq!(state.remaining_degree(1), 0);

        let run = state.run();
        assert_eq!(run.outcome, PeelOutcome::Success);
        assert_eq!(run.stale_entries, 1);
        assert_eq!(run.inconsistent_checks, 0);
        assert_eq!(
            run.series.samples(),
            &[sample(0, 2), sample(1, 1), sample(2, 0)]
        );
    }

    #[test]
    fn partial_recovery_then_stall() {
        // v0 recovers, {v1, v2} never drops below two.
        let g = graph(3, &[&[0], &[0, 1, 2], &[1, 2]]);
        let run = peel(&g);
        assert_eq!(run.outcome, PeelOutcome::Stall { at: 1 });
        assert_eq!(run.series.samples(), &[sample(0, 1), sample(1, 0)]);
    }

    #[test]
    fn deterministic_on_a_fixed_graph() {
        let spec = DistributionSpec::new(DistributionFamily::FixedTable, 500)
            .expect("test: valid spec");
        let dist = compute_distribution(&spec);
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..10 {
            let g = Graph::build(500, 10, &dist, &mut rng);
            assert_eq!(peel(&g), peel(&g));
        }
    }

    #[test]
    fn sampled_graphs_never_hit_inconsistent_branch() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        for family in [
            DistributionFamily::Ideal,
            DistributionFamily::Robust { c: 0.05, delta: 0.05 },
            DistributionFamily::FixedTable,
        ] {
            let spec = DistributionSpec::new(family, 400).expect("test: valid spec");
            let dist = compute_distribution(&spec);
            for overhead in [0, 5, 20, 50] {
                let g = Graph::build(400, overhead, &dist, &mut rng);
                let run = peel(&g);
                assert_eq!(run.inconsistent_checks, 0);
                assert_eq!(run.series.steps() as u32, run.solved_count);
            }
        }
    }

    /// v0 solved through check 0 leaves check 1 queued at degree one; marking
    /// v1 solved behind the decoder's back leaves that check nothing to solve.
    fn desynced_state(g: &Graph) -> PeelingState<'_> {
        let mut state = PeelingState::new(g);
        assert_eq!(state.step(), Step::Solved { check: 0, variable: 0 });
        assert_eq!(state.check_state(1), CheckState::Queued);
        assert_eq!(state.ripple_size(), 1);
        state.variables[1] = VariableState::Solved;
        state
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "degree bookkeeping out of sync")]
    fn desynced_bookkeeping_panics_in_debug() {
        let g = graph(2, &[&[0], &[0, 1]]);
        let mut state = desynced_state(&g);
        state.step();
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn desynced_bookkeeping_exhausts_the_check() {
        let g = graph(2, &[&[0], &[0, 1]]);
        let mut state = desynced_state(&g);

        assert_eq!(state.step(), Step::Inconsistent { check: 1 });
        assert_eq!(state.inconsistent_checks, 1);
        assert_eq!(state.ripple_size(), 0);
        assert_eq!(state.remaining_degree(1), 0);
        assert_eq!(state.check_state(1), CheckState::Exhausted);
        assert_eq!(state.solved_count(), 1);
        assert_eq!(
            state.series().samples(),
            &[sample(0, 1), sample(1, 1), sample(1, 0)]
        );

        let run = state.run();
        assert_eq!(run.outcome, PeelOutcome::Stall { at: 1 });
        assert_eq!(run.inconsistent_checks, 1);
    }

    fn arb_graph() -> impl Strategy<Value = Graph> {
        (1u32..40).prop_flat_map(|k| {
            let width = k.min(6) as usize;
            prop::collection::vec(prop::collection::btree_set(0..k, 1..=width), 0..60).prop_map(
                move |checks| {
                    let checks = checks.into_iter().map(|c| c.into_iter().collect()).collect();
                    Graph::from_checks(k, checks).expect("test: strategy builds valid graphs")
                },
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn prop_ripple_counts_degree_one_checks(g in arb_graph()) {
            let mut state = PeelingState::new(&g);
            loop {
                let degree_one = (0..g.num_checks())
                    .filter(|&j| state.remaining_degree(j) == 1)
                    .count() as u32;
                prop_assert_eq!(state.ripple_size(), degree_one);
                for j in 0..g.num_checks() {
                    prop_assert!(state.remaining_degree(j) <= g.initial_degree(j));
                }
                if let Step::Finished(_) = state.step() {
                    break;
                }
            }
        }

        #[test]
        fn prop_series_is_monotone_and_bounded(g in arb_graph()) {
            let run = peel(&g);
            let samples = run.series.samples();
            prop_assert!(samples.windows(2).all(|w| w[0].solved <= w[1].solved));
            prop_assert!(samples.iter().all(|s| s.solved <= g.num_variables()));
            prop_assert_eq!(run.inconsistent_checks, 0);
            match run.outcome {
                PeelOutcome::Success => prop_assert_eq!(run.solved_count, g.num_variables()),
                PeelOutcome::Stall { at } => {
                    prop_assert!(at < g.num_variables());
                    prop_assert_eq!(at, run.solved_count);
                }
            }
        }

        #[test]
        fn prop_peeling_is_deterministic(g in arb_graph()) {
            prop_assert_eq!(peel(&g), peel(&g));
        }
    }
}
