// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple") - Simulation Session

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::distribution::{compute_distribution, DegreeDistribution};
use crate::error::ParamError;
use crate::graph::Graph;
use crate::params::SimulationParams;
use crate::peeling::PeelingState;
use crate::report::{degree_bars, DegreeBar, SimulationReport, StatusLine};

// ─── SimulationResult ────────────────────────────────────────────────────────

/// Everything the renderer needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub distribution: DegreeDistribution,
    pub bars: Vec<DegreeBar>,
    pub report: SimulationReport,
}

impl SimulationResult {
    pub fn status_line(&self) -> String {
        StatusLine {
            distribution: &self.distribution,
            report: &self.report,
        }
        .to_string()
    }
}

// ─── RippleSimulation ────────────────────────────────────────────────────────

/// Caller-owned session: current parameters, their distribution, the random
/// stream and the last result.
#[wasm_bindgen]
pub struct RippleSimulation {
    pub(crate) params: SimulationParams,
    pub(crate) distribution: DegreeDistribution,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) last: Option<SimulationResult>,
}

impl RippleSimulation {
    /// Build a session from clamped `params` with a reproducible stream.
    ///
    /// # Errors
    ///
    /// [`ParamError::NonFinite`] if a shape parameter is NaN or infinite.
    pub fn with_params(params: SimulationParams, seed: u64) -> Result<Self, ParamError> {
        let params = params.clamped()?;
        let distribution = compute_distribution(&params.distribution_spec()?);
        Ok(Self {
            params,
            distribution,
            rng: ChaCha8Rng::seed_from_u64(seed),
            last: None,
        })
    }

    /// Same as [`with_params`](Self::with_params), seeded from OS entropy.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_entropy(params: SimulationParams) -> Result<Self, ParamError> {
        let mut session = Self::with_params(params, 0)?;
        session.rng = ChaCha8Rng::from_entropy();
        Ok(session)
    }

    /// Replace the parameters and run once with them.
    ///
    /// Out-of-range values are clamped. On error nothing changes.
    pub fn set_parameters(&mut self, params: SimulationParams) -> Result<(), ParamError> {
        let params = params.clamped()?;
        let distribution = compute_distribution(&params.distribution_spec()?);
        self.params = params;
        self.distribution = distribution;
        self.run_current();
        Ok(())
    }

    /// Recompute the distribution from the current parameters and run on a
    /// freshly sampled graph.
    pub fn run_simulation(&mut self) -> SimulationResult {
        // Parameters were validated when they were stored.
        match self.params.distribution_spec() {
            Ok(spec) => self.distribution = compute_distribution(&spec),
            Err(err) => tracing::warn!(%err, "keeping previous distribution"),
        }
        self.run_current()
    }

    /// Run again with the last distribution on a brand-new graph.
    pub fn resample(&mut self) -> SimulationResult {
        self.run_current()
    }

    fn run_current(&mut self) -> SimulationResult {
        let graph = Graph::build(
            self.params.k,
            self.params.overhead_pct,
            &self.distribution,
            &mut self.rng,
        );
        let run = PeelingState::new(&graph).run();
        let report = SimulationReport::new(&graph, &run);

        tracing::debug!(
            family = %self.params.family,
            k = report.k,
            m = report.m,
            edges = report.edge_count,
            solved = report.solved_count,
            stale = run.stale_entries,
            success = report.is_success(),
            "simulation run"
        );

        let result = SimulationResult {
            distribution: self.distribution.clone(),
            bars: degree_bars(&self.distribution),
            report,
        };
        self.last = Some(result.clone());
        result
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn distribution(&self) -> &DegreeDistribution {
        &self.distribution
    }

    pub fn last_result(&self) -> Option<&SimulationResult> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FamilyKind, K_MAX, K_MIN};

    fn session(params: SimulationParams) -> RippleSimulation {
        RippleSimulation::with_params(params, 42).expect("test: finite params")
    }

    #[test]
    fn default_session_uses_rfc_table() {
        let mut sim = session(SimulationParams::default());
        let result = sim.run_simulation();
        assert_eq!(result.report.k, 800);
        assert_eq!(result.report.m, 840);
        assert_eq!(result.distribution.max_degree(), 30);
        assert!(sim.last_result().is_some());
    }

    #[test]
    fn constructor_clamps() {
        let sim = session(SimulationParams {
            k: 5,
            overhead_pct: 90,
            ..SimulationParams::default()
        });
        assert_eq!(sim.params().k, K_MIN);
        assert_eq!(sim.params().overhead_pct, 50);
    }

    #[test]
    fn set_parameters_runs_and_clamps() {
        let mut sim = session(SimulationParams::default());
        sim.set_parameters(SimulationParams {
            family: FamilyKind::Robust,
            k: 10_000,
            overhead_pct: 10,
            c: 0.05,
            delta: 0.05,
        })
        .expect("test: finite params");

        let last = sim.last_result().expect("test: set_parameters runs");
        assert_eq!(last.report.k, K_MAX);
        assert_eq!(last.report.m, 2200);
        assert!(last.distribution.spike.is_some());
    }

    #[test]
    fn set_parameters_rejects_non_finite_without_side_effects() {
        let mut sim = session(SimulationParams::default());
        let before = *sim.params();
        let err = sim
            .set_parameters(SimulationParams {
                delta: f64::NAN,
                ..SimulationParams::default()
            })
            .expect_err("test: NaN delta");
        assert_eq!(err, ParamError::NonFinite { name: "delta" });
        assert_eq!(*sim.params(), before);
        assert!(sim.last_result().is_none());
    }

    #[test]
    fn run_simulation_keeps_distribution_when_stored_params_are_broken() {
        let mut sim = session(SimulationParams {
            family: FamilyKind::Robust,
            k: 300,
            ..SimulationParams::default()
        });
        let before = sim.distribution().clone();
        sim.params.delta = f64::NAN;

        let result = sim.run_simulation();
        assert_eq!(result.distribution, before);
        assert_eq!(result.report.k, 300);
    }

    #[test]
    fn resample_draws_a_new_graph() {
        let mut sim = session(SimulationParams {
            family: FamilyKind::Ideal,
            k: 500,
            ..SimulationParams::default()
        });
        let a = sim.run_simulation();
        let b = sim.resample();
        assert_eq!(a.distribution, b.distribution);
        assert_ne!(a.report.ripple_series, b.report.ripple_series);
    }

    #[test]
    fn same_seed_reproduces_runs() {
        let params = SimulationParams {
            family: FamilyKind::Robust,
            ..SimulationParams::default()
        };
        let mut a = session(params);
        let mut b = session(params);
        assert_eq!(a.run_simulation(), b.run_simulation());
        assert_eq!(a.resample(), b.resample());
    }

    #[test]
    fn status_line_is_rendered() {
        let mut sim = session(SimulationParams::default());
        let line = sim.run_simulation().status_line();
        assert!(line.starts_with("RFC 6330 degree table"));
        assert!(line.contains("M=840 (=K+40, +5.0%)"));
    }
}
