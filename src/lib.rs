// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple")

mod binary_search;

pub mod distribution;
pub mod error;
pub mod graph;
pub mod params;
pub mod peeling;
pub mod report;
pub mod sampler;
pub mod simulation;

pub use distribution::{
    compute_distribution, DegreeDistribution, DistributionFamily, DistributionSpec,
};
pub use error::{GraphError, ParamError};
pub use graph::{check_count, Graph};
pub use params::{FamilyKind, SimulationParams};
pub use peeling::{peel, PeelOutcome, PeelingRun, PeelingState, RippleSample, RippleSeries};
pub use report::{degree_bars, SimulationReport};
pub use simulation::{RippleSimulation, SimulationResult};

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl RippleSimulation {
    /// Unknown family names fall back to the RFC 6330 table and a non-finite
    /// `c` to its default; every number is clamped into range. `seed` comes
    /// from the page so runs can be replayed.
    #[wasm_bindgen(constructor)]
    pub fn new(
        family: &str,
        k: u32,
        overhead_pct: u32,
        c: f64,
        seed: u64,
    ) -> Result<RippleSimulation, JsError> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let defaults = SimulationParams::default();
        let family = family.parse().unwrap_or_else(|err: ParamError| {
            console_warn(&err, "using default family");
            defaults.family
        });
        let c = params::clamp_c(c).unwrap_or(defaults.c);
        let params = SimulationParams {
            family,
            k,
            overhead_pct,
            c,
            ..defaults
        };

        Ok(RippleSimulation::with_params(params, seed)?)
    }

    pub fn set_family(&mut self, family: &str) -> JsValue {
        match family.parse() {
            Ok(family) => self.apply(SimulationParams { family, ..self.params }),
            Err(err) => self.ignore(err),
        }
    }

    pub fn set_k(&mut self, k: u32) -> JsValue {
        self.apply(SimulationParams { k, ..self.params })
    }

    pub fn set_overhead(&mut self, pct: f64) -> JsValue {
        match params::clamp_overhead_f64(pct) {
            Ok(overhead_pct) => self.apply(SimulationParams { overhead_pct, ..self.params }),
            Err(err) => self.ignore(err),
        }
    }

    pub fn set_c(&mut self, c: f64) -> JsValue {
        self.apply(SimulationParams { c, ..self.params })
    }

    pub fn set_delta(&mut self, delta: f64) -> JsValue {
        self.apply(SimulationParams { delta, ..self.params })
    }

    /// Recompute the distribution and run on a new graph.
    pub fn simulate(&mut self) -> JsValue {
        to_js(&self.run_simulation())
    }

    /// New graph, same distribution.
    #[wasm_bindgen(js_name = resample)]
    pub fn resample_js(&mut self) -> JsValue {
        to_js(&self.resample())
    }

    pub fn get_distribution(&self) -> JsValue {
        to_js(&self.distribution)
    }

    pub fn get_bars(&self) -> JsValue {
        to_js(&degree_bars(&self.distribution))
    }

    pub fn get_params(&self) -> JsValue {
        to_js(&self.params)
    }

    pub fn get_last(&self) -> JsValue {
        match &self.last {
            Some(result) => to_js(result),
            None => JsValue::NULL,
        }
    }

    /// Status line of the last run, empty before the first one.
    pub fn summary(&self) -> String {
        self.last
            .as_ref()
            .map(SimulationResult::status_line)
            .unwrap_or_default()
    }
}

impl RippleSimulation {
    fn apply(&mut self, params: SimulationParams) -> JsValue {
        match self.set_parameters(params) {
            Ok(()) => self.get_last(),
            Err(err) => self.ignore(err),
        }
    }

    /// Keep the previous state and hand back the previous result.
    fn ignore(&self, err: ParamError) -> JsValue {
        console_warn(&err, "ignoring parameter change");
        self.get_last()
    }
}

/// Log through `tracing` and, in the browser, to the developer console.
fn console_warn(err: &ParamError, action: &str) -> String {
    let message = format!("ripple: {}: {}", action, err);
    tracing::warn!(%err, "{}", action);
    #[cfg(target_arch = "wasm32")]
    warn(&message);
    message
}

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}
