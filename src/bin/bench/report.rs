// Monte Carlo Report Types
// Structured JSON output for offline analysis of peeling behavior

use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    /// Half-width of the 95% confidence interval.
    pub fn ci_half_width(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub seed: u64,
    pub success: bool,
    pub k: u32,
    pub m: u32,
    pub edge_count: usize,
    pub solved_count: u32,
    pub recovered_pct: f64,
    pub stall_at: Option<u32>,
    pub initial_ripple: u32,
    pub max_ripple: u32,
    pub realized_mean_degree: f64,
    pub elapsed_us: u128,
}

// ─── Monte Carlo Report (per-scenario aggregation) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub family: String,
    pub k: u32,
    pub overhead_pct: u32,
    pub mean_degree: f64,
    pub n_runs: usize,
    pub success_rate: f64,
    pub recovered_pct: Stats,
    /// Over stalled runs only.
    pub stall_at: Stats,
    pub initial_ripple: Stats,
    pub max_ripple: Stats,
    pub realized_mean_degree: Stats,
    pub elapsed_us: Stats,
    pub individual_runs: Vec<BenchResult>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub base_seed: u64,
    pub n_runs_per_scenario: usize,
    pub summary: Summary,
    pub scenarios: Vec<MonteCarloReport>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    /// Scenarios where every run recovered all symbols.
    pub always_recovered: usize,
    /// Scenarios where at least one run stalled.
    pub stalled: usize,
    pub overhead_sweep: Vec<SweepPoint>,
}

/// Success rate of one overhead setting in the sweep.
#[derive(Debug, Serialize)]
pub struct SweepPoint {
    pub overhead_pct: u32,
    pub m: u32,
    pub success_rate: f64,
    pub recovered_pct_mean: f64,
}
