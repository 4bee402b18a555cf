// Monte Carlo Infrastructure - N runs per scenario with statistical aggregation
// Each scenario runs N times with seeds base..base+N, computing mean ± 95% CI

use ripple_engine::{compute_distribution, RippleSimulation};

use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series;
use crate::BenchError;

use std::path::Path;
use std::time::Instant;

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    time_series_dir: Option<&Path>,
) -> Result<BenchResult, BenchError> {
    let start = Instant::now();
    let mut sim = RippleSimulation::with_params(scenario.params, seed)?;
    let report = sim.run_simulation().report;
    let elapsed_us = start.elapsed().as_micros();

    if let Some(dir) = time_series_dir {
        let path = dir.join(format!("seed-{}.jsonl", seed));
        if let Err(err) = time_series::write_jsonl(&report.ripple_series, report.k, &path) {
            tracing::warn!(%err, path = %path.display(), "failed to write ripple series");
        }
    }

    Ok(BenchResult {
        seed,
        success: report.is_success(),
        k: report.k,
        m: report.m,
        edge_count: report.edge_count,
        solved_count: report.solved_count,
        recovered_pct: report.recovered_pct,
        stall_at: report.stall_at,
        initial_ripple: report.initial_ripple,
        max_ripple: report.max_ripple,
        realized_mean_degree: report.realized_mean_degree,
        elapsed_us,
    })
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    time_series_base: Option<&Path>,
) -> Result<MonteCarloReport, BenchError> {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    let mut results = Vec::with_capacity(n_runs);
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        results.push(run_single(scenario, seed, ts_dir.as_deref())?);
    }

    let mean_degree = compute_distribution(&scenario.params.distribution_spec()?).mean_degree;
    tracing::debug!(scenario = %scenario.name, runs = n_runs, "scenario finished");

    Ok(aggregate(scenario, mean_degree, results))
}

fn stats_of(results: &[BenchResult], metric: impl Fn(&BenchResult) -> f64) -> Stats {
    Stats::from_samples(&results.iter().map(metric).collect::<Vec<_>>())
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate(scenario: &Scenario, mean_degree: f64, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let succeeded = results.iter().filter(|r| r.success).count();
    let success_rate = if n == 0 { 0.0 } else { succeeded as f64 / n as f64 };

    let stalls: Vec<f64> = results
        .iter()
        .filter_map(|r| r.stall_at.map(f64::from))
        .collect();

    MonteCarloReport {
        scenario_name: scenario.name.clone(),
        label: scenario.label.clone(),
        category: scenario.category.to_string(),
        family: scenario.params.family.as_str().to_string(),
        k: scenario.params.k,
        overhead_pct: scenario.params.overhead_pct,
        mean_degree,
        n_runs: n,
        success_rate,
        recovered_pct: stats_of(&results, |r| r.recovered_pct),
        stall_at: Stats::from_samples(&stalls),
        initial_ripple: stats_of(&results, |r| r.initial_ripple as f64),
        max_ripple: stats_of(&results, |r| r.max_ripple as f64),
        realized_mean_degree: stats_of(&results, |r| r.realized_mean_degree),
        elapsed_us: stats_of(&results, |r| r.elapsed_us as f64),
        individual_runs: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::scenarios;

    fn scenario(name: &str) -> Scenario {
        scenarios()
            .into_iter()
            .find(|s| s.name == name)
            .expect("test: scenario exists")
    }

    #[test]
    fn single_run_matches_scenario_shape() {
        let result = run_single(&scenario("BASE_RFC6330"), 7, None).expect("test: run");
        assert_eq!(result.k, 800);
        assert_eq!(result.m, 840);
        assert_eq!(result.success, result.stall_at.is_none());
        assert_eq!(result.success, result.solved_count == 800);
    }

    #[test]
    fn same_seed_same_result() {
        let s = scenario("BASE_ROBUST");
        let a = run_single(&s, 3, None).expect("test: run");
        let b = run_single(&s, 3, None).expect("test: run");
        assert_eq!(a.solved_count, b.solved_count);
        assert_eq!(a.edge_count, b.edge_count);
        assert_eq!(a.stall_at, b.stall_at);
    }

    #[test]
    fn aggregate_counts_runs_and_stalls() {
        let report = run_monte_carlo(&scenario("SCALE_ROBUST_SMALL"), 8, 0, None).expect("test: run");
        assert_eq!(report.n_runs, 8);
        assert_eq!(report.individual_runs.len(), 8);
        let stalled = report.individual_runs.iter().filter(|r| !r.success).count();
        assert_eq!(report.stall_at.n, stalled);
        assert!((report.success_rate - (8 - stalled) as f64 / 8.0).abs() < 1e-12);
        assert!(report.mean_degree > 1.0);
    }

    #[test]
    fn time_series_written_per_seed() {
        let dir = std::env::temp_dir().join(format!("ripple-bench-ts-{}", std::process::id()));
        let s = scenario("BASE_IDEAL");
        let result = run_single(&s, 11, Some(&dir)).expect("test: run");

        let text = std::fs::read_to_string(dir.join("seed-11.jsonl")).expect("test: jsonl written");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), result.solved_count as usize + 1);
        let first: serde_json::Value = serde_json::from_str(lines[0]).expect("test: json line");
        assert_eq!(first["step"], 0);
        assert_eq!(first["ripple"], result.initial_ripple);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
