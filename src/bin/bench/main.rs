// Ripple Benchmark Runner v0.1.0 - Monte Carlo peeling statistics
// Seedable PRNG, per-run ripple series, JSON report for offline analysis
//
// Usage:
//   cargo run --release --bin bench                     # Run all scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5         # Quick mode (5 runs each)
//   cargo run --release --bin bench -- sweep            # Filter by name, label or category
//   cargo run --release --bin bench -- --time-series    # Enable JSONL output
//   cargo run --release --bin bench -- --seed 42        # Custom base seed

mod monte_carlo;
mod report;
mod scenarios;
mod time_series;

use clap::Parser;
use report::*;
use ripple_engine::ParamError;
use scenarios::*;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("invalid scenario parameters: {0}")]
    Param(#[from] ParamError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no scenarios match filter {0:?}")]
    NoMatch(String),
}

// ─── CLI ────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "bench", about = "Monte Carlo runner for the peeling decoder")]
struct Cli {
    /// Runs per scenario.
    #[arg(long, default_value_t = 30)]
    runs: usize,

    /// Base seed; run i of every scenario uses seed + i.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write each run's ripple series as JSONL.
    #[arg(long)]
    time_series: bool,

    /// Output directory for reports.
    #[arg(long, default_value = "benchmark-results")]
    out: PathBuf,

    /// Only run scenarios whose name, label or category contains this.
    filter: Option<String>,
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<(), BenchError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let all_scenarios = scenarios();

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => all_scenarios.iter().filter(|s| s.matches(f)).collect(),
        None => all_scenarios.iter().collect(),
    };
    if to_run.is_empty() {
        return Err(BenchError::NoMatch(cli.filter.unwrap_or_default()));
    }

    let ts_dir = cli.time_series.then(|| cli.out.join("time-series"));

    println!("\n  Ripple Benchmark Runner v{}", env!("CARGO_PKG_VERSION"));
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!(
        "  {:<30} {:>6} {:>5} {:>9} {:>13} {:>10} {:>8}",
        "Scenario", "E[d]", "M", "Success%", "Recovered%", "MaxRipple", "Time"
    );
    println!("  {}", "-".repeat(88));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::with_capacity(to_run.len());

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(scenario, cli.runs, cli.seed, ts_dir.as_deref())?;
        let m = report.individual_runs.first().map(|r| r.m).unwrap_or(0);

        println!(
            "  {:<30} {:>6.2} {:>5} {:>8.1}% {:>7.1}±{:<5.1} {:>10.1} {:>6.0}us",
            report.label,
            report.mean_degree,
            m,
            report.success_rate * 100.0,
            report.recovered_pct.mean,
            report.recovered_pct.ci_half_width(),
            report.max_ripple.mean,
            report.elapsed_us.mean,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let always_recovered = mc_reports.iter().filter(|r| r.n_runs > 0 && r.success_rate >= 1.0).count();
    let stalled = mc_reports.iter().filter(|r| r.success_rate < 1.0).count();

    let overhead_sweep: Vec<SweepPoint> = mc_reports
        .iter()
        .filter(|r| r.category == "overhead_sweep")
        .map(|r| SweepPoint {
            overhead_pct: r.overhead_pct,
            m: ripple_engine::check_count(r.k, r.overhead_pct),
            success_rate: r.success_rate,
            recovered_pct_mean: r.recovered_pct.mean,
        })
        .collect();

    println!("  {}", "-".repeat(88));
    println!(
        "  Total: {}  Always recovered: {}  Stalled at least once: {}  Suite time: {:.1}s\n",
        total,
        always_recovered,
        stalled,
        suite_elapsed.as_secs_f64()
    );

    if !overhead_sweep.is_empty() {
        println!("  Overhead sweep (robust soliton):");
        for point in &overhead_sweep {
            println!(
                "    +{:>2}%  M={:<5} success {:>5.1}%  recovered {:>5.1}%",
                point.overhead_pct,
                point.m,
                point.success_rate * 100.0,
                point.recovered_pct_mean
            );
        }
        println!();
    }

    let find = |name: &str| mc_reports.iter().find(|r| r.scenario_name == name);
    if let (Some(ideal), Some(robust)) = (find("CMP_IDEAL_20"), find("CMP_ROBUST_20")) {
        println!("  Ideal vs robust (K={}, +{}%):", ideal.k, ideal.overhead_pct);
        println!(
            "    ideal   recovered {:>5.1}±{:.1}%  success {:>5.1}%",
            ideal.recovered_pct.mean,
            ideal.recovered_pct.ci_half_width(),
            ideal.success_rate * 100.0
        );
        println!(
            "    robust  recovered {:>5.1}±{:.1}%  success {:>5.1}%\n",
            robust.recovered_pct.mean,
            robust.recovered_pct.ci_half_width(),
            robust.success_rate * 100.0
        );
    }

    // ─── Write JSON Report ──────────────────────────────────────────────

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string();

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        base_seed: cli.seed,
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            always_recovered,
            stalled,
            overhead_sweep,
        },
        scenarios: mc_reports,
    };

    std::fs::create_dir_all(&cli.out)?;
    let path = cli.out.join(format!("bench-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    tracing::info!(path = %path.display(), "results saved");

    Ok(())
}
