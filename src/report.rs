// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple") - Reporting
//
// Read-only projections of a finished run and of a degree distribution, in
// the shape the renderer consumes.

use serde::Serialize;
use std::fmt;

use crate::distribution::{DegreeDistribution, DistributionFamily};
use crate::graph::Graph;
use crate::peeling::{PeelOutcome, PeelingRun, RippleSeries};

/// Degrees drawn individually before the tail is aggregated.
pub const BAR_DEGREES: u32 = 30;

// ---------------------------------------------------------------------------
// SimulationReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub k: u32,
    pub m: u32,
    pub edge_count: usize,
    pub solved_count: u32,
    pub recovered_pct: f64,
    pub outcome: PeelOutcome,
    pub stall_at: Option<u32>,
    pub initial_ripple: u32,
    pub max_ripple: u32,
    pub realized_mean_degree: f64,
    pub ripple_series: RippleSeries,
}

impl SimulationReport {
    pub fn new(graph: &Graph, run: &PeelingRun) -> Self {
        let k = graph.num_variables();
        Self {
            k,
            m: graph.num_checks(),
            edge_count: graph.edge_count(),
            solved_count: run.solved_count,
            recovered_pct: percent(run.solved_count, k),
            outcome: run.outcome,
            stall_at: run.outcome.stall_at(),
            initial_ripple: run.series.initial_ripple(),
            max_ripple: run.series.max_ripple(),
            realized_mean_degree: graph.realized_mean_degree(),
            ripple_series: run.series.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Extra checks beyond `k`, as a count and as a percentage.
    pub fn overhead(&self) -> (u32, f64) {
        let extra = self.m.saturating_sub(self.k);
        (extra, percent(extra, self.k))
    }
}

/// `100 * part / whole`, zero for an empty graph.
fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

// ---------------------------------------------------------------------------
// Degree bars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarKind {
    Degree,
    Spike,
    Tail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeBar {
    pub label: String,
    pub degree: Option<u32>,
    pub probability: f64,
    pub kind: BarKind,
}

/// Bar chart data: one bar per degree up to [`BAR_DEGREES`], then the tail
/// mass in one bar. A robust spike past the cutoff gets its own bar.
pub fn degree_bars(dist: &DegreeDistribution) -> Vec<DegreeBar> {
    let shown = BAR_DEGREES.min(dist.max_degree());
    let mut bars: Vec<DegreeBar> = dist
        .iter()
        .take(shown as usize)
        .map(|(d, probability)| DegreeBar {
            label: d.to_string(),
            degree: Some(d),
            probability,
            kind: BarKind::Degree,
        })
        .collect();

    if matches!(dist.family, DistributionFamily::FixedTable) || dist.max_degree() <= shown {
        return bars;
    }

    let tail: f64 = dist.pmf[shown as usize..].iter().sum();
    let tail_label = format!("> {}", shown);

    match dist.spike {
        Some(spike) if spike.k_over_r > shown && spike.k_over_r <= dist.max_degree() => {
            let mass = dist.probability(spike.k_over_r);
            bars.push(DegreeBar {
                label: format!("d={}", spike.k_over_r),
                degree: Some(spike.k_over_r),
                probability: mass,
                kind: BarKind::Spike,
            });
            bars.push(DegreeBar {
                label: tail_label,
                degree: None,
                probability: (tail - mass).max(0.0),
                kind: BarKind::Tail,
            });
        }
        _ => bars.push(DegreeBar {
            label: tail_label,
            degree: None,
            probability: tail,
            kind: BarKind::Tail,
        }),
    }

    bars
}

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

/// One-line status text pairing a distribution with a run over it.
pub struct StatusLine<'a> {
    pub distribution: &'a DegreeDistribution,
    pub report: &'a SimulationReport,
}

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dist = self.distribution;
        let report = self.report;

        write!(f, "{}", dist.family)?;
        if let Some(spike) = dist.spike {
            write!(f, " spike≈d={}", spike.k_over_r)?;
        }

        let (extra, pct) = report.overhead();
        write!(
            f,
            " · E[d]≈{:.2} (sample≈{:.2}) · M={} (=K+{}, +{:.1}%) · ripple start={}, max={} · ",
            dist.mean_degree,
            report.realized_mean_degree,
            report.m,
            extra,
            pct,
            report.initial_ripple,
            report.max_ripple,
        )?;

        match report.outcome {
            PeelOutcome::Success => write!(f, "peeling completed (100%)"),
            PeelOutcome::Stall { at } => write!(
                f,
                "stalled at step {} ({:.1}% recovered)",
                at, report.recovered_pct
            ),
        }
    }
}
