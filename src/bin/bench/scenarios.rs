// Scenario Definitions - named parameter sets for the Monte Carlo runner
// Baselines per family, an overhead sweep and a matched ideal/robust comparison

use ripple_engine::{FamilyKind, SimulationParams};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: String,
    pub label: String,
    pub category: &'static str,
    pub params: SimulationParams,
}

impl Scenario {
    fn new(name: impl Into<String>, label: impl Into<String>, category: &'static str, params: SimulationParams) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            category,
            params,
        }
    }

    pub fn matches(&self, filter: &str) -> bool {
        let f = filter.to_lowercase();
        self.name.to_lowercase().contains(&f)
            || self.label.to_lowercase().contains(&f)
            || self.category.contains(&f)
    }
}

/// Overhead percentages swept for the robust soliton.
pub const SWEEP_OVERHEADS: [u32; 7] = [0, 5, 10, 15, 20, 30, 50];

fn params(family: FamilyKind, k: u32, overhead_pct: u32) -> SimulationParams {
    SimulationParams {
        family,
        k,
        overhead_pct,
        ..SimulationParams::default()
    }
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    let mut all = vec![
        Scenario::new("BASE_RFC6330", "RFC 6330 table K=800 +5%", "baseline", params(FamilyKind::FixedTable, 800, 5)),
        Scenario::new("BASE_IDEAL", "Ideal soliton K=800 +5%", "baseline", params(FamilyKind::Ideal, 800, 5)),
        Scenario::new("BASE_ROBUST", "Robust soliton K=800 +5%", "baseline", params(FamilyKind::Robust, 800, 5)),
        Scenario::new("CMP_IDEAL_20", "Ideal soliton K=800 +20%", "comparison", params(FamilyKind::Ideal, 800, 20)),
        Scenario::new("CMP_ROBUST_20", "Robust soliton K=800 +20%", "comparison", params(FamilyKind::Robust, 800, 20)),
        Scenario::new("SCALE_ROBUST_SMALL", "Robust soliton K=50 +20%", "scale", params(FamilyKind::Robust, 50, 20)),
        Scenario::new("SCALE_ROBUST_LARGE", "Robust soliton K=2000 +20%", "scale", params(FamilyKind::Robust, 2000, 20)),
    ];

    all.extend(SWEEP_OVERHEADS.iter().map(|&pct| {
        Scenario::new(
            format!("SWEEP_ROBUST_{pct}"),
            format!("Robust soliton K=800 +{pct}%"),
            "overhead_sweep",
            params(FamilyKind::Robust, 800, pct),
        )
    }));

    all
}
