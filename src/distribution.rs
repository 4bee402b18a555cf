// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple") - Degree Distributions
//
// Ideal soliton, robust soliton and the RFC 6330 fixed degree table, all
// reduced to the same PMF/CDF form so that samplers and the graph builder never
// need to know which family produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParamError;
use crate::params::FamilyKind;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest degree the RFC 6330 table can produce.
pub const RFC6330_MAX_DEGREE: usize = 30;

/// Denominator of the RFC 6330 cumulative thresholds (2^20).
pub const RFC6330_DENOMINATOR: u32 = 1 << 20;

/// RFC 6330 Table 1: cumulative thresholds, indexed by degree.
pub const RFC6330_THRESHOLDS: [u32; RFC6330_MAX_DEGREE + 1] = [
    0, 5243, 529531, 704294, 791675, 844104, 879057, 904023, 922747, 937311, 948962, 958494,
    966438, 973160, 978921, 983914, 988283, 992138, 995565, 998631, 1001391, 1003887, 1006157,
    1008229, 1010129, 1011876, 1013490, 1014983, 1016370, 1017662, 1048576,
];

// ---------------------------------------------------------------------------
// DistributionFamily
// ---------------------------------------------------------------------------

/// Degree distribution family, with the shape parameters it needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionFamily {
    Ideal,
    Robust { c: f64, delta: f64 },
    #[serde(rename = "rfc6330")]
    FixedTable,
}

impl DistributionFamily {
    pub fn kind(&self) -> FamilyKind {
        match self {
            Self::Ideal => FamilyKind::Ideal,
            Self::Robust { .. } => FamilyKind::Robust,
            Self::FixedTable => FamilyKind::FixedTable,
        }
    }
}

impl fmt::Display for DistributionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ideal => write!(f, "ideal soliton"),
            Self::Robust { c, delta } => write!(f, "robust soliton (c={:.2}, δ={:.2})", c, delta),
            Self::FixedTable => write!(f, "RFC 6330 degree table"),
        }
    }
}

// ---------------------------------------------------------------------------
// DistributionSpec
// ---------------------------------------------------------------------------

/// Validated input of [`compute_distribution`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionSpec {
    family: DistributionFamily,
    k: u32,
}

impl DistributionSpec {
    /// # Errors
    ///
    /// [`ParamError::ZeroSymbols`] when `k == 0`, [`ParamError::InvalidShape`]
    /// when a robust shape has `c <= 0`, a non-finite `c`, or `delta` outside
    /// `(0, 1)`.
    pub fn new(family: DistributionFamily, k: u32) -> Result<Self, ParamError> {
        if k == 0 {
            return Err(ParamError::ZeroSymbols);
        }
        if let DistributionFamily::Robust { c, delta } = family {
            let c_ok = c.is_finite() && c > 0.0;
            let delta_ok = delta > 0.0 && delta < 1.0;
            if !c_ok || !delta_ok {
                return Err(ParamError::InvalidShape { c, delta });
            }
        }
        Ok(Self { family, k })
    }

    pub fn family(&self) -> DistributionFamily {
        self.family
    }

    pub fn k(&self) -> u32 {
        self.k
    }
}

// ---------------------------------------------------------------------------
// DegreeDistribution
// ---------------------------------------------------------------------------

/// Location of the extra mass the robust soliton places at `K/R`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RobustSpike {
    /// `R = c * ln(K / delta) * sqrt(K)`.
    pub r: f64,
    /// `clamp(floor(K / R), 1, K)`.
    pub k_over_r: u32,
}

/// PMF and CDF over degrees `1..=max_degree`.
///
/// Slot `i` of `pmf` and `cdf` holds degree `i + 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeDistribution {
    pub family: DistributionFamily,
    pub k: u32,
    pub pmf: Vec<f64>,
    pub cdf: Vec<f64>,
    pub mean_degree: f64,
    pub spike: Option<RobustSpike>,
}

impl DegreeDistribution {
    pub fn max_degree(&self) -> u32 {
        self.pmf.len() as u32
    }

    /// Probability of `degree`; zero outside the support.
    pub fn probability(&self, degree: u32) -> f64 {
        match degree {
            0 => 0.0,
            d => self.pmf.get(d as usize - 1).copied().unwrap_or(0.0),
        }
    }

    /// `(degree, probability)` pairs in increasing degree order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.pmf.iter().enumerate().map(|(i, &p)| (i as u32 + 1, p))
    }
}

/// Compute PMF, CDF and mean degree for `spec`.
pub fn compute_distribution(spec: &DistributionSpec) -> DegreeDistribution {
    let k = spec.k();
    let (pmf, spike) = match spec.family() {
        DistributionFamily::Ideal => (ideal_soliton(k), None),
        DistributionFamily::Robust { c, delta } => {
            let (pmf, spike) = robust_soliton(k, c, delta);
            (pmf, Some(spike))
        }
        DistributionFamily::FixedTable => (rfc6330_table(), None),
    };
    let cdf = cdf_from_pmf(&pmf);
    let mean_degree = mean_from_pmf(&pmf);

    DegreeDistribution {
        family: spec.family(),
        k,
        pmf,
        cdf,
        mean_degree,
        spike,
    }
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

/// `p(1) = 1/K`, `p(d) = 1/(d(d-1))` for `2 <= d <= K`.
pub fn ideal_soliton(k: u32) -> Vec<f64> {
    let mut pmf = Vec::with_capacity(k as usize);
    pmf.push(1.0 / k as f64);
    for d in 2..=k {
        let d = d as f64;
        pmf.push(1.0 / (d * (d - 1.0)));
    }
    pmf
}

/// Ideal soliton plus the `tau` correction, normalized.
pub fn robust_soliton(k: u32, c: f64, delta: f64) -> (Vec<f64>, RobustSpike) {
    let kf = k as f64;
    let r = c * (kf / delta).ln() * kf.sqrt();
    let k_over_r = (kf / r).floor().clamp(1.0, kf) as u32;

    let mut mu = ideal_soliton(k);
    let spike_width = k_over_r as f64;
    for d in 1..k_over_r {
        mu[d as usize - 1] += 1.0 / (d as f64 * spike_width);
    }
    // ln(R/delta) turns negative only for degenerate shapes; no negative mass.
    mu[k_over_r as usize - 1] += (r / delta).ln().max(0.0) / spike_width;

    let z: f64 = mu.iter().sum();
    for p in mu.iter_mut() {
        *p /= z;
    }

    (mu, RobustSpike { r, k_over_r })
}

/// Per-degree probabilities of the RFC 6330 table.
pub fn rfc6330_table() -> Vec<f64> {
    let denom = RFC6330_DENOMINATOR as f64;
    RFC6330_THRESHOLDS
        .windows(2)
        .map(|w| (w[1] - w[0]) as f64 / denom)
        .collect()
}

/// Running sum of `pmf`, last cell forced to exactly 1.0.
pub fn cdf_from_pmf(pmf: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    let mut cdf: Vec<f64> = pmf
        .iter()
        .map(|p| {
            acc += p;
            acc
        })
        .collect();
    if let Some(last) = cdf.last_mut() {
        *last = 1.0;
    }
    cdf
}

pub fn mean_from_pmf(pmf: &[f64]) -> f64 {
    pmf.iter()
        .enumerate()
        .map(|(i, p)| (i + 1) as f64 * p)
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
