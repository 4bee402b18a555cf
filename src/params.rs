// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple") - Session Parameters
//
// The interactive surface never rejects a number: anything out of range is
// clamped into the bounds below so every request still produces a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::distribution::{DistributionFamily, DistributionSpec};
use crate::error::ParamError;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

pub const K_MIN: u32 = 50;
pub const K_MAX: u32 = 2000;

pub const OVERHEAD_PCT_MAX: u32 = 50;

pub const C_MIN: f64 = 0.01;
pub const C_MAX: f64 = 0.20;

pub const DELTA_MIN: f64 = 0.001;
pub const DELTA_MAX: f64 = 0.5;

// ---------------------------------------------------------------------------
// FamilyKind
// ---------------------------------------------------------------------------

/// Family selector without shape parameters, as picked in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyKind {
    Ideal,
    Robust,
    #[default]
    #[serde(rename = "rfc6330")]
    FixedTable,
}

impl FamilyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ideal => "ideal",
            Self::Robust => "robust",
            Self::FixedTable => "rfc6330",
        }
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FamilyKind {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ideal" => Ok(Self::Ideal),
            "robust" => Ok(Self::Robust),
            "rfc6330" | "fixed" | "table" => Ok(Self::FixedTable),
            _ => Err(ParamError::UnknownFamily(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// SimulationParams
// ---------------------------------------------------------------------------

/// Everything a run depends on besides the random stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    #[serde(default)]
    pub family: FamilyKind,
    pub k: u32,
    /// Extra checks as a whole percentage of `k`.
    pub overhead_pct: u32,
    /// Robust soliton `c`; ignored by the other families.
    pub c: f64,
    /// Robust soliton `delta`; ignored by the other families.
    pub delta: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            family: FamilyKind::FixedTable,
            k: 800,
            overhead_pct: 5,
            c: 0.05,
            delta: 0.05,
        }
    }
}

impl SimulationParams {
    /// Clamp every field into its interactive range.
    ///
    /// # Errors
    ///
    /// [`ParamError::NonFinite`] if `c` or `delta` is NaN or infinite.
    pub fn clamped(self) -> Result<Self, ParamError> {
        Ok(Self {
            family: self.family,
            k: clamp_k(self.k),
            overhead_pct: clamp_overhead(self.overhead_pct),
            c: clamp_c(self.c)?,
            delta: clamp_delta(self.delta)?,
        })
    }

    /// Family with this parameter set's shape attached.
    pub fn family(&self) -> DistributionFamily {
        match self.family {
            FamilyKind::Ideal => DistributionFamily::Ideal,
            FamilyKind::Robust => DistributionFamily::Robust {
                c: self.c,
                delta: self.delta,
            },
            FamilyKind::FixedTable => DistributionFamily::FixedTable,
        }
    }

    pub fn distribution_spec(&self) -> Result<DistributionSpec, ParamError> {
        DistributionSpec::new(self.family(), self.k)
    }
}

pub fn clamp_k(k: u32) -> u32 {
    k.clamp(K_MIN, K_MAX)
}

pub fn clamp_overhead(pct: u32) -> u32 {
    pct.min(OVERHEAD_PCT_MAX)
}

/// Clamp a fractional overhead coming from a float-typed UI control.
pub fn clamp_overhead_f64(pct: f64) -> Result<u32, ParamError> {
    if !pct.is_finite() {
        return Err(ParamError::NonFinite { name: "overhead_pct" });
    }
    Ok(pct.round().clamp(0.0, OVERHEAD_PCT_MAX as f64) as u32)
}

pub fn clamp_c(c: f64) -> Result<f64, ParamError> {
    if !c.is_finite() {
        return Err(ParamError::NonFinite { name: "c" });
    }
    Ok(c.clamp(C_MIN, C_MAX))
}

pub fn clamp_delta(delta: f64) -> Result<f64, ParamError> {
    if !delta.is_finite() {
        return Err(ParamError::NonFinite { name: "delta" });
    }
    Ok(delta.clamp(DELTA_MIN, DELTA_MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Out-of-range requests are clamped, never rejected.
    #[test]
    fn out_of_range_values_are_clamped() {
        let p = SimulationParams {
            family: FamilyKind::Robust,
            k: 10,
            overhead_pct: 400,
            c: 3.0,
            delta: 0.9,
        }
        .clamped()
        .expect("test: finite params");

        assert_eq!(p.k, K_MIN);
        assert_eq!(p.overhead_pct, OVERHEAD_PCT_MAX);
        assert_eq!(p.c, C_MAX);
        assert_eq!(p.delta, DELTA_MAX);

        let p = SimulationParams {
            k: 1_000_000,
            c: -1.0,
            delta: 0.0,
            ..SimulationParams::default()
        }
        .clamped()
        .expect("test: finite params");
        assert_eq!(p.k, K_MAX);
        assert_eq!(p.c, C_MIN);
        assert_eq!(p.delta, DELTA_MIN);
    }

    #[test]
    fn in_range_values_pass_through() {
        let p = SimulationParams::default();
        assert_eq!(p.clamped(), Ok(p));
    }

    #[test]
    fn non_finite_values_are_errors() {
        let p = SimulationParams {
            c: f64::NAN,
            ..SimulationParams::default()
        };
        assert_eq!(p.clamped(), Err(ParamError::NonFinite { name: "c" }));
        assert_eq!(
            clamp_overhead_f64(f64::INFINITY),
            Err(ParamError::NonFinite { name: "overhead_pct" })
        );
        assert_eq!(clamp_overhead_f64(-3.0), Ok(0));
        assert_eq!(clamp_overhead_f64(12.6), Ok(13));
    }

    #[test]
    fn family_names_round_trip() {
        for kind in [FamilyKind::Ideal, FamilyKind::Robust, FamilyKind::FixedTable] {
            assert_eq!(kind.as_str().parse::<FamilyKind>(), Ok(kind));
        }
        assert_eq!(" Robust ".parse::<FamilyKind>(), Ok(FamilyKind::Robust));
        assert_eq!(
            "gaussian".parse::<FamilyKind>(),
            Err(ParamError::UnknownFamily("gaussian".to_string()))
        );
    }

    #[test]
    fn shape_only_attached_to_robust() {
        let p = SimulationParams {
            family: FamilyKind::Robust,
            ..SimulationParams::default()
        };
        assert_eq!(
            p.family(),
            DistributionFamily::Robust { c: 0.05, delta: 0.05 }
        );
        assert_eq!(SimulationParams::default().family(), DistributionFamily::FixedTable);
        assert_eq!(FamilyKind::default(), FamilyKind::FixedTable);
        assert_eq!(p.family().kind(), p.family);
    }
}
