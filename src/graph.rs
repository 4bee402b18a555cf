// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple") - Bipartite Graph Builder
//
// Variables are the K source symbols, checks the M received encoded symbols.
// Each check stores its incident variables; each variable stores the checks
// that cover it so that solving a variable can decrement its checks directly.

use rand::Rng;
use serde::Serialize;

use crate::distribution::DegreeDistribution;
use crate::error::GraphError;
use crate::sampler::{sample_degree, sample_neighbors};

/// Number of checks for `k` variables and a whole-percent overhead:
/// `ceil(k * (100 + overhead_pct) / 100)`, computed exactly.
pub fn check_count(k: u32, overhead_pct: u32) -> u32 {
    let scaled = k as u64 * (100 + overhead_pct as u64);
    scaled.div_ceil(100) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Graph {
    num_variables: u32,
    checks: Vec<Vec<u32>>,
    variable_checks: Vec<Vec<u32>>,
    edge_count: usize,
}

impl Graph {
    /// Sample a fresh graph: `check_count(k, overhead_pct)` checks, each with
    /// a degree drawn from `dist` and clamped to `[1, k]`.
    pub fn build<R: Rng + ?Sized>(
        k: u32,
        overhead_pct: u32,
        dist: &DegreeDistribution,
        rng: &mut R,
    ) -> Self {
        let m = check_count(k, overhead_pct);
        let mut graph = Self::empty(k, m as usize);

        for _ in 0..m {
            let degree = sample_degree(&dist.cdf, rng).clamp(1, k.max(1));
            let neighbors = sample_neighbors(k, degree, rng);
            graph.push_check(neighbors);
        }

        graph
    }

    /// Assemble a graph from explicit incidence lists.
    ///
    /// # Errors
    ///
    /// Rejects graphs without variables, empty checks, out-of-range
    /// variable indices and indices repeated within one check.
    pub fn from_checks(num_variables: u32, checks: Vec<Vec<u32>>) -> Result<Self, GraphError> {
        if num_variables == 0 {
            return Err(GraphError::NoVariables);
        }

        let mut seen = vec![usize::MAX; num_variables as usize];
        for (check, neighbors) in checks.iter().enumerate() {
            if neighbors.is_empty() {
                return Err(GraphError::EmptyCheck { check });
            }
            for &variable in neighbors {
                let slot = seen
                    .get_mut(variable as usize)
                    .ok_or(GraphError::VariableOutOfRange {
                        check,
                        variable,
                        num_variables,
                    })?;
                if *slot == check {
                    return Err(GraphError::DuplicateNeighbor { check, variable });
                }
                *slot = check;
            }
        }

        let mut graph = Self::empty(num_variables, checks.len());
        for neighbors in checks {
            graph.push_check(neighbors);
        }
        Ok(graph)
    }

    fn empty(num_variables: u32, num_checks: usize) -> Self {
        Self {
            num_variables,
            checks: Vec::with_capacity(num_checks),
            variable_checks: vec![Vec::new(); num_variables as usize],
            edge_count: 0,
        }
    }

    fn push_check(&mut self, neighbors: Vec<u32>) {
        let check = self.checks.len() as u32;
        for &v in &neighbors {
            self.variable_checks[v as usize].push(check);
        }
        self.edge_count += neighbors.len();
        self.checks.push(neighbors);
    }

    pub fn num_variables(&self) -> u32 {
        self.num_variables
    }

    pub fn num_checks(&self) -> u32 {
        self.checks.len() as u32
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Variables covered by `check`.
    pub fn check(&self, check: u32) -> &[u32] {
        &self.checks[check as usize]
    }

    /// Checks covering `variable`.
    pub fn checks_of(&self, variable: u32) -> &[u32] {
        &self.variable_checks[variable as usize]
    }

    pub fn initial_degree(&self, check: u32) -> u32 {
        self.checks[check as usize].len() as u32
    }

    pub fn checks(&self) -> impl Iterator<Item = &[u32]> {
        self.checks.iter().map(Vec::as_slice)
    }

    /// `edges / M`; zero for a graph without checks.
    pub fn realized_mean_degree(&self) -> f64 {
        if self.checks.is_empty() {
            0.0
        } else {
            self.edge_count as f64 / self.checks.len() as f64
        }
    }
}
