// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fountain Code Simulation Suite ("The Ripple") - Errors

// ---------------------------------------------------------------------------
// Parameter errors
// ---------------------------------------------------------------------------

/// Errors from building a distribution or applying session parameters.
///
/// Out-of-range values never show up here: the session clamps them. What is
/// left are inputs that have no sensible clamp target.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown distribution family: {0:?} (expected ideal, robust or rfc6330)")]
    UnknownFamily(String),

    #[error("parameter {name} is not a finite number")]
    NonFinite { name: &'static str },

    #[error("a distribution needs at least one source symbol")]
    ZeroSymbols,

    #[error("robust soliton shape out of domain: c={c}, delta={delta}")]
    InvalidShape { c: f64, delta: f64 },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

/// Errors from validating a hand-built incidence structure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("graph has no variable nodes")]
    NoVariables,

    #[error("check {check} covers no variables")]
    EmptyCheck { check: usize },

    #[error("check {check} references variable {variable}, but only {num_variables} exist")]
    VariableOutOfRange {
        check: usize,
        variable: u32,
        num_variables: u32,
    },

    #[error("check {check} lists variable {variable} more than once")]
    DuplicateNeighbor { check: usize, variable: u32 },
}
