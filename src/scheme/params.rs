// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Multi-class Network Equilibrium - Scheme Configuration

//! Run parameters for the fixed-point schemes.
//!
//! Defaults reproduce the reference call sites: ten cycles, solver capped at
//! one hundred iterations with `q = 10`, silent, and no cycle-level stopping
//! rule.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::solver::SolverParams;

// ---------------------------------------------------------------------------
// Scheme
// ---------------------------------------------------------------------------

/// How a cycle publishes the classes' new flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Each class's result is visible to the classes solved after it in the
    /// same cycle. Usually converges in fewer cycles, but the outcome depends
    /// on class order.
    #[default]
    GaussSeidel,
    /// Results are staged and published together at the end of the cycle, so
    /// every class sees only the previous cycle. Independent of class order.
    Jacobi,
}

impl Scheme {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GaussSeidel => "gauss_seidel",
            Self::Jacobi => "jacobi",
        }
    }
}

// ---------------------------------------------------------------------------
// SchemeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    pub scheme: Scheme,
    /// Upper bound on fixed-point cycles.
    pub max_cycles: u32,
    /// Forwarded to the solver.
    pub max_iter: u32,
    /// Forwarded to the solver.
    pub q: u32,
    /// Verbosity: `>= 1` logs every cycle. Also forwarded to the solver.
    pub display: u8,
    /// Stop early once a cycle moves no cell by more than this. `None` runs
    /// all `max_cycles`.
    pub stop_cycle: Option<f64>,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::GaussSeidel,
            max_cycles: 10,
            max_iter: 100,
            q: 10,
            display: 0,
            stop_cycle: None,
        }
    }
}

impl SchemeConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_scheme(self, scheme: Scheme) -> Self {
        Self { scheme, ..self }
    }

    pub fn with_max_cycles(self, max_cycles: u32) -> Self {
        Self { max_cycles, ..self }
    }

    pub fn with_stop_cycle(self, tolerance: f64) -> Self {
        Self {
            stop_cycle: Some(tolerance),
            ..self
        }
    }

    /// The subset handed to the solver on every call.
    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            max_iter: self.max_iter,
            q: self.q,
            display: self.display,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
