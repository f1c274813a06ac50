// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Multi-class Network Equilibrium - Solver Capability

//! Boundary to the single-class equilibrium solver.
//!
//! The fixed-point schemes know nothing about how a solver assigns flow. Any
//! routine that maps a graph and one class's demand to a per-link flow
//! vector qualifies, including plain closures.

use serde::{Deserialize, Serialize};

use crate::error::{BoxError, EquilibriumError, Result, SolverFault};
use crate::types::{Demand, Graph};

/// Knobs forwarded untouched to the solver on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverParams {
    /// Iteration cap inside the solver.
    pub max_iter: u32,
    /// Solver-specific line-search / averaging parameter.
    pub q: u32,
    /// Verbosity level. Has no effect on the returned flows.
    pub display: u8,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            max_iter: 100,
            q: 10,
            display: 0,
        }
    }
}

/// Single-class traffic assignment.
pub trait EquilibriumSolver {
    /// One nonnegative flow per link of `graph`.
    fn solve(
        &mut self,
        graph: &Graph,
        demand: &Demand,
        params: &SolverParams,
    ) -> std::result::Result<Vec<f64>, BoxError>;
}

impl<F> EquilibriumSolver for F
where
    F: FnMut(&Graph, &Demand, &SolverParams) -> std::result::Result<Vec<f64>, BoxError>,
{
    fn solve(
        &mut self,
        graph: &Graph,
        demand: &Demand,
        params: &SolverParams,
    ) -> std::result::Result<Vec<f64>, BoxError> {
        self(graph, demand, params)
    }
}

/// Pin a closure to the solver signature so its argument types are inferred.
///
/// ```
/// use multiclass_equilibrium::solver::{from_fn, EquilibriumSolver};
///
/// let mut solver = from_fn(|graph, demand, _params| Ok(vec![demand.total_volume(); graph.link_count()]));
/// # let _ = &mut solver as &mut dyn EquilibriumSolver;
/// ```
pub fn from_fn<F>(f: F) -> F
where
    F: FnMut(&Graph, &Demand, &SolverParams) -> std::result::Result<Vec<f64>, BoxError>,
{
    f
}

/// Call `solver` for `class` and reject anything that is not a valid flow
/// vector for `graph`.
pub(crate) fn solve_checked<S: EquilibriumSolver + ?Sized>(
    solver: &mut S,
    class: usize,
    graph: &Graph,
    demand: &Demand,
    params: &SolverParams,
) -> Result<Vec<f64>> {
    let fail = |reason| EquilibriumError::SolverFailure { class, reason };

    let flows = solver
        .solve(graph, demand, params)
        .map_err(|e| fail(SolverFault::Raised(e)))?;

    if flows.len() != graph.link_count() {
        return Err(fail(SolverFault::WrongLength {
            expected: graph.link_count(),
            got: flows.len(),
        }));
    }
    for (link, &value) in flows.iter().enumerate() {
        if !value.is_finite() {
            return Err(fail(SolverFault::NonFiniteFlow { link }));
        }
        if value < 0.0 {
            return Err(fail(SolverFault::NegativeFlow { link, value }));
        }
    }
    Ok(flows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
