// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Multi-class Network Equilibrium - Fixed-Point Iteration

//! Gauss-Seidel and Jacobi cycles over the classes.
//!
//! Every class update follows the same three steps:
//!
//! ```text
//! shift[l] = sum over c != i of F[l, c]
//! g_i'     = g_i with every curve p_l(x) replaced by p_l(x + shift[l])
//! F[., i]  = solver(g_i', demand_i)
//! ```
//!
//! The schemes differ only in when `F[., i]` becomes visible to the other
//! classes. Gauss-Seidel writes it straight into the matrix it is reading,
//! so later classes in the same cycle already see it. Jacobi stages every
//! result in a fresh matrix and publishes the whole snapshot at the end of
//! the cycle.
//!
//! A solver failure or an overflowing shift aborts the run; the partially
//! updated matrix is dropped, never returned.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::params::{Scheme, SchemeConfig};
use crate::error::{EquilibriumError, Result, ShapeMismatch};
use crate::flow::FlowMatrix;
use crate::latency::shift_graph;
use crate::solver::{solve_checked, EquilibriumSolver, SolverParams};
use crate::types::{Demand, Graph};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumReport {
    /// Flows after the last completed cycle.
    pub flows: FlowMatrix,
    /// Cycles actually executed.
    pub cycles_run: u32,
    /// Per cycle, the largest absolute change of any cell.
    pub residuals: Vec<f64>,
    /// Whether `stop_cycle` was set and met. Always `false` without it.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run the configured scheme and return the final flow matrix.
///
/// `graphs[i]` holds class `i`'s unshifted latency curves; all graphs must
/// share links and endpoints. `demands[i]` is class `i`'s OD table.
pub fn run<S: EquilibriumSolver + ?Sized>(
    graphs: &[Graph],
    demands: &[Demand],
    solver: &mut S,
    config: &SchemeConfig,
) -> Result<FlowMatrix> {
    run_with_report(graphs, demands, solver, config).map(|r| r.flows)
}

/// Sequential updates; the result depends on class order.
pub fn gauss_seidel<S: EquilibriumSolver + ?Sized>(
    graphs: &[Graph],
    demands: &[Demand],
    solver: &mut S,
    config: &SchemeConfig,
) -> Result<FlowMatrix> {
    let config = config.clone().with_scheme(Scheme::GaussSeidel);
    run(graphs, demands, solver, &config)
}

/// Simultaneous updates; permuting classes permutes the result columns.
pub fn jacobi<S: EquilibriumSolver + ?Sized>(
    graphs: &[Graph],
    demands: &[Demand],
    solver: &mut S,
    config: &SchemeConfig,
) -> Result<FlowMatrix> {
    let config = config.clone().with_scheme(Scheme::Jacobi);
    run(graphs, demands, solver, &config)
}

/// Run the configured scheme and keep the per-cycle residuals.
pub fn run_with_report<S: EquilibriumSolver + ?Sized>(
    graphs: &[Graph],
    demands: &[Demand],
    solver: &mut S,
    config: &SchemeConfig,
) -> Result<EquilibriumReport> {
    let links = validate(graphs, demands)?;
    let mut sweep = Sweep {
        graphs,
        demands,
        solver,
        params: config.solver_params(),
        buffer: graphs[0].clone(),
    };

    let mut flows = FlowMatrix::zeros(links, graphs.len());
    let mut residuals = Vec::new();
    let mut converged = false;

    for cycle in 0..config.max_cycles {
        if config.display >= 1 {
            debug!(cycle, scheme = config.scheme.name(), "fixed-point cycle");
        }
        let previous = flows.clone();
        match config.scheme {
            Scheme::GaussSeidel => sweep.sequential(&mut flows)?,
            Scheme::Jacobi => flows = sweep.simultaneous(&flows)?,
        }

        let residual = previous.max_abs_diff(&flows);
        residuals.push(residual);
        if config.stop_cycle.is_some_and(|tol| residual <= tol) {
            converged = true;
            break;
        }
    }

    let cycles_run = residuals.len() as u32;
    info!(
        scheme = config.scheme.name(),
        classes = graphs.len(),
        links,
        cycles_run,
        converged,
        "fixed-point run finished"
    );
    Ok(EquilibriumReport {
        flows,
        cycles_run,
        residuals,
        converged,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check class counts, topology agreement and demand nodes. Returns the
/// link count.
fn validate(graphs: &[Graph], demands: &[Demand]) -> Result<usize> {
    let reference = graphs.first().ok_or(ShapeMismatch::NoClasses)?;
    if graphs.len() != demands.len() {
        return Err(ShapeMismatch::ClassCount {
            graphs: graphs.len(),
            demands: demands.len(),
        }
        .into());
    }
    reference.check_ids()?;

    for (class, graph) in graphs.iter().enumerate().skip(1) {
        match reference.topology_mismatch(graph) {
            Ok(None) => {}
            Ok(Some(link)) => return Err(ShapeMismatch::Topology { class, link }.into()),
            Err((expected, got)) => {
                return Err(ShapeMismatch::LinkCount { class, expected, got }.into())
            }
        }
    }

    let node_count = reference.node_count();
    for demand in demands {
        demand.check_nodes(node_count)?;
    }
    Ok(reference.link_count())
}

// ---------------------------------------------------------------------------
// Sweep
// ---------------------------------------------------------------------------

/// Borrowed inputs plus the one reusable shifted-graph buffer.
struct Sweep<'a, S: ?Sized> {
    graphs: &'a [Graph],
    demands: &'a [Demand],
    solver: &'a mut S,
    params: SolverParams,
    buffer: Graph,
}

impl<S: EquilibriumSolver + ?Sized> Sweep<'_, S> {
    /// Gauss-Seidel: class `i` reads this cycle's columns `0..i` and the
    /// previous cycle's columns `i+1..`.
    fn sequential(&mut self, flows: &mut FlowMatrix) -> Result<()> {
        for class in 0..self.graphs.len() {
            let column = self.solve_class(class, flows)?;
            flows.set_column(class, &column)?;
        }
        Ok(())
    }

    /// Jacobi: every class reads `flows` as it was when the cycle began.
    fn simultaneous(&mut self, flows: &FlowMatrix) -> Result<FlowMatrix> {
        let mut staged = FlowMatrix::zeros(flows.links(), flows.classes());
        for class in 0..self.graphs.len() {
            let column = self.solve_class(class, flows)?;
            staged.set_column(class, &column)?;
        }
        Ok(staged)
    }

    fn solve_class(&mut self, class: usize, flows: &FlowMatrix) -> Result<Vec<f64>> {
        let shift = flows.externality(class);
        shift_graph(&self.graphs[class], &shift, &mut self.buffer).map_err(|e| {
            warn!(class, error = %e, "latency shift failed");
            e
        })?;
        trace!(class, externality = shift.iter().sum::<f64>(), "solving class");

        solve_checked(
            &mut *self.solver,
            class,
            &self.buffer,
            &self.demands[class],
            &self.params,
        )
        .map_err(|e: EquilibriumError| {
            warn!(class, error = %e, "equilibrium solver failed");
            e
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::solver::from_fn;

    /// Every link carries `volume / (1 + a0 + a1)`: more perceived latency,
    /// less flow. Deterministic and sensitive to the shift.
    fn damped(graph: &Graph, demand: &Demand, _: &SolverParams) -> std::result::Result<Vec<f64>, BoxError> {
        let v = demand.total_volume();
        Ok(graph
            .links()
            .iter()
            .map(|l| v / (1.0 + l.latency.0[0] + l.latency.0[1]))
            .collect())
    }

    fn one_link(a: [f64; 5]) -> Graph {
        Graph::from_records(&[(0, 0, 1, a)]).expect("test: dense ids")
    }

    fn volume(v: f64) -> Demand {
        Demand::from_triples(&[(0, 1, v)])
    }

    #[test]
    fn gauss_seidel_later_class_sees_same_cycle_update() {
        let graphs = vec![one_link([0.0, 1.0, 0.0, 0.0, 0.0]); 2];
        let demands = vec![volume(2.0), volume(2.0)];
        let config = SchemeConfig::default().with_max_cycles(1);

        let gs = gauss_seidel(&graphs, &demands, &mut from_fn(damped), &config)
            .expect("test: run should succeed");
        // class 0: shift 0 -> 2 / 2 = 1; class 1: shift 1 -> 2 / (1 + 1 + 1)
        assert_eq!(gs.column(0), &[1.0]);
        assert_eq!(gs.column(1), &[2.0 / 3.0]);

        let jc = jacobi(&graphs, &demands, &mut from_fn(damped), &config)
            .expect("test: run should succeed");
        assert_eq!(jc.column(0), &[1.0]);
        assert_eq!(jc.column(1), &[1.0]);
    }

    #[test]
    fn validate_rejects_class_count_mismatch() {
        let err = validate(&[one_link([1.0, 0.0, 0.0, 0.0, 0.0])], &[]);
        assert!(matches!(
            err,
            Err(EquilibriumError::ShapeMismatch(ShapeMismatch::ClassCount { graphs: 1, demands: 0 }))
        ));
    }

    #[test]
    fn validate_rejects_empty_class_list() {
        let err = validate(&[], &[]);
        assert!(matches!(
            err,
            Err(EquilibriumError::ShapeMismatch(ShapeMismatch::NoClasses))
        ));
    }

    #[test]
    fn validate_rejects_disagreeing_topology() {
        let a = Graph::from_records(&[
            (0, 0, 1, [1.0, 0.0, 0.0, 0.0, 0.0]),
            (1, 1, 2, [1.0, 0.0, 0.0, 0.0, 0.0]),
        ])
        .expect("test: dense ids");
        let b = Graph::from_records(&[
            (0, 0, 1, [2.0, 0.0, 0.0, 0.0, 0.0]),
            (1, 2, 1, [1.0, 0.0, 0.0, 0.0, 0.0]),
        ])
        .expect("test: dense ids");
        let c = one_link([1.0, 0.0, 0.0, 0.0, 0.0]);
        let d = vec![volume(1.0); 2];

        assert!(matches!(
            validate(&[a.clone(), b], &d),
            Err(EquilibriumError::ShapeMismatch(ShapeMismatch::Topology { class: 1, link: 1 }))
        ));
        assert!(matches!(
            validate(&[a, c], &d),
            Err(EquilibriumError::ShapeMismatch(ShapeMismatch::LinkCount { class: 1, expected: 2, got: 1 }))
        ));
    }

    #[test]
    fn validate_rejects_demand_outside_graph() {
        let graphs = vec![one_link([1.0, 0.0, 0.0, 0.0, 0.0])];
        let demands = vec![Demand::from_triples(&[(0, 4, 1.0)])];
        assert!(matches!(
            validate(&graphs, &demands),
            Err(EquilibriumError::ShapeMismatch(ShapeMismatch::UnknownNode { node: 4, .. }))
        ));
    }

    #[test]
    fn shape_errors_surface_before_any_solve() {
        let mut calls = 0;
        let mut solver = from_fn(|g, _, _| {
            calls += 1;
            Ok(vec![0.0; g.link_count()])
        });
        let graphs = vec![one_link([1.0, 0.0, 0.0, 0.0, 0.0])];
        let err = run(&graphs, &[volume(1.0), volume(1.0)], &mut solver, &SchemeConfig::default());
        assert!(err.is_err());
        assert_eq!(calls, 0);
    }

    #[test]
    fn overflowing_externality_aborts_run() {
        let graphs = vec![one_link([0.0, 0.0, 0.0, 0.0, 1.0]); 2];
        let demands = vec![volume(1.0); 2];
        let mut solver = from_fn(|_, _, _| Ok(vec![1e100]));
        let err = run(&graphs, &demands, &mut solver, &SchemeConfig::default());
        assert!(
            matches!(err, Err(EquilibriumError::NumericInstability { link: 0, .. })),
            "expected NumericInstability, got {err:?}"
        );
    }
}
