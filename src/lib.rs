// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Multi-class Network Equilibrium

//! Fixed-point equilibrium for several classes of flow sharing one network.
//!
//! Each class perceives a link's latency curve shifted by the flow every
//! other class puts on that link. A [`Scheme`] cycles over the classes,
//! shifting the curves ([`shift_graph`]) and handing the resulting
//! single-class problem to an [`EquilibriumSolver`] supplied by the caller.

pub mod error;
pub mod flow;
pub mod latency;
pub mod polynomial;
pub mod scheme;
pub mod solver;
pub mod types;

pub use error::{EquilibriumError, Result, ShapeMismatch, SolverFault};
pub use flow::FlowMatrix;
pub use latency::shift_graph;
pub use polynomial::{shift_polynomial, LatencyPolynomial};
pub use scheme::{gauss_seidel, jacobi, run, run_with_report, EquilibriumReport, Scheme, SchemeConfig};
pub use solver::{EquilibriumSolver, SolverParams};
pub use types::{Demand, Graph, Link, OdPair};
