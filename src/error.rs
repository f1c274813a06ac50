// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Multi-class Network Equilibrium - Error Types

//! Errors surfaced by the fixed-point schemes and their building blocks.

/// Boxed error returned by an [`EquilibriumSolver`](crate::solver::EquilibriumSolver).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EquilibriumError>;

/// Everything that can abort an equilibrium run.
#[derive(Debug, thiserror::Error)]
pub enum EquilibriumError {
    /// Inputs disagree on shape or topology.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(#[from] ShapeMismatch),

    /// A shifted latency coefficient overflowed.
    #[error("non-finite latency coefficient a{degree} on link {link} after shift by {offset}")]
    NumericInstability {
        link: usize,
        degree: usize,
        offset: f64,
    },

    /// The external solver failed or returned an unusable flow vector.
    #[error("solver failed for class {class}: {reason}")]
    SolverFailure {
        class: usize,
        #[source]
        reason: SolverFault,
    },

    /// A demand share outside `[0, 1]`.
    #[error("demand share must lie in [0, 1], got {0}")]
    InvalidShare(f64),

    /// A scheme configuration document could not be parsed.
    #[error("invalid scheme configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Shape problems detected before any iteration starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeMismatch {
    #[error("no classes supplied")]
    NoClasses,

    #[error("{graphs} class graphs but {demands} class demands")]
    ClassCount { graphs: usize, demands: usize },

    #[error("class {class} graph has {got} links, expected {expected}")]
    LinkCount {
        class: usize,
        expected: usize,
        got: usize,
    },

    #[error("class {class} graph disagrees on the endpoints of link {link}")]
    Topology { class: usize, link: usize },

    #[error("link ids are not dense: position {position} holds id {id}")]
    SparseLinkIds { position: usize, id: usize },

    #[error("demand pair {pair} references node {node} outside 0..{node_count}")]
    UnknownNode {
        pair: usize,
        node: usize,
        node_count: usize,
    },

    #[error("destination graph does not share the source's links and endpoints")]
    Destination,

    #[error("{got} per-link values for a graph of {expected} links")]
    VectorLength { expected: usize, got: usize },
}

/// Why a solver result was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SolverFault {
    #[error("{0}")]
    Raised(#[source] BoxError),

    #[error("returned {got} flows for {expected} links")]
    WrongLength { expected: usize, got: usize },

    #[error("negative flow {value} on link {link}")]
    NegativeFlow { link: usize, value: f64 },

    #[error("non-finite flow on link {link}")]
    NonFiniteFlow { link: usize },
}
