//! Fixed-point schemes coupling the classes through their shared links.

pub mod fixed_point;
pub mod params;

pub use fixed_point::{gauss_seidel, jacobi, run, run_with_report, EquilibriumReport};
pub use params::{Scheme, SchemeConfig};
