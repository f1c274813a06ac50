// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Multi-class Network Equilibrium - Latency Polynomials

//! Degree-4 link latency curves and the exact argument-shift transform.
//!
//! A curve `sum_k a_k x^k` evaluated at `x + d` is again a degree-4 curve.
//! Its coefficients follow from the binomial expansion:
//!
//! ```text
//! b_i = sum_{j=i}^{4} a_j * d^(j-i) * C(j, i)
//! ```

use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Number of coefficients in a latency curve (`a0..a4`).
pub const COEFFICIENTS: usize = 5;

// ---------------------------------------------------------------------------
// Coefficient algebra
// ---------------------------------------------------------------------------

/// Pascal's triangle, `c[j][i] = C(j, i)`, built by exact integer additions.
fn binomials<T: Float>() -> [[T; COEFFICIENTS]; COEFFICIENTS] {
    let mut c = [[T::zero(); COEFFICIENTS]; COEFFICIENTS];
    for j in 0..COEFFICIENTS {
        c[j][0] = T::one();
        for i in 1..=j {
            let above = if i < j { c[j - 1][i] } else { T::zero() };
            c[j][i] = c[j - 1][i - 1] + above;
        }
    }
    c
}

/// Coefficients of `p(x + offset)` given the coefficients of `p(x)`.
///
/// Shifting by zero returns the input exactly. Large offsets combined with a
/// nonzero quartic term amplify rounding error; no rescaling is attempted.
pub fn shift_coefficients<T: Float>(
    coefficients: &[T; COEFFICIENTS],
    offset: T,
) -> [T; COEFFICIENTS] {
    let binom = binomials::<T>();
    let mut shifted = [T::zero(); COEFFICIENTS];
    for (i, out) in shifted.iter_mut().enumerate() {
        for j in i..COEFFICIENTS {
            *out = *out + coefficients[j] * offset.powi((j - i) as i32) * binom[j][i];
        }
    }
    shifted
}

/// `f64` form of [`shift_coefficients`].
pub fn shift_polynomial(coefficients: [f64; COEFFICIENTS], offset: f64) -> [f64; COEFFICIENTS] {
    shift_coefficients(&coefficients, offset)
}

// ---------------------------------------------------------------------------
// LatencyPolynomial
// ---------------------------------------------------------------------------

/// Travel cost as a function of link flow: `a0 + a1 x + a2 x^2 + a3 x^3 + a4 x^4`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatencyPolynomial(pub [f64; COEFFICIENTS]);

impl LatencyPolynomial {
    pub fn new(coefficients: [f64; COEFFICIENTS]) -> Self {
        Self(coefficients)
    }

    /// Flow-independent cost.
    pub fn constant(cost: f64) -> Self {
        Self([cost, 0.0, 0.0, 0.0, 0.0])
    }

    pub fn coefficients(&self) -> &[f64; COEFFICIENTS] {
        &self.0
    }

    /// The same curve seen by a class whose flow sits on top of `offset`.
    pub fn shifted(&self, offset: f64) -> Self {
        Self(shift_polynomial(self.0, offset))
    }

    /// Horner evaluation at flow `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.0.iter().rev().fold(0.0, |acc, &a| acc * x + a)
    }

    /// Degree of the first non-finite coefficient, if any.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.0.iter().position(|a| !a.is_finite())
    }
}

impl From<[f64; COEFFICIENTS]> for LatencyPolynomial {
    fn from(coefficients: [f64; COEFFICIENTS]) -> Self {
        Self(coefficients)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
