// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Multi-class Network Equilibrium - Flow Matrix

//! Links x classes table of flows, stored column by column so that a class's
//! flow vector is one contiguous slice.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeMismatch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMatrix {
    links: usize,
    classes: usize,
    data: Vec<f64>,
}

impl FlowMatrix {
    /// All-zero matrix.
    pub fn zeros(links: usize, classes: usize) -> Self {
        Self {
            links,
            classes,
            data: vec![0.0; links * classes],
        }
    }

    /// Build from one flow vector per class.
    pub fn from_columns(links: usize, columns: &[Vec<f64>]) -> Result<Self> {
        let mut m = Self::zeros(links, columns.len());
        for (class, column) in columns.iter().enumerate() {
            m.set_column(class, column)?;
        }
        Ok(m)
    }

    pub fn links(&self) -> usize {
        self.links
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Class `class`'s flow on `link`.
    pub fn get(&self, link: usize, class: usize) -> f64 {
        self.data[class * self.links + link]
    }

    pub fn column(&self, class: usize) -> &[f64] {
        let start = class * self.links;
        &self.data[start..start + self.links]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.classes).map(move |c| self.column(c))
    }

    /// Overwrite one class's flow vector.
    pub fn set_column(&mut self, class: usize, flows: &[f64]) -> Result<()> {
        if flows.len() != self.links {
            return Err(ShapeMismatch::VectorLength {
                expected: self.links,
                got: flows.len(),
            }
            .into());
        }
        let start = class * self.links;
        self.data[start..start + self.links].copy_from_slice(flows);
        Ok(())
    }

    /// Per-link flow of every class except `class`.
    pub fn externality(&self, class: usize) -> Vec<f64> {
        let mut shift = vec![0.0; self.links];
        for other in (0..self.classes).filter(|&c| c != class) {
            for (s, &f) in shift.iter_mut().zip(self.column(other)) {
                *s += f;
            }
        }
        shift
    }

    /// Row sums: total congestion per link.
    pub fn link_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.links];
        for column in self.columns() {
            for (t, &f) in totals.iter_mut().zip(column) {
                *t += f;
            }
        }
        totals
    }

    /// Largest absolute cell difference; infinite when shapes differ.
    pub fn max_abs_diff(&self, other: &FlowMatrix) -> f64 {
        if self.links != other.links || self.classes != other.classes {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlowMatrix {
        FlowMatrix::from_columns(
            2,
            &[vec![1.0, 2.0], vec![10.0, 20.0], vec![100.0, 200.0]],
        )
        .expect("test: columns have link length")
    }

    #[test]
    fn zeros_has_requested_shape() {
        let m = FlowMatrix::zeros(4, 3);
        assert_eq!((m.links(), m.classes()), (4, 3));
        assert!(m.columns().all(|c| c.iter().all(|&f| f == 0.0)));
    }

    #[test]
    fn externality_excludes_own_class() {
        let m = sample();
        assert_eq!(m.externality(0), vec![110.0, 220.0]);
        assert_eq!(m.externality(1), vec![101.0, 202.0]);
        assert_eq!(m.externality(2), vec![11.0, 22.0]);
    }

    #[test]
    fn single_class_externality_is_zero() {
        let m = FlowMatrix::from_columns(3, &[vec![4.0, 5.0, 6.0]]).expect("test: one column");
        assert_eq!(m.externality(0), vec![0.0; 3]);
    }

    #[test]
    fn link_totals_sum_rows() {
        assert_eq!(sample().link_totals(), vec![111.0, 222.0]);
    }

    #[test]
    fn cell_and_column_views_agree() {
        let m = sample();
        assert_eq!(m.get(1, 2), 200.0);
        assert_eq!(m.column(1), &[10.0, 20.0]);
    }

    #[test]
    fn set_column_checks_length() {
        let mut m = FlowMatrix::zeros(2, 1);
        assert!(m.set_column(0, &[1.0, 2.0, 3.0]).is_err());
        m.set_column(0, &[1.0, 2.0]).expect("test: matching length");
        assert_eq!(m.column(0), &[1.0, 2.0]);
    }

    #[test]
    fn max_abs_diff_finds_largest_change() {
        let a = sample();
        let mut b = a.clone();
        b.set_column(1, &[10.5, 17.0]).expect("test: matching length");
        assert_eq!(a.max_abs_diff(&b), 3.0);
        assert_eq!(a.max_abs_diff(&FlowMatrix::zeros(2, 1)), f64::INFINITY);
    }
}
