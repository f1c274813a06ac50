// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Multi-class Network Equilibrium - Latency Field Update

//! Re-derives every link's latency curve under a per-link flow offset.
//!
//! The destination graph is a caller-owned buffer reused across the many
//! updates of a run; only its latency coefficients are written.

use crate::error::{EquilibriumError, Result, ShapeMismatch};
use crate::types::Graph;

/// Write `source`'s curves shifted by `offsets[link]` into `destination`.
///
/// `destination` must already carry `source`'s links and endpoints. A
/// non-finite shifted coefficient aborts the update with
/// [`EquilibriumError::NumericInstability`]; links before the failing one
/// have already been rewritten.
pub fn shift_graph(source: &Graph, offsets: &[f64], destination: &mut Graph) -> Result<()> {
    if offsets.len() != source.link_count() {
        return Err(ShapeMismatch::VectorLength {
            expected: source.link_count(),
            got: offsets.len(),
        }
        .into());
    }
    if !source.same_topology(destination) {
        return Err(ShapeMismatch::Destination.into());
    }

    for (link, &offset) in source.links().iter().zip(offsets) {
        let shifted = link.latency.shifted(offset);
        if let Some(degree) = shifted.first_non_finite() {
            return Err(EquilibriumError::NumericInstability {
                link: link.id,
                degree,
                offset,
            });
        }
        if let Some(latency) = destination.latency_mut(link.id) {
            *latency = shifted;
        }
    }
    Ok(())
}

impl Graph {
    /// Fresh copy of this graph with every curve shifted by its offset.
    pub fn shifted(&self, offsets: &[f64]) -> Result<Graph> {
        let mut out = self.clone();
        shift_graph(self, offsets, &mut out)?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::shift_polynomial;

    fn network() -> Graph {
        Graph::from_records(&[
            (0, 0, 1, [1.0, 0.0, 0.0, 0.0, 0.15]),
            (1, 0, 2, [2.0, 1.0, 0.0, 0.0, 0.0]),
            (2, 2, 1, [0.5, 0.0, 1.0, 0.0, 0.0]),
        ])
        .expect("test: dense ids")
    }

    #[test]
    fn shift_preserves_ids_and_endpoints() {
        let source = network();
        let mut dest = source.clone();
        shift_graph(&source, &[3.0, 0.0, 1.5], &mut dest).expect("test: shift should succeed");

        for (a, b) in source.links().iter().zip(dest.links()) {
            assert_eq!((a.id, a.tail, a.head), (b.id, b.tail, b.head));
        }
        assert_eq!(dest.links()[0].latency.0, shift_polynomial(source.links()[0].latency.0, 3.0));
        assert_eq!(dest.links()[1].latency, source.links()[1].latency);
        assert_eq!(dest.links()[2].latency.0, [2.75, 3.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn buffer_reuse_always_shifts_from_source() {
        let source = network();
        let mut dest = source.clone();
        shift_graph(&source, &[1.0, 1.0, 1.0], &mut dest).expect("test: first shift");
        shift_graph(&source, &[1.0, 1.0, 1.0], &mut dest).expect("test: second shift");
        assert_eq!(dest.links()[1].latency.0, [3.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn offset_length_must_match_links() {
        let source = network();
        let mut dest = source.clone();
        let err = shift_graph(&source, &[1.0], &mut dest);
        assert!(
            matches!(
                err,
                Err(EquilibriumError::ShapeMismatch(ShapeMismatch::VectorLength { expected: 3, got: 1 }))
            ),
            "expected VectorLength, got {err:?}"
        );
    }

    #[test]
    fn destination_topology_must_match() {
        let source = network();
        let mut dest = Graph::from_records(&[(0, 0, 1, [1.0, 0.0, 0.0, 0.0, 0.0])])
            .expect("test: dense ids");
        let err = shift_graph(&source, &[0.0, 0.0, 0.0], &mut dest);
        assert!(matches!(
            err,
            Err(EquilibriumError::ShapeMismatch(ShapeMismatch::Destination))
        ));
    }

    #[test]
    fn overflowing_shift_is_reported_not_clamped() {
        let source = network();
        let err = source.shifted(&[1e90, 0.0, 0.0]);
        assert!(
            matches!(err, Err(EquilibriumError::NumericInstability { link: 0, degree: 0, .. })),
            "expected NumericInstability, got {err:?}"
        );
    }
}
