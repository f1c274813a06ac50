// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Multi-class Network Equilibrium - Type Definitions

use serde::{Deserialize, Serialize};

use crate::error::{EquilibriumError, Result, ShapeMismatch};
use crate::polynomial::{LatencyPolynomial, COEFFICIENTS};

// ─── Link ───────────────────────────────────────────────────────────────────

/// A directed link with its latency curve.
///
/// `id`, `tail` and `head` are shared by every class; only `latency`
/// differs between a class's working copy and the source graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: usize,
    pub tail: usize,
    pub head: usize,
    pub latency: LatencyPolynomial,
}

impl Link {
    pub fn new(id: usize, tail: usize, head: usize, latency: LatencyPolynomial) -> Self {
        Self { id, tail, head, latency }
    }

    /// Same id and endpoints.
    pub fn same_endpoints(&self, other: &Link) -> bool {
        self.id == other.id && self.tail == other.tail && self.head == other.head
    }
}

// ─── Graph ──────────────────────────────────────────────────────────────────

/// Links ordered by id. The link count is the length of every flow vector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    links: Vec<Link>,
}

impl Graph {
    /// Build a graph, requiring `links[k].id == k`.
    pub fn new(links: Vec<Link>) -> Result<Self> {
        let graph = Self { links };
        graph.check_ids()?;
        Ok(graph)
    }

    /// Deserialized graphs skip [`Graph::new`], so runs re-check this.
    pub fn check_ids(&self) -> Result<()> {
        match self.links.iter().enumerate().find(|(k, l)| l.id != *k) {
            Some((position, link)) => {
                Err(ShapeMismatch::SparseLinkIds { position, id: link.id }.into())
            }
            None => Ok(()),
        }
    }

    /// Build from `(link_id, tail, head, a0, a1, a2, a3, a4)` records.
    ///
    /// Records may arrive in any order; ids must cover `0..records.len()`.
    pub fn from_records(records: &[(usize, usize, usize, [f64; COEFFICIENTS])]) -> Result<Self> {
        let mut links: Vec<Link> = records
            .iter()
            .map(|&(id, tail, head, a)| Link::new(id, tail, head, LatencyPolynomial::new(a)))
            .collect();
        links.sort_by_key(|l| l.id);
        Self::new(links)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, id: usize) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Nodes are numbered `0..node_count()`.
    pub fn node_count(&self) -> usize {
        self.links
            .iter()
            .map(|l| l.tail.max(l.head) + 1)
            .max()
            .unwrap_or(0)
    }

    /// First link whose id or endpoints differ from `other`'s, or `Err` on a
    /// link count difference.
    pub(crate) fn topology_mismatch(&self, other: &Graph) -> std::result::Result<Option<usize>, (usize, usize)> {
        if self.link_count() != other.link_count() {
            return Err((self.link_count(), other.link_count()));
        }
        Ok(self
            .links
            .iter()
            .zip(&other.links)
            .position(|(a, b)| !a.same_endpoints(b)))
    }

    /// Whether `other` has exactly this graph's links and endpoints.
    pub fn same_topology(&self, other: &Graph) -> bool {
        matches!(self.topology_mismatch(other), Ok(None))
    }

    pub(crate) fn latency_mut(&mut self, id: usize) -> Option<&mut LatencyPolynomial> {
        self.links.get_mut(id).map(|l| &mut l.latency)
    }

    /// Per-link travel cost at the given flows.
    pub fn link_costs(&self, flows: &[f64]) -> Result<Vec<f64>> {
        if flows.len() != self.link_count() {
            return Err(ShapeMismatch::VectorLength {
                expected: self.link_count(),
                got: flows.len(),
            }
            .into());
        }
        Ok(self
            .links
            .iter()
            .zip(flows)
            .map(|(l, &x)| l.latency.eval(x))
            .collect())
    }
}

// ─── Demand ─────────────────────────────────────────────────────────────────

/// Volume travelling from `origin` to `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OdPair {
    pub origin: usize,
    pub destination: usize,
    pub volume: f64,
}

/// One class's origin-destination table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Demand {
    pairs: Vec<OdPair>,
}

impl Demand {
    pub fn new(pairs: Vec<OdPair>) -> Self {
        Self { pairs }
    }

    /// Build from `(origin, destination, volume)` triples.
    pub fn from_triples(triples: &[(usize, usize, f64)]) -> Self {
        Self::new(
            triples
                .iter()
                .map(|&(origin, destination, volume)| OdPair { origin, destination, volume })
                .collect(),
        )
    }

    pub fn pairs(&self) -> &[OdPair] {
        &self.pairs
    }

    pub fn total_volume(&self) -> f64 {
        self.pairs.iter().map(|p| p.volume).sum()
    }

    /// Volumes multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.pairs
                .iter()
                .map(|p| OdPair { volume: p.volume * factor, ..*p })
                .collect(),
        )
    }

    /// Split into `(non_routed, routed)` demand where a share `alpha` of every
    /// pair's volume is routed.
    pub fn split(&self, alpha: f64) -> Result<(Demand, Demand)> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(EquilibriumError::InvalidShare(alpha));
        }
        Ok((self.scaled(1.0 - alpha), self.scaled(alpha)))
    }

    /// Reject pairs whose endpoints fall outside `0..node_count`.
    pub fn check_nodes(&self, node_count: usize) -> Result<()> {
        for (pair, od) in self.pairs.iter().enumerate() {
            for node in [od.origin, od.destination] {
                if node >= node_count {
                    return Err(ShapeMismatch::UnknownNode { pair, node, node_count }.into());
                }
            }
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
