//! In-Entropy Aggregation per Node
//!
//! in_entropy_sum(n) = Σ_{x -> n} H(next | x -> n)
//!
//! A plain sum, not an average: a node reached through many moderately
//! unpredictable transitions ranks above one reached through a single
//! highly unpredictable transition.

use std::cmp::Ordering;

use tracing::debug;

use crate::graph::{AnnotatedGraph, EntropyGraph, NodeEntropy, StateLabel};

/// Attach the in-entropy sum to every node.
///
/// Only an `EntropyGraph` is accepted, so entropy is always present.
pub fn aggregate_node_entropy<L: StateLabel>(graph: EntropyGraph<L>) -> AnnotatedGraph<L> {
    let sums: Vec<f64> = graph
        .nodes()
        .map(|node| graph.incoming_edges(&node.label).map(|e| e.data.entropy).sum::<f64>())
        .collect();

    let graph = graph.map_nodes(|i, ()| NodeEntropy { in_entropy_sum: sums[i] });
    debug!(nodes = graph.node_count(), "aggregated node in-entropy");
    graph
}

impl<L: StateLabel> AnnotatedGraph<L> {
    /// Nodes ranked by in-entropy sum, highest first; ties by label
    pub fn ranked_by_in_entropy(&self) -> Vec<(&L, f64)> {
        let mut ranked: Vec<(&L, f64)> = self
            .nodes()
            .map(|n| (&n.label, n.data.in_entropy_sum))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
    }
}
