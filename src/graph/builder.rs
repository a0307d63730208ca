//! Transition Graph Builder
//!
//! Two linear passes over the sequence:
//!
//! 1. Weights: every adjacent pair (sᵢ, sᵢ₊₁) increments weight(sᵢ, sᵢ₊₁).
//! 2. Context: every triple (sᵢ, sᵢ₊₁, sᵢ₊₂) increments
//!    next_counts[sᵢ₊₂] on edge (sᵢ, sᵢ₊₁).
//!
//! With `ignore_self_loops`, a pair u -> u never becomes an edge and is
//! never the context of a triple. It may still be counted as a successor.

use tracing::debug;

use super::transition::{StateLabel, Transition, WeightedGraph};

/// Build the weighted transition graph of a sequence.
///
/// Every distinct label of the sequence becomes a node, even when it takes
/// part in no counted transition. Sequences shorter than two elements
/// produce no edges.
pub fn build_transition_graph<L: StateLabel>(sequence: &[L], ignore_self_loops: bool) -> WeightedGraph<L> {
    let mut graph = WeightedGraph::new();

    let indices: Vec<_> = sequence
        .iter()
        .map(|label| graph.insert_node(label.clone(), ()))
        .collect();

    let skipped = |u: usize, v: usize| ignore_self_loops && sequence[u] == sequence[v];

    for i in 0..sequence.len().saturating_sub(1) {
        if skipped(i, i + 1) {
            continue;
        }
        let (u, v) = (indices[i], indices[i + 1]);
        match graph.edge_mut(u, v) {
            Some(transition) => transition.weight += 1,
            None => {
                graph.insert_edge(u, v, Transition::observed_once());
            }
        }
    }

    for i in 0..sequence.len().saturating_sub(2) {
        if skipped(i, i + 1) {
            continue;
        }
        if let Some(transition) = graph.edge_mut(indices[i], indices[i + 1]) {
            transition.record_successor(sequence[i + 2].clone());
        }
    }

    debug!(
        len = sequence.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        ignore_self_loops,
        "built transition graph"
    );
    graph
}
