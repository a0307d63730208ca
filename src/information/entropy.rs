//! Conditional Entropy of Transitions
//!
//! For an edge u -> v with continuation counts next_counts = {w: n_w}, the
//! conditional entropy is the Shannon entropy (bits) of the successor
//! distribution:
//!
//!   H(next | u -> v) = -Σ_w p_w log₂ p_w,   p_w = n_w / Σ n
//!
//! This is second-order: it depends on where v was entered from, not on
//! v's out-degree. Edges without any recorded continuation get 0.0.

use tracing::debug;

use crate::graph::{EntropyGraph, ScoredTransition, StateLabel, TransitionGraph, WeightedGraph};

/// Shannon entropy in bits of a count distribution.
///
/// Zero counts are ignored. Returns exactly 0.0 when fewer than two
/// positive categories remain.
pub fn shannon_entropy_bits<I>(counts: I) -> f64
where
    I: IntoIterator<Item = u64>,
{
    let counts: Vec<u64> = counts.into_iter().filter(|&c| c > 0).collect();
    if counts.len() < 2 {
        return 0.0;
    }

    let total = counts.iter().sum::<u64>() as f64;
    let mut entropy = 0.0;
    for &c in &counts {
        let p = c as f64 / total;
        entropy -= p * p.log2();
    }

    entropy
}

/// Assign H(next | u -> v) to every edge.
pub fn annotate_edge_entropy<L: StateLabel>(graph: WeightedGraph<L>) -> EntropyGraph<L> {
    let graph = graph.map_edges(|transition| {
        let entropy = shannon_entropy_bits(transition.next_counts.values().copied());
        ScoredTransition { transition, entropy }
    });
    debug!(edges = graph.edge_count(), "annotated edge entropy");
    graph
}

/// Min / max / mean of edge entropies
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EntropySummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl EntropySummary {
    /// Summarize a list of entropies; all zeros when empty
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        Self { min, max, mean }
    }

    /// Summarize every edge of an entropy-bearing graph
    pub fn from_graph<L: StateLabel, N>(graph: &TransitionGraph<L, ScoredTransition<L>, N>) -> Self {
        Self::from_values(&graph.entropy_values())
    }
}
