//! Graph Module: Weighted Transition Graphs with Second-Order Context
//!
//! Nodes are the distinct state labels of a sequence; an edge u -> v exists
//! when u was immediately followed by v at least once. Each edge carries:
//!
//! - `weight`: number of u -> v occurrences
//! - `next_counts`: for each w, number of u -> v -> w occurrences
//!
//! `next_counts` is the second-order context from which the conditional
//! entropy H(next | u -> v) is computed in the `information` module.

mod builder;
mod snapshot;
mod transition;

pub use builder::build_transition_graph;
pub use snapshot::{EdgeAttributes, EdgeRecord, GraphSnapshot, NodeAttributes, NodeRecord};
pub use transition::{
    AnnotatedGraph, EdgeView, EntropyGraph, NodeEntropy, ScoredTransition, StateLabel, StateNode,
    Transition, TransitionGraph, WeightedGraph,
};
