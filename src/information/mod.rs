//! Information Module: Conditional Entropy on Transition Graphs
//!
//! ## Edge entropy (second order)
//!
//! For each transition u -> v the successor distribution is estimated from
//! the counts of u -> v -> w, and its Shannon entropy (bits) is recorded:
//!
//!   H(next | u -> v) = -Σ_w p(w | u, v) log₂ p(w | u, v)
//!
//! Arriving at v from different predecessors can lead to entirely
//! different, individually deterministic continuations. A first-order view
//! of v's out-edges would report uncertainty there; this measure does not.
//!
//! ## Node aggregate
//!
//! The in-entropy sum of a node adds the entropies of all its incoming
//! edges. It ranks "hub instability" rather than average unpredictability.

mod entropy;
mod node;

pub use entropy::{EntropySummary, annotate_edge_entropy, shannon_entropy_bits};
pub use node::aggregate_node_entropy;
