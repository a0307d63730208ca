//! Second-Order Entropy: Hub Routing Check
//!
//! The sequence (A B C X B D) repeated ten times routes every visit to B
//! deterministically:
//!
//! - A -> B is always followed by C
//! - X -> B is always followed by D
//!
//! A first-order view of B sees two equally likely successors (1 bit).
//! Conditioned on the incoming transition, every edge entropy is 0.

use transition_entropy::{
    build_transition_graph, annotate_edge_entropy, aggregate_node_entropy, shannon_entropy_bits,
    EntropySummary,
};

fn main() {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Second-Order Transition Entropy: Hub Routing Check");
    println!("═══════════════════════════════════════════════════════════════\n");

    let cycle = ["A", "B", "C", "X", "B", "D"];
    let repeats = 10;
    let sequence: Vec<String> = (0..repeats)
        .flat_map(|_| cycle.iter().map(|s| s.to_string()))
        .collect();

    println!("Sequence:");
    println!("  ({}) x {}", cycle.join(" "), repeats);
    println!("  Length = {}\n", sequence.len());

    let weighted = build_transition_graph(&sequence, false);
    println!("Transition graph:");
    println!("  Nodes = {}", weighted.node_count());
    println!("  Edges = {}\n", weighted.edge_count());

    // First-order view of B: successors pooled over all predecessors
    let b = "B".to_string();
    let first_order: Vec<u64> = weighted
        .outgoing_edges(&b)
        .map(|e| e.data.weight)
        .collect();
    let h_first = shannon_entropy_bits(first_order.iter().copied());

    let scored = annotate_edge_entropy(weighted);
    let values = scored.entropy_values();
    let summary = EntropySummary::from_values(&values);

    println!("Edge entropies H(next | u -> v):");
    println!("  ┌──────────┬────────┬──────────────┐");
    println!("  │ Edge     │ Weight │ Entropy (b)  │");
    println!("  ├──────────┼────────┼──────────────┤");
    for edge in scored.edges() {
        println!(
            "  │ {:>2} -> {:<2} │ {:>6} │ {:>12.4} │",
            edge.source, edge.target, edge.data.transition.weight, edge.data.entropy
        );
    }
    println!("  └──────────┴────────┴──────────────┘\n");

    let annotated = aggregate_node_entropy(scored);

    println!("In-entropy sums:");
    for (label, sum) in annotated.ranked_by_in_entropy() {
        println!("  {:<3} {:.4}", label, sum);
    }
    println!();

    println!("═══════════════════════════════════════════════════════════════");
    println!("  RESULT");
    println!("═══════════════════════════════════════════════════════════════\n");
    println!("  First-order  H(next | B)        = {:.4} bits", h_first);
    println!("  Second-order max H(next | u->v) = {:.4} bits", summary.max);
    println!("  Mean edge entropy               = {:.4} bits\n", summary.mean);

    if summary.max == 0.0 && h_first > 0.0 {
        println!("  ✓ Hub B routes deterministically once its predecessor is known");
    } else {
        println!("  ✗ Unexpected residual uncertainty at the hub");
    }
}
