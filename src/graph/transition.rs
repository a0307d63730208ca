//! Transition Graph: Typed Stages over a Directed Graph
//!
//! One generic container, three stages:
//!
//! ```text
//! WeightedGraph   ── annotate ──▶  EntropyGraph  ── aggregate ──▶  AnnotatedGraph
//! edges: Transition               edges: ScoredTransition         + nodes: NodeEntropy
//! ```
//!
//! Stage transitions consume the previous value, so a stage's invariants
//! ("every edge has an entropy") are carried by its type.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// Requirements on a state label: an opaque, ordered, hashable token
pub trait StateLabel: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> StateLabel for T {}

/// First- and second-order counts for one directed transition u -> v
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<L> {
    /// Number of u -> v occurrences (>= 1)
    pub weight: u64,
    /// Successor w -> number of u -> v -> w occurrences
    pub next_counts: BTreeMap<L, u64>,
}

impl<L: Ord> Transition<L> {
    /// A transition observed once, with no recorded continuation yet
    pub fn observed_once() -> Self {
        Self {
            weight: 1,
            next_counts: BTreeMap::new(),
        }
    }

    /// Total number of recorded continuations (<= weight)
    pub fn continuation_total(&self) -> u64 {
        self.next_counts.values().sum()
    }

    pub(crate) fn record_successor(&mut self, successor: L) {
        *self.next_counts.entry(successor).or_insert(0) += 1;
    }
}

impl<L> AsRef<Transition<L>> for Transition<L> {
    fn as_ref(&self) -> &Transition<L> {
        self
    }
}

/// A transition together with its conditional entropy (bits)
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTransition<L> {
    pub transition: Transition<L>,
    /// H(next | u -> v), always >= 0
    pub entropy: f64,
}

impl<L> AsRef<Transition<L>> for ScoredTransition<L> {
    fn as_ref(&self) -> &Transition<L> {
        &self.transition
    }
}

/// Per-node aggregate of incoming edge entropies
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeEntropy {
    /// Sum of entropy over all incoming edges (0.0 without incoming edges)
    pub in_entropy_sum: f64,
}

/// A node: its label plus stage-specific data
#[derive(Debug, Clone, PartialEq)]
pub struct StateNode<L, N> {
    pub label: L,
    pub data: N,
}

/// Borrowed view of one edge
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a, L, E> {
    pub source: &'a L,
    pub target: &'a L,
    pub data: &'a E,
}

/// Directed transition graph, generic over edge and node payloads
#[derive(Debug, Clone)]
pub struct TransitionGraph<L, E, N = ()> {
    graph: DiGraph<StateNode<L, N>, E>,
    node_lookup: HashMap<L, NodeIndex>,
    edge_lookup: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
}

/// Builder output: weights and continuation counts
pub type WeightedGraph<L> = TransitionGraph<L, Transition<L>>;

/// Every edge carries a conditional entropy
pub type EntropyGraph<L> = TransitionGraph<L, ScoredTransition<L>>;

/// Every edge carries entropy and every node its in-entropy sum
pub type AnnotatedGraph<L> = TransitionGraph<L, ScoredTransition<L>, NodeEntropy>;

impl<L: StateLabel, E, N> TransitionGraph<L, E, N> {
    pub(crate) fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_lookup: HashMap::new(),
            edge_lookup: HashMap::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// No nodes (and hence no edges)
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, label: &L) -> bool {
        self.node_lookup.contains_key(label)
    }

    pub fn contains_edge(&self, source: &L, target: &L) -> bool {
        self.edge_index(source, target).is_some()
    }

    /// Node by label
    pub fn node(&self, label: &L) -> Option<&StateNode<L, N>> {
        self.node_lookup.get(label).map(|&idx| &self.graph[idx])
    }

    /// Nodes in first-seen order
    pub fn nodes(&self) -> impl Iterator<Item = &StateNode<L, N>> + '_ {
        self.graph.node_weights()
    }

    /// Edge payload for u -> v
    pub fn edge(&self, source: &L, target: &L) -> Option<&E> {
        self.edge_index(source, target).map(|idx| &self.graph[idx])
    }

    /// Edges in first-seen order
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_, L, E>> + '_ {
        self.graph.edge_references().map(move |e| self.view(e.source(), e.target(), e.weight()))
    }

    /// Edges whose target is `label`
    pub fn incoming_edges<'a>(&'a self, label: &L) -> impl Iterator<Item = EdgeView<'a, L, E>> + 'a {
        self.directed_edges(label, Direction::Incoming)
    }

    /// Edges whose source is `label`
    pub fn outgoing_edges<'a>(&'a self, label: &L) -> impl Iterator<Item = EdgeView<'a, L, E>> + 'a {
        self.directed_edges(label, Direction::Outgoing)
    }

    fn directed_edges<'a>(
        &'a self,
        label: &L,
        direction: Direction,
    ) -> impl Iterator<Item = EdgeView<'a, L, E>> + 'a {
        let idx = self.node_lookup.get(label).copied();
        idx.into_iter().flat_map(move |idx| {
            self.graph
                .edges_directed(idx, direction)
                .map(move |e| self.view(e.source(), e.target(), e.weight()))
        })
    }

    fn view<'a>(&'a self, source: NodeIndex, target: NodeIndex, data: &'a E) -> EdgeView<'a, L, E> {
        EdgeView {
            source: &self.graph[source].label,
            target: &self.graph[target].label,
            data,
        }
    }

    fn edge_index(&self, source: &L, target: &L) -> Option<EdgeIndex> {
        let u = *self.node_lookup.get(source)?;
        let v = *self.node_lookup.get(target)?;
        self.edge_lookup.get(&(u, v)).copied()
    }

    /// Get-or-insert a node; existing node data is left untouched
    pub(crate) fn insert_node(&mut self, label: L, data: N) -> NodeIndex {
        if let Some(&idx) = self.node_lookup.get(&label) {
            return idx;
        }
        let idx = self.graph.add_node(StateNode { label: label.clone(), data });
        self.node_lookup.insert(label, idx);
        idx
    }

    /// Insert u -> v; returns false (and drops `data`) if it already exists
    pub(crate) fn insert_edge(&mut self, source: NodeIndex, target: NodeIndex, data: E) -> bool {
        if self.edge_lookup.contains_key(&(source, target)) {
            return false;
        }
        let idx = self.graph.add_edge(source, target, data);
        self.edge_lookup.insert((source, target), idx);
        true
    }

    pub(crate) fn edge_mut(&mut self, source: NodeIndex, target: NodeIndex) -> Option<&mut E> {
        let idx = *self.edge_lookup.get(&(source, target))?;
        self.graph.edge_weight_mut(idx)
    }

    pub(crate) fn node_index(&self, label: &L) -> Option<NodeIndex> {
        self.node_lookup.get(label).copied()
    }

    /// Replace every edge payload; node and edge order are preserved
    pub(crate) fn map_edges<E2>(self, mut f: impl FnMut(E) -> E2) -> TransitionGraph<L, E2, N> {
        let (nodes, edges) = self.graph.into_nodes_edges();
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        for node in nodes {
            graph.add_node(node.weight);
        }
        for edge in edges {
            graph.add_edge(edge.source(), edge.target(), f(edge.weight));
        }
        TransitionGraph {
            graph,
            node_lookup: self.node_lookup,
            edge_lookup: self.edge_lookup,
        }
    }

    /// Replace every node payload; `f` receives the node's position
    pub(crate) fn map_nodes<N2>(self, mut f: impl FnMut(usize, N) -> N2) -> TransitionGraph<L, E, N2> {
        let (nodes, edges) = self.graph.into_nodes_edges();
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        for (i, node) in nodes.into_iter().enumerate() {
            let StateNode { label, data } = node.weight;
            graph.add_node(StateNode { label, data: f(i, data) });
        }
        for edge in edges {
            graph.add_edge(edge.source(), edge.target(), edge.weight);
        }
        TransitionGraph {
            graph,
            node_lookup: self.node_lookup,
            edge_lookup: self.edge_lookup,
        }
    }
}

impl<L: StateLabel, E: AsRef<Transition<L>>, N> TransitionGraph<L, E, N> {
    /// Count of u -> v occurrences
    pub fn weight(&self, source: &L, target: &L) -> Option<u64> {
        self.edge(source, target).map(|e| e.as_ref().weight)
    }

    /// Continuation counts recorded after u -> v
    pub fn next_counts(&self, source: &L, target: &L) -> Option<&BTreeMap<L, u64>> {
        self.edge(source, target).map(|e| &e.as_ref().next_counts)
    }

    /// Weighted in-degree
    pub fn in_weight(&self, label: &L) -> u64 {
        self.incoming_edges(label).map(|e| e.data.as_ref().weight).sum()
    }

    /// Weighted out-degree
    pub fn out_weight(&self, label: &L) -> u64 {
        self.outgoing_edges(label).map(|e| e.data.as_ref().weight).sum()
    }

    /// Sum of all edge weights (number of counted transitions)
    pub fn total_weight(&self) -> u64 {
        self.graph.edge_weights().map(|e| e.as_ref().weight).sum()
    }
}

impl<L: StateLabel, N> TransitionGraph<L, ScoredTransition<L>, N> {
    /// Conditional entropy of u -> v
    pub fn entropy(&self, source: &L, target: &L) -> Option<f64> {
        self.edge(source, target).map(|e| e.entropy)
    }

    /// Entropy of every edge, in edge iteration order
    pub fn entropy_values(&self) -> Vec<f64> {
        self.graph.edge_weights().map(|e| e.entropy).collect()
    }
}

impl<L: StateLabel, E> TransitionGraph<L, E, NodeEntropy> {
    /// Sum of incoming edge entropies for a node
    pub fn in_entropy_sum(&self, label: &L) -> Option<f64> {
        self.node(label).map(|n| n.data.in_entropy_sum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> WeightedGraph<&'static str> {
        let mut g = WeightedGraph::new();
        let a = g.insert_node("A", ());
        let b = g.insert_node("B", ());
        let c = g.insert_node("C", ());
        assert!(g.insert_edge(a, b, Transition { weight: 3, next_counts: BTreeMap::new() }));
        assert!(g.insert_edge(c, b, Transition::observed_once()));
        assert!(g.insert_edge(b, a, Transition { weight: 2, next_counts: BTreeMap::new() }));
        g
    }

    #[test]
    fn test_insert_node_is_idempotent() {
        let mut g = small();
        let again = g.insert_node("A", ());
        assert_eq!(g.node_index(&"A"), Some(again));
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let mut g = small();
        let a = g.node_index(&"A").unwrap();
        let b = g.node_index(&"B").unwrap();
        assert!(!g.insert_edge(a, b, Transition::observed_once()));
        assert_eq!(g.weight(&"A", &"B"), Some(3));
    }

    #[test]
    fn test_weighted_degrees() {
        let g = small();
        assert_eq!(g.in_weight(&"B"), 4);
        assert_eq!(g.out_weight(&"B"), 2);
        assert_eq!(g.in_weight(&"C"), 0);
        assert_eq!(g.in_weight(&"missing"), 0);
        assert_eq!(g.total_weight(), 6);
    }

    #[test]
    fn test_edge_order_is_insertion_order() {
        let g = small();
        let pairs: Vec<(&str, &str)> = g.edges().map(|e| (*e.source, *e.target)).collect();
        assert_eq!(pairs, vec![("A", "B"), ("C", "B"), ("B", "A")]);
    }

    #[test]
    fn test_map_edges_keeps_lookup() {
        let g = small().map_edges(|t| ScoredTransition { transition: t, entropy: 0.5 });
        assert_eq!(g.entropy(&"C", &"B"), Some(0.5));
        assert_eq!(g.weight(&"B", &"A"), Some(2));
        assert_eq!(g.entropy_values().len(), 3);
    }
}
