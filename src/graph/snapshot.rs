//! Graph Snapshots: Serializable Value Objects
//!
//! A snapshot is the flat, serde-friendly form of any graph stage. It is
//! what the JSON exporter writes, and the only way to rebuild an
//! `EntropyGraph` from outside the pipeline. Rebuilding checks every
//! invariant the typed stages otherwise guarantee by construction.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::transition::{
    NodeEntropy, ScoredTransition, StateLabel, Transition, TransitionGraph, EntropyGraph,
    WeightedGraph,
};
use crate::error::{AnalysisError, Result};

/// Edge payloads that can report an entropy value
pub trait EdgeAttributes<L>: AsRef<Transition<L>> {
    fn entropy(&self) -> Option<f64>;
}

impl<L> EdgeAttributes<L> for Transition<L> {
    fn entropy(&self) -> Option<f64> {
        None
    }
}

impl<L> EdgeAttributes<L> for ScoredTransition<L> {
    fn entropy(&self) -> Option<f64> {
        Some(self.entropy)
    }
}

/// Node payloads that can report an in-entropy sum
pub trait NodeAttributes {
    fn in_entropy_sum(&self) -> Option<f64>;
}

impl NodeAttributes for () {
    fn in_entropy_sum(&self) -> Option<f64> {
        None
    }
}

impl NodeAttributes for NodeEntropy {
    fn in_entropy_sum(&self) -> Option<f64> {
        Some(self.in_entropy_sum)
    }
}

/// Serialized node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord<L> {
    pub label: L,
    /// Weighted in-degree (derived, ignored on rebuild)
    #[serde(default)]
    pub in_degree: u64,
    /// Weighted out-degree (derived, ignored on rebuild)
    #[serde(default)]
    pub out_degree: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_entropy_sum: Option<f64>,
}

/// Serialized edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: Deserialize<'de> + Ord"))]
pub struct EdgeRecord<L> {
    pub source: L,
    pub target: L,
    pub weight: u64,
    #[serde(default)]
    pub next_counts: BTreeMap<L, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
}

/// Flat node and edge lists of a transition graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "L: Deserialize<'de> + Ord"))]
pub struct GraphSnapshot<L> {
    pub nodes: Vec<NodeRecord<L>>,
    pub edges: Vec<EdgeRecord<L>>,
}

impl<L: StateLabel> GraphSnapshot<L> {
    /// Snapshot any graph stage; node and edge order are preserved
    pub fn from_graph<E, N>(graph: &TransitionGraph<L, E, N>) -> Self
    where
        E: EdgeAttributes<L>,
        N: NodeAttributes,
    {
        let nodes = graph
            .nodes()
            .map(|n| NodeRecord {
                label: n.label.clone(),
                in_degree: graph.in_weight(&n.label),
                out_degree: graph.out_weight(&n.label),
                in_entropy_sum: n.data.in_entropy_sum(),
            })
            .collect();

        let edges = graph
            .edges()
            .map(|e| {
                let transition = e.data.as_ref();
                EdgeRecord {
                    source: e.source.clone(),
                    target: e.target.clone(),
                    weight: transition.weight,
                    next_counts: transition.next_counts.clone(),
                    entropy: e.data.entropy(),
                }
            })
            .collect();

        Self { nodes, edges }
    }

    /// Rebuild the weighted stage, discarding any recorded entropy
    pub fn into_weighted_graph(self) -> Result<WeightedGraph<L>> {
        self.rebuild(|_, transition| Ok(transition))
    }

    /// Rebuild the entropy stage; every edge must carry a valid entropy
    pub fn into_entropy_graph(self) -> Result<EntropyGraph<L>> {
        self.rebuild(|record, transition| {
            let entropy = record.entropy.ok_or_else(|| AnalysisError::EntropyNotAnnotated {
                from: format!("{:?}", record.source),
                to: format!("{:?}", record.target),
            })?;
            if !entropy.is_finite() || entropy < 0.0 {
                return Err(AnalysisError::InvalidSnapshot(format!(
                    "edge {:?} -> {:?} has invalid entropy {}",
                    record.source, record.target, entropy
                )));
            }
            Ok(ScoredTransition { transition, entropy })
        })
    }

    fn rebuild<E>(
        self,
        mut edge_data: impl FnMut(&EdgeRecord<L>, Transition<L>) -> Result<E>,
    ) -> Result<TransitionGraph<L, E>> {
        let mut graph = TransitionGraph::new();
        let mut seen = HashSet::new();

        for node in self.nodes {
            if !seen.insert(node.label.clone()) {
                return Err(AnalysisError::InvalidSnapshot(format!(
                    "duplicate node {:?}",
                    node.label
                )));
            }
            graph.insert_node(node.label, ());
        }

        for record in self.edges {
            let endpoint = |label: &L| {
                graph.node_index(label).ok_or_else(|| {
                    AnalysisError::InvalidSnapshot(format!("edge references unknown node {:?}", label))
                })
            };
            let u = endpoint(&record.source)?;
            let v = endpoint(&record.target)?;

            if record.weight == 0 {
                return Err(AnalysisError::InvalidSnapshot(format!(
                    "edge {:?} -> {:?} has zero weight",
                    record.source, record.target
                )));
            }
            let transition = Transition {
                weight: record.weight,
                next_counts: record.next_counts.clone(),
            };
            if transition.continuation_total() > transition.weight {
                return Err(AnalysisError::InvalidSnapshot(format!(
                    "edge {:?} -> {:?} records more continuations than occurrences",
                    record.source, record.target
                )));
            }

            let data = edge_data(&record, transition)?;
            if !graph.insert_edge(u, v, data) {
                return Err(AnalysisError::InvalidSnapshot(format!(
                    "duplicate edge {:?} -> {:?}",
                    record.source, record.target
                )));
            }
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_transition_graph;

    fn edge(source: &str, target: &str, entropy: Option<f64>) -> EdgeRecord<String> {
        EdgeRecord {
            source: source.into(),
            target: target.into(),
            weight: 1,
            next_counts: BTreeMap::new(),
            entropy,
        }
    }

    fn node(label: &str) -> NodeRecord<String> {
        NodeRecord {
            label: label.into(),
            in_degree: 0,
            out_degree: 0,
            in_entropy_sum: None,
        }
    }

    #[test]
    fn test_weighted_snapshot_roundtrip() {
        let seq: Vec<String> = "A B C A B D".split(' ').map(String::from).collect();
        let graph = build_transition_graph(&seq, false);
        let snapshot = GraphSnapshot::from_graph(&graph);

        assert_eq!(snapshot.nodes.len(), 4);
        assert_eq!(snapshot.nodes[1].in_degree, 2);
        assert!(snapshot.edges.iter().all(|e| e.entropy.is_none()));

        let rebuilt = snapshot.into_weighted_graph().unwrap();
        assert_eq!(rebuilt.edge_count(), graph.edge_count());
        assert_eq!(
            rebuilt.next_counts(&"A".to_string(), &"B".to_string()),
            graph.next_counts(&"A".to_string(), &"B".to_string())
        );
    }

    #[test]
    fn test_missing_entropy_is_rejected() {
        let snapshot = GraphSnapshot {
            nodes: vec![node("A"), node("B")],
            edges: vec![edge("A", "B", None)],
        };
        let err = snapshot.into_entropy_graph().unwrap_err();
        assert!(matches!(err, AnalysisError::EntropyNotAnnotated { .. }));
    }

    #[test]
    fn test_structural_checks() {
        let unknown = GraphSnapshot {
            nodes: vec![node("A")],
            edges: vec![edge("A", "Z", Some(0.0))],
        };
        assert!(matches!(unknown.into_entropy_graph(), Err(AnalysisError::InvalidSnapshot(_))));

        let duplicate = GraphSnapshot {
            nodes: vec![node("A"), node("B")],
            edges: vec![edge("A", "B", Some(0.0)), edge("A", "B", Some(0.0))],
        };
        assert!(matches!(duplicate.into_entropy_graph(), Err(AnalysisError::InvalidSnapshot(_))));

        let negative = GraphSnapshot {
            nodes: vec![node("A"), node("B")],
            edges: vec![edge("A", "B", Some(-1.0))],
        };
        assert!(matches!(negative.into_entropy_graph(), Err(AnalysisError::InvalidSnapshot(_))));

        let mut overfull = edge("A", "B", Some(0.0));
        overfull.next_counts.insert("A".into(), 2);
        let overfull = GraphSnapshot {
            nodes: vec![node("A"), node("B")],
            edges: vec![overfull],
        };
        assert!(matches!(overfull.into_entropy_graph(), Err(AnalysisError::InvalidSnapshot(_))));
    }

    #[test]
    fn test_json_shape() {
        let snapshot = GraphSnapshot {
            nodes: vec![node("A"), node("B")],
            edges: vec![edge("A", "B", Some(0.5))],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GraphSnapshot<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert!(!json.contains("in_entropy_sum"));
    }
}
