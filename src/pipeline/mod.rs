//! Pipeline: Sequence to Annotated Graph
//!
//! ## Protocol
//!
//! 1. Duration filter (`min_duration`)
//! 2. Stride sub-sampling (`step_size`)
//! 3. Transition graph construction (`ignore_self_loops`)
//! 4. Edge conditional entropy
//! 5. Summary statistics over edge entropies
//! 6. Node in-entropy aggregation
//!
//! Every run is independent: nothing is shared between calls.

mod config;

pub use config::PipelineConfig;

use tracing::{info, warn};

use crate::error::Result;
use crate::graph::{build_transition_graph, AnnotatedGraph, StateLabel};
use crate::information::{aggregate_node_entropy, annotate_edge_entropy, EntropySummary};
use crate::sequence::{filter_by_duration, subsample};

/// Sequence lengths after each transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceStats {
    pub raw_len: usize,
    pub filtered_len: usize,
    pub sampled_len: usize,
}

/// Everything a pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput<L: StateLabel> {
    pub graph: AnnotatedGraph<L>,
    pub summary: EntropySummary,
    /// Per-edge entropies in edge order, when requested
    pub entropy_values: Option<Vec<f64>>,
    pub stats: SequenceStats,
}

/// Run filter -> sub-sample -> build -> annotate -> summarize -> aggregate.
pub fn run_pipeline<L: StateLabel>(raw_sequence: &[L], config: &PipelineConfig) -> Result<PipelineOutput<L>> {
    config.validate()?;

    let filtered = filter_by_duration(raw_sequence, config.min_duration);
    if filtered.is_empty() && !raw_sequence.is_empty() {
        warn!(
            min_duration = config.min_duration,
            "duration filter removed every state"
        );
    }

    let sampled = subsample(&filtered, config.step_size);
    let stats = SequenceStats {
        raw_len: raw_sequence.len(),
        filtered_len: filtered.len(),
        sampled_len: sampled.len(),
    };

    let graph = annotate_edge_entropy(build_transition_graph(&sampled, config.ignore_self_loops));

    let summary = EntropySummary::from_graph(&graph);
    let entropy_values = config
        .include_raw_entropy_values
        .then(|| graph.entropy_values());

    let graph = aggregate_node_entropy(graph);

    info!(
        raw_len = stats.raw_len,
        filtered_len = stats.filtered_len,
        sampled_len = stats.sampled_len,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        min_entropy = summary.min,
        max_entropy = summary.max,
        mean_entropy = summary.mean,
        "pipeline complete"
    );

    Ok(PipelineOutput {
        graph,
        summary,
        entropy_values,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    fn s(label: &str) -> String {
        label.to_string()
    }

    #[test]
    fn test_degenerate_sequences() {
        for input in [seq(""), seq("A")] {
            let out = run_pipeline(&input, &PipelineConfig::default()).unwrap();
            assert_eq!(out.graph.edge_count(), 0);
            assert_eq!(out.summary, EntropySummary::default());
        }

        let empty = run_pipeline(&seq(""), &PipelineConfig::default()).unwrap();
        assert!(empty.graph.is_empty());

        let single = run_pipeline(&seq("A"), &PipelineConfig::default()).unwrap();
        assert!(!single.graph.is_empty());
        assert!(single.graph.contains_node(&s("A")));
        assert!(!single.graph.contains_node(&s("B")));
    }

    #[test]
    fn test_filter_runs_before_subsampling() {
        // A A B C C C D D -> min_duration 2 -> A A C C C D D -> step 2 -> A C C D
        let config = PipelineConfig {
            min_duration: 2,
            step_size: 2,
            ..PipelineConfig::default()
        };
        let out = run_pipeline(&seq("A A B C C C D D"), &config).unwrap();

        assert_eq!(out.stats.filtered_len, 7);
        assert_eq!(out.stats.sampled_len, 4);
        assert_eq!(out.graph.edge_count(), 3);
        assert!(!out.graph.contains_node(&s("B")));
        for (u, v) in [("A", "C"), ("C", "C"), ("C", "D")] {
            assert_eq!(out.graph.weight(&s(u), &s(v)), Some(1));
        }
    }

    #[test]
    fn test_step_size() {
        // A B B C A -> step 2 -> A B A
        let config = PipelineConfig {
            step_size: 2,
            ..PipelineConfig::default()
        };
        let out = run_pipeline(&seq("A B B C A"), &config).unwrap();
        assert!(out.graph.contains_edge(&s("A"), &s("B")));
        assert!(out.graph.contains_edge(&s("B"), &s("A")));
        assert!(!out.graph.contains_edge(&s("B"), &s("B")));
        assert_eq!(out.stats.sampled_len, 3);
    }

    #[test]
    fn test_duration_filter_applied_first() {
        // A B B C A -> min_duration 2 -> B B
        let config = PipelineConfig {
            min_duration: 2,
            ..PipelineConfig::default()
        };
        let out = run_pipeline(&seq("A B B C A"), &config).unwrap();
        assert_eq!(out.graph.node_count(), 1);
        assert!(out.graph.contains_edge(&s("B"), &s("B")));
        assert_eq!(out.stats.filtered_len, 2);
    }

    #[test]
    fn test_raw_values_optional() {
        let input = seq("A B C A B D A B");
        let out = run_pipeline(&input, &PipelineConfig::default()).unwrap();
        assert!(out.entropy_values.is_none());

        let config = PipelineConfig {
            include_raw_entropy_values: true,
            ..PipelineConfig::default()
        };
        let out = run_pipeline(&input, &config).unwrap();
        let values = out.entropy_values.unwrap();
        assert_eq!(values.len(), out.graph.edge_count());
        // A -> B continues to C once and D once
        assert!((out.summary.max - 1.0).abs() < 1e-12);
        assert_eq!(out.summary.min, 0.0);
    }

    #[test]
    fn test_self_loop_policy_forwarded() {
        let config = PipelineConfig {
            ignore_self_loops: true,
            ..PipelineConfig::default()
        };
        let out = run_pipeline(&seq("A A B B A"), &config).unwrap();
        assert!(out.graph.edges().all(|e| e.source != e.target));
        assert_eq!(out.graph.edge_count(), 2);
    }

    #[test]
    fn test_invalid_config() {
        let config = PipelineConfig {
            step_size: 0,
            ..PipelineConfig::default()
        };
        assert!(run_pipeline(&seq("A B"), &config).is_err());
    }
}
