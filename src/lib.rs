//! # transition-entropy
//!
//! Second-Order Conditional Entropy of State-Transition Graphs
//!
//! ## Framework
//!
//! A discrete trajectory (one state label per time step) is turned into a
//! directed, weighted transition graph. Every edge u -> v remembers which
//! states followed it, so the uncertainty of the next step can be measured
//! *given the transition that led here*, not only the current state.
//!
//! ### Methodology
//!
//! 1. **Sequence preparation**: duration filtering of short-lived states
//!    and stride sub-sampling of the trajectory
//!
//! 2. **Graph construction**: edge weights from consecutive pairs,
//!    second-order context from consecutive triples
//!
//! 3. **Edge entropy**: Shannon entropy (bits) of the successor
//!    distribution of each edge
//!
//! 4. **Node aggregation**: sum of incoming edge entropies per state
//!
//! ## Key Property
//!
//! For a node v reached from several predecessors:
//!
//!   H(next | u -> v) = 0 for every u  does not imply  H(next | v) = 0
//!
//! Per-edge entropy separates deterministic routing through a hub from
//! genuine branching at that hub.
//!
//! ## Stages
//!
//! The graph moves through typed stages so that entropy aggregation can
//! only be applied to a graph whose edges already carry entropy:
//!
//!   `WeightedGraph` -> `EntropyGraph` -> `AnnotatedGraph`

pub mod error;
pub mod sequence;
pub mod graph;
pub mod information;
pub mod pipeline;
pub mod export;
pub mod synthetic;

pub use error::{AnalysisError, Result};

// Re-exports from sequence
pub use sequence::{
    LoaderConfig,
    StateRun,
    filter_by_duration,
    load_sequence,
    parse_sequence,
    state_runs,
    subsample,
};

// Re-exports from graph
pub use graph::{
    // Stages
    TransitionGraph,
    WeightedGraph,
    EntropyGraph,
    AnnotatedGraph,
    // Payloads
    StateLabel,
    StateNode,
    Transition,
    ScoredTransition,
    NodeEntropy,
    EdgeView,
    // Construction
    build_transition_graph,
    // Serialization
    GraphSnapshot,
    NodeRecord,
    EdgeRecord,
    EdgeAttributes,
    NodeAttributes,
};

// Re-exports from information
pub use information::{
    EntropySummary,
    annotate_edge_entropy,
    aggregate_node_entropy,
    shannon_entropy_bits,
};

// Re-exports from pipeline
pub use pipeline::{
    PipelineConfig,
    PipelineOutput,
    SequenceStats,
    run_pipeline,
};

// Re-exports from export
pub use export::{
    export_gexf,
    export_json,
    write_gexf,
    write_json,
};

// Re-exports from synthetic
pub use synthetic::{
    TrajectoryConfig,
    TrajectoryGenerator,
    write_table,
};
