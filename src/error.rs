//! Error types for sequence loading, graph construction and export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur anywhere in the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Filesystem failure, with the path that was being accessed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required column is absent from the input table header
    #[error("Required column '{column}' missing from input table")]
    MissingColumn { column: String },

    /// The input table has no header line
    #[error("Input table is empty (no header line)")]
    EmptyInput,

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A persisted graph snapshot is structurally inconsistent
    #[error("Invalid graph snapshot: {0}")]
    InvalidSnapshot(String),

    /// Node aggregation requested on an edge without an entropy value
    #[error("Edge {from} -> {to} has no entropy; annotate edges before aggregating nodes")]
    EntropyNotAnnotated { from: String, to: String },

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GEXF writer failure
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;
