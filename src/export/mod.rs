//! Export Module: Handing Annotated Graphs to Other Tools
//!
//! - `gexf`: Gephi-compatible GEXF 1.2 (scalar attributes, viridis node colours)
//! - `json`: full `GraphSnapshot`, including `next_counts`

mod colormap;
mod gexf;

pub use colormap::{ColorScale, Rgba, viridis};
pub use gexf::{export_gexf, write_gexf};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::{AnalysisError, Result};
use crate::graph::{AnnotatedGraph, GraphSnapshot, StateLabel};

/// Write the full snapshot of `graph` as pretty-printed JSON.
pub fn write_json<L, W>(graph: &AnnotatedGraph<L>, out: W) -> Result<()>
where
    L: StateLabel + Serialize,
    W: Write,
{
    serde_json::to_writer_pretty(out, &GraphSnapshot::from_graph(graph))?;
    Ok(())
}

/// Write the full snapshot of `graph` to a JSON file.
pub fn export_json<L>(graph: &AnnotatedGraph<L>, path: impl AsRef<Path>) -> Result<()>
where
    L: StateLabel + Serialize,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| AnalysisError::io(path, e))?;
    let mut out = BufWriter::new(file);
    write_json(graph, &mut out)?;
    out.flush().map_err(|e| AnalysisError::io(path, e))?;
    info!(path = %path.display(), "graph exported (json)");
    Ok(())
}
