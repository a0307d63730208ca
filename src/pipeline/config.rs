//! Pipeline configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Options applied between the raw sequence and the annotated graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum run length kept by the duration filter (<= 1 disables it)
    pub min_duration: usize,
    /// Stride of the sub-sampling step (1 keeps every element)
    pub step_size: usize,
    /// Drop u -> u transitions from edges and from second-order context
    pub ignore_self_loops: bool,
    /// Return the per-edge entropy list alongside the summary
    pub include_raw_entropy_values: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_duration: 1,
            step_size: 1,
            ignore_self_loops: false,
            include_raw_entropy_values: false,
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file; absent keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.step_size == 0 {
            return Err(AnalysisError::InvalidConfig("step_size must be >= 1".into()));
        }
        Ok(())
    }
}
