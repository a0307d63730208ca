//! Synthetic state sequences
//!
//! Seeded Markov trajectories with dwell times, for demos and for
//! exercising the pipeline without a recorded dataset.

mod trajectory;

pub use trajectory::{write_table, TrajectoryConfig, TrajectoryGenerator};
