//! Markov Trajectory with Dwell Times
//!
//! Jump chain: the next distinct state is drawn from row i of a
//! row-stochastic matrix P. Each visit lasts
//!
//!   d = 1 + Poisson(mean_dwell - 1)
//!
//! time steps, so the emitted sequence contains runs of repeated labels
//! (self-loops) whose length is controlled by `mean_dwell`.

use std::io::Write;

use ndarray::Array2;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Poisson;

use crate::error::{AnalysisError, Result};

/// Parameters of a synthetic trajectory
#[derive(Debug, Clone)]
pub struct TrajectoryConfig {
    /// Number of states (used by `TrajectoryGenerator::random`)
    pub n_states: usize,
    /// Number of emitted time steps
    pub length: usize,
    /// Mean number of steps per visit (>= 1)
    pub mean_dwell: f64,
    /// RNG seed
    pub seed: u64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            n_states: 8,
            length: 10_000,
            mean_dwell: 3.0,
            seed: 42,
        }
    }
}

/// Seeded generator of state sequences
pub struct TrajectoryGenerator {
    transitions: Array2<f64>,
    rows: Vec<WeightedIndex<f64>>,
    dwell: Option<Poisson<f64>>,
    length: usize,
    rng: StdRng,
}

impl TrajectoryGenerator {
    /// Generator over an explicit jump matrix
    pub fn new(transitions: Array2<f64>, config: &TrajectoryConfig) -> Result<Self> {
        let (n, m) = transitions.dim();
        if n == 0 || n != m {
            return Err(AnalysisError::InvalidConfig(format!(
                "transition matrix must be square and non-empty, got {}x{}",
                n, m
            )));
        }
        if n != config.n_states {
            return Err(AnalysisError::InvalidConfig(format!(
                "transition matrix has {} states, config expects {}",
                n, config.n_states
            )));
        }
        if transitions.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "transition probabilities must be finite and non-negative".into(),
            ));
        }

        let rows = transitions
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                WeightedIndex::new(row.iter()).map_err(|e| {
                    AnalysisError::InvalidConfig(format!("row {} of transition matrix: {}", i, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let dwell = if config.mean_dwell > 1.0 {
            let poisson = Poisson::new(config.mean_dwell - 1.0)
                .map_err(|e| AnalysisError::InvalidConfig(format!("mean_dwell: {}", e)))?;
            Some(poisson)
        } else {
            None
        };

        Ok(Self {
            transitions,
            rows,
            dwell,
            length: config.length,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Generator over a random jump matrix with no self-transitions
    pub fn random(config: &TrajectoryConfig) -> Result<Self> {
        let n = config.n_states;
        if n < 2 {
            return Err(AnalysisError::InvalidConfig("n_states must be >= 2".into()));
        }

        let mut rng = StdRng::seed_from_u64(config.seed ^ 0x5eed);
        let mut transitions = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    transitions[[i, j]] = rng.random_range(0.05..1.0);
                }
            }
            let total = transitions.row(i).sum();
            transitions.row_mut(i).mapv_inplace(|p| p / total);
        }

        Self::new(transitions, config)
    }

    /// Label of state `i`
    pub fn label(i: usize) -> String {
        format!("S{}", i)
    }

    pub fn transition_matrix(&self) -> &Array2<f64> {
        &self.transitions
    }

    pub fn n_states(&self) -> usize {
        self.rows.len()
    }

    /// Emit `length` labels
    pub fn generate(&mut self) -> Vec<String> {
        let mut sequence = Vec::with_capacity(self.length);
        if self.length == 0 {
            return sequence;
        }

        let mut state = self.rng.random_range(0..self.n_states());
        while sequence.len() < self.length {
            let dwell = match &self.dwell {
                Some(poisson) => 1 + poisson.sample(&mut self.rng) as usize,
                None => 1,
            };
            let steps = dwell.min(self.length - sequence.len());
            sequence.extend(std::iter::repeat(Self::label(state)).take(steps));
            state = self.rows[state].sample(&mut self.rng);
        }

        sequence
    }
}

/// Write a sequence as a `time` / `sub_cot` TSV table.
pub fn write_table<W: Write>(sequence: &[String], mut out: W) -> std::io::Result<()> {
    writeln!(out, "time\tsub_cot")?;
    for (t, label) in sequence.iter().enumerate() {
        writeln!(out, "{}\t{}", t, label)?;
    }
    out.flush()
}
