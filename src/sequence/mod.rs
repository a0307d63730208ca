//! Sequence Module: State Sequences Before Graph Construction
//!
//! A sequence is the ordered list of state labels observed at each time
//! step. Repeated consecutive labels are data (self-loops), not noise,
//! unless removed explicitly by the duration filter.
//!
//! - `loader`: delimited table -> sequence, with error-row bridging
//! - `filter`: duration filtering of state runs and stride sub-sampling

mod filter;
mod loader;

pub use filter::{StateRun, filter_by_duration, state_runs, subsample};
pub use loader::{LoaderConfig, load_sequence, parse_sequence};
