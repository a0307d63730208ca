//! Duration Filter and Sub-sampling
//!
//! A state run is a maximal block of consecutive identical labels.
//! Duration filtering drops every run shorter than `min_duration` and
//! concatenates the survivors, in order, without shortening them:
//!
//!   A A B C C C  --(min_duration = 2)-->  A A C C C
//!
//! Sub-sampling keeps every `step`-th element starting at index 0.

/// A maximal run of identical labels inside a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRun<'a, L> {
    /// The repeated label
    pub label: &'a L,
    /// Index of the first element of the run
    pub start: usize,
    /// Number of consecutive repetitions (always >= 1)
    pub len: usize,
}

/// Decompose a sequence into maximal runs of identical labels.
pub fn state_runs<L: PartialEq>(sequence: &[L]) -> Vec<StateRun<'_, L>> {
    let mut runs = Vec::new();
    let mut start = 0;

    while start < sequence.len() {
        let label = &sequence[start];
        let len = sequence[start..]
            .iter()
            .take_while(|s| *s == label)
            .count();
        runs.push(StateRun { label, start, len });
        start += len;
    }

    runs
}

/// Remove state runs shorter than `min_duration`.
///
/// `min_duration <= 1` returns the input unchanged.
pub fn filter_by_duration<L: Clone + PartialEq>(sequence: &[L], min_duration: usize) -> Vec<L> {
    if min_duration <= 1 {
        return sequence.to_vec();
    }

    let mut filtered = Vec::with_capacity(sequence.len());
    for run in state_runs(sequence) {
        if run.len >= min_duration {
            filtered.extend_from_slice(&sequence[run.start..run.start + run.len]);
        }
    }

    filtered
}

/// Take every `step`-th element, starting at index 0.
///
/// `step <= 1` returns the input unchanged.
pub fn subsample<L: Clone>(sequence: &[L], step: usize) -> Vec<L> {
    if step <= 1 {
        return sequence.to_vec();
    }
    sequence.iter().step_by(step).cloned().collect()
}
