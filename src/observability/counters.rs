//! In-process aggregation of operation events.

use super::{OperationEvent, OperationObserver, Operation, Outcome};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

/// Upper bounds of the description length histogram, in characters.
pub const DESCRIPTION_LENGTH_BUCKETS: [usize; 5] = [10, 50, 100, 500, 1000];

/// Aggregated counts for one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationTally {
    /// Number of successful calls.
    pub successes: u64,
    /// Number of failed calls.
    pub failures: u64,
    /// Total time spent across all calls.
    pub total_elapsed: Duration,
}

#[derive(Debug, Default)]
struct CounterState {
    tallies: BTreeMap<Operation, OperationTally>,
    // One slot per bucket plus an overflow slot.
    description_lengths: [u64; DESCRIPTION_LENGTH_BUCKETS.len() + 1],
}

/// Observer that keeps per-operation counters for later export.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use taskkeeper::observability::{
///     Operation, OperationCounters, OperationEvent, OperationObserver, Outcome,
/// };
///
/// let counters = OperationCounters::new();
/// counters.observe(&OperationEvent::new(
///     Operation::CreateTask,
///     Outcome::Success,
///     Duration::from_millis(2),
/// ));
/// assert_eq!(counters.tally(Operation::CreateTask).successes, 1);
/// ```
#[derive(Debug, Default)]
pub struct OperationCounters {
    state: Mutex<CounterState>,
}

impl OperationCounters {
    /// Creates empty counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tally for one operation.
    #[must_use]
    pub fn tally(&self, operation: Operation) -> OperationTally {
        self.state
            .lock()
            .map(|state| state.tallies.get(&operation).copied().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Returns every tally recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<Operation, OperationTally> {
        self.state
            .lock()
            .map(|state| state.tallies.clone())
            .unwrap_or_default()
    }

    /// Returns the description length histogram.
    ///
    /// Slot `i` counts descriptions no longer than
    /// `DESCRIPTION_LENGTH_BUCKETS[i]` (and longer than the previous bound);
    /// the final slot counts everything above the largest bound.
    #[must_use]
    pub fn description_lengths(&self) -> Vec<u64> {
        self.state
            .lock()
            .map(|state| state.description_lengths.to_vec())
            .unwrap_or_default()
    }
}

impl OperationObserver for OperationCounters {
    fn observe(&self, event: &OperationEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let tally = state.tallies.entry(event.operation).or_default();
        match event.outcome {
            Outcome::Success => tally.successes = tally.successes.saturating_add(1),
            Outcome::Failure(_) => tally.failures = tally.failures.saturating_add(1),
        }
        tally.total_elapsed = tally.total_elapsed.saturating_add(event.elapsed);

        if let Some(chars) = event.description_chars {
            let slot = DESCRIPTION_LENGTH_BUCKETS
                .iter()
                .position(|bound| chars <= *bound)
                .unwrap_or(DESCRIPTION_LENGTH_BUCKETS.len());
            if let Some(count) = state.description_lengths.get_mut(slot) {
                *count = count.saturating_add(1);
            }
        }
    }
}
