//! Check-cycle outcomes.

use std::fmt;

use super::state::WatchState;

/// Verdict reached once a current count is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No baseline existed; the current count was adopted silently.
    BaselineSet {
        /// The adopted count.
        count: u64,
    },
    /// The count rose within the spike-guard threshold.
    Increased {
        /// Baseline before this cycle.
        previous: u64,
        /// Count observed this cycle.
        current: u64,
        /// `current - previous`.
        diff: u64,
    },
    /// The count stayed the same or dropped.
    Unchanged {
        /// Baseline before this cycle.
        previous: u64,
        /// Count observed this cycle.
        current: u64,
    },
    /// The count jumped by more than the threshold and was distrusted.
    SpikeGuarded {
        /// Baseline before this cycle (kept).
        previous: u64,
        /// Count observed this cycle (ignored).
        current: u64,
        /// `current - previous`.
        delta: u64,
    },
}

impl CheckOutcome {
    /// Short machine-friendly name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BaselineSet { .. } => "baseline_set",
            Self::Increased { .. } => "increased",
            Self::Unchanged { .. } => "unchanged",
            Self::SpikeGuarded { .. } => "spike_guarded",
        }
    }

    /// The count observed this cycle.
    pub fn current(&self) -> u64 {
        match *self {
            Self::BaselineSet { count } => count,
            Self::Increased { current, .. }
            | Self::Unchanged { current, .. }
            | Self::SpikeGuarded { current, .. } => current,
        }
    }

    /// Returns true if this outcome sends a notification.
    pub fn notifies(&self) -> bool {
        matches!(self, Self::Increased { .. })
    }

    /// The baseline this outcome leaves behind, given the one it started from.
    pub fn next_baseline(&self, previous: Option<u64>) -> Option<u64> {
        match *self {
            Self::BaselineSet { count } => Some(count),
            Self::Increased { current, .. } => Some(current),
            Self::Unchanged { .. } | Self::SpikeGuarded { .. } => previous,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BaselineSet { count } => write!(f, "baseline set to {count}"),
            Self::Increased {
                previous,
                current,
                diff,
            } => write!(f, "increased by {diff} ({previous} -> {current})"),
            Self::Unchanged { previous, current } => {
                write!(f, "unchanged (baseline {previous}, current {current})")
            }
            Self::SpikeGuarded {
                previous,
                current,
                delta,
            } => write!(
                f,
                "spike ignored: +{delta} ({previous} -> {current}) exceeds threshold"
            ),
        }
    }
}

/// What a single call to [`Watcher::run_cycle`](crate::Watcher::run_cycle) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// The current count could not be determined. Nothing was written.
    FetchFailed {
        /// Human-readable cause, including the last underlying error.
        reason: String,
    },
    /// A count was obtained and evaluated.
    Evaluated {
        /// The verdict.
        outcome: CheckOutcome,
        /// State after the cycle (the loaded state when nothing was written).
        state: WatchState,
        /// False in dry-run mode.
        persisted: bool,
    },
}

impl CycleReport {
    /// Returns the verdict, if one was reached.
    pub fn outcome(&self) -> Option<&CheckOutcome> {
        match self {
            Self::Evaluated { outcome, .. } => Some(outcome),
            Self::FetchFailed { .. } => None,
        }
    }

    /// Returns true if the cycle could not fetch a count.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_baseline() {
        let spike = CheckOutcome::SpikeGuarded {
            previous: 10,
            current: 500,
            delta: 490,
        };
        assert_eq!(spike.next_baseline(Some(10)), Some(10));

        let up = CheckOutcome::Increased {
            previous: 10,
            current: 13,
            diff: 3,
        };
        assert_eq!(up.next_baseline(Some(10)), Some(13));
        assert!(up.notifies());
        assert!(!spike.notifies());
    }

    #[test]
    fn test_display() {
        let up = CheckOutcome::Increased {
            previous: 10,
            current: 13,
            diff: 3,
        };
        assert_eq!(up.to_string(), "increased by 3 (10 -> 13)");
        assert_eq!(
            CheckOutcome::BaselineSet { count: 42 }.to_string(),
            "baseline set to 42"
        );
    }
}
