//! Persisted watch state.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// The only durable record kept between check cycles.
///
/// Serialized as `{"last_count": <int|null>, "last_checked": <int|null>}`.
/// A missing `last_count` means no baseline has been established yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchState {
    /// Last accepted item count.
    #[serde(default)]
    pub last_count: Option<u64>,
    /// Unix timestamp (seconds) of the last check that reached a verdict.
    #[serde(default)]
    pub last_checked: Option<i64>,
}

impl WatchState {
    /// Creates an empty state with no baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a baseline count has been recorded.
    pub fn has_baseline(&self) -> bool {
        self.last_count.is_some()
    }

    /// Records that a check happened at `now`.
    pub fn mark_checked(&mut self, now: DateTime<Utc>) {
        self.last_checked = Some(now.timestamp());
    }

    /// Replaces the baseline unconditionally and marks the state checked.
    pub fn set_baseline(&mut self, count: u64, now: DateTime<Utc>) {
        self.last_count = Some(count);
        self.mark_checked(now);
    }

    /// Returns `last_checked` as a UTC datetime.
    pub fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        self.last_checked
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_baseline() {
        let state = WatchState::new();
        assert!(!state.has_baseline());
        assert_eq!(state.last_checked, None);
    }

    #[test]
    fn test_serializes_nulls() {
        let json = serde_json::to_value(WatchState::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"last_count": null, "last_checked": null})
        );
    }

    #[test]
    fn test_deserializes_missing_fields() {
        let state: WatchState = serde_json::from_str(r#"{"last_count": 7}"#).unwrap();
        assert_eq!(state.last_count, Some(7));
        assert_eq!(state.last_checked, None);
    }

    #[test]
    fn test_rejects_negative_count() {
        let result: Result<WatchState, _> = serde_json::from_str(r#"{"last_count": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_set_baseline_marks_checked() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut state = WatchState::new();
        state.set_baseline(42, now);

        assert_eq!(state.last_count, Some(42));
        assert_eq!(state.last_checked, Some(1_700_000_000));
        assert_eq!(state.last_checked_at(), Some(now));
    }
}
