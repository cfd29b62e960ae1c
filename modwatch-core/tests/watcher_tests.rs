//! Check-cycle behaviour tests using in-memory fakes.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use modwatch_core::{
    CheckOutcome, CountSource, CycleReport, Notification, Notifier, StateRepository,
    WatchError, WatchOptions, WatchState, Watcher, override_baseline,
};
use thiserror::Error;

// ============================================================================
// Fakes
// ============================================================================

#[derive(Debug, Error)]
#[error("{0}")]
struct FakeError(String);

struct ScriptedSource {
    counts: Mutex<VecDeque<Result<u64, String>>>,
}

impl ScriptedSource {
    fn new(counts: Vec<Result<u64, String>>) -> Self {
        Self {
            counts: Mutex::new(counts.into()),
        }
    }

    fn always(count: u64) -> Self {
        Self::new(vec![Ok(count); 8])
    }
}

#[async_trait]
impl CountSource for ScriptedSource {
    type Error = FakeError;

    async fn current_count(&self) -> Result<u64, FakeError> {
        self.counts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()))
            .map_err(FakeError)
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    type Error = FakeError;

    async fn send(&self, notification: &Notification) -> Result<(), FakeError> {
        if self.fail {
            return Err(FakeError("smtp connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

struct MemoryRepository {
    state: Mutex<WatchState>,
    saves: AtomicUsize,
    failing_saves: AtomicUsize,
}

impl MemoryRepository {
    fn with(state: WatchState) -> Self {
        Self {
            state: Mutex::new(state),
            saves: AtomicUsize::new(0),
            failing_saves: AtomicUsize::new(0),
        }
    }

    /// Makes the next `n` saves fail.
    fn fail_next_saves(self, n: usize) -> Self {
        self.failing_saves.store(n, Ordering::SeqCst);
        self
    }

    fn baseline(count: u64) -> Self {
        Self::with(WatchState {
            last_count: Some(count),
            last_checked: Some(1_000),
        })
    }

    fn state(&self) -> WatchState {
        *self.state.lock().unwrap()
    }

    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateRepository for MemoryRepository {
    type Error = FakeError;

    async fn load(&self) -> Result<WatchState, FakeError> {
        Ok(self.state())
    }

    async fn save(&self, state: &WatchState) -> Result<(), FakeError> {
        let failing = self
            .failing_saves
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FakeError("disk full".to_string()));
        }
        *self.state.lock().unwrap() = *state;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn at(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).unwrap()
}

fn options() -> WatchOptions {
    WatchOptions::default()
        .with_max_delta(200)
        .with_labels("baldursgate3", "ps5")
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_increase_notifies_with_delta() {
    let watcher = Watcher::new(
        ScriptedSource::always(13),
        RecordingNotifier::default(),
        MemoryRepository::baseline(10),
        options(),
    );

    let report = watcher.run_cycle_at(at(2_000)).await.unwrap();

    assert_eq!(
        report.outcome(),
        Some(&CheckOutcome::Increased {
            previous: 10,
            current: 13,
            diff: 3
        })
    );
    let sent = watcher.notifier().sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("3 new ps5 mods"));
    assert!(sent[0].body.contains("13"));
    assert_eq!(
        watcher.repository().state(),
        WatchState {
            last_count: Some(13),
            last_checked: Some(2_000)
        }
    );
    assert_eq!(watcher.repository().saves(), 1);
}

#[tokio::test]
async fn test_first_run_sets_baseline_silently() {
    let watcher = Watcher::new(
        ScriptedSource::always(42),
        RecordingNotifier::default(),
        MemoryRepository::with(WatchState::default()),
        options(),
    );

    let report = watcher.run_cycle_at(at(2_000)).await.unwrap();

    assert_eq!(report.outcome(), Some(&CheckOutcome::BaselineSet { count: 42 }));
    assert!(watcher.notifier().sent().is_empty());
    assert_eq!(watcher.repository().state().last_count, Some(42));
    assert_eq!(watcher.repository().state().last_checked, Some(2_000));
}

#[tokio::test]
async fn test_spike_keeps_baseline_but_updates_checked() {
    let watcher = Watcher::new(
        ScriptedSource::always(500),
        RecordingNotifier::default(),
        MemoryRepository::baseline(10),
        options(),
    );

    let report = watcher.run_cycle_at(at(2_000)).await.unwrap();

    assert!(matches!(
        report.outcome(),
        Some(CheckOutcome::SpikeGuarded { delta: 490, .. })
    ));
    assert!(watcher.notifier().sent().is_empty());
    assert_eq!(
        watcher.repository().state(),
        WatchState {
            last_count: Some(10),
            last_checked: Some(2_000)
        }
    );
}

#[tokio::test]
async fn test_drop_only_touches_last_checked() {
    let watcher = Watcher::new(
        ScriptedSource::always(7),
        RecordingNotifier::default(),
        MemoryRepository::baseline(10),
        options(),
    );

    watcher.run_cycle_at(at(2_000)).await.unwrap();

    assert!(watcher.notifier().sent().is_empty());
    assert_eq!(
        watcher.repository().state(),
        WatchState {
            last_count: Some(10),
            last_checked: Some(2_000)
        }
    );
}

#[tokio::test]
async fn test_second_run_with_same_count_is_quiet() {
    let watcher = Watcher::new(
        ScriptedSource::always(13),
        RecordingNotifier::default(),
        MemoryRepository::baseline(10),
        options(),
    );

    watcher.run_cycle_at(at(2_000)).await.unwrap();
    let second = watcher.run_cycle_at(at(3_000)).await.unwrap();

    assert!(matches!(second.outcome(), Some(CheckOutcome::Unchanged { .. })));
    assert_eq!(watcher.notifier().sent().len(), 1);
    assert_eq!(
        watcher.repository().state(),
        WatchState {
            last_count: Some(13),
            last_checked: Some(3_000)
        }
    );
}

#[tokio::test]
async fn test_fetch_failure_writes_nothing() {
    let before = WatchState {
        last_count: Some(10),
        last_checked: Some(1_000),
    };
    let watcher = Watcher::new(
        ScriptedSource::new(vec![Err("all hosts failed: 503".to_string())]),
        RecordingNotifier::default(),
        MemoryRepository::with(before),
        options(),
    );

    let report = watcher.run_cycle_at(at(2_000)).await.unwrap();

    assert_eq!(
        report,
        CycleReport::FetchFailed {
            reason: "all hosts failed: 503".to_string()
        }
    );
    assert_eq!(watcher.repository().state(), before);
    assert_eq!(watcher.repository().saves(), 0);
}

#[tokio::test]
async fn test_dry_run_reports_without_side_effects() {
    let watcher = Watcher::new(
        ScriptedSource::always(13),
        RecordingNotifier::default(),
        MemoryRepository::baseline(10),
        options().with_dry_run(true),
    );

    let report = watcher.run_cycle_at(at(2_000)).await.unwrap();

    match report {
        CycleReport::Evaluated {
            outcome, persisted, ..
        } => {
            assert!(outcome.notifies());
            assert!(!persisted);
        }
        CycleReport::FetchFailed { .. } => panic!("expected an evaluated cycle"),
    }
    assert!(watcher.notifier().sent().is_empty());
    assert_eq!(watcher.repository().saves(), 0);
}

#[tokio::test]
async fn test_notification_failure_skips_persist() {
    let watcher = Watcher::new(
        ScriptedSource::new(vec![Ok(13), Ok(13)]),
        RecordingNotifier::failing(),
        MemoryRepository::baseline(10),
        options(),
    );

    let err = watcher.run_cycle_at(at(2_000)).await.unwrap_err();

    assert!(matches!(err, WatchError::Notify(_)));
    assert!(err.to_string().contains("smtp connection refused"));
    assert_eq!(watcher.repository().saves(), 0);
    assert_eq!(watcher.repository().state().last_count, Some(10));

    // The same increase is seen again next time.
    let err = watcher.run_cycle_at(at(3_000)).await.unwrap_err();
    assert!(matches!(err, WatchError::Notify(_)));
}

#[tokio::test]
async fn test_manual_baseline_can_lower_count() {
    let repository = MemoryRepository::baseline(50);

    let state = override_baseline(&repository, 5, at(2_000), false)
        .await
        .unwrap();

    assert_eq!(state.last_count, Some(5));
    assert_eq!(state.last_checked, Some(2_000));
    assert_eq!(repository.state(), state);
    assert_eq!(repository.saves(), 1);
}

#[tokio::test]
async fn test_manual_baseline_respects_dry_run() {
    let repository = MemoryRepository::baseline(50);

    let state = override_baseline(&repository, 5, at(2_000), true)
        .await
        .unwrap();

    assert_eq!(state.last_count, Some(5));
    assert_eq!(repository.state().last_count, Some(50));
    assert_eq!(repository.saves(), 0);
}

#[tokio::test]
async fn test_increase_property_over_range() {
    for current in 11..=210u64 {
        let watcher = Watcher::new(
            ScriptedSource::always(current),
            RecordingNotifier::default(),
            MemoryRepository::baseline(10),
            options(),
        );
        watcher.run_cycle_at(at(2_000)).await.unwrap();

        assert_eq!(watcher.notifier().sent().len(), 1, "current = {current}");
        assert_eq!(watcher.repository().state().last_count, Some(current));
    }
}

#[tokio::test]
async fn test_persist_failure_after_notify_resends_next_cycle() {
    let watcher = Watcher::new(
        ScriptedSource::new(vec![Ok(13), Ok(13)]),
        RecordingNotifier::default(),
        MemoryRepository::baseline(10).fail_next_saves(1),
        options(),
    );

    let err = watcher.run_cycle_at(at(2_000)).await.unwrap_err();
    assert!(matches!(err, WatchError::Persist(_)));
    assert!(err.to_string().contains("disk full"));
    assert_eq!(watcher.notifier().sent().len(), 1);
    assert_eq!(watcher.repository().state().last_count, Some(10));

    // The stored baseline never moved, so the increase is reported again.
    let report = watcher.run_cycle_at(at(3_000)).await.unwrap();
    assert!(report.outcome().is_some_and(CheckOutcome::notifies));
    assert_eq!(watcher.notifier().sent().len(), 2);
    assert_eq!(watcher.repository().state().last_count, Some(13));
}
