//! The check-cycle engine.
//!
//! One cycle: load state, fetch the current count, decide, notify on an
//! increase, persist. Count failures end the cycle without touching state.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::error::WatchError;
use crate::models::{CheckOutcome, CycleReport, Notification, WatchState};
use crate::traits::{CountSource, Notifier, StateRepository};

/// Default spike-guard threshold.
pub const DEFAULT_MAX_DELTA: u64 = 200;

// ============================================================================
// Options
// ============================================================================

/// Behaviour switches for a [`Watcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    /// Largest rise accepted as genuine in one cycle.
    pub max_delta: u64,
    /// Observe only: never notify, never persist.
    pub dry_run: bool,
    /// Game name used in notification text.
    pub game_label: String,
    /// Platform name used in notification text.
    pub platform: String,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            max_delta: DEFAULT_MAX_DELTA,
            dry_run: false,
            game_label: "game".to_string(),
            platform: "ps5".to_string(),
        }
    }
}

impl WatchOptions {
    /// Sets the spike-guard threshold.
    pub fn with_max_delta(mut self, max_delta: u64) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the labels used in notifications.
    pub fn with_labels(mut self, game: impl Into<String>, platform: impl Into<String>) -> Self {
        self.game_label = game.into();
        self.platform = platform.into();
        self
    }
}

// ============================================================================
// Diff
// ============================================================================

/// Decides the outcome for a fetched count against the stored baseline.
///
/// A rise of more than `max_delta` is distrusted; a rise of exactly
/// `max_delta` is accepted.
pub fn evaluate(last_count: Option<u64>, current: u64, max_delta: u64) -> CheckOutcome {
    let Some(previous) = last_count else {
        return CheckOutcome::BaselineSet { count: current };
    };

    if current <= previous {
        return CheckOutcome::Unchanged { previous, current };
    }

    let diff = current - previous;
    if diff > max_delta {
        CheckOutcome::SpikeGuarded {
            previous,
            current,
            delta: diff,
        }
    } else {
        CheckOutcome::Increased {
            previous,
            current,
            diff,
        }
    }
}

// ============================================================================
// Watcher
// ============================================================================

/// Runs check cycles against a count source, notifier and state repository.
pub struct Watcher<C, N, R> {
    source: C,
    notifier: N,
    repository: R,
    options: WatchOptions,
}

impl<C, N, R> Watcher<C, N, R>
where
    C: CountSource,
    N: Notifier,
    R: StateRepository,
{
    /// Creates a watcher.
    pub fn new(source: C, notifier: N, repository: R, options: WatchOptions) -> Self {
        Self {
            source,
            notifier,
            repository,
            options,
        }
    }

    /// Returns the options this watcher was built with.
    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Returns the notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Returns the state repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Runs one cycle stamped with the current time.
    pub async fn run_cycle(&self) -> Result<CycleReport, WatchError> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Runs one cycle stamped with `now`.
    ///
    /// Returns `Ok(CycleReport::FetchFailed)` when the count is unavailable;
    /// load, notification and persistence failures are returned as errors.
    /// When the notifier fails the state is not saved, so the same increase
    /// is detected again on the next cycle. The same holds when the
    /// notification went out but saving failed: the increase is sent again.
    #[instrument(skip(self, now), fields(game = %self.options.game_label, dry_run = self.options.dry_run))]
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) -> Result<CycleReport, WatchError> {
        let mut state = self
            .repository
            .load()
            .await
            .map_err(|e| WatchError::Load(Box::new(e)))?;
        debug!(last_count = ?state.last_count, last_checked = ?state.last_checked, "Loaded state");

        let current = match self.source.current_count().await {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "Could not determine current count, state left untouched");
                return Ok(CycleReport::FetchFailed {
                    reason: e.to_string(),
                });
            }
        };

        let outcome = evaluate(state.last_count, current, self.options.max_delta);

        if self.options.dry_run {
            info!(outcome = %outcome, "Dry run, nothing notified or saved");
            return Ok(CycleReport::Evaluated {
                outcome,
                state,
                persisted: false,
            });
        }

        match outcome {
            CheckOutcome::BaselineSet { count } => {
                info!(count, "No baseline yet, adopting current count");
            }
            CheckOutcome::Increased {
                previous,
                current,
                diff,
            } => {
                info!(previous, current, diff, "Count increased, notifying");
                let notification = Notification::increase(
                    &self.options.game_label,
                    &self.options.platform,
                    previous,
                    current,
                    now,
                );
                self.notifier
                    .send(&notification)
                    .await
                    .map_err(|e| WatchError::Notify(Box::new(e)))?;
            }
            CheckOutcome::Unchanged { previous, current } => {
                debug!(previous, current, "No increase");
            }
            CheckOutcome::SpikeGuarded {
                previous,
                current,
                delta,
            } => {
                warn!(
                    previous,
                    current,
                    delta,
                    max_delta = self.options.max_delta,
                    "Implausible jump, keeping baseline"
                );
            }
        }

        state.last_count = outcome.next_baseline(state.last_count);
        state.mark_checked(now);
        self.persist(&state).await?;

        Ok(CycleReport::Evaluated {
            outcome,
            state,
            persisted: true,
        })
    }

    async fn persist(&self, state: &WatchState) -> Result<(), WatchError> {
        self.repository
            .save(state)
            .await
            .map_err(|e| WatchError::Persist(Box::new(e)))
    }
}

// ============================================================================
// Manual Baseline
// ============================================================================

/// Overrides the stored baseline with `count`, stamped with `now`.
///
/// This is the only path that can lower `last_count`. With `dry_run` the
/// resulting state is returned but not saved.
pub async fn override_baseline<R: StateRepository>(
    repository: &R,
    count: u64,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<WatchState, WatchError> {
    let mut state = repository
        .load()
        .await
        .map_err(|e| WatchError::Load(Box::new(e)))?;
    let previous = state.last_count;
    state.set_baseline(count, now);

    if dry_run {
        info!(?previous, count, "Dry run, baseline not saved");
        return Ok(state);
    }

    repository
        .save(&state)
        .await
        .map_err(|e| WatchError::Persist(Box::new(e)))?;
    info!(?previous, count, "Baseline set manually");
    Ok(state)
}
