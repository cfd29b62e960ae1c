//! Core error types for `modwatch`.

use thiserror::Error;

/// Boxed error carried across the trait seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a check cycle.
///
/// Count failures are not in this list: the watcher reports them as
/// [`CycleReport::FetchFailed`](crate::CycleReport::FetchFailed) and leaves
/// the state untouched.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The persisted state could not be read.
    #[error("failed to load watch state: {0}")]
    Load(#[source] BoxError),

    /// The notifier rejected or failed to deliver a message.
    #[error("failed to send notification: {0}")]
    Notify(#[source] BoxError),

    /// The updated state could not be written.
    #[error("failed to persist watch state: {0}")]
    Persist(#[source] BoxError),
}
