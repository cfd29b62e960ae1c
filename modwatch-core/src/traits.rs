//! Trait definitions for modwatch.
//!
//! The watcher talks to the outside world only through these three seams,
//! so every check-cycle rule can be exercised with in-memory fakes.

use async_trait::async_trait;

use crate::models::{Notification, WatchState};

/// Something that can report the current item count.
#[async_trait]
pub trait CountSource: Send + Sync {
    /// Error returned when the count cannot be determined.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches the current count. Each call is independent.
    async fn current_count(&self) -> Result<u64, Self::Error>;
}

/// Delivers notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Error returned when delivery fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends one notification.
    async fn send(&self, notification: &Notification) -> Result<(), Self::Error>;
}

/// Loads and saves the [`WatchState`] record.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Error returned by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loads the state, returning the default when none was saved yet.
    async fn load(&self) -> Result<WatchState, Self::Error>;

    /// Replaces the saved state.
    async fn save(&self, state: &WatchState) -> Result<(), Self::Error>;
}
