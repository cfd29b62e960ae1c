//! Domain models for modwatch.
//!
//! - [`state`] - the persisted [`WatchState`]
//! - [`outcome`] - per-cycle [`CheckOutcome`] and [`CycleReport`]
//! - [`notification`] - the [`Notification`] message

mod notification;
mod outcome;
mod state;

pub use notification::Notification;
pub use outcome::{CheckOutcome, CycleReport};
pub use state::WatchState;
