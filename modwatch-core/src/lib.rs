// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # modwatch Core
//!
//! Core types and the check-cycle engine for `modwatch`.
//!
//! This crate owns everything that decides *what happens* during a check:
//!
//! - [`WatchState`] - the persisted baseline record
//! - [`CheckOutcome`] / [`CycleReport`] - the result of one cycle
//! - [`Notification`] - subject and body handed to a notifier
//! - [`CountSource`], [`Notifier`], [`StateRepository`] - the seams to I/O
//! - [`Watcher`] - loads state, fetches, applies the spike guard, notifies
//!   and persists
//!
//! The I/O implementations live in `modwatch-fetch`, `modwatch-notify` and
//! `modwatch-store`; this crate never touches the network or the disk.

pub mod error;
pub mod models;
pub mod traits;
pub mod watcher;

pub use error::{BoxError, WatchError};
pub use models::{CheckOutcome, CycleReport, Notification, WatchState};
pub use traits::{CountSource, Notifier, StateRepository};
pub use watcher::{DEFAULT_MAX_DELTA, WatchOptions, Watcher, evaluate, override_baseline};
