// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # modwatch Notify
//!
//! Sends [`Notification`](modwatch_core::Notification)s by email over SMTP
//! with STARTTLS and login authentication.
//!
//! Settings are validated when a message is sent, not when the notifier is
//! built, so commands that never notify run without SMTP configuration.

pub mod error;
pub mod smtp;

pub use error::NotifyError;
pub use smtp::{SmtpConfig, SmtpNotifier};
