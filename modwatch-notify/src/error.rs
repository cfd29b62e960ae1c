//! Notifier error types.

use thiserror::Error;

/// Errors raised while sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// One or more required settings are unset.
    #[error("missing required settings: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    /// `SMTP_PORT` is not a port number.
    #[error("invalid SMTP_PORT '{0}'")]
    InvalidPort(String),

    /// A sender or recipient address could not be parsed.
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// Connecting, negotiating TLS, authenticating or sending failed.
    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

impl NotifyError {
    /// Returns true if the error is caused by local configuration.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            NotifyError::MissingConfig(_) | NotifyError::InvalidPort(_) | NotifyError::Address(_)
        )
    }
}
