//! Notification messages.

use chrono::{DateTime, Utc};

/// A message for a [`Notifier`](crate::Notifier): subject line plus plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

impl Notification {
    /// Creates a notification from raw parts.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Message sent when the count rises.
    pub fn increase(
        game: &str,
        platform: &str,
        previous: u64,
        current: u64,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let diff = current.saturating_sub(previous);
        let noun = if diff == 1 { "mod" } else { "mods" };
        let subject = format!("{game}: {diff} new {platform} {noun}");
        let body = format!(
            "The {platform} mod count for {game} went from {previous} to {current} (+{diff}).\n\
             Checked at {}.\n",
            checked_at.to_rfc3339()
        );
        Self::new(subject, body)
    }

    /// Message used to verify the mail transport.
    pub fn test_message(game: &str, platform: &str) -> Self {
        Self::new(
            format!("modwatch test: {game} ({platform})"),
            format!(
                "This is a test notification from modwatch.\n\
                 Alerts for new {platform} mods of {game} will arrive at this address.\n"
            ),
        )
    }
}
