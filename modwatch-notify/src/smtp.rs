//! SMTP notifier.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use modwatch_core::{Notification, Notifier};
use secrecy::{ExposeSecret, Secret};
use tracing::{debug, info, instrument};

use crate::error::NotifyError;

/// Timeout for the whole SMTP conversation.
const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Configuration
// ============================================================================

/// SMTP settings as read from the environment. Every field is required at send time.
#[derive(Clone, Default)]
pub struct SmtpConfig {
    /// `SMTP_HOST`
    pub host: Option<String>,
    /// `SMTP_PORT`
    pub port: Option<String>,
    /// `SMTP_USER`, also the sender address.
    pub username: Option<String>,
    /// `SMTP_PASS`
    pub password: Option<Secret<String>>,
    /// `ALERT_TO`
    pub recipient: Option<String>,
}

/// Settings after validation.
struct ValidatedSmtp<'a> {
    host: &'a str,
    port: u16,
    username: &'a str,
    password: &'a str,
    recipient: &'a str,
}

impl SmtpConfig {
    /// Checks that every setting is present, reporting all missing keys at once.
    fn validate(&self) -> Result<ValidatedSmtp<'_>, NotifyError> {
        let host = present(self.host.as_deref());
        let port = present(self.port.as_deref());
        let username = present(self.username.as_deref());
        let password = present(self.password.as_ref().map(|p| p.expose_secret().as_str()));
        let recipient = present(self.recipient.as_deref());

        let missing: Vec<&'static str> = [
            ("SMTP_HOST", host.is_none()),
            ("SMTP_PORT", port.is_none()),
            ("SMTP_USER", username.is_none()),
            ("SMTP_PASS", password.is_none()),
            ("ALERT_TO", recipient.is_none()),
        ]
        .into_iter()
        .filter_map(|(key, absent)| absent.then_some(key))
        .collect();

        match (host, port, username, password, recipient) {
            (Some(host), Some(port), Some(username), Some(password), Some(recipient)) => {
                let port = port
                    .parse()
                    .map_err(|_| NotifyError::InvalidPort(port.to_string()))?;
                Ok(ValidatedSmtp {
                    host,
                    port,
                    username,
                    password,
                    recipient,
                })
            }
            _ => Err(NotifyError::MissingConfig(missing)),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("recipient", &self.recipient)
            .finish()
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Sends notifications as plain-text email from `SMTP_USER` to `ALERT_TO`.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    config: SmtpConfig,
}

impl SmtpNotifier {
    /// Creates a notifier. Settings are checked on each send.
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Builds and sends one message.
    #[instrument(skip(self, notification), fields(subject = %notification.subject))]
    pub async fn send_email(&self, notification: &Notification) -> Result<(), NotifyError> {
        let smtp = self.config.validate()?;
        let message = build_message(&smtp, notification)?;

        debug!(host = smtp.host, port = smtp.port, "Connecting to SMTP relay");
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp.host)?
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.to_string(),
                smtp.password.to_string(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        transport.send(message).await?;
        info!(to = smtp.recipient, "Notification sent");
        Ok(())
    }
}

fn build_message(smtp: &ValidatedSmtp<'_>, notification: &Notification) -> Result<Message, NotifyError> {
    let from: Mailbox = smtp.username.parse()?;
    let to: Mailbox = smtp.recipient.parse()?;

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(notification.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())?;
    Ok(message)
}

#[async_trait]
impl Notifier for SmtpNotifier {
    type Error = NotifyError;

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.send_email(notification).await
    }
}

// ============================================================================
// Tests
// ============================================================================
