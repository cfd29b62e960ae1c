//! Notify-test command - checks the mail setup end to end.

use anyhow::Result;
use modwatch_core::Notification;
use modwatch_notify::SmtpNotifier;
use modwatch_store::Settings;

use crate::Cli;

/// Runs the notify-test command.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let message = Notification::test_message(settings.game_label(), settings.platform());

    if cli.dry_run {
        println!("Dry run, would send:\nSubject: {}\n\n{}", message.subject, message.body);
        return Ok(());
    }

    SmtpNotifier::new(settings.smtp.clone())
        .send_email(&message)
        .await?;

    if !cli.quiet {
        println!(
            "Test email sent to {}",
            settings.smtp.recipient.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}
