//! CLI command implementations.

pub mod baseline;
pub mod check;
pub mod notify;
pub mod search;
pub mod state;
pub mod watch;

use std::io::IsTerminal;

use anyhow::Result;
use modwatch_core::{WatchOptions, Watcher};
use modwatch_fetch::{CountFetcher, HttpClient};
use modwatch_notify::SmtpNotifier;
use modwatch_store::{Settings, StateStore};
use tokio_util::sync::CancellationToken;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// The watcher wired to mod.io, SMTP and the state file.
pub type AppWatcher = Watcher<CountFetcher, SmtpNotifier, StateStore>;

/// Builds the HTTP client; retry sleeps end early once `shutdown` fires.
pub fn http_client(settings: &Settings, shutdown: CancellationToken) -> Result<HttpClient> {
    Ok(HttpClient::new(&settings.fetch_settings()?)?.with_shutdown(shutdown))
}

/// Builds the production watcher from settings.
pub fn build_watcher(
    settings: &Settings,
    dry_run: bool,
    shutdown: CancellationToken,
) -> Result<AppWatcher> {
    let fetcher = CountFetcher::new(http_client(settings, shutdown)?, settings.api_target()?);
    let notifier = SmtpNotifier::new(settings.smtp.clone());
    let store = StateStore::new(&settings.state_path);
    let options = WatchOptions::default()
        .with_max_delta(settings.max_delta()?)
        .with_dry_run(dry_run)
        .with_labels(settings.game_label(), settings.platform());

    Ok(Watcher::new(fetcher, notifier, store, options))
}

/// Prints one result in the selected output format.
pub fn emit(
    cli: &Cli,
    text: impl FnOnce(&TextFormatter) -> String,
    json: impl FnOnce(&JsonFormatter) -> Result<String>,
) -> Result<()> {
    let out = match cli.format {
        OutputFormat::Text => text(&TextFormatter::new(use_colors(cli))),
        OutputFormat::Json => json(&JsonFormatter::new(cli.pretty))?,
    };
    println!("{out}");
    Ok(())
}

/// Colors only when stdout is a terminal and not disabled.
pub fn use_colors(cli: &Cli) -> bool {
    !cli.no_color && std::io::stdout().is_terminal()
}
