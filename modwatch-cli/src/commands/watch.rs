//! Watch command - check cycles until interrupted.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use modwatch_core::{CountSource, CycleReport, Notifier, StateRepository, Watcher};
use modwatch_store::Settings;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::{build_watcher, use_colors};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Seconds between cycles (defaults to MODWATCH_INTERVAL_SECS).
    #[arg(long, short)]
    pub interval: Option<u64>,
}

/// What a watch loop did before it stopped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    /// Cycles started.
    pub cycles: u32,
    /// Cycles that ended without a verdict.
    pub failures: u32,
}

/// Runs the watch command.
pub async fn run(
    args: &WatchArgs,
    cli: &Cli,
    settings: &Settings,
    shutdown: CancellationToken,
) -> Result<()> {
    let interval = match args.interval {
        Some(secs) => Duration::from_secs(secs),
        None => settings.interval()?,
    };
    if interval.is_zero() {
        anyhow::bail!("--interval must be at least 1 second");
    }

    let watcher = build_watcher(settings, cli.dry_run, shutdown.clone())?;
    let options = watcher.options();
    let text = TextFormatter::new(use_colors(cli));
    let json = JsonFormatter::new(false);

    info!(
        game = %options.game_label,
        platform = %options.platform,
        interval_secs = interval.as_secs(),
        "Starting watch mode"
    );

    let summary = watch_loop(&watcher, interval, &shutdown, |report| {
        let line = match cli.format {
            OutputFormat::Text => format!(
                "[{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                text.format_report(report, &options.game_label, &options.platform)
            ),
            OutputFormat::Json => {
                json.format_report(report, &options.game_label, &options.platform)?
            }
        };
        println!("{line}");
        Ok(())
    })
    .await?;

    info!(cycles = summary.cycles, failures = summary.failures, "Watch mode stopped");
    Ok(())
}

/// Runs cycles until `shutdown` fires, sleeping `interval` between them.
///
/// A cycle error is reported on stderr and the loop carries on. Each
/// completed cycle is handed to `on_report`.
pub async fn watch_loop<C, N, R, F>(
    watcher: &Watcher<C, N, R>,
    interval: Duration,
    shutdown: &CancellationToken,
    mut on_report: F,
) -> Result<LoopSummary>
where
    C: CountSource,
    N: Notifier,
    R: StateRepository,
    F: FnMut(&CycleReport) -> Result<()>,
{
    let mut summary = LoopSummary::default();

    while !shutdown.is_cancelled() {
        summary.cycles += 1;
        match watcher.run_cycle().await {
            Ok(report) => {
                if report.is_fetch_failure() {
                    summary.failures += 1;
                }
                on_report(&report)?;
            }
            Err(e) => {
                summary.failures += 1;
                error!(error = %e, "Cycle failed, retrying next interval");
                // Logging may be off (--quiet); the failure still gets its line.
                eprintln!("Error: {e:#}");
            }
        }

        tokio::select! {
            () = shutdown.cancelled() => break,
            () = tokio::time::sleep(interval) => {}
        }
    }

    Ok(summary)
}
