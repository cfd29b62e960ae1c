//! Check command - one watch cycle.

use anyhow::Result;
use modwatch_core::CycleReport;
use modwatch_store::Settings;
use tokio_util::sync::CancellationToken;

use super::{build_watcher, emit};
use crate::{Cli, OutputFormat};

/// Runs the check command.
pub async fn run(cli: &Cli, settings: &Settings, shutdown: CancellationToken) -> Result<()> {
    let watcher = build_watcher(settings, cli.dry_run, shutdown)?;
    let report = watcher.run_cycle().await?;

    if report.is_fetch_failure() && cli.format == OutputFormat::Text {
        if let CycleReport::FetchFailed { reason } = &report {
            anyhow::bail!("could not determine the current mod count: {reason}");
        }
    }

    let options = watcher.options();
    emit(
        cli,
        |f| f.format_report(&report, &options.game_label, &options.platform),
        |f| f.format_report(&report, &options.game_label, &options.platform),
    )
}
