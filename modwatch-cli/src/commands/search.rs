//! Search command - find a game's id and slug.

use anyhow::Result;
use clap::Args;
use modwatch_fetch::IdentifierResolver;
use modwatch_store::Settings;
use tokio_util::sync::CancellationToken;

use super::{emit, http_client};
use crate::Cli;

/// Arguments for search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Name or part of a name.
    pub term: String,
}

/// Runs the search command.
pub async fn run(
    args: &SearchArgs,
    cli: &Cli,
    settings: &Settings,
    shutdown: CancellationToken,
) -> Result<()> {
    let http = http_client(settings, shutdown)?;
    let target = settings.api_target()?;
    let games = IdentifierResolver::new(&http, &target)
        .search(&args.term)
        .await?;

    emit(cli, |f| f.format_games(&games), |f| f.format_games(&games))
}
