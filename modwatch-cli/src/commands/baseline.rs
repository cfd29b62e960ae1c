//! Baseline command - manual override of the stored count.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use modwatch_core::override_baseline;
use modwatch_store::{Settings, StateStore};

use super::emit;
use crate::Cli;

/// Arguments for baseline command.
#[derive(Args)]
pub struct BaselineArgs {
    /// New stored count. May be lower than the current one.
    pub count: u64,
}

/// Runs the baseline command.
pub async fn run(args: &BaselineArgs, cli: &Cli, settings: &Settings) -> Result<()> {
    let store = StateStore::new(&settings.state_path);
    let state = override_baseline(&store, args.count, Utc::now(), cli.dry_run).await?;
    let saved = !cli.dry_run;

    emit(
        cli,
        |f| f.format_baseline(&state, saved),
        |f| f.format_state(&state, store.path()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use modwatch_core::WatchState;

    #[tokio::test]
    async fn test_baseline_ignores_network_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let settings = Settings::from_lookup(|key| match key {
            "MODWATCH_STATE_PATH" => Some(path.display().to_string()),
            "MODWATCH_HTTP_TIMEOUT_SECS" => Some("soon".to_string()),
            _ => None,
        });
        let cli = Cli::parse_from(["modwatch", "baseline", "7"]);

        run(&BaselineArgs { count: 7 }, &cli, &settings).await.unwrap();

        let state: WatchState =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(state.last_count, Some(7));
    }

    #[tokio::test]
    async fn test_dry_run_baseline_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let settings = Settings::from_lookup(|key| {
            (key == "MODWATCH_STATE_PATH").then(|| path.display().to_string())
        });
        let cli = Cli::parse_from(["modwatch", "--dry-run", "baseline", "7"]);

        run(&BaselineArgs { count: 7 }, &cli, &settings).await.unwrap();

        assert!(!path.exists());
    }
}
