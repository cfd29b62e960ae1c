//! State command - show what is stored.

use anyhow::Result;
use modwatch_store::{Settings, StateStore};

use super::emit;
use crate::Cli;

/// Runs the state command.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let store = StateStore::new(&settings.state_path);
    let state = store.load().await?;

    emit(
        cli,
        |f| f.format_state(&state, store.path()),
        |f| f.format_state(&state, store.path()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_state_works_with_malformed_tunables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"last_count": 3, "last_checked": 10}"#).unwrap();
        let settings = Settings::from_lookup(|key| match key {
            "MODWATCH_STATE_PATH" => Some(path.display().to_string()),
            "MODWATCH_MAX_DELTA" => Some("lots".to_string()),
            "MODWATCH_INTERVAL_SECS" => Some("often".to_string()),
            _ => None,
        });
        let cli = Cli::parse_from(["modwatch", "--format", "json", "state"]);

        run(&cli, &settings).await.unwrap();
        assert!(settings.max_delta().is_err());
    }

    #[tokio::test]
    async fn test_corrupt_state_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{oops").unwrap();
        let settings = Settings::from_lookup(|key| {
            (key == "MODWATCH_STATE_PATH").then(|| path.display().to_string())
        });
        let cli = Cli::parse_from(["modwatch", "state"]);

        let err = run(&cli, &settings).await.unwrap_err();
        assert!(format!("{err:#}").contains("corrupt state file"));
    }
}
