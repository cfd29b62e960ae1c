//! JSON output formatting.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use modwatch_core::{CheckOutcome, CycleReport, WatchState};
use modwatch_fetch::GameEntry;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one cycle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput<'a> {
    pub game: &'a str,
    pub platform: &'a str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

/// JSON output for the stored state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub last_count: Option<u64>,
    pub last_checked: Option<i64>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl StateOutput {
    fn new(state: &WatchState, path: Option<&Path>) -> Self {
        Self {
            path: path.map(|p| p.display().to_string()),
            last_count: state.last_count,
            last_checked: state.last_checked,
            last_checked_at: state.last_checked_at(),
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serializes any value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a cycle report.
    pub fn format_report(&self, report: &CycleReport, game: &str, platform: &str) -> Result<String> {
        let output = match report {
            CycleReport::FetchFailed { reason } => ReportOutput {
                game,
                platform,
                status: "fetch_failed",
                previous: None,
                current: None,
                diff: None,
                state: None,
                persisted: None,
                error: Some(reason.as_str()),
            },
            CycleReport::Evaluated {
                outcome,
                state,
                persisted,
            } => {
                let (previous, diff) = match *outcome {
                    CheckOutcome::BaselineSet { .. } => (None, None),
                    CheckOutcome::Increased { previous, diff, .. } => (Some(previous), Some(diff)),
                    CheckOutcome::Unchanged { previous, .. } => (Some(previous), None),
                    CheckOutcome::SpikeGuarded {
                        previous, delta, ..
                    } => (Some(previous), Some(delta)),
                };
                ReportOutput {
                    game,
                    platform,
                    status: outcome.kind(),
                    previous,
                    current: Some(outcome.current()),
                    diff,
                    state: Some(StateOutput::new(state, None)),
                    persisted: Some(*persisted),
                    error: None,
                }
            }
        };
        self.format(&output)
    }

    /// Formats the stored state.
    pub fn format_state(&self, state: &WatchState, path: &Path) -> Result<String> {
        self.format(&StateOutput::new(state, Some(path)))
    }

    /// Formats search results.
    pub fn format_games(&self, games: &[GameEntry]) -> Result<String> {
        self.format(&games)
    }
}
