//! Human-readable output.

use std::path::Path;

use chrono::{DateTime, Utc};
use modwatch_core::{CheckOutcome, CycleReport, WatchState};
use modwatch_fetch::GameEntry;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// One line describing what a cycle did.
    pub fn format_report(&self, report: &CycleReport, game: &str, platform: &str) -> String {
        let header = self.bold(&format!("{game} ({platform})"));
        match report {
            CycleReport::FetchFailed { reason } => {
                format!("{header}: {} {reason}", self.paint(RED, "fetch failed:"))
            }
            CycleReport::Evaluated {
                outcome, persisted, ..
            } => {
                let verdict = self.format_outcome(outcome);
                if *persisted {
                    format!("{header}: {verdict}")
                } else {
                    format!("{header}: {verdict} {}", self.dim("[dry run, not saved]"))
                }
            }
        }
    }

    fn format_outcome(&self, outcome: &CheckOutcome) -> String {
        let text = outcome.to_string();
        match outcome {
            CheckOutcome::Increased { .. } => self.paint(GREEN, &text),
            CheckOutcome::SpikeGuarded { .. } => self.paint(YELLOW, &text),
            CheckOutcome::BaselineSet { .. } => self.paint(CYAN, &text),
            CheckOutcome::Unchanged { .. } => self.dim(&text),
        }
    }

    /// The stored state, one field per line.
    pub fn format_state(&self, state: &WatchState, path: &Path) -> String {
        let count = state
            .last_count
            .map_or_else(|| self.dim("none (no baseline yet)"), |c| c.to_string());
        let checked = state
            .last_checked_at()
            .map_or_else(|| self.dim("never"), format_time);

        [
            format!("State file:   {}", path.display()),
            format!("Last count:   {count}"),
            format!("Last checked: {checked}"),
        ]
        .join("\n")
    }

    /// Result of a manual baseline override.
    pub fn format_baseline(&self, state: &WatchState, saved: bool) -> String {
        let count = state.last_count.unwrap_or_default();
        if saved {
            format!("Baseline set to {}", self.bold(&count.to_string()))
        } else {
            format!(
                "Baseline would be set to {} {}",
                self.bold(&count.to_string()),
                self.dim("[dry run, not saved]")
            )
        }
    }

    /// Search results as an aligned table.
    pub fn format_games(&self, games: &[GameEntry]) -> String {
        if games.is_empty() {
            return "No games found".to_string();
        }

        let mut lines = vec![self.bold(&format!("{:<10} {:<28} {}", "ID", "SLUG", "NAME"))];
        for game in games {
            lines.push(format!(
                "{:<10} {:<28} {}",
                game.id,
                game.name_id.as_deref().unwrap_or("-"),
                game.name.as_deref().unwrap_or("-"),
            ));
        }
        lines.join("\n")
    }

    // Color helpers

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }
}

fn format_time(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
