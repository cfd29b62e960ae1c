// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! modwatch CLI - watches a mod.io game for new platform mods.
//!
//! # Examples
//!
//! ```bash
//! # One check cycle (the default command)
//! modwatch
//!
//! # Poll every 10 minutes until interrupted
//! modwatch watch --interval 600
//!
//! # See what a cycle would do without mailing or saving
//! modwatch --dry-run check
//!
//! # Reset the baseline by hand
//! modwatch baseline 120
//!
//! # Find a game's id and slug
//! modwatch search "baldur"
//! ```

mod commands;
mod output;
mod signal;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use modwatch_store::Settings;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{baseline, check, notify, search, state, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// modwatch - new mod alerts for mod.io games.
#[derive(Parser)]
#[command(name = "modwatch")]
#[command(about = "Watches a mod.io game for new platform mods")]
#[command(long_about = r#"
modwatch polls the mod.io API for the number of mods a game has on one
platform and sends an email when that number goes up.

Configuration is read from the environment (and a .env file):
  MODIO_API_KEY, MODIO_GAME, MODIO_PLATFORM, MODIO_HOSTS
  SMTP_HOST, SMTP_PORT, SMTP_USER, SMTP_PASS, ALERT_TO

Examples:
  modwatch                       # One check cycle
  modwatch watch                 # Poll until interrupted
  modwatch --dry-run check       # Evaluate without side effects
  modwatch baseline 120          # Override the stored count
  modwatch state --format json   # Show the stored state
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'check' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Evaluate without sending mail or writing state.
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,

    /// State file (overrides MODWATCH_STATE_PATH).
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run one check cycle (default if no command specified).
    #[command(visible_alias = "c")]
    Check,

    /// Run check cycles until interrupted.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Set the stored count by hand.
    Baseline(baseline::BaselineArgs),

    /// Search games by name.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Send a test email.
    NotifyTest,

    /// Show the stored state.
    State,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("modwatch=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modwatch=info,warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    Settings::load_dotenv();
    setup_logging(cli.verbose, cli.quiet);

    let shutdown = CancellationToken::new();
    signal::spawn_shutdown_listener(shutdown.clone());

    // Failures are reported, never turned into a non-zero exit status.
    if let Err(e) = run(&cli, shutdown).await {
        eprintln!("Error: {e:#}");
    }
}

async fn run(cli: &Cli, shutdown: CancellationToken) -> Result<()> {
    let mut settings = Settings::from_env();
    if let Some(path) = &cli.state {
        settings.state_path.clone_from(path);
    }

    match &cli.command {
        Some(Commands::Check) | None => check::run(cli, &settings, shutdown).await,
        Some(Commands::Watch(args)) => watch::run(args, cli, &settings, shutdown).await,
        Some(Commands::Baseline(args)) => baseline::run(args, cli, &settings).await,
        Some(Commands::Search(args)) => search::run(args, cli, &settings, shutdown).await,
        Some(Commands::NotifyTest) => notify::run(cli, &settings).await,
        Some(Commands::State) => state::run(cli, &settings).await,
    }
}
