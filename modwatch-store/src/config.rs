//! Configuration management.
//!
//! Every tunable comes from the process environment, optionally seeded from a
//! `.env` file in the working directory.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use modwatch_core::DEFAULT_MAX_DELTA;
use modwatch_fetch::context::{DEFAULT_HOST, DEFAULT_PLATFORM};
use modwatch_fetch::{ApiTarget, FetchSettings, SlugMatch};
use modwatch_notify::SmtpConfig;
use secrecy::Secret;
use tracing::debug;

use crate::error::StoreError;
use crate::persistence::default_state_path;

// ============================================================================
// Keys
// ============================================================================

/// mod.io API key.
pub const API_KEY: &str = "MODIO_API_KEY";
/// Game id or slug.
pub const GAME: &str = "MODIO_GAME";
/// Platform selector.
pub const PLATFORM: &str = "MODIO_PLATFORM";
/// Comma-separated API base URLs.
pub const HOSTS: &str = "MODIO_HOSTS";
/// Slug match policy (`exact` or `first`).
pub const SLUG_MATCH: &str = "MODIO_SLUG_MATCH";
/// Per-request timeout in seconds.
pub const HTTP_TIMEOUT_SECS: &str = "MODWATCH_HTTP_TIMEOUT_SECS";
/// Attempts per request.
pub const HTTP_MAX_TRIES: &str = "MODWATCH_HTTP_MAX_TRIES";
/// Backoff base in seconds.
pub const HTTP_BACKOFF_BASE: &str = "MODWATCH_HTTP_BACKOFF_BASE";
/// Spike guard threshold.
pub const MAX_DELTA: &str = "MODWATCH_MAX_DELTA";
/// State file path.
pub const STATE_PATH: &str = "MODWATCH_STATE_PATH";
/// Watch interval in seconds.
pub const INTERVAL_SECS: &str = "MODWATCH_INTERVAL_SECS";
/// SMTP relay host.
pub const SMTP_HOST: &str = "SMTP_HOST";
/// SMTP relay port.
pub const SMTP_PORT: &str = "SMTP_PORT";
/// SMTP login (also the sender address).
pub const SMTP_USER: &str = "SMTP_USER";
/// SMTP password.
pub const SMTP_PASS: &str = "SMTP_PASS";
/// Alert recipient.
pub const ALERT_TO: &str = "ALERT_TO";

/// Default watch interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(900);

// ============================================================================
// Settings
// ============================================================================

/// Runtime settings read from the environment.
///
/// Loading never fails. Tunables are kept as read and parsed by the accessor
/// of the operation that needs them, so a malformed value only breaks the
/// commands that use it.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Mail delivery.
    pub smtp: SmtpConfig,
    /// State file location.
    pub state_path: PathBuf,
    api: ApiTarget,
    raw: RawTunables,
}

/// Tunables exactly as found in the environment.
#[derive(Debug, Clone, Default)]
struct RawTunables {
    slug_match: Option<String>,
    timeout_secs: Option<String>,
    max_tries: Option<String>,
    backoff_base: Option<String>,
    max_delta: Option<String>,
    interval_secs: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Loads `.env` from the working directory, if present.
    ///
    /// Variables already set in the environment win.
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => debug!(error = %e, "Ignoring unreadable .env"),
        }
    }

    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let platform = get(PLATFORM).unwrap_or_else(|| DEFAULT_PLATFORM.to_string());
        let hosts = get(HOSTS).map_or_else(|| vec![DEFAULT_HOST.to_string()], |raw| split_hosts(&raw));
        let mut api = ApiTarget::new(platform, hosts);
        api.api_key = get(API_KEY).map(Secret::new);
        api.game = get(GAME);

        Self {
            smtp: SmtpConfig {
                host: get(SMTP_HOST),
                port: get(SMTP_PORT),
                username: get(SMTP_USER),
                password: get(SMTP_PASS).map(Secret::new),
                recipient: get(ALERT_TO),
            },
            state_path: get(STATE_PATH).map_or_else(default_state_path, PathBuf::from),
            api,
            raw: RawTunables {
                slug_match: get(SLUG_MATCH),
                timeout_secs: get(HTTP_TIMEOUT_SECS),
                max_tries: get(HTTP_MAX_TRIES),
                backoff_base: get(HTTP_BACKOFF_BASE),
                max_delta: get(MAX_DELTA),
                interval_secs: get(INTERVAL_SECS),
            },
        }
    }

    /// Game label for messages: the configured game or a placeholder.
    pub fn game_label(&self) -> &str {
        self.api.game_label()
    }

    /// Platform selector.
    pub fn platform(&self) -> &str {
        &self.api.platform
    }

    /// The API target, with the slug match policy applied.
    pub fn api_target(&self) -> Result<ApiTarget, StoreError> {
        let slug_match = match &self.raw.slug_match {
            Some(raw) => SlugMatch::from_str(raw).map_err(|e| invalid(SLUG_MATCH, &e))?,
            None => SlugMatch::default(),
        };
        Ok(self.api.clone().with_slug_match(slug_match))
    }

    /// Transport tuning.
    pub fn fetch_settings(&self) -> Result<FetchSettings, StoreError> {
        let defaults = FetchSettings::default();
        let timeout_secs: u64 = parse_or(
            self.raw.timeout_secs.as_deref(),
            HTTP_TIMEOUT_SECS,
            defaults.timeout.as_secs(),
        )?;
        let max_tries: u32 = parse_or(self.raw.max_tries.as_deref(), HTTP_MAX_TRIES, defaults.max_tries)?;
        let backoff_base: f64 = parse_or(
            self.raw.backoff_base.as_deref(),
            HTTP_BACKOFF_BASE,
            defaults.backoff_base,
        )?;

        if timeout_secs == 0 {
            return Err(invalid(HTTP_TIMEOUT_SECS, "must be at least 1"));
        }
        if max_tries == 0 {
            return Err(invalid(HTTP_MAX_TRIES, "must be at least 1"));
        }
        if !backoff_base.is_finite() || backoff_base < 0.0 {
            return Err(invalid(HTTP_BACKOFF_BASE, "must be a non-negative number"));
        }

        Ok(defaults
            .with_timeout(Duration::from_secs(timeout_secs))
            .with_max_tries(max_tries)
            .with_backoff_base(backoff_base))
    }

    /// Spike guard threshold.
    pub fn max_delta(&self) -> Result<u64, StoreError> {
        parse_or(self.raw.max_delta.as_deref(), MAX_DELTA, DEFAULT_MAX_DELTA)
    }

    /// Delay between watch cycles.
    pub fn interval(&self) -> Result<Duration, StoreError> {
        let secs: u64 = parse_or(
            self.raw.interval_secs.as_deref(),
            INTERVAL_SECS,
            DEFAULT_INTERVAL.as_secs(),
        )?;
        if secs == 0 {
            return Err(invalid(INTERVAL_SECS, "must be at least 1"));
        }
        Ok(Duration::from_secs(secs))
    }
}

fn split_hosts(raw: &str) -> Vec<String> {
    let hosts: Vec<String> = raw
        .split(',')
        .map(|h| h.trim().trim_end_matches('/').to_string())
        .filter(|h| !h.is_empty())
        .collect();

    if hosts.is_empty() {
        vec![DEFAULT_HOST.to_string()]
    } else {
        hosts
    }
}

fn parse_or<T>(raw: Option<&str>, key: &str, default: T) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| invalid(key, &format!("'{raw}' ({e})"))),
        None => Ok(default),
    }
}

fn invalid(key: &str, detail: &str) -> StoreError {
    StoreError::Config(format!("invalid {key}: {detail}"))
}

// ============================================================================
// Tests
// ============================================================================
