//! Settings shared by the fetch layers.

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, Secret};

use crate::error::FetchError;
use crate::resolver::SlugMatch;
use crate::retry::RetryPolicy;

/// Default mod.io API host.
pub const DEFAULT_HOST: &str = "https://api.mod.io/v1";

/// Default platform selector.
pub const DEFAULT_PLATFORM: &str = "ps5";

// ============================================================================
// Fetch Settings
// ============================================================================

/// Transport settings for the resilient client.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempts per request.
    pub max_tries: u32,
    /// Exponential backoff base in seconds.
    pub backoff_base: f64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            max_tries: 3,
            backoff_base: 2.0,
        }
    }
}

impl FetchSettings {
    /// Sets the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the attempt count.
    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Sets the backoff base.
    pub fn with_backoff_base(mut self, base: f64) -> Self {
        self.backoff_base = base;
        self
    }

    /// Builds the retry policy for these settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_tries).with_backoff_base(self.backoff_base)
    }
}

// ============================================================================
// API Target
// ============================================================================

/// Which game to watch, on which platform, through which hosts.
///
/// The API key and game are optional here and checked only when a request
/// needs them, so commands that never touch the API run without them.
#[derive(Clone)]
pub struct ApiTarget {
    /// API key, sent as the `api_key` query parameter.
    pub api_key: Option<Secret<String>>,
    /// Numeric game id or slug.
    pub game: Option<String>,
    /// Platform selector header value.
    pub platform: String,
    /// API base URLs in priority order.
    pub hosts: Vec<String>,
    /// How strictly a slug search result must match.
    pub slug_match: SlugMatch,
}

impl ApiTarget {
    /// Creates a target with no key or game.
    pub fn new(platform: impl Into<String>, hosts: Vec<String>) -> Self {
        Self {
            api_key: None,
            game: None,
            platform: platform.into(),
            hosts,
            slug_match: SlugMatch::default(),
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(key.into()));
        self
    }

    /// Sets the game identifier.
    pub fn with_game(mut self, game: impl Into<String>) -> Self {
        self.game = Some(game.into());
        self
    }

    /// Sets the slug match policy.
    pub fn with_slug_match(mut self, slug_match: SlugMatch) -> Self {
        self.slug_match = slug_match;
        self
    }

    /// Returns the API key, or a configuration error if it is unset or blank.
    pub fn require_api_key(&self) -> Result<&str, FetchError> {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().trim())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| FetchError::Config("MODIO_API_KEY is not set".to_string()))
    }

    /// Returns the game identifier, or a configuration error if it is unset or blank.
    pub fn require_game(&self) -> Result<&str, FetchError> {
        self.game
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .ok_or_else(|| FetchError::Config("MODIO_GAME is not set".to_string()))
    }

    /// Returns the host list, or a configuration error if it is empty.
    pub fn require_hosts(&self) -> Result<&[String], FetchError> {
        if self.hosts.is_empty() {
            return Err(FetchError::Config("no API hosts configured".to_string()));
        }
        Ok(&self.hosts)
    }

    /// Label for messages: the configured game or a placeholder.
    pub fn game_label(&self) -> &str {
        self.game.as_deref().unwrap_or("(unset game)")
    }
}

impl Default for ApiTarget {
    fn default() -> Self {
        Self::new(DEFAULT_PLATFORM, vec![DEFAULT_HOST.to_string()])
    }
}

impl fmt::Debug for ApiTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiTarget")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("game", &self.game)
            .field("platform", &self.platform)
            .field("hosts", &self.hosts)
            .field("slug_match", &self.slug_match)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
