//! Game identifier resolution.
//!
//! Numeric ids pass straight through. Slugs are looked up with
//! `GET /games?name_id=<slug>` on each host in order; the first host that
//! returns an acceptable entry wins.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, instrument, warn};

use crate::api::{GameEntry, Page, games_url, platform_headers};
use crate::client::HttpClient;
use crate::context::ApiTarget;
use crate::error::FetchError;

// ============================================================================
// Slug Match Policy
// ============================================================================

/// How the first search result is checked against the requested slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlugMatch {
    /// The entry's `name_id` must equal the slug.
    #[default]
    Exact,
    /// Any first entry is accepted.
    First,
}

impl SlugMatch {
    /// Config spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::First => "first",
        }
    }

    fn accepts(self, slug: &str, entry: &GameEntry) -> bool {
        match self {
            Self::Exact => entry.name_id.as_deref() == Some(slug),
            Self::First => true,
        }
    }
}

impl FromStr for SlugMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "first" => Ok(Self::First),
            other => Err(format!("unknown slug match policy '{other}' (expected exact or first)")),
        }
    }
}

impl fmt::Display for SlugMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `identifier` is a numeric game id.
pub fn is_numeric_id(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// Resolver
// ============================================================================

/// Maps a game slug or id to the numeric id used by the mods endpoint.
#[derive(Debug)]
pub struct IdentifierResolver<'a> {
    http: &'a HttpClient,
    target: &'a ApiTarget,
}

impl<'a> IdentifierResolver<'a> {
    /// Creates a resolver over a client and target.
    pub fn new(http: &'a HttpClient, target: &'a ApiTarget) -> Self {
        Self { http, target }
    }

    /// Resolves `identifier` to a numeric game id.
    ///
    /// A host that fails is skipped. If no host yields an acceptable entry
    /// the result is [`FetchError::NotFound`].
    #[instrument(skip(self), fields(policy = %self.target.slug_match))]
    pub async fn resolve(&self, identifier: &str) -> Result<u64, FetchError> {
        let identifier = identifier.trim();
        if is_numeric_id(identifier) {
            return identifier
                .parse()
                .map_err(|_| FetchError::Config(format!("game id '{identifier}' is out of range")));
        }

        let api_key = self.target.require_api_key()?;
        let hosts = self.target.require_hosts()?;
        let headers = platform_headers(&self.target.platform)?;
        let mut last_error = None;

        for host in hosts {
            let url = games_url(host)?;
            let query = [("api_key", api_key), ("name_id", identifier)];

            let page: Page<GameEntry> = match self.http.get_json(url, &query, &headers).await {
                Ok(page) => page,
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) => {
                    warn!(host = %host, error = %e, "Game lookup failed, trying next host");
                    last_error = Some(e.to_string());
                    continue;
                }
            };

            match page.items().first() {
                Some(entry) if self.target.slug_match.accepts(identifier, entry) => {
                    info!(host = %host, game_id = entry.id, "Resolved game identifier");
                    return Ok(entry.id);
                }
                Some(entry) => {
                    debug!(host = %host, returned = ?entry.name_id, "First result does not match slug");
                }
                None => debug!(host = %host, "No games matched"),
            }
        }

        Err(FetchError::NotFound {
            identifier: identifier.to_string(),
            last_error,
        })
    }

    /// Free-text game search, returning results from the first host that answers.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<GameEntry>, FetchError> {
        let api_key = self.target.require_api_key()?;
        let hosts = self.target.require_hosts()?;
        let headers = platform_headers(&self.target.platform)?;
        let mut last_error = String::from("no hosts tried");

        for host in hosts {
            let url = games_url(host)?;
            let query = [("api_key", api_key), ("_q", term.trim())];

            match self.http.get_json::<Page<GameEntry>>(url, &query, &headers).await {
                Ok(page) => return Ok(page.into_items()),
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) => {
                    warn!(host = %host, error = %e, "Search failed, trying next host");
                    last_error = e.to_string();
                }
            }
        }

        Err(FetchError::AllHostsFailed { last_error })
    }
}

// ============================================================================
// Tests
// ============================================================================
