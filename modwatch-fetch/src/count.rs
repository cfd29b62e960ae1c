//! Platform-filtered mod count.

use async_trait::async_trait;
use modwatch_core::CountSource;
use serde::de::IgnoredAny;
use tracing::{info, instrument, warn};

use crate::api::{Page, mods_url, platform_headers};
use crate::client::HttpClient;
use crate::context::ApiTarget;
use crate::error::FetchError;
use crate::resolver::IdentifierResolver;

/// Reads the number of mods a game has for the configured platform.
///
/// Only one item is requested per host; the total comes from the
/// pagination metadata.
#[derive(Debug, Clone)]
pub struct CountFetcher {
    http: HttpClient,
    target: ApiTarget,
}

impl CountFetcher {
    /// Creates a count fetcher.
    pub fn new(http: HttpClient, target: ApiTarget) -> Self {
        Self { http, target }
    }

    /// Returns a resolver sharing this fetcher's client and target.
    pub fn resolver(&self) -> IdentifierResolver<'_> {
        IdentifierResolver::new(&self.http, &self.target)
    }

    /// Fetches the current count.
    ///
    /// The game identifier is resolved on every call. A host answering 404
    /// or failing in any other way is skipped; when all hosts fail the
    /// last error is reported. A missing count is never reported as zero.
    #[instrument(skip(self), fields(platform = %self.target.platform))]
    pub async fn get_count(&self) -> Result<u64, FetchError> {
        let api_key = self.target.require_api_key()?;
        let game = self.target.require_game()?;
        let hosts = self.target.require_hosts()?;
        let headers = platform_headers(&self.target.platform)?;

        let game_id = self.resolver().resolve(game).await?;
        let query = [("api_key", api_key), ("_limit", "1")];
        let mut last_error = String::from("no hosts tried");

        for host in hosts {
            let url = mods_url(host, game_id)?;

            match self.http.get_json::<Page<IgnoredAny>>(url, &query, &headers).await {
                Ok(page) => match page.total() {
                    Some(total) => {
                        info!(host = %host, game_id, total, "Fetched mod count");
                        return Ok(total);
                    }
                    None => {
                        warn!(host = %host, "Response had no count fields");
                        last_error = format!("response from {host} had no count fields");
                    }
                },
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) if e.is_not_found_status() => {
                    warn!(host = %host, game_id, "Game not found on host, trying next");
                    last_error = e.to_string();
                }
                Err(e) => {
                    warn!(host = %host, error = %e, "Count request failed, trying next host");
                    last_error = e.to_string();
                }
            }
        }

        Err(FetchError::AllHostsFailed { last_error })
    }
}

#[async_trait]
impl CountSource for CountFetcher {
    type Error = FetchError;

    async fn current_count(&self) -> Result<u64, FetchError> {
        self.get_count().await
    }
}
