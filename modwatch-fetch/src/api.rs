//! mod.io API shapes and endpoints.

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FetchError;

/// Header that restricts results to one target platform.
pub const PLATFORM_HEADER: &str = "X-Modio-Platform";

// ============================================================================
// Response Types
// ============================================================================

/// A paginated list response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub data: Option<Vec<T>>,
    /// Items on this page, as reported by the server.
    #[serde(default)]
    pub result_count: Option<u64>,
    /// Items across all pages.
    #[serde(default)]
    pub result_total: Option<u64>,
}

impl<T> Page<T> {
    /// Best available item total.
    ///
    /// Prefers `result_total`, then `result_count`, then the length of
    /// `data`. Returns `None` when the response carries none of them.
    pub fn total(&self) -> Option<u64> {
        self.result_total
            .or(self.result_count)
            .or_else(|| self.data.as_ref().map(|d| d.len() as u64))
    }

    /// Items on this page.
    pub fn items(&self) -> &[T] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Consumes the page, returning its items.
    pub fn into_items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// A game returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    /// Numeric game id.
    pub id: u64,
    /// URL slug, e.g. `baldursgate3`.
    #[serde(default)]
    pub name_id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// Endpoints
// ============================================================================

/// Joins an API host and a path.
pub fn endpoint(host: &str, path: &str) -> Result<Url, FetchError> {
    let base = host.trim().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base}/{path}"))
        .map_err(|e| FetchError::Config(format!("invalid API host '{host}': {e}")))
}

/// `GET /games` - search games.
pub fn games_url(host: &str) -> Result<Url, FetchError> {
    endpoint(host, "games")
}

/// `GET /games/{id}/mods` - list mods of one game.
pub fn mods_url(host: &str, game_id: u64) -> Result<Url, FetchError> {
    endpoint(host, &format!("games/{game_id}/mods"))
}

/// Request headers carrying the platform selector.
pub fn platform_headers(platform: &str) -> Result<HeaderMap, FetchError> {
    let value = HeaderValue::from_str(platform.trim())
        .map_err(|e| FetchError::Config(format!("invalid platform '{platform}': {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(HeaderName::from_static("x-modio-platform"), value);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IgnoredAny;

    #[test]
    fn test_total_prefers_result_total() {
        let page: Page<IgnoredAny> =
            serde_json::from_str(r#"{"data": [{}], "result_count": 1, "result_total": 87}"#)
                .unwrap();
        assert_eq!(page.total(), Some(87));
    }

    #[test]
    fn test_total_falls_back_to_result_count() {
        let page: Page<IgnoredAny> =
            serde_json::from_str(r#"{"data": [{}, {}], "result_count": 5}"#).unwrap();
        assert_eq!(page.total(), Some(5));
    }

    #[test]
    fn test_total_falls_back_to_data_len() {
        let page: Page<IgnoredAny> = serde_json::from_str(r#"{"data": [{}, {}, {}]}"#).unwrap();
        assert_eq!(page.total(), Some(3));
    }

    #[test]
    fn test_total_unknown() {
        let page: Page<IgnoredAny> = serde_json::from_str(r#"{"error": "x"}"#).unwrap();
        assert_eq!(page.total(), None);
    }

    #[test]
    fn test_game_entry_optional_fields() {
        let page: Page<GameEntry> =
            serde_json::from_str(r#"{"data": [{"id": 5, "name_id": "baldursgate3"}]}"#).unwrap();
        assert_eq!(page.items()[0].id, 5);
        assert_eq!(page.items()[0].name, None);
    }

    #[test]
    fn test_game_page_without_data() {
        let page: Page<GameEntry> = serde_json::from_str(r#"{"result_total": 0}"#).unwrap();
        assert!(page.items().is_empty());
        assert_eq!(page.total(), Some(0));
    }

    #[test]
    fn test_endpoint_joining() {
        assert_eq!(
            mods_url("https://api.mod.io/v1/", 5).unwrap().as_str(),
            "https://api.mod.io/v1/games/5/mods"
        );
        assert_eq!(
            games_url("https://g-5.modapi.io/v1").unwrap().as_str(),
            "https://g-5.modapi.io/v1/games"
        );
        assert!(games_url("not a url").unwrap_err().is_config());
    }

    #[test]
    fn test_platform_header() {
        let headers = platform_headers("ps5").unwrap();
        assert_eq!(headers.get(PLATFORM_HEADER).unwrap(), "ps5");
        assert!(platform_headers("bad\nvalue").is_err());
    }
}
