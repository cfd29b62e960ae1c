//! Resilient HTTP client.
//!
//! Every GET goes through [`HttpClient::get_json`], which applies the
//! [`RetryPolicy`]: HTTP 429/500/502/503/504 and network errors are retried,
//! any other non-2xx status fails immediately.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::context::FetchSettings;
use crate::error::FetchError;
use crate::retry::{RetryPolicy, StatusClass, classify, parse_retry_after};

/// User agent string for modwatch.
const USER_AGENT: &str = concat!("modwatch/", env!("CARGO_PKG_VERSION"));

/// Why one attempt did not produce a body.
#[derive(Debug)]
enum AttemptError {
    /// Worth another try, optionally after a server-chosen delay.
    Retryable {
        description: String,
        retry_after: Option<Duration>,
    },
    /// Give up now.
    Fatal(FetchError),
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client with timeout, retries and cancellable backoff.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    policy: RetryPolicy,
    shutdown: CancellationToken,
}

impl HttpClient {
    /// Creates a client from fetch settings.
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let inner = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner,
            policy: settings.retry_policy(),
            shutdown: CancellationToken::new(),
        })
    }

    /// Ties backoff sleeps to a shutdown token.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Performs a GET and decodes the JSON body.
    ///
    /// Retryable failures are attempted up to `max_tries` times; a numeric
    /// `Retry-After` is honoured exactly, otherwise the exponential schedule
    /// applies. There is no sleep after the final attempt.
    #[instrument(skip(self, url, query, headers), fields(url = %redact(&url)))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        headers: &HeaderMap,
    ) -> Result<T, FetchError> {
        let max_tries = self.policy.attempts();
        let mut last_error = String::new();

        for attempt in 1..=max_tries {
            if self.shutdown.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            debug!(attempt, max_tries, "GET request");

            let wait = match self.attempt(&url, query, headers).await {
                Ok(body) => return decode(&body),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retryable {
                    description,
                    retry_after,
                }) => {
                    last_error = description;
                    retry_after.unwrap_or_else(|| self.policy.delay_for_attempt(attempt))
                }
            };

            if attempt == max_tries {
                break;
            }

            warn!(
                attempt,
                max_tries,
                delay_secs = wait.as_secs_f64(),
                error = %last_error,
                "Request failed, retrying"
            );
            self.sleep(wait).await?;
        }

        Err(FetchError::Exhausted {
            attempts: max_tries,
            last_error,
        })
    }

    /// Sends one request and reads the body of a successful response.
    async fn attempt(
        &self,
        url: &Url,
        query: &[(&str, &str)],
        headers: &HeaderMap,
    ) -> Result<String, AttemptError> {
        let result = self
            .inner
            .get(url.clone())
            .query(query)
            .headers(headers.clone())
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) if e.is_builder() => return Err(AttemptError::Fatal(e.without_url().into())),
            Err(e) => {
                return Err(AttemptError::Retryable {
                    description: network_description(url, &e),
                    retry_after: None,
                });
            }
        };

        let status = response.status();
        debug!(status = %status, "Response received");

        match classify(status) {
            StatusClass::Success => {
                response
                    .text()
                    .await
                    .map_err(|e| AttemptError::Retryable {
                        description: network_description(url, &e),
                        retry_after: None,
                    })
            }
            StatusClass::Retryable => Err(AttemptError::Retryable {
                description: format!("HTTP {status} from {}", redact(url)),
                retry_after: retry_after(&response),
            }),
            StatusClass::Fatal => Err(AttemptError::Fatal(FetchError::Status {
                status: status.as_u16(),
                url: redact(url),
            })),
        }
    }

    /// Sleeps unless shutdown is requested first.
    async fn sleep(&self, duration: Duration) -> Result<(), FetchError> {
        tokio::select! {
            () = self.shutdown.cancelled() => Err(FetchError::Cancelled),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(format!("invalid JSON: {e}")))
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after)
}

fn network_description(url: &Url, error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    // reqwest's own message embeds the full URL, api_key included.
    let detail = std::error::Error::source(error)
        .map(ToString::to_string)
        .unwrap_or_else(|| kind.to_string());
    format!("{kind} for {}: {detail}", redact(url))
}

/// The URL without its query string, safe to log.
pub(crate) fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

// ============================================================================
// Tests
// ============================================================================
