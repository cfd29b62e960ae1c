// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # modwatch Fetch
//!
//! Everything between the watcher and the mod.io API.
//!
//! ## Layers
//!
//! - [`client::HttpClient`] - GET with timeout, retries and backoff; classifies
//!   responses as success, retryable or fatal
//! - [`resolver::IdentifierResolver`] - turns a game slug into its numeric id,
//!   trying each API host in order
//! - [`count::CountFetcher`] - reads the platform-filtered mod total for a game
//!
//! ## Example
//!
//! ```ignore
//! use modwatch_fetch::{ApiTarget, CountFetcher, FetchSettings, HttpClient};
//!
//! let http = HttpClient::new(&FetchSettings::default())?;
//! let target = ApiTarget::new("ps5", vec!["https://api.mod.io/v1".into()])
//!     .with_api_key("...")
//!     .with_game("baldursgate3");
//! let count = CountFetcher::new(http, target).get_count().await?;
//! ```

pub mod api;
pub mod client;
pub mod context;
pub mod count;
pub mod error;
pub mod resolver;
pub mod retry;

pub use api::{GameEntry, Page, PLATFORM_HEADER};
pub use client::HttpClient;
pub use context::{ApiTarget, FetchSettings};
pub use count::CountFetcher;
pub use error::FetchError;
pub use resolver::{IdentifierResolver, SlugMatch};
pub use retry::{RetryPolicy, StatusClass};
