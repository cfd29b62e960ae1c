// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # modwatch Store
//!
//! Durable state and configuration for `modwatch`.
//!
//! - **StateStore**: the JSON state file behind [`StateRepository`](modwatch_core::StateRepository)
//! - **Settings**: every tunable, read from the environment (and `.env`)
//! - **Persistence**: atomic, owner-only JSON file helpers
//!
//! ## Usage
//!
//! ```ignore
//! use modwatch_store::{Settings, StateStore};
//!
//! Settings::load_dotenv();
//! let settings = Settings::from_env();
//! let store = StateStore::new(&settings.state_path);
//! let state = store.load().await?;
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod state_store;

pub use config::Settings;
pub use error::StoreError;
pub use persistence::{default_data_dir, default_state_path, load_json, save_json};
pub use state_store::StateStore;

#[cfg(test)]
mod persistence_tests;
