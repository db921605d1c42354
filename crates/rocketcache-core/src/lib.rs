//! Rocketcache core - data access for a rocket catalog.
//!
//! Records come from a read-only remote API and from rockets created on
//! this machine, which are kept in local key/value storage. `RocketStore`
//! combines the two and exposes filtered and aggregated views.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rocketcache_core::{ApiClient, FileStore, RocketStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let api = ApiClient::new()?;
//! let storage = FileStore::new("./data".into())?;
//! let store = RocketStore::new(Arc::new(api), Arc::new(storage));
//!
//! store.fetch_all().await;
//! store.set_search("falcon");
//! for rocket in store.filtered_rockets() {
//!     println!("{} ({})", rocket.name, rocket.country);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod storage;
pub mod store;
pub mod utils;

pub use api::{ApiClient, ApiError, RocketSource};
pub use config::Config;
pub use models::{ActiveFilter, Rocket, RocketFilter};
pub use storage::{FileStore, KeyValueStore, LocalRockets, MemoryStore, StorageError};
pub use store::{RocketStore, FETCH_ERROR_MESSAGE};
