//! Persistent storage for the Slice Savvy dashboard.
//!
//! This crate keeps the dashboard's customers, orders and analytics snapshot in a
//! versioned record, and the menu as a separate collection, on a small key/value
//! [`Storage`] backend.
//!
//! # Architecture
//!
//! - [`DashboardStore`]: in-memory state behind a `tokio` lock, written through to
//!   storage on every mutation, with loading and error tracking for actions
//! - [`MenuRepository`]: load/save/create/update/delete over the menu collection
//! - [`migrations`]: schema versions of the persisted record and the upgrade chain
//! - [`RocksStorage`]: `RocksDB` backend with a single `local_storage` column family
//!   (feature `rocksdb-backend`, on by default)
//! - [`MemoryStorage`]: in-process backend for tests and ephemeral sessions
//!
//! # Example
//!
//! ```no_run
//! use slice_savvy_store::{Dashboard, StoreConfig};
//!
//! # async fn run() -> slice_savvy_store::Result<()> {
//! let dashboard = Dashboard::open(StoreConfig::from_env())?;
//!
//! let today = chrono::Local::now().date_naive();
//! let report = dashboard.report(None, today).await?;
//! println!("revenue: {} cents", report.summary.total_revenue_cents);
//!
//! dashboard.close().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod dashboard;
pub mod error;
pub mod keys;
pub mod memory;
pub mod menu;
pub mod migrations;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;
pub mod seed;
pub mod selectors;
pub mod state;
pub mod store;

pub use config::StoreConfig;
pub use dashboard::Dashboard;
pub use error::{Result, StoreError};
pub use memory::MemoryStorage;
pub use menu::MenuRepository;
pub use migrations::VersionedState;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStorage;
pub use schema::CURRENT_VERSION;
pub use seed::SeedData;
pub use state::{PersistedState, StoreState};
pub use store::DashboardStore;

/// A string-keyed byte store.
///
/// Writes replace the whole value under a key. Implementations must be safe to share
/// across tasks.
pub trait Storage: Send + Sync {
    /// Read the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails or the value doesn't fit.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn delete(&self, key: &str) -> Result<()>;

    /// Make previous writes durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend flush fails.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
