//! Common test utilities for Slice Savvy storage integration tests.

#![cfg(feature = "rocksdb-backend")]
#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use tempfile::TempDir;

use slice_savvy_store::{Dashboard, RocksStorage, SeedData, StoreConfig};

/// A `RocksDB` directory that outlives the dashboards opened on it.
pub struct TestHarness {
    /// Temporary directory for the database (kept alive for test duration).
    pub temp_dir: TempDir,
}

impl TestHarness {
    /// Create a harness with a fresh, empty database directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Configuration pointing at the harness directory.
    pub fn config(&self) -> StoreConfig {
        StoreConfig {
            data_dir: self.temp_dir.path().to_string_lossy().to_string(),
            ..StoreConfig::default()
        }
    }

    /// Open the raw storage. Drop it before opening a dashboard on the same path.
    pub fn storage(&self) -> Arc<RocksStorage> {
        Arc::new(RocksStorage::open(self.temp_dir.path()).expect("Failed to open storage"))
    }

    /// Open a dashboard with the bundled seed.
    pub fn dashboard(&self) -> Dashboard<RocksStorage> {
        Dashboard::open(self.config()).expect("Failed to open dashboard")
    }

    /// The bundled seed.
    pub fn seed() -> SeedData {
        SeedData::builtin().expect("Failed to parse seed")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
