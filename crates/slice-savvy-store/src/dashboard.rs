//! Shared dashboard handles.

use std::sync::Arc;

use chrono::NaiveDate;
use slice_savvy_core::{DashboardReport, DateRange};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::menu::MenuRepository;
use crate::seed::SeedData;
use crate::store::DashboardStore;
use crate::Storage;

/// The dashboard store and menu repository over one storage backend.
pub struct Dashboard<S> {
    /// Configuration.
    pub config: StoreConfig,
    /// Customers, orders and analytics.
    pub store: DashboardStore<S>,
    /// Menu items.
    pub menu: MenuRepository<S>,
}

impl<S: Storage> Dashboard<S> {
    /// Open both halves over `storage`, seeding from `seed`.
    pub fn new(config: StoreConfig, storage: Arc<S>, seed: SeedData) -> Self {
        let store = DashboardStore::open(Arc::clone(&storage), &seed);
        let menu = MenuRepository::new(storage, seed.menu_items);
        Self {
            config,
            store,
            menu,
        }
    }

    /// Build the dashboard report for `range`, ending on `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the menu can't be loaded.
    pub async fn report(&self, range: Option<DateRange>, today: NaiveDate) -> Result<DashboardReport> {
        let menu_items = self.menu.load()?;
        let mut options = self.config.report_options(today);
        options.range = range;
        Ok(self.store.report(&menu_items, &options).await)
    }

    /// Flush the store.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the final write fails.
    pub async fn close(&self) -> Result<()> {
        self.store.close().await
    }
}

#[cfg(feature = "rocksdb-backend")]
impl Dashboard<crate::rocks::RocksStorage> {
    /// Open a `RocksDB`-backed dashboard at `config.data_dir` with the bundled seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database can't be opened or the seed doesn't parse.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let storage = Arc::new(crate::rocks::RocksStorage::open(&config.data_dir)?);
        tracing::info!(data_dir = %config.data_dir, "Dashboard storage opened");
        Ok(Self::new(config, storage, SeedData::builtin()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;

    #[tokio::test]
    async fn report_joins_store_and_menu() {
        let dashboard = Dashboard::new(
            StoreConfig::default(),
            Arc::new(MemoryStorage::new()),
            SeedData::builtin().unwrap(),
        );
        let today = NaiveDate::from_ymd_opt(2024, 6, 13).unwrap();

        let report = dashboard.report(None, today).await.unwrap();
        assert_eq!(report.summary.total_orders, 13);
        assert_eq!(report.products.len(), dashboard.menu.load().unwrap().len());
        assert_eq!(report.recent_orders.len(), 4);
        assert_eq!(report.recent_orders[0].order_id.as_str(), "ORD-013");

        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        let ranged = dashboard
            .report(Some(DateRange::new(day(7), day(8))), today)
            .await
            .unwrap();
        assert_eq!(ranged.summary.total_orders, 4);
    }
}
