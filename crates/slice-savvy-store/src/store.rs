//! The persisted dashboard store.
//!
//! [`DashboardStore`] owns the in-memory [`StoreState`] behind a `tokio` lock and
//! writes the persisted subset through to a [`Storage`] backend on every mutation.
//!
//! # Status tracking
//!
//! Actions run through [`DashboardStore::track`], which flips `is_loading` on for
//! the duration of the action and records the error message when it fails. Loading
//! is cleared whether the action succeeds or not.
//!
//! # Write failures
//!
//! A failed write is recorded in `error` and returned to the caller. The in-memory
//! change it was persisting stays applied.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use slice_savvy_core::{
    AnalyticsSnapshot, Customer, CustomerId, DashboardReport, DateRange, MenuItem, Order,
    ReportOptions,
};

use crate::error::{Result, StoreError};
use crate::keys::STORE_STATE_KEY;
use crate::migrations;
use crate::schema::CURRENT_VERSION;
use crate::seed::SeedData;
use crate::selectors;
use crate::state::{PersistedState, StoreState};
use crate::Storage;

/// Dashboard state with write-through persistence.
pub struct DashboardStore<S> {
    storage: Arc<S>,
    state: RwLock<StoreState>,
}

impl<S: Storage> DashboardStore<S> {
    /// Load the persisted record from `storage`, or start from `seed`.
    ///
    /// Older records are migrated and written back at the current version. A record
    /// that can't be read is logged and replaced in memory by the seed defaults.
    pub fn open(storage: Arc<S>, seed: &SeedData) -> Self {
        let (persisted, write_back) = load_persisted(storage.as_ref(), seed);
        let mut state = StoreState::from_persisted(persisted);

        if write_back {
            let written = migrations::encode(state.persisted_view())
                .and_then(|bytes| storage.set(STORE_STATE_KEY, &bytes));
            if let Err(e) = written {
                tracing::warn!(error = %e, "Failed to write back migrated dashboard state");
                state.error = Some(e.to_string());
            }
        }

        Self {
            storage,
            state: RwLock::new(state),
        }
    }

    /// The backing storage.
    #[must_use]
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Run `selector` over the current state.
    pub async fn select<T>(&self, selector: impl FnOnce(&StoreState) -> T) -> T {
        let state = self.state.read().await;
        selector(&state)
    }

    /// Clone the current state.
    pub async fn snapshot(&self) -> StoreState {
        self.state.read().await.clone()
    }

    /// Whether a tracked action is in flight.
    pub async fn is_loading(&self) -> bool {
        self.select(selectors::is_loading).await
    }

    /// Message of the last failure.
    pub async fn error(&self) -> Option<String> {
        self.select(|s| selectors::error(s).map(str::to_string)).await
    }

    /// Build the full dashboard report over the current orders and customers.
    pub async fn report(&self, menu_items: &[MenuItem], options: &ReportOptions) -> DashboardReport {
        let state = self.state.read().await;
        DashboardReport::build(&state.orders, &state.customers, menu_items, options)
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Replace all customers and persist.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails; the new customers stay in memory.
    pub async fn set_customers(&self, customers: Vec<Customer>) -> Result<()> {
        self.state.write().await.customers = customers;
        self.persist_or_record().await
    }

    /// Replace all orders and persist.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails; the new orders stay in memory.
    pub async fn set_orders(&self, orders: Vec<Order>) -> Result<()> {
        self.state.write().await.orders = orders;
        self.persist_or_record().await
    }

    /// Replace the analytics snapshot and persist.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails; the new snapshot stays in memory.
    pub async fn set_analytics(&self, analytics: AnalyticsSnapshot) -> Result<()> {
        self.state.write().await.analytics = analytics;
        self.persist_or_record().await
    }

    /// Select a customer for the detail view.
    pub async fn set_selected_customer(&self, customer: Option<Customer>) {
        self.state.write().await.selected_customer = customer;
    }

    /// Set the loading flag.
    pub async fn set_loading(&self, loading: bool) {
        self.state.write().await.is_loading = loading;
    }

    /// Set or clear the error message.
    pub async fn set_error(&self, error: Option<String>) {
        self.state.write().await.error = error;
    }

    // =========================================================================
    // Tracked actions
    // =========================================================================

    /// Run `op` with loading and error tracking.
    ///
    /// Sets `is_loading` and clears `error` before `op` starts. Afterwards loading is
    /// cleared and, on failure, `error` holds the message. The result is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns whatever error `op` returns.
    pub async fn track<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let result = op().await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Dashboard action failed");
            state.error = Some(e.to_string());
        }
        result
    }

    /// Look up a customer by id.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other tracked actions.
    pub async fn get_customer_by_id(&self, id: &CustomerId) -> Result<Option<Customer>> {
        self.track(|| async move {
            Ok(self
                .select(|s| selectors::customer_by_id(s, id).cloned())
                .await)
        })
        .await
    }

    /// Orders placed by a customer. Empty when the customer doesn't exist.
    ///
    /// # Errors
    ///
    /// Never fails today; the signature matches the other tracked actions.
    pub async fn get_customer_orders(&self, id: &CustomerId) -> Result<Vec<Order>> {
        self.track(|| async move {
            Ok(self
                .select(|s| {
                    selectors::orders_by_customer(s, id)
                        .into_iter()
                        .cloned()
                        .collect()
                })
                .await)
        })
        .await
    }

    /// Replace the customer with the same id and persist.
    ///
    /// A selected customer with that id is refreshed too.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no customer has that id.
    /// - The storage error if the write fails.
    pub async fn update_customer(&self, customer: Customer) -> Result<()> {
        self.track(|| async move {
            {
                let mut state = self.state.write().await;
                let slot = state
                    .customers
                    .iter_mut()
                    .find(|c| c.id == customer.id)
                    .ok_or_else(|| StoreError::not_found("customer", customer.id.as_str()))?;
                *slot = customer.clone();

                if state
                    .selected_customer
                    .as_ref()
                    .is_some_and(|s| s.id == customer.id)
                {
                    state.selected_customer = Some(customer.clone());
                }
            }

            tracing::info!(customer_id = %customer.id, "Customer updated");
            self.persist().await
        })
        .await
    }

    /// Remove a customer and persist. Their orders are kept.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if no customer has that id.
    /// - The storage error if the write fails.
    pub async fn delete_customer(&self, id: &CustomerId) -> Result<()> {
        self.track(|| async move {
            {
                let mut state = self.state.write().await;
                let before = state.customers.len();
                state.customers.retain(|c| &c.id != id);
                if state.customers.len() == before {
                    return Err(StoreError::not_found("customer", id.as_str()));
                }
                if state.selected_customer.as_ref().is_some_and(|s| &s.id == id) {
                    state.selected_customer = None;
                }
            }

            tracing::info!(customer_id = %id, "Customer deleted");
            self.persist().await
        })
        .await
    }

    /// Recompute the analytics snapshot from the current orders and persist it.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write fails; the new snapshot stays in memory.
    pub async fn refresh_analytics(
        &self,
        range: Option<DateRange>,
        today: NaiveDate,
    ) -> Result<AnalyticsSnapshot> {
        self.track(|| async move {
            let snapshot = {
                let mut state = self.state.write().await;
                let snapshot = AnalyticsSnapshot::compute(&state.orders, range.as_ref(), today);
                state.analytics = snapshot.clone();
                snapshot
            };

            tracing::debug!(
                total_orders = snapshot.total_orders,
                total_revenue_cents = snapshot.total_revenue_cents,
                "Analytics refreshed"
            );
            self.persist().await?;
            Ok(snapshot)
        })
        .await
    }

    /// Write the persisted record and flush the backend.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the write or flush fails.
    pub async fn close(&self) -> Result<()> {
        self.persist().await?;
        self.storage.flush()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    async fn persist(&self) -> Result<()> {
        let bytes = {
            let state = self.state.read().await;
            migrations::encode(state.persisted_view())?
        };
        self.storage.set(STORE_STATE_KEY, &bytes)
    }

    async fn persist_or_record(&self) -> Result<()> {
        let result = self.persist().await;
        if let Err(e) = &result {
            tracing::error!(error = %e, "Failed to persist dashboard state");
            self.state.write().await.error = Some(e.to_string());
        }
        result
    }
}

/// Read and migrate the stored record. The flag is set when it must be written back.
fn load_persisted<S: Storage>(storage: &S, seed: &SeedData) -> (PersistedState, bool) {
    let bytes = match storage.get(STORE_STATE_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::info!("No persisted dashboard state, starting from seed");
            return (seed.default_state(), false);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read dashboard state, starting from seed");
            return (seed.default_state(), false);
        }
    };

    match migrations::decode(&bytes) {
        Ok(versioned) => {
            let from = versioned.version();
            let state = versioned.upgrade();
            if from < CURRENT_VERSION {
                tracing::info!(from, to = CURRENT_VERSION, "Migrated dashboard state");
            }
            (state, from < CURRENT_VERSION)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable dashboard state, starting from seed");
            (seed.default_state(), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Storage whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: AtomicBool,
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Database("disk full".into()));
            }
            self.inner.set(key, value)
        }

        fn delete(&self, key: &str) -> Result<()> {
            self.inner.delete(key)
        }
    }

    fn seed() -> SeedData {
        SeedData::builtin().unwrap()
    }

    fn open_store() -> DashboardStore<MemoryStorage> {
        DashboardStore::open(Arc::new(MemoryStorage::new()), &seed())
    }

    fn id(raw: &str) -> CustomerId {
        CustomerId::new(raw).unwrap()
    }

    fn stored_state(storage: &impl Storage) -> PersistedState {
        let bytes = storage.get(STORE_STATE_KEY).unwrap().unwrap();
        migrations::decode(&bytes).unwrap().upgrade()
    }

    #[tokio::test]
    async fn opens_from_seed() {
        let store = open_store();
        let state = store.snapshot().await;

        assert_eq!(state.customers, seed().customers);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        // Nothing is written until the first mutation.
        assert!(store.storage().get(STORE_STATE_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn lookups_by_id() {
        let store = open_store();

        let found = store.get_customer_by_id(&id("2")).await.unwrap();
        assert_eq!(found.unwrap().name, "James Carter");
        assert!(store.get_customer_by_id(&id("404")).await.unwrap().is_none());

        let orders = store.get_customer_orders(&id("2")).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(store.get_customer_orders(&id("404")).await.unwrap().is_empty());

        assert!(!store.is_loading().await);
    }

    #[tokio::test]
    async fn update_customer_persists() {
        let store = open_store();
        let mut customer = store.get_customer_by_id(&id("4")).await.unwrap().unwrap();
        store.set_selected_customer(Some(customer.clone())).await;

        customer.phone = "(555) 000-0000".into();
        store.update_customer(customer.clone()).await.unwrap();

        let state = store.snapshot().await;
        assert_eq!(selectors::customer_by_id(&state, &id("4")), Some(&customer));
        assert_eq!(state.selected_customer.as_ref(), Some(&customer));

        let stored = stored_state(store.storage().as_ref());
        assert!(stored.customers.contains(&customer));
    }

    #[tokio::test]
    async fn update_unknown_customer_is_an_error() {
        let store = open_store();
        let mut ghost = store.get_customer_by_id(&id("1")).await.unwrap().unwrap();
        ghost.id = id("404");

        let err = store.update_customer(ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "customer", .. }));
        assert_eq!(store.error().await.as_deref(), Some("customer not found: 404"));
        assert!(!store.is_loading().await);
    }

    #[tokio::test]
    async fn delete_customer_removes_and_deselects() {
        let store = open_store();
        let customer = store.get_customer_by_id(&id("6")).await.unwrap().unwrap();
        store.set_selected_customer(Some(customer)).await;

        store.delete_customer(&id("6")).await.unwrap();

        let state = store.snapshot().await;
        assert!(selectors::customer_by_id(&state, &id("6")).is_none());
        assert!(state.selected_customer.is_none());
        // Orders are history and stay.
        assert_eq!(state.orders.len(), seed().orders.len());

        let err = store.delete_customer(&id("6")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn a_failed_action_does_not_leave_loading_stuck() {
        let store = open_store();

        let result: Result<()> = store
            .track(|| async {
                assert!(store.is_loading().await);
                Err(StoreError::Database("connection reset".into()))
            })
            .await;

        assert!(result.is_err());
        assert!(!store.is_loading().await);
        assert_eq!(
            store.error().await.as_deref(),
            Some("database error: connection reset")
        );

        // The next action starts with a clean error.
        store.get_customer_by_id(&id("1")).await.unwrap();
        assert!(store.error().await.is_none());
    }

    #[tokio::test]
    async fn a_write_failure_is_not_rolled_back() {
        let storage = Arc::new(FlakyStorage::default());
        let store = DashboardStore::open(Arc::clone(&storage), &seed());
        storage.fail_writes.store(true, Ordering::SeqCst);

        let err = store.set_customers(Vec::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        let state = store.snapshot().await;
        assert!(state.customers.is_empty());
        assert_eq!(state.error.as_deref(), Some("database error: disk full"));
        assert!(storage.get(STORE_STATE_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn refresh_analytics_recomputes_for_range() {
        let store = open_store();
        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();

        let all_time = store.refresh_analytics(None, day(13)).await.unwrap();
        assert_eq!(all_time.total_orders, 13);
        assert_eq!(all_time.total_revenue_cents, 28_979);

        let ranged = store
            .refresh_analytics(Some(DateRange::new(day(12), day(13))), day(13))
            .await
            .unwrap();
        assert_eq!(ranged.total_orders, 3);
        assert_eq!(ranged.total_revenue_cents, 2198 + 3498 + 1699);
        assert_eq!(store.select(|s| s.analytics.clone()).await, ranged);

        assert_eq!(stored_state(store.storage().as_ref()).analytics, ranged);
    }

    #[tokio::test]
    async fn setters_persist_immediately() {
        let store = open_store();
        let mut orders = seed().orders;
        orders.truncate(2);

        store.set_orders(orders.clone()).await.unwrap();
        store.set_analytics(AnalyticsSnapshot::default()).await.unwrap();

        let stored = stored_state(store.storage().as_ref());
        assert_eq!(stored.orders, orders);
        assert_eq!(stored.analytics, AnalyticsSnapshot::default());
    }

    #[tokio::test]
    async fn status_setters_are_not_persisted() {
        let store = open_store();
        store.set_loading(true).await;
        store.set_error(Some("manual".into())).await;
        assert!(store.is_loading().await);
        assert_eq!(store.error().await.as_deref(), Some("manual"));
        assert!(store.storage().get(STORE_STATE_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_record_falls_back_to_seed() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(STORE_STATE_KEY, b"{ not json").unwrap();

        let store = DashboardStore::open(Arc::clone(&storage), &seed());
        let state = store.snapshot().await;
        assert_eq!(state.orders, seed().orders);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn future_version_falls_back_to_seed() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(STORE_STATE_KEY, br#"{"version": 7, "state": {}}"#)
            .unwrap();

        let store = DashboardStore::open(storage, &seed());
        assert_eq!(store.snapshot().await.customers, seed().customers);
    }

    #[tokio::test]
    async fn close_writes_current_state() {
        let store = open_store();
        store.close().await.unwrap();

        let stored = stored_state(store.storage().as_ref());
        assert_eq!(stored.customers, seed().customers);
    }
}
