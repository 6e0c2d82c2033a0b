//! Static catalog the dashboard starts from.

use chrono::Local;
use serde::Deserialize;
use slice_savvy_core::{AnalyticsSnapshot, Customer, MenuItem, Order};

use crate::error::{Result, StoreError};
use crate::state::PersistedState;

const BUILTIN_SEED: &str = include_str!("../data/seed.json");

/// Customers, orders and menu items used when nothing has been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    /// Seed customers.
    #[serde(default)]
    pub customers: Vec<Customer>,
    /// Seed orders.
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Seed menu.
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
}

impl SeedData {
    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Seed` if the bundled file does not parse.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_SEED)
    }

    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Seed` if the JSON does not describe a catalog.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::Seed(e.to_string()))
    }

    /// Default persisted state: the seed collections and an all-time snapshot.
    ///
    /// The snapshot is anchored on the newest seed order so the defaults don't depend
    /// on the wall clock; with no dated orders it falls back to today.
    #[must_use]
    pub fn default_state(&self) -> PersistedState {
        let anchor = self
            .orders
            .iter()
            .filter_map(Order::order_day)
            .max()
            .unwrap_or_else(|| Local::now().date_naive());

        PersistedState {
            customers: self.customers.clone(),
            orders: self.orders.clone(),
            analytics: AnalyticsSnapshot::compute(&self.orders, None, anchor),
        }
    }
}
