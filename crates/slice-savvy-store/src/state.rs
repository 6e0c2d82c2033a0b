//! Dashboard state, in memory and on disk.

use serde::{Deserialize, Serialize};
use slice_savvy_core::{AnalyticsSnapshot, Customer, Order};

/// The persisted part of the dashboard state, at the current schema version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Customer records.
    pub customers: Vec<Customer>,
    /// Order records.
    pub orders: Vec<Order>,
    /// Last computed analytics snapshot.
    pub analytics: AnalyticsSnapshot,
}

/// Borrowed view of [`PersistedState`], serialized without cloning the collections.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PersistedView<'a> {
    pub customers: &'a [Customer],
    pub orders: &'a [Order],
    pub analytics: &'a AnalyticsSnapshot,
}

/// Everything the dashboard holds in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Customer records.
    pub customers: Vec<Customer>,
    /// Order records.
    pub orders: Vec<Order>,
    /// Last computed analytics snapshot.
    pub analytics: AnalyticsSnapshot,
    /// Customer open in the detail view. Not persisted.
    pub selected_customer: Option<Customer>,
    /// A tracked action is in flight. Not persisted.
    pub is_loading: bool,
    /// Message of the last failed action. Not persisted.
    pub error: Option<String>,
}

impl StoreState {
    /// Fresh in-memory state around a persisted record.
    #[must_use]
    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            customers: persisted.customers,
            orders: persisted.orders,
            analytics: persisted.analytics,
            selected_customer: None,
            is_loading: false,
            error: None,
        }
    }

    pub(crate) fn persisted_view(&self) -> PersistedView<'_> {
        PersistedView {
            customers: &self.customers,
            orders: &self.orders,
            analytics: &self.analytics,
        }
    }
}
