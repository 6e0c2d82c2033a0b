//! Versioned schema of the persisted dashboard record.
//!
//! The record is JSON shaped `{"version": n, "state": {...}}`. Every version has a
//! concrete state struct, and each step of the chain is a pure function from one
//! version to the next. [`VersionedState::upgrade`] walks the chain to
//! [`CURRENT_VERSION`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use slice_savvy_core::dates::lenient_datetime;
use slice_savvy_core::{
    distribution_map, monthly_revenue, AnalyticsSnapshot, Customer, GrowthMetrics, Order,
    OrderId, OrderStatus, SummaryMetrics, SNAPSHOT_MONTHS,
};

use crate::error::{Result, StoreError};
use crate::schema::CURRENT_VERSION;
use crate::state::{PersistedState, PersistedView};

/// An order as written by version 0, naming its product `pizzaType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderV0 {
    /// Order identifier.
    pub order_id: OrderId,
    /// Customer display name.
    #[serde(default)]
    pub customer: String,
    /// Customer email.
    #[serde(default)]
    pub customer_email: String,
    /// Product name under its old field name.
    #[serde(default)]
    pub pizza_type: String,
    /// Units ordered.
    #[serde(default)]
    pub quantity: u32,
    /// Order total in cents.
    #[serde(default)]
    pub total_cents: i64,
    /// When the order was placed.
    #[serde(default, with = "lenient_datetime")]
    pub order_date: Option<NaiveDateTime>,
    /// Fulfilment status.
    #[serde(default)]
    pub status: OrderStatus,
}

/// The four-total analytics record of versions 0 and 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAnalytics {
    /// Revenue in cents.
    #[serde(default)]
    pub total_revenue_cents: i64,
    /// Number of orders.
    #[serde(default)]
    pub total_orders: u64,
    /// Revenue per order in cents.
    #[serde(default)]
    pub average_order_value_cents: i64,
    /// Number of customers.
    #[serde(default)]
    pub customer_count: u64,
}

/// Persisted state at version 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateV0 {
    /// Customer records.
    pub customers: Vec<Customer>,
    /// Orders with `pizzaType`.
    pub orders: Vec<OrderV0>,
    /// Legacy totals.
    pub analytics: LegacyAnalytics,
}

/// Persisted state at version 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateV1 {
    /// Customer records.
    pub customers: Vec<Customer>,
    /// Orders with `productName`.
    pub orders: Vec<Order>,
    /// Legacy totals.
    pub analytics: LegacyAnalytics,
}

/// A decoded record at whatever version it was written with.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionedState {
    /// Version 0.
    V0(StateV0),
    /// Version 1.
    V1(StateV1),
    /// Version 2, the current layout.
    V2(PersistedState),
}

impl VersionedState {
    /// The schema version of this record.
    #[must_use]
    pub const fn version(&self) -> u32 {
        match self {
            Self::V0(_) => 0,
            Self::V1(_) => 1,
            Self::V2(_) => 2,
        }
    }

    /// Migrate to the current layout, one version at a time.
    #[must_use]
    pub fn upgrade(self) -> PersistedState {
        let mut state = self;
        loop {
            state = match state {
                Self::V0(v0) => Self::V1(migrate_v0_to_v1(v0)),
                Self::V1(v1) => Self::V2(migrate_v1_to_v2(v1)),
                Self::V2(current) => return current,
            };
        }
    }
}

/// Rename `pizzaType` to `productName` on every order.
#[must_use]
pub fn migrate_v0_to_v1(state: StateV0) -> StateV1 {
    StateV1 {
        customers: state.customers,
        orders: state
            .orders
            .into_iter()
            .map(|o| Order {
                order_id: o.order_id,
                customer: o.customer,
                customer_email: o.customer_email,
                product_name: o.pizza_type,
                quantity: o.quantity,
                total_cents: o.total_cents,
                order_date: o.order_date,
                status: o.status,
            })
            .collect(),
        analytics: state.analytics,
    }
}

/// Expand the legacy totals into a full snapshot.
///
/// The stored totals are kept as they were. Growth starts at zero, monthly revenue is
/// anchored at the newest dated order (empty when no order has a date) and the sales
/// distribution is derived from the orders.
#[must_use]
pub fn migrate_v1_to_v2(state: StateV1) -> PersistedState {
    let legacy = state.analytics;
    let summary = SummaryMetrics {
        total_revenue_cents: legacy.total_revenue_cents,
        total_orders: legacy.total_orders,
        active_customers: legacy.customer_count,
        avg_order_value_cents: legacy.average_order_value_cents,
    };

    let monthly = state
        .orders
        .iter()
        .filter_map(Order::order_day)
        .max()
        .map(|anchor| monthly_revenue(&state.orders, anchor, SNAPSHOT_MONTHS))
        .unwrap_or_default();

    let analytics = AnalyticsSnapshot::from_parts(
        &summary,
        GrowthMetrics::default(),
        monthly,
        distribution_map(&state.orders),
    );

    PersistedState {
        customers: state.customers,
        orders: state.orders,
        analytics,
    }
}

#[derive(Deserialize)]
struct RawRecord {
    version: u32,
    state: serde_json::Value,
}

#[derive(Serialize)]
struct Record<'a> {
    version: u32,
    state: PersistedView<'a>,
}

/// Decode a stored record into its versioned state.
///
/// # Errors
///
/// - `StoreError::Serialization` if the bytes are not a record, or the state does not
///   match the layout of its version.
/// - `StoreError::UnsupportedVersion` if the record is newer than this build.
pub fn decode(bytes: &[u8]) -> Result<VersionedState> {
    let raw: RawRecord = serde_json::from_slice(bytes)?;
    let state = match raw.version {
        0 => VersionedState::V0(serde_json::from_value(raw.state)?),
        1 => VersionedState::V1(serde_json::from_value(raw.state)?),
        2 => VersionedState::V2(serde_json::from_value(raw.state)?),
        found => {
            return Err(StoreError::UnsupportedVersion {
                found,
                current: CURRENT_VERSION,
            })
        }
    };
    Ok(state)
}

/// Encode state as a record at [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns `StoreError::Serialization` if encoding fails.
pub(crate) fn encode(state: PersistedView<'_>) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&Record {
        version: CURRENT_VERSION,
        state,
    })?)
}
