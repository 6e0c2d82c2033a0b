//! Read-only views over [`StoreState`].
//!
//! Pass these to [`crate::DashboardStore::select`], or call them on a snapshot.

use slice_savvy_core::{AnalyticsSnapshot, Customer, CustomerId, MembershipTier, Order};

use crate::state::StoreState;

/// All customers.
#[must_use]
pub fn customers(state: &StoreState) -> &[Customer] {
    &state.customers
}

/// The customer with `id`, if any.
#[must_use]
pub fn customer_by_id<'a>(state: &'a StoreState, id: &CustomerId) -> Option<&'a Customer> {
    state.customers.iter().find(|c| &c.id == id)
}

/// Number of customers.
#[must_use]
pub fn customer_count(state: &StoreState) -> usize {
    state.customers.len()
}

/// Customers in one membership tier.
#[must_use]
pub fn customers_by_tier(state: &StoreState, tier: MembershipTier) -> Vec<&Customer> {
    state
        .customers
        .iter()
        .filter(|c| c.membership_tier == tier)
        .collect()
}

/// All orders.
#[must_use]
pub fn orders(state: &StoreState) -> &[Order] {
    &state.orders
}

/// Orders placed by the customer with `id` (see [`Customer::placed`]).
///
/// Empty when no such customer exists.
#[must_use]
pub fn orders_by_customer<'a>(state: &'a StoreState, id: &CustomerId) -> Vec<&'a Order> {
    let Some(customer) = customer_by_id(state, id) else {
        return Vec::new();
    };
    state.orders.iter().filter(|o| customer.placed(o)).collect()
}

/// Revenue from the analytics snapshot, in cents.
#[must_use]
pub fn total_revenue_cents(state: &StoreState) -> i64 {
    state.analytics.total_revenue_cents
}

/// The analytics snapshot.
#[must_use]
pub fn analytics(state: &StoreState) -> &AnalyticsSnapshot {
    &state.analytics
}

/// Average order value from the analytics snapshot, in cents.
#[must_use]
pub fn average_order_value_cents(state: &StoreState) -> i64 {
    state.analytics.average_order_value_cents
}

/// Whether a tracked action is in flight.
#[must_use]
pub fn is_loading(state: &StoreState) -> bool {
    state.is_loading
}

/// Message of the last failure.
#[must_use]
pub fn error(state: &StoreState) -> Option<&str> {
    state.error.as_deref()
}

/// Customer open in the detail view.
#[must_use]
pub fn selected_customer(state: &StoreState) -> Option<&Customer> {
    state.selected_customer.as_ref()
}
