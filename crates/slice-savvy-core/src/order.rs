//! Order records.
//!
//! Orders are immutable once created. Each order names exactly one product via
//! `product_name`; that field is the join key against menu item names.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::customer::customer_identity;
use crate::dates::lenient_datetime;
use crate::error::DomainError;
use crate::OrderId;

/// A single customer order.
///
/// Missing numeric fields deserialize as 0 and an unparseable `order_date` as `None`, so
/// a partially broken record still contributes what it can to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier.
    pub order_id: OrderId,

    /// Customer display name.
    #[serde(default)]
    pub customer: String,

    /// Customer email; preferred identity key when present.
    #[serde(default)]
    pub customer_email: String,

    /// Name of the ordered product, matching `MenuItem::name`.
    ///
    /// Older records name this field `pizzaType`.
    #[serde(default, alias = "pizzaType")]
    pub product_name: String,

    /// Number of units ordered.
    #[serde(default)]
    pub quantity: u32,

    /// Order total in cents.
    #[serde(default)]
    pub total_cents: i64,

    /// When the order was placed (local time).
    #[serde(default, with = "lenient_datetime")]
    pub order_date: Option<NaiveDateTime>,

    /// Fulfilment status.
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    /// Calendar day the order was placed on.
    #[must_use]
    pub fn order_day(&self) -> Option<NaiveDate> {
        self.order_date.map(|dt| dt.date())
    }

    /// Identity of the customer who placed this order.
    #[must_use]
    pub fn customer_key(&self) -> String {
        customer_identity(&self.customer, &self.customer_email)
    }

    /// Case-insensitive match against order id, customer name, and product name.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.order_id.as_str().to_lowercase().contains(&term)
            || self.customer.to_lowercase().contains(&term)
            || self.product_name.to_lowercase().contains(&term)
    }
}

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Received, not started.
    #[default]
    Pending,
    /// In the kitchen.
    Preparing,
    /// With a driver.
    #[serde(rename = "Out for Delivery", alias = "OutForDelivery")]
    OutForDelivery,
    /// Handed to the customer.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
}

impl OrderStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Preparing,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "outfordelivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }
}

/// Search and status filter for the orders table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Free-text search term; empty or `None` matches everything.
    pub search: Option<String>,
    /// Restrict to one status; `None` means all statuses.
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    /// Whether `order` passes the filter.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        let status_ok = self.status.map_or(true, |s| order.status == s);
        let search_ok = self
            .search
            .as_deref()
            .map_or(true, |term| order.matches_search(term));
        status_ok && search_ok
    }

    /// Orders passing the filter, in input order.
    #[must_use]
    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }
}
