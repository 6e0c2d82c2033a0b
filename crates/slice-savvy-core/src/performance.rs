//! Per-product and per-customer performance tables.
//!
//! Both tables are recomputed from the order set they are given. Customer rows in
//! particular never reuse the cached totals on [`Customer`]: those are only valid for the
//! all-time view, and a date-filtered order set must produce date-filtered totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analytics::div_round;
use crate::customer::{Customer, MembershipTier};
use crate::menu::MenuItem;
use crate::order::Order;
use crate::sort::{locale_cmp, sort_rows, SortDirection};
use crate::{CustomerId, MenuItemId};

/// Sales of one menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
    /// Menu item id.
    pub id: MenuItemId,
    /// Menu item name.
    pub name: String,
    /// Menu category.
    pub category: String,
    /// List price in cents.
    pub price_cents: i64,
    /// Units sold.
    pub sales: u64,
    /// Revenue in cents.
    pub revenue_cents: i64,
}

/// Sortable columns of the product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortField {
    /// Item name.
    Name,
    /// Category.
    Category,
    /// List price.
    Price,
    /// Units sold.
    Sales,
    /// Revenue.
    Revenue,
}

/// One row per menu item, including items that sold nothing.
///
/// Orders are matched to items by exact product name.
#[must_use]
pub fn product_performance(orders: &[Order], menu_items: &[MenuItem]) -> Vec<ProductPerformance> {
    let mut by_name: HashMap<&str, (u64, i64)> = HashMap::new();
    for order in orders {
        let entry = by_name.entry(order.product_name.as_str()).or_default();
        entry.0 += u64::from(order.quantity);
        entry.1 += order.total_cents;
    }

    menu_items
        .iter()
        .map(|item| {
            let (sales, revenue_cents) = by_name.get(item.name.as_str()).copied().unwrap_or_default();
            ProductPerformance {
                id: item.id.clone(),
                name: item.name.clone(),
                category: item.category.clone(),
                price_cents: item.price_cents,
                sales,
                revenue_cents,
            }
        })
        .collect()
}

/// Stable sort of product rows by one column.
pub fn sort_products(rows: &mut [ProductPerformance], field: ProductSortField, direction: SortDirection) {
    sort_rows(rows, direction, |a, b| match field {
        ProductSortField::Name => locale_cmp(&a.name, &b.name),
        ProductSortField::Category => locale_cmp(&a.category, &b.category),
        ProductSortField::Price => a.price_cents.cmp(&b.price_cents),
        ProductSortField::Sales => a.sales.cmp(&b.sales),
        ProductSortField::Revenue => a.revenue_cents.cmp(&b.revenue_cents),
    });
}

/// A customer's totals over a given order set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPerformance {
    /// Customer id.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Loyalty tier.
    pub membership_tier: MembershipTier,
    /// Join date.
    pub join_date: Option<NaiveDate>,
    /// Orders in the given set.
    pub total_orders: u64,
    /// Revenue in the given set, in cents.
    pub total_revenue_cents: i64,
}

/// Sortable columns of the customer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSortField {
    /// Name.
    Name,
    /// Email.
    Email,
    /// Order count.
    TotalOrders,
    /// Revenue.
    TotalRevenue,
    /// Tier, by rank.
    MembershipTier,
    /// Join date; unknown dates first when ascending.
    JoinDate,
}

/// One row per customer with totals recomputed from `orders`.
///
/// Orders are attributed with [`Customer::placed`].
#[must_use]
pub fn customer_performance(customers: &[Customer], orders: &[Order]) -> Vec<CustomerPerformance> {
    customers
        .iter()
        .map(|c| {
            let (total_orders, total_revenue_cents) = orders
                .iter()
                .filter(|o| c.placed(o))
                .fold((0, 0), |(count, revenue), o| (count + 1, revenue + o.total_cents));
            CustomerPerformance {
                id: c.id.clone(),
                name: c.name.clone(),
                email: c.email.clone(),
                membership_tier: c.membership_tier,
                join_date: c.join_date,
                total_orders,
                total_revenue_cents,
            }
        })
        .collect()
}

/// Stable sort of customer rows by one column.
pub fn sort_customers(
    rows: &mut [CustomerPerformance],
    field: CustomerSortField,
    direction: SortDirection,
) {
    sort_rows(rows, direction, |a, b| match field {
        CustomerSortField::Name => locale_cmp(&a.name, &b.name),
        CustomerSortField::Email => locale_cmp(&a.email, &b.email),
        CustomerSortField::TotalOrders => a.total_orders.cmp(&b.total_orders),
        CustomerSortField::TotalRevenue => a.total_revenue_cents.cmp(&b.total_revenue_cents),
        CustomerSortField::MembershipTier => a.membership_tier.cmp(&b.membership_tier),
        CustomerSortField::JoinDate => a.join_date.cmp(&b.join_date),
    });
}

/// Headline numbers for the customers page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    /// Number of customers.
    pub total_customers: u64,
    /// Mean of per-customer average order value, in cents.
    pub avg_order_value_cents: i64,
    /// Revenue across all customers, in cents.
    pub total_revenue_cents: i64,
    /// Customers above Bronze.
    pub loyalty_members: u64,
}

/// Summarise customer rows. Customers with no orders don't count toward the average.
#[must_use]
pub fn customer_summary(rows: &[CustomerPerformance]) -> CustomerSummary {
    let per_customer: Vec<i64> = rows
        .iter()
        .filter(|r| r.total_orders > 0)
        .map(|r| div_round(r.total_revenue_cents, r.total_orders))
        .collect();

    CustomerSummary {
        total_customers: rows.len() as u64,
        avg_order_value_cents: div_round(per_customer.iter().sum(), per_customer.len() as u64),
        total_revenue_cents: rows.iter().map(|r| r.total_revenue_cents).sum(),
        loyalty_members: rows
            .iter()
            .filter(|r| r.membership_tier.is_loyalty_member())
            .count() as u64,
    }
}
