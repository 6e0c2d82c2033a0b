//! Analytics aggregation over orders.
//!
//! Every function here is pure: inputs are borrowed, never mutated, and the same input
//! always yields the same output. Empty input gives zero sums, zero rates, and empty
//! rankings. Division is always guarded, so no result is ever NaN.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::dates::DateRange;
use crate::order::Order;

/// Default number of days in the sales trend.
pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 7;

/// Default length of the top-selling ranking.
pub const DEFAULT_TOP_ITEMS: usize = 5;

/// Number of trailing months in a snapshot's revenue series.
pub const SNAPSHOT_MONTHS: u32 = 12;

/// Growth window used when no complete date range is selected.
pub const DEFAULT_GROWTH_WINDOW_DAYS: u32 = 30;

/// Headline numbers for a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    /// Sum of order totals in cents.
    pub total_revenue_cents: i64,
    /// Number of orders.
    pub total_orders: u64,
    /// Distinct customer identities among the orders.
    pub active_customers: u64,
    /// Revenue per order in cents, 0 when there are no orders.
    pub avg_order_value_cents: i64,
}

/// One calendar day of the sales trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    /// The day.
    pub date: NaiveDate,
    /// Sum of order totals that day, in cents.
    pub sales_total_cents: i64,
    /// Orders placed that day.
    pub order_count: u64,
}

/// Units sold for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSales {
    /// Product name.
    pub name: String,
    /// Units sold.
    pub quantity: u64,
}

/// A product's share of units sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesShare {
    /// Product name.
    pub name: String,
    /// Units sold.
    pub quantity: u64,
    /// Share of all units, in percent, rounded to one decimal.
    pub percentage: f64,
}

/// Revenue for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Revenue in cents.
    pub revenue_cents: i64,
}

/// Period-over-period change, in percent rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMetrics {
    /// Revenue change.
    pub revenue: f64,
    /// Order count change.
    pub orders: f64,
    /// Active customer change.
    pub customers: f64,
    /// Average order value change.
    pub avg_order_value: f64,
}

/// Orders whose day lies inside `range`.
///
/// An absent or incomplete range returns every order unchanged. Under a complete range,
/// orders without a date are left out.
#[must_use]
pub fn filter_by_date_range(orders: &[Order], range: Option<&DateRange>) -> Vec<Order> {
    match range.filter(|r| r.is_complete()) {
        None => orders.to_vec(),
        Some(range) => orders
            .iter()
            .filter(|o| o.order_day().is_some_and(|d| range.contains(d)))
            .cloned()
            .collect(),
    }
}

/// Totals, order count, distinct customers, and average order value.
#[must_use]
pub fn summary_metrics(orders: &[Order]) -> SummaryMetrics {
    let total_revenue_cents: i64 = orders.iter().map(|o| o.total_cents).sum();
    let total_orders = orders.len() as u64;
    let active_customers = orders
        .iter()
        .map(Order::customer_key)
        .collect::<HashSet<_>>()
        .len() as u64;

    SummaryMetrics {
        total_revenue_cents,
        total_orders,
        active_customers,
        avg_order_value_cents: div_round(total_revenue_cents, total_orders),
    }
}

/// One bucket per day for the `window_days` days ending at `today`, oldest first.
///
/// Days without orders are zero-filled. Orders without a date are skipped.
#[must_use]
pub fn daily_sales_trend(orders: &[Order], today: NaiveDate, window_days: u32) -> Vec<DailySales> {
    let mut buckets: Vec<DailySales> = (0..window_days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .map(|date| DailySales {
            date,
            sales_total_cents: 0,
            order_count: 0,
        })
        .collect();

    let index: HashMap<NaiveDate, usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| (b.date, i))
        .collect();

    for order in orders {
        if let Some(&i) = order.order_day().and_then(|d| index.get(&d)) {
            buckets[i].sales_total_cents += order.total_cents;
            buckets[i].order_count += 1;
        }
    }

    buckets
}

/// [`daily_sales_trend`] ending at the local calendar date.
#[must_use]
pub fn daily_sales_trend_today(orders: &[Order], window_days: u32) -> Vec<DailySales> {
    daily_sales_trend(orders, chrono::Local::now().date_naive(), window_days)
}

/// Units sold per product, in first-encountered order.
///
/// Orders with a blank product name are ignored.
#[must_use]
pub fn quantity_by_product(orders: &[Order]) -> Vec<ItemSales> {
    let mut totals: Vec<ItemSales> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for order in orders {
        let name = order.product_name.trim();
        if name.is_empty() {
            continue;
        }
        let i = *index.entry(name).or_insert_with(|| {
            totals.push(ItemSales {
                name: name.to_string(),
                quantity: 0,
            });
            totals.len() - 1
        });
        totals[i].quantity += u64::from(order.quantity);
    }

    totals
}

/// The `n` products with the most units sold, most first.
///
/// Ties keep the order in which products first appear.
#[must_use]
pub fn top_selling_items(orders: &[Order], n: usize) -> Vec<ItemSales> {
    let mut ranked = quantity_by_product(orders);
    ranked.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    ranked.truncate(n);
    ranked
}

/// Each product's share of total units sold, in percent with one decimal.
///
/// Products with no units are dropped; an order set with no units yields an empty list.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pizza_sales_distribution(orders: &[Order]) -> Vec<SalesShare> {
    let sold: Vec<ItemSales> = quantity_by_product(orders)
        .into_iter()
        .filter(|s| s.quantity > 0)
        .collect();
    let total: u64 = sold.iter().map(|s| s.quantity).sum();
    if total == 0 {
        return Vec::new();
    }

    sold.into_iter()
        .map(|s| SalesShare {
            percentage: round1(s.quantity as f64 / total as f64 * 100.0),
            name: s.name,
            quantity: s.quantity,
        })
        .collect()
}

/// [`pizza_sales_distribution`] as a name → percentage map.
#[must_use]
pub fn distribution_map(orders: &[Order]) -> BTreeMap<String, f64> {
    pizza_sales_distribution(orders)
        .into_iter()
        .map(|s| (s.name, s.percentage))
        .collect()
}

/// Revenue for the `months` calendar months ending with `anchor`'s month, oldest first.
#[must_use]
pub fn monthly_revenue(orders: &[Order], anchor: NaiveDate, months: u32) -> Vec<MonthlyRevenue> {
    let anchor_index = i64::from(anchor.year()) * 12 + i64::from(anchor.month0());

    let mut buckets: Vec<MonthlyRevenue> = (0..i64::from(months))
        .rev()
        .filter_map(|back| {
            let idx = anchor_index - back;
            let year = i32::try_from(idx.div_euclid(12)).ok()?;
            let month = u32::try_from(idx.rem_euclid(12)).ok()? + 1;
            Some(MonthlyRevenue {
                year,
                month,
                revenue_cents: 0,
            })
        })
        .collect();

    for order in orders {
        let Some(day) = order.order_day() else {
            continue;
        };
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.year == day.year() && b.month == day.month())
        {
            bucket.revenue_cents += order.total_cents;
        }
    }

    buckets
}

/// Percentage change from `previous` to `current`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn growth_metrics(current: &SummaryMetrics, previous: &SummaryMetrics) -> GrowthMetrics {
    let pct = |cur: f64, prev: f64| {
        if prev == 0.0 {
            0.0
        } else {
            round1((cur - prev) / prev * 100.0)
        }
    };

    GrowthMetrics {
        revenue: pct(
            current.total_revenue_cents as f64,
            previous.total_revenue_cents as f64,
        ),
        orders: pct(current.total_orders as f64, previous.total_orders as f64),
        customers: pct(
            current.active_customers as f64,
            previous.active_customers as f64,
        ),
        avg_order_value: pct(
            current.avg_order_value_cents as f64,
            previous.avg_order_value_cents as f64,
        ),
    }
}

/// The `n` newest orders; undated orders sort last.
#[must_use]
pub fn recent_orders(orders: &[Order], n: usize) -> Vec<Order> {
    let mut sorted = orders.to_vec();
    sorted.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    sorted.truncate(n);
    sorted
}

/// The dashboard's derived analytics record.
///
/// Never edited by hand: build it with [`AnalyticsSnapshot::compute`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    /// Revenue in cents.
    pub total_revenue_cents: i64,
    /// Number of orders.
    pub total_orders: u64,
    /// Revenue per order in cents.
    pub average_order_value_cents: i64,
    /// Distinct customers with orders in the window.
    pub customer_count: u64,
    /// Revenue change against the previous period, percent.
    pub revenue_growth: f64,
    /// Order count change against the previous period, percent.
    pub orders_growth: f64,
    /// Customer count change against the previous period, percent.
    pub customers_growth: f64,
    /// Average order value change against the previous period, percent.
    pub avg_order_value_growth: f64,
    /// Trailing monthly revenue, oldest first.
    pub monthly_revenue: Vec<MonthlyRevenue>,
    /// Product name → share of units sold, percent.
    pub pizza_sales_distribution: BTreeMap<String, f64>,
}

impl AnalyticsSnapshot {
    /// Compute a snapshot over `orders` restricted to `range`.
    ///
    /// Growth compares the selected range with the equal-length period right before it.
    /// Without a complete range, totals are all-time and growth compares the last
    /// [`DEFAULT_GROWTH_WINDOW_DAYS`] days ending `today` with the days before them.
    #[must_use]
    pub fn compute(orders: &[Order], range: Option<&DateRange>, today: NaiveDate) -> Self {
        let complete = range.copied().filter(DateRange::is_complete);
        let current = filter_by_date_range(orders, complete.as_ref());
        let summary = summary_metrics(&current);

        let growth_window =
            complete.unwrap_or_else(|| DateRange::last_days(today, DEFAULT_GROWTH_WINDOW_DAYS));
        let growth = growth_window
            .previous_period()
            .map(|previous| {
                growth_metrics(
                    &summary_metrics(&filter_by_date_range(orders, Some(&growth_window))),
                    &summary_metrics(&filter_by_date_range(orders, Some(&previous))),
                )
            })
            .unwrap_or_default();

        let anchor = complete.and_then(|r| r.to).unwrap_or(today);

        Self::from_parts(
            &summary,
            growth,
            monthly_revenue(&current, anchor, SNAPSHOT_MONTHS),
            distribution_map(&current),
        )
    }

    /// Assemble a snapshot from already computed pieces.
    #[must_use]
    pub fn from_parts(
        summary: &SummaryMetrics,
        growth: GrowthMetrics,
        monthly_revenue: Vec<MonthlyRevenue>,
        pizza_sales_distribution: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            total_revenue_cents: summary.total_revenue_cents,
            total_orders: summary.total_orders,
            average_order_value_cents: summary.avg_order_value_cents,
            customer_count: summary.active_customers,
            revenue_growth: growth.revenue,
            orders_growth: growth.orders,
            customers_growth: growth.customers,
            avg_order_value_growth: growth.avg_order_value,
            monthly_revenue,
            pizza_sales_distribution,
        }
    }
}

/// Integer division rounded half away from zero; 0 when `den` is 0.
pub(crate) fn div_round(num: i64, den: u64) -> i64 {
    if den == 0 {
        return 0;
    }
    let n = i128::from(num);
    let d = i128::from(den);
    let q = (n.abs() * 2 + d) / (2 * d);
    let q = if n < 0 { -q } else { q };
    i64::try_from(q).unwrap_or(if n < 0 { i64::MIN } else { i64::MAX })
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
