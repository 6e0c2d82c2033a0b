//! The dashboard report: every derived view model in one pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::{
    daily_sales_trend, filter_by_date_range, pizza_sales_distribution, recent_orders,
    summary_metrics, top_selling_items, AnalyticsSnapshot, DailySales, ItemSales, SalesShare,
    SummaryMetrics, DEFAULT_TOP_ITEMS, DEFAULT_TREND_WINDOW_DAYS,
};
use crate::customer::Customer;
use crate::dates::DateRange;
use crate::menu::MenuItem;
use crate::order::Order;
use crate::performance::{
    customer_performance, customer_summary, product_performance, sort_customers, sort_products,
    CustomerPerformance, CustomerSortField, CustomerSummary, ProductPerformance,
    ProductSortField,
};
use crate::sort::SortDirection;

/// Default number of rows in the recent orders list.
pub const DEFAULT_RECENT_ORDERS: usize = 4;

/// Inputs that shape a [`DashboardReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOptions {
    /// Aggregation window; `None` or incomplete means all time.
    pub range: Option<DateRange>,
    /// The day the trend and growth windows end on.
    pub today: NaiveDate,
    /// Days in the sales trend.
    pub trend_window_days: u32,
    /// Rows in the top-selling ranking.
    pub top_items: usize,
    /// Rows in the recent orders list.
    pub recent_orders: usize,
}

impl ReportOptions {
    /// Default options ending on `today`, over all time.
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self {
            range: None,
            today,
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            top_items: DEFAULT_TOP_ITEMS,
            recent_orders: DEFAULT_RECENT_ORDERS,
        }
    }

    /// Restrict the report to `range`.
    #[must_use]
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Everything the dashboard pages display, derived from raw collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    /// The window the report was computed over.
    pub range: Option<DateRange>,
    /// Headline metrics over the window.
    pub summary: SummaryMetrics,
    /// Daily sales ending `today`.
    pub trend: Vec<DailySales>,
    /// Best sellers in the window.
    pub top_items: Vec<ItemSales>,
    /// Product table, by revenue, highest first.
    pub products: Vec<ProductPerformance>,
    /// Customer table, by revenue, highest first.
    pub customers: Vec<CustomerPerformance>,
    /// Customers page headline numbers.
    pub customer_summary: CustomerSummary,
    /// Share of units per product.
    pub distribution: Vec<SalesShare>,
    /// Newest orders in the window.
    pub recent_orders: Vec<Order>,
    /// Snapshot suitable for persisting.
    pub snapshot: AnalyticsSnapshot,
}

impl DashboardReport {
    /// Build the report.
    ///
    /// The trend always covers the days ending `options.today`, drawn from the windowed
    /// orders, so days outside the selected range show as zero.
    #[must_use]
    pub fn build(
        orders: &[Order],
        customers: &[Customer],
        menu_items: &[MenuItem],
        options: &ReportOptions,
    ) -> Self {
        let windowed = filter_by_date_range(orders, options.range.as_ref());

        let mut products = product_performance(&windowed, menu_items);
        sort_products(&mut products, ProductSortField::Revenue, SortDirection::Descending);

        let mut customer_rows = customer_performance(customers, &windowed);
        let customer_summary = customer_summary(&customer_rows);
        sort_customers(
            &mut customer_rows,
            CustomerSortField::TotalRevenue,
            SortDirection::Descending,
        );

        Self {
            range: options.range,
            summary: summary_metrics(&windowed),
            trend: daily_sales_trend(&windowed, options.today, options.trend_window_days),
            top_items: top_selling_items(&windowed, options.top_items),
            products,
            customers: customer_rows,
            customer_summary,
            distribution: pizza_sales_distribution(&windowed),
            recent_orders: recent_orders(&windowed, options.recent_orders),
            snapshot: AnalyticsSnapshot::compute(orders, options.range.as_ref(), options.today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::MembershipTier;
    use crate::order::OrderStatus;
    use crate::{CustomerId, MenuItemId, OrderId};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn fixtures() -> (Vec<Order>, Vec<Customer>, Vec<MenuItem>) {
        let order = |id: &str, who: &str, product: &str, qty: u32, total: i64, day: u32| Order {
            order_id: OrderId::new(id).unwrap(),
            customer: who.into(),
            customer_email: String::new(),
            product_name: product.into(),
            quantity: qty,
            total_cents: total,
            order_date: date(day).and_hms_opt(19, 0, 0),
            status: OrderStatus::Delivered,
        };
        let orders = vec![
            order("1", "Ada", "Margherita", 2, 2598, 1),
            order("2", "Bob", "Pepperoni", 1, 1499, 5),
            order("3", "Ada", "Pepperoni", 3, 4497, 7),
        ];
        let customers = ["Ada", "Bob"]
            .iter()
            .enumerate()
            .map(|(i, name)| Customer {
                id: CustomerId::new((i + 1).to_string()).unwrap(),
                name: (*name).into(),
                email: String::new(),
                phone: String::new(),
                total_orders: 0,
                total_revenue_cents: 0,
                membership_tier: MembershipTier::Silver,
                loyalty_points: 0,
                join_date: None,
                last_order_date: None,
            })
            .collect();
        let menu = ["Margherita", "Pepperoni"]
            .iter()
            .map(|name| MenuItem {
                id: MenuItemId::new(*name).unwrap(),
                name: (*name).into(),
                category: "Classic".into(),
                price_cents: 1299,
                description: String::new(),
                ingredients: Vec::new(),
                is_popular: false,
            })
            .collect();
        (orders, customers, menu)
    }

    #[test]
    fn all_time_report() {
        let (orders, customers, menu) = fixtures();
        let report = DashboardReport::build(&orders, &customers, &menu, &ReportOptions::new(date(7)));

        assert_eq!(report.summary.total_revenue_cents, 8594);
        assert_eq!(report.trend.len(), DEFAULT_TREND_WINDOW_DAYS as usize);
        assert_eq!(report.top_items[0].name, "Pepperoni");
        assert_eq!(report.products[0].name, "Pepperoni");
        assert_eq!(report.customers[0].name, "Ada");
        assert_eq!(report.recent_orders[0].order_id.as_str(), "3");
        assert_eq!(report.snapshot.total_orders, 3);
    }

    #[test]
    fn ranged_report_recomputes_customer_totals() {
        let (orders, customers, menu) = fixtures();
        let options = ReportOptions::new(date(7)).with_range(DateRange::new(date(5), date(7)));
        let report = DashboardReport::build(&orders, &customers, &menu, &options);

        assert_eq!(report.summary.total_orders, 2);
        let ada = report.customers.iter().find(|c| c.name == "Ada").unwrap();
        assert_eq!(ada.total_orders, 1);
        assert_eq!(ada.total_revenue_cents, 4497);
        let margherita = report.products.iter().find(|p| p.name == "Margherita").unwrap();
        assert_eq!(margherita.sales, 0);
    }
}
