//! Core types and analytics for the Slice Savvy restaurant dashboard.
//!
//! This crate provides the foundational types and pure aggregation used throughout
//! Slice Savvy:
//!
//! - **Identifiers**: `CustomerId`, `OrderId`, `MenuItemId`
//! - **Records**: `Order`, `Customer`, `MenuItem`
//! - **Analytics**: summary metrics, sales trends, rankings, distributions, snapshots
//! - **Performance tables**: per-product and per-customer rows with stable sorting
//! - **Report**: `DashboardReport`, every derived view model in one pass
//!
//! # Money
//!
//! Amounts are `i64` cents. Percentages are `f64` rounded to one decimal.
//!
//! # Dates
//!
//! Timestamps are naive local times. A date range is inclusive on both ends, and an
//! absent or half-picked range means "all time".

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analytics;
pub mod customer;
pub mod dates;
pub mod error;
pub mod ids;
pub mod menu;
pub mod order;
pub mod performance;
pub mod report;
pub mod sort;

pub use analytics::{
    daily_sales_trend, daily_sales_trend_today, distribution_map, filter_by_date_range,
    growth_metrics, monthly_revenue, pizza_sales_distribution, quantity_by_product,
    recent_orders, summary_metrics, top_selling_items, AnalyticsSnapshot, DailySales,
    GrowthMetrics, ItemSales, MonthlyRevenue, SalesShare, SummaryMetrics,
    DEFAULT_GROWTH_WINDOW_DAYS, DEFAULT_TOP_ITEMS, DEFAULT_TREND_WINDOW_DAYS, SNAPSHOT_MONTHS,
};
pub use customer::{customer_identity, Customer, MembershipTier};
pub use dates::DateRange;
pub use error::{DomainError, Result};
pub use ids::{CustomerId, IdError, MenuItemId, OrderId};
pub use menu::{menu_categories, MenuFilter, MenuItem, MenuItemDraft};
pub use order::{Order, OrderFilter, OrderStatus};
pub use performance::{
    customer_performance, customer_summary, product_performance, sort_customers, sort_products,
    CustomerPerformance, CustomerSortField, CustomerSummary, ProductPerformance,
    ProductSortField,
};
pub use report::{DashboardReport, ReportOptions, DEFAULT_RECENT_ORDERS};
pub use sort::{locale_cmp, SortDirection};
