//! Store configuration.

use chrono::NaiveDate;
use slice_savvy_core::{
    ReportOptions, DEFAULT_RECENT_ORDERS, DEFAULT_TOP_ITEMS, DEFAULT_TREND_WINDOW_DAYS,
};

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path to `RocksDB` data directory (default: "./data/slice-savvy").
    pub data_dir: String,

    /// Days in the dashboard sales trend (default: 7).
    pub trend_window_days: u32,

    /// Rows in the top-selling ranking (default: 5).
    pub top_items: usize,

    /// Rows in the recent orders list (default: 4).
    pub recent_orders: usize,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("SLICE_SAVVY_DATA_DIR").unwrap_or(defaults.data_dir),
            trend_window_days: env_parse("SLICE_SAVVY_TREND_WINDOW_DAYS")
                .filter(|days| *days > 0)
                .unwrap_or(defaults.trend_window_days),
            top_items: env_parse("SLICE_SAVVY_TOP_ITEMS").unwrap_or(defaults.top_items),
            recent_orders: env_parse("SLICE_SAVVY_RECENT_ORDERS")
                .unwrap_or(defaults.recent_orders),
        }
    }

    /// Report options ending on `today`, over all time.
    #[must_use]
    pub fn report_options(&self, today: NaiveDate) -> ReportOptions {
        ReportOptions {
            trend_window_days: self.trend_window_days,
            top_items: self.top_items,
            recent_orders: self.recent_orders,
            ..ReportOptions::new(today)
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(var = name, value = %raw, "Ignoring unparseable config value");
    }
    parsed
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data/slice-savvy".into(),
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
            top_items: DEFAULT_TOP_ITEMS,
            recent_orders: DEFAULT_RECENT_ORDERS,
        }
    }
}
