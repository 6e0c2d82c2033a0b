//! Storage keys.
//!
//! Every record lives under a fixed string key in the `local_storage` column family.

/// Persisted dashboard state (customers, orders, analytics).
pub const STORE_STATE_KEY: &str = "slice-savvy-store";

/// The menu item collection.
pub const MENU_ITEMS_KEY: &str = "menuItems";
