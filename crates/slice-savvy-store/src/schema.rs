//! Database schema definitions and column families.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Key/value records, keyed by a fixed string key (see [`crate::keys`]).
    pub const LOCAL_STORAGE: &str = "local_storage";
}

/// Version of the persisted dashboard record written by this build.
///
/// - 0: orders carry `pizzaType`, analytics holds four totals.
/// - 1: orders carry `productName`, analytics unchanged.
/// - 2: full analytics snapshot with growth, monthly revenue and distribution.
pub const CURRENT_VERSION: u32 = 2;

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::LOCAL_STORAGE]
}
