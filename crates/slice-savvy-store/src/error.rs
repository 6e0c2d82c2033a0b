//! Error types for Slice Savvy storage.

use slice_savvy_core::DomainError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend read or write failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record, e.g. "customer".
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The persisted record was written by a newer build.
    #[error("unsupported record version {found} (current is {current})")]
    UnsupportedVersion {
        /// Version found in the record.
        found: u32,
        /// Newest version this build understands.
        current: u32,
    },

    /// Writing the value would exceed the backend's quota.
    #[error("quota exceeded writing {key}: {size} bytes over a {quota} byte quota")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Total bytes the backend would hold after the write.
        size: usize,
        /// Configured limit.
        quota: usize,
    },

    /// Two menu items share an id.
    #[error("duplicate menu item id: {0}")]
    DuplicateId(String),

    /// The bundled seed data could not be loaded.
    #[error("seed data error: {0}")]
    Seed(String),

    /// A record failed domain validation.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl StoreError {
    /// Shorthand for a missing record.
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
