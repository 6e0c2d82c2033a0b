//! Error types for Slice Savvy domain values.

use crate::ids::IdError;

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors raised while constructing or validating domain values.
///
/// Aggregation never fails; these only come from parsing and validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Unrecognised order status.
    #[error("unknown order status: {0}")]
    UnknownStatus(String),

    /// Unrecognised membership tier.
    #[error("unknown membership tier: {0}")]
    UnknownTier(String),

    /// A menu item failed validation.
    #[error("invalid menu item: {0}")]
    InvalidMenuItem(String),
}
