//! Identifier types for Slice Savvy.
//!
//! This module provides strongly-typed identifiers for customers, orders, and menu items.
//! Seed data uses short human-readable ids (`"1"`, `"ORD-001"`), so every identifier is a
//! non-empty string underneath. Menu items created at runtime get ULID-based ids.
//!
//! # Macro-based ID Types
//!
//! The `string_id_type!` macro reduces boilerplate for string-backed identifier types,
//! ensuring consistent implementation of serialization, parsing, and display traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Macro to define a string-backed identifier type with standard trait implementations.
///
/// This macro generates a newtype wrapper around a non-blank `String` with implementations for:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `Serialize`, `Deserialize` (as string, rejecting blank input)
/// - `FromStr`, `Display`, `Debug`
/// - `TryFrom<String>`, `Into<String>`
///
/// # Example
///
/// ```ignore
/// string_id_type!(MyId, "A custom identifier type.");
/// let id = MyId::new("42").unwrap();
/// let parsed: MyId = id.to_string().parse().unwrap();
/// ```
macro_rules! string_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Create a new `", stringify!($name), "`.")]
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` if the value is blank.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(IdError::Empty);
                }
                Ok(Self(value))
            }

            /// Return the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id_type!(CustomerId, "A customer identifier.");
string_id_type!(OrderId, "An order identifier (e.g. `ORD-001`).");
string_id_type!(
    MenuItemId,
    "A menu item identifier.\n\nItems from the seed catalog keep their catalog ids. Items created at runtime use a\nULID string, so ids minted later sort after ids minted earlier."
);

impl MenuItemId {
    /// Generate a new time-ordered `MenuItemId`.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is empty or whitespace.
    #[error("identifier must not be empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_roundtrip() {
        let id = CustomerId::new("42").unwrap();
        let parsed = CustomerId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!(CustomerId::new("  "), Err(IdError::Empty));
        assert_eq!(OrderId::from_str(""), Err(IdError::Empty));
        assert!(serde_json::from_str::<MenuItemId>("\"\"").is_err());
    }

    #[test]
    fn order_id_serde_json() {
        let id = OrderId::new("ORD-007").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ORD-007\"");
        let parsed: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn debug_names_the_type() {
        assert_eq!(format!("{:?}", CustomerId::new("1").unwrap()), "CustomerId(1)");
        assert_eq!(format!("{:?}", OrderId::new("ORD-001").unwrap()), "OrderId(ORD-001)");
        assert_eq!(format!("{:?}", MenuItemId::new("m1").unwrap()), "MenuItemId(m1)");
    }

    #[test]
    fn generated_menu_item_ids_are_distinct() {
        let a = MenuItemId::generate();
        let b = MenuItemId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 26);
    }
}
