//! Customer records and membership tiers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dates::lenient_date;
use crate::error::DomainError;
use crate::order::Order;
use crate::CustomerId;

/// Key that tells the customers behind a set of orders apart.
///
/// The lower-cased email when present, otherwise the lower-cased name. Matching an
/// order to a known customer goes through [`Customer::placed`] instead.
#[must_use]
pub fn customer_identity(name: &str, email: &str) -> String {
    let email = email.trim();
    if email.is_empty() {
        name.trim().to_lowercase()
    } else {
        email.to_lowercase()
    }
}

/// A restaurant customer.
///
/// `total_orders` and `total_revenue_cents` are a cache of the all-time order history.
/// Any date-filtered view must recompute them from orders (see
/// [`crate::performance::customer_performance`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer identifier.
    pub id: CustomerId,

    /// Display name.
    pub name: String,

    /// Email address.
    #[serde(default)]
    pub email: String,

    /// Phone number as entered.
    #[serde(default)]
    pub phone: String,

    /// Cached all-time order count.
    #[serde(default)]
    pub total_orders: u32,

    /// Cached all-time revenue in cents.
    #[serde(default)]
    pub total_revenue_cents: i64,

    /// Loyalty tier.
    #[serde(default)]
    pub membership_tier: MembershipTier,

    /// Accumulated loyalty points.
    #[serde(default)]
    pub loyalty_points: u32,

    /// Date the customer joined.
    #[serde(default, with = "lenient_date")]
    pub join_date: Option<NaiveDate>,

    /// Date of the most recent order.
    #[serde(default, with = "lenient_date")]
    pub last_order_date: Option<NaiveDate>,
}

impl Customer {
    /// Whether `order` was placed by this customer.
    ///
    /// Emails decide when both sides carry one. Otherwise the names are compared,
    /// case-insensitively, so an order without an email still finds its customer.
    #[must_use]
    pub fn placed(&self, order: &Order) -> bool {
        let mine = self.email.trim();
        let theirs = order.customer_email.trim();
        if !mine.is_empty() && !theirs.is_empty() {
            return mine.to_lowercase() == theirs.to_lowercase();
        }

        let name = self.name.trim();
        !name.is_empty() && name.to_lowercase() == order.customer.trim().to_lowercase()
    }

    /// Case-insensitive match on name and email, plain substring match on phone.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return true;
        }
        let lowered = trimmed.to_lowercase();
        self.name.to_lowercase().contains(&lowered)
            || self.email.to_lowercase().contains(&lowered)
            || self.phone.contains(trimmed)
    }
}

/// Ordinal loyalty classification: Bronze < Silver < Gold < Platinum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MembershipTier {
    /// Entry tier.
    #[default]
    Bronze,
    /// Second tier.
    Silver,
    /// Third tier.
    Gold,
    /// Top tier.
    Platinum,
}

impl MembershipTier {
    /// Whether this tier counts as a loyalty-program member (anything above Bronze).
    #[must_use]
    pub const fn is_loyalty_member(self) -> bool {
        !matches!(self, Self::Bronze)
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MembershipTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bronze" => Ok(Self::Bronze),
            "silver" => Ok(Self::Silver),
            "gold" => Ok(Self::Gold),
            "platinum" => Ok(Self::Platinum),
            _ => Err(DomainError::UnknownTier(s.to_string())),
        }
    }
}
