//! Table sorting shared by the performance views.
//!
//! Every sort here is stable: rows that compare equal keep their input order, in both
//! directions. Descending reverses the comparator, never the output.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction for a table column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Apply the direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// The opposite direction (for header click toggling).
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Locale-style string comparison.
///
/// Letters compare case-insensitively first. Strings that differ only in case order
/// lower case before upper case at the first differing position, and anything still
/// tied falls back to code-point order so the result is a total order.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map_or(Ordering::Equal, |(x, y)| {
                    match (x.is_lowercase(), y.is_lowercase()) {
                        (true, false) => Ordering::Less,
                        (false, true) => Ordering::Greater,
                        _ => Ordering::Equal,
                    }
                })
        })
        .then_with(|| a.cmp(b))
}

/// Stable sort of `rows` by an ascending comparator, in the given direction.
pub fn sort_rows<T, F>(rows: &mut [T], direction: SortDirection, compare: F)
where
    F: Fn(&T, &T) -> Ordering,
{
    rows.sort_by(|a, b| direction.apply(compare(a, b)));
}
