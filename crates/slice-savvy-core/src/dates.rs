//! Date handling for dashboard records.
//!
//! Orders and customers carry naive local timestamps. Stored records come from several
//! generations of the dashboard, so dates are parsed leniently: anything that does not
//! parse becomes `None` instead of failing the whole record.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Canonical timestamp format written to storage.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Canonical date format written to storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp in any of the accepted shapes.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]` and RFC 3339.
/// RFC 3339 values keep their wall-clock time in their own offset.
#[must_use]
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a calendar date, accepting full timestamps too.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date()))
}

/// Serde adapter for `Option<NaiveDateTime>` that never fails on bad input.
pub mod lenient_datetime {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as [`super::DATETIME_FORMAT`] or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_some(&dt.format(super::DATETIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from any accepted string shape; anything else becomes `None`.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON-like data at all.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(super::parse_datetime))
    }
}

/// Serde adapter for `Option<NaiveDate>` that never fails on bad input.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as [`super::DATE_FORMAT`] or `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.format(super::DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize from a date or timestamp string; anything else becomes `None`.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON-like data at all.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(super::parse_date))
    }
}

/// An inclusive calendar-date window.
///
/// Either bound may be missing while a range is being picked; an incomplete range
/// means "all time" for every filter in this crate. A range whose `from` is after
/// its `to` matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the window (inclusive).
    pub from: Option<NaiveDate>,
    /// Last day of the window (inclusive).
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Create a complete range.
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// The `days` most recent days ending at `today` (inclusive).
    ///
    /// Returns an incomplete range when `days` is zero or the window underflows the
    /// calendar.
    #[must_use]
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let from = days
            .checked_sub(1)
            .and_then(|back| today.checked_sub_days(Days::new(u64::from(back))));
        Self {
            from,
            to: from.map(|_| today),
        }
    }

    /// Both bounds, if the range is complete.
    #[must_use]
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.from.zip(self.to)
    }

    /// Whether both bounds are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.bounds().is_some()
    }

    /// Whether `date` falls inside the window. Incomplete ranges contain every date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.bounds()
            .map_or(true, |(from, to)| from <= date && date <= to)
    }

    /// Number of days covered, if complete and well-ordered.
    #[must_use]
    pub fn len_days(&self) -> Option<u64> {
        let (from, to) = self.bounds()?;
        let span = (to - from).num_days();
        u64::try_from(span).ok().map(|d| d + 1)
    }

    /// The window of equal length immediately preceding this one.
    #[must_use]
    pub fn previous_period(&self) -> Option<Self> {
        let (from, _) = self.bounds()?;
        let len = self.len_days()?;
        let prev_to = from.checked_sub_days(Days::new(1))?;
        let prev_from = prev_to.checked_sub_days(Days::new(len - 1))?;
        Some(Self::new(prev_from, prev_to))
    }
}
