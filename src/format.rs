//! Display Formatting
//!
//! Turns snapshot values into the strings shown on the dashboard.
//! Rounding is done on the decimal value the server sent, half away from
//! zero, so `42.315` becomes `42.32` and `7.05` becomes `7.1`.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

use crate::snapshot::TimestampValue;

/// Default currency symbol
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// `YYYY/M/D H:MM:SS`, the `ja-JP` locale string the page has always shown
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "%Y/%-m/%-d %-H:%M:%S";

/// Shown for timestamps that cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

/// Naive layouts accepted in addition to RFC 3339, interpreted as wall
/// clock time in the display zone
const NAIVE_LAYOUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Zone timestamps are shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// System time zone. Each instant gets the offset in effect at that
    /// instant, so DST changes are honored.
    #[default]
    Local,
    /// The same offset for every instant
    Fixed(FixedOffset),
}

/// How values are presented
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub zone: DisplayZone,
    /// chrono strftime pattern for timestamps
    pub timestamp_pattern: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            zone: DisplayZone::Local,
            timestamp_pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
        }
    }
}

impl DisplayOptions {
    /// Options pinned to a fixed offset
    pub fn with_offset(utc_offset: FixedOffset) -> Self {
        Self {
            zone: DisplayZone::Fixed(utc_offset),
            ..Default::default()
        }
    }

    pub fn currency(&self, amount: Decimal) -> String {
        format_currency(&self.currency_symbol, amount)
    }

    pub fn abs_currency(&self, amount: Decimal) -> String {
        format_abs_currency(&self.currency_symbol, amount)
    }

    pub fn timestamp(&self, value: &TimestampValue) -> String {
        match self.zone {
            DisplayZone::Local => format_timestamp(value, &Local, &self.timestamp_pattern),
            DisplayZone::Fixed(offset) => format_timestamp(value, &offset, &self.timestamp_pattern),
        }
    }
}

/// Round half away from zero and pin the scale so trailing zeros are kept
pub fn round_fixed(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    rounded.to_string()
}

/// `symbol` followed by the amount with 2 decimals
pub fn format_currency(symbol: &str, amount: Decimal) -> String {
    format!("{}{}", symbol, round_fixed(amount, 2))
}

/// Same as [`format_currency`] on the absolute value
pub fn format_abs_currency(symbol: &str, amount: Decimal) -> String {
    format_currency(symbol, amount.abs())
}

/// One decimal and a trailing `%`
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", round_fixed(value, 1))
}

/// Parse a wire timestamp into `zone`
pub fn parse_timestamp<Tz: TimeZone>(value: &TimestampValue, zone: &Tz) -> Option<DateTime<Tz>> {
    let utc = match value {
        TimestampValue::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms)?,
        TimestampValue::Fractional(ms) => {
            if !ms.is_finite() {
                return None;
            }
            DateTime::<Utc>::from_timestamp_millis(ms.trunc() as i64)?
        }
        TimestampValue::Text(text) => return parse_text_timestamp(text.trim(), zone),
        TimestampValue::Other(_) => return None,
    };

    Some(utc.with_timezone(zone))
}

fn parse_text_timestamp<Tz: TimeZone>(text: &str, zone: &Tz) -> Option<DateTime<Tz>> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(zone));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(zone));
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
            // Wall times repeated by a DST fold resolve to the first one;
            // times skipped by a DST gap do not exist
            return zone.from_local_datetime(&naive).earliest();
        }
    }

    // Date-only values are midnight UTC
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).with_timezone(zone))
}

/// Timestamp in `zone`, or `Invalid Date`
pub fn format_timestamp<Tz>(value: &TimestampValue, zone: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match parse_timestamp(value, zone) {
        Some(dt) => dt.format(pattern).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Parse `+09:00`, `-0530`, `+9`, `Z` or `UTC` into an offset
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() == 4 => rest.split_at(2),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
