//! Time-part derivation from raw millisecond epochs.
//!
//! Every derived field is a pure function of the epoch, so the time
//! dimension and the fact rows agree by construction: both call [`derive`]
//! on the same raw value. Weekday counts from Monday = 0.

use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Timelike, Utc};

/// The six derived parts plus the canonical text of one instant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TimeParts {
    /// RFC3339 UTC text, millisecond precision.
    pub ts: String,
    /// Hour of day, 0-23.
    pub hour: i32,
    /// Day of month, 1-31.
    pub day_of_month: i32,
    /// ISO 8601 week number, 1-53.
    pub iso_week: i32,
    /// Month, 1-12.
    pub month: i32,
    /// Calendar year.
    pub year: i32,
    /// Weekday with Monday = 0.
    pub weekday: i32,
}

/// Derive the time parts for a raw millisecond UTC epoch.
///
/// Returns `None` when the epoch falls outside chrono's representable range.
pub fn derive(epoch_ms: i64) -> Option<TimeParts> {
    let dt: DateTime<Utc> = Utc.timestamp_millis_opt(epoch_ms).single()?;
    Some(TimeParts {
        ts: to_rfc3339_millis(dt),
        hour: dt.hour() as i32,
        day_of_month: dt.day() as i32,
        iso_week: dt.iso_week().week() as i32,
        month: dt.month() as i32,
        year: dt.year(),
        weekday: dt.weekday().num_days_from_monday() as i32,
    })
}

/// Canonical RFC3339 UTC rendering with millisecond precision.
pub fn to_rfc3339_millis(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
