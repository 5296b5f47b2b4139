//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as fractional seconds since the Unix epoch.
///
/// Task records store their timestamp in this form.
pub fn unix_seconds() -> f64 {
    to_unix_seconds(now())
}

/// Convert a UTC timestamp to fractional Unix seconds (microsecond precision)
pub fn to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_micros() as f64 / 1_000_000.0
}
