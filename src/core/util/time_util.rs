use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Epoch values above this are treated as milliseconds (year 5138 in seconds).
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub struct TimeUtil;

impl TimeUtil {
    /// Parses the timestamp encodings the fleet backend emits:
    /// RFC 3339 strings, naive `YYYY-MM-DD HH:MM:SS` strings (UTC),
    /// and epoch seconds or milliseconds as numbers or numeric strings.
    /// Fractional epochs are truncated to whole units.
    pub fn parse_wire_timestamp(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(truncate_epoch))
                .and_then(Self::from_epoch),
            Value::String(s) => Self::parse_str(s.trim()),
            _ => None,
        }
    }

    fn parse_str(s: &str) -> Option<DateTime<Utc>> {
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.and_utc());
            }
        }

        s.parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().and_then(truncate_epoch))
            .and_then(Self::from_epoch)
    }

    fn from_epoch(raw: i64) -> Option<DateTime<Utc>> {
        if raw.abs() >= EPOCH_MILLIS_THRESHOLD {
            DateTime::<Utc>::from_timestamp_millis(raw)
        } else {
            DateTime::<Utc>::from_timestamp(raw, 0)
        }
    }

    /// Hour of day (0..23) of a unix second, in a fixed UTC offset.
    #[inline]
    pub fn hour_of_day(epoch_secs: i64, offset_secs: i64) -> usize {
        ((epoch_secs + offset_secs).rem_euclid(SECONDS_PER_DAY) / SECONDS_PER_HOUR) as usize
    }

    /// First top-of-hour strictly after `epoch_secs`, in a fixed UTC offset.
    #[inline]
    pub fn next_hour_boundary(epoch_secs: i64, offset_secs: i64) -> i64 {
        epoch_secs - (epoch_secs + offset_secs).rem_euclid(SECONDS_PER_HOUR) + SECONDS_PER_HOUR
    }
}

fn truncate_epoch(raw: f64) -> Option<i64> {
    raw.is_finite().then(|| raw.trunc() as i64)
}
