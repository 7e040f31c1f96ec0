//! Shared domain types (Interval, QueryWindow, grouping keys, etc.)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// On/off state reported by a machine for one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MachineStatus {
    On,
    #[default]
    Off,
}

impl MachineStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            MachineStatus::On => "ON",
            MachineStatus::Off => "OFF",
        }
    }

    /// Chart level for the status view (ON plots high, OFF plots low).
    pub fn level(&self) -> f64 {
        match self {
            MachineStatus::On => 1.0,
            MachineStatus::Off => 0.0,
        }
    }

    /// Recognises the status encodings the backend emits.
    /// Returns `None` for anything unrecognised so the caller can count the coercion.
    pub fn from_wire(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(if *b { MachineStatus::On } else { MachineStatus::Off }),
            Value::Number(n) => match n.as_i64() {
                Some(1) => Some(MachineStatus::On),
                Some(0) => Some(MachineStatus::Off),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_uppercase().as_str() {
                "ON" | "1" | "TRUE" | "RUNNING" | "ACTIVE" => Some(MachineStatus::On),
                "OFF" | "0" | "FALSE" | "STOPPED" | "IDLE" => Some(MachineStatus::Off),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Interval record as returned by the fleet backend, before any parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIntervalRecord {
    #[serde(default)]
    pub start_time: Option<Value>,
    #[serde(default)]
    pub end_time: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default, alias = "movement_type", alias = "type")]
    pub label: Option<String>,
    #[serde(default)]
    pub alert_id: Option<Value>,
}

/// A parsed, duration-tagged interval. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: MachineStatus,
    pub label: Option<String>,
    pub alert_id: Option<String>,
    /// Whole seconds, `end - start` truncated.
    pub duration_secs: i64,
}

impl Interval {
    pub fn is_zero_length(&self) -> bool {
        self.duration_secs == 0
    }
}

/// Inclusive query window in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl QueryWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        // swapped bounds are a caller mistake, not an empty window
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// True when `[start, end]` has no point in common with the window.
    pub fn excludes(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        end < self.from || start > self.to
    }
}

/// Key used by the accumulator and the grouper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Status view: keys are `ON` / `OFF`.
    #[default]
    Status,
    /// Movement view: keys are movement labels or `alert_<id>`.
    Label,
}

/// Which intervals feed the hour-of-day grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BucketSource {
    #[default]
    ActiveOnly,
    All,
}

/// Typed knobs for one aggregation pass.
#[derive(Debug, Clone, Serialize)]
pub struct AggregationOptions {
    pub group_by: GroupBy,
    pub bucket_source: BucketSource,
    pub max_points: usize,
    pub page_size: usize,
    pub utc_offset_minutes: i32,
    pub max_interval_hours: i64,
}

pub const DEFAULT_MAX_POINTS: usize = 100;
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// One leap year of hours.
pub const DEFAULT_MAX_INTERVAL_HOURS: i64 = 8784;

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            group_by: GroupBy::Status,
            bucket_source: BucketSource::ActiveOnly,
            max_points: DEFAULT_MAX_POINTS,
            page_size: DEFAULT_PAGE_SIZE,
            utc_offset_minutes: 0,
            max_interval_hours: DEFAULT_MAX_INTERVAL_HOURS,
        }
    }
}

impl AggregationOptions {
    /// These options switched to `group_by`. Movement views chart every
    /// labelled interval, since movement records rarely carry a status.
    pub fn for_group_by(&self, group_by: GroupBy) -> Self {
        Self {
            group_by,
            bucket_source: match group_by {
                GroupBy::Label => BucketSource::All,
                GroupBy::Status => self.bucket_source,
            },
            ..self.clone()
        }
    }
}

/// A fixed-size contiguous slice of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// `page_index * page_size`.
    pub offset: usize,
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn label_view_buckets_every_interval() {
        let defaults = AggregationOptions {
            max_points: 12,
            ..Default::default()
        };

        let label = defaults.for_group_by(GroupBy::Label);
        assert_eq!(label.bucket_source, BucketSource::All);
        assert_eq!(label.max_points, 12);

        let status = defaults.for_group_by(GroupBy::Status);
        assert_eq!(status.bucket_source, BucketSource::ActiveOnly);
    }

    #[test]
    fn status_from_wire_accepts_known_encodings() {
        assert_eq!(MachineStatus::from_wire(&json!("on")), Some(MachineStatus::On));
        assert_eq!(MachineStatus::from_wire(&json!(" OFF ")), Some(MachineStatus::Off));
        assert_eq!(MachineStatus::from_wire(&json!(1)), Some(MachineStatus::On));
        assert_eq!(MachineStatus::from_wire(&json!(false)), Some(MachineStatus::Off));
        assert_eq!(MachineStatus::from_wire(&json!("maintenance")), None);
        assert_eq!(MachineStatus::from_wire(&json!(7)), None);
    }

    #[test]
    fn raw_record_accepts_movement_type_alias() {
        let raw: RawIntervalRecord = serde_json::from_value(json!({
            "start_time": "2024-01-01T08:00:00Z",
            "end_time": "2024-01-01T09:00:00Z",
            "movement_type": "lifting",
            "alert_id": 42
        }))
        .unwrap();

        assert_eq!(raw.label.as_deref(), Some("lifting"));
        assert_eq!(raw.alert_id, Some(json!(42)));
        assert!(raw.status.is_none());
    }

    #[test]
    fn query_window_swaps_reversed_bounds() {
        let a = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let w = QueryWindow::new(a, b);
        assert_eq!(w.from, b);
        assert_eq!(w.to, a);
    }
}
