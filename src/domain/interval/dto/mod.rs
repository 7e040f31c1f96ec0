pub mod interval_aggregation_dto;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Total seconds per status or label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DurationTotals {
    pub per_key: BTreeMap<String, i64>,
    pub total_secs: i64,
}

impl DurationTotals {
    pub fn get(&self, key: &str) -> i64 {
        self.per_key.get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HourSlot {
    pub hour_of_day: u8,
    pub accumulated_secs: i64,
}

/// 24 hour-of-day slots. Hour 0 is the first slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourBucketGrid {
    pub slots: [HourSlot; 24],
    /// Number of intervals whose contribution was capped as implausibly long.
    pub capped_intervals: usize,
}

impl Default for HourBucketGrid {
    fn default() -> Self {
        let mut slots = [HourSlot::default(); 24];
        for (hour, slot) in slots.iter_mut().enumerate() {
            slot.hour_of_day = hour as u8;
        }
        Self {
            slots,
            capped_intervals: 0,
        }
    }
}

impl HourBucketGrid {
    pub fn add(&mut self, hour_of_day: usize, secs: i64) {
        self.slots[hour_of_day % 24].accumulated_secs += secs;
    }

    pub fn at(&self, hour_of_day: usize) -> i64 {
        self.slots[hour_of_day % 24].accumulated_secs
    }

    pub fn total_secs(&self) -> i64 {
        self.slots.iter().map(|s| s.accumulated_secs).sum()
    }

    /// Slots with a non-zero total, as `(hour, seconds)`.
    pub fn non_zero(&self) -> Vec<(u8, i64)> {
        self.slots
            .iter()
            .filter(|s| s.accumulated_secs != 0)
            .map(|s| (s.hour_of_day, s.accumulated_secs))
            .collect()
    }
}

/// One chart point. `value` is the status level (1.0 / 0.0) in the status
/// view and the duration in seconds in the label view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub key: String,
    pub value: f64,
    pub duration_secs: i64,
}

/// Counters describing what the normalizer and bucketizer did with the input.
///
/// `received == kept + outside_window + skipped_unparsable`; the remaining
/// counters describe subsets of `kept`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationDiagnostics {
    pub received: usize,
    pub kept: usize,
    pub outside_window: usize,
    /// Records without a usable start time.
    pub skipped_unparsable: usize,
    /// Kept records whose end time could not be parsed.
    pub zeroed_unparsable: usize,
    pub defaulted_status: usize,
    pub zero_length: usize,
    pub capped_intervals: usize,
}
