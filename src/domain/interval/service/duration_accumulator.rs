use crate::domain::common::model::{GroupBy, Interval};
use crate::domain::interval::dto::DurationTotals;
use crate::domain::interval::service::label_grouper::interval_key;

/// Sums whole-second durations per key in a single pass.
///
/// Durations are integers already truncated by the normalizer, so
/// `sum(per_key) == total_secs == sum(duration_secs)` holds exactly.
/// Zero-length intervals still register their key.
pub fn accumulate_durations(intervals: &[Interval], group_by: GroupBy) -> DurationTotals {
    let mut totals = DurationTotals::default();

    for interval in intervals {
        *totals
            .per_key
            .entry(interval_key(interval, group_by))
            .or_insert(0) += interval.duration_secs;
        totals.total_secs += interval.duration_secs;
    }

    totals
}
