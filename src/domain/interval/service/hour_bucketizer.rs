use chrono::SecondsFormat;
use tracing::warn;

use crate::core::util::time_util::{TimeUtil, SECONDS_PER_DAY, SECONDS_PER_HOUR};
use crate::domain::common::model::Interval;
use crate::domain::interval::dto::HourBucketGrid;
use crate::domain::interval::issue::IntervalIssue;

/// Accumulates each interval into the hour-of-day slots it overlaps.
///
/// An interval crossing a top-of-hour boundary is split there, so a run from
/// 23:40 to 00:20 adds 1200s to slot 23 and 1200s to slot 0. Hours are taken
/// modulo 24, so multi-day intervals add to the same slots once per day.
///
/// Whole days are added in one step (3600s to every slot), which bounds the
/// hour walk at 25 segments per interval. Intervals longer than
/// `max_interval_hours` are capped to that span and counted on the grid.
pub fn bucketize_into(
    grid: &mut HourBucketGrid,
    intervals: &[Interval],
    utc_offset_minutes: i32,
    max_interval_hours: i64,
) {
    let offset_secs = i64::from(utc_offset_minutes) * 60;
    let cap_secs = max_interval_hours.max(1).saturating_mul(SECONDS_PER_HOUR);

    for interval in intervals {
        if interval.is_zero_length() {
            continue;
        }

        let mut span = interval.duration_secs;
        if span > cap_secs {
            let issue = IntervalIssue::BoundaryOverflow {
                start: interval.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                span_hours: span / SECONDS_PER_HOUR,
                cap_hours: max_interval_hours,
            };
            warn!("{}", issue);
            grid.capped_intervals += 1;
            span = cap_secs;
        }

        let mut current = interval.start.timestamp();
        let end = current + span;

        // full days land on every slot equally
        let full_days = span / SECONDS_PER_DAY;
        if full_days > 0 {
            for hour in 0..24 {
                grid.add(hour, full_days * SECONDS_PER_HOUR);
            }
            current += full_days * SECONDS_PER_DAY;
        }

        while current < end {
            let segment_end = TimeUtil::next_hour_boundary(current, offset_secs).min(end);
            grid.add(TimeUtil::hour_of_day(current, offset_secs), segment_end - current);
            current = segment_end;
        }
    }
}

pub fn bucketize(intervals: &[Interval], utc_offset_minutes: i32, max_interval_hours: i64) -> HourBucketGrid {
    let mut grid = HourBucketGrid::default();
    bucketize_into(&mut grid, intervals, utc_offset_minutes, max_interval_hours);
    grid
}
