use tracing::debug;

use crate::domain::common::model::{
    AggregationOptions, BucketSource, GroupBy, Interval, MachineStatus, Page, QueryWindow,
    RawIntervalRecord,
};
use crate::domain::interval::dto::interval_aggregation_dto::{
    IntervalAggregationDto, IntervalGroupDto, ResultStatus,
};
use crate::domain::interval::dto::{HourBucketGrid, SeriesPoint};
use crate::domain::interval::service::downsampler::downsample;
use crate::domain::interval::service::duration_accumulator::accumulate_durations;
use crate::domain::interval::service::hour_bucketizer::bucketize;
use crate::domain::interval::service::interval_normalizer::normalize_intervals;
use crate::domain::interval::service::label_color::label_color;
use crate::domain::interval::service::label_grouper::{group_intervals, interval_key};
use crate::domain::interval::service::paginator::{all_pages, paginate, total_pages};

/// Runs one full aggregation pass over a fetched interval list.
///
/// Synchronous and self-contained: nothing is shared between calls. The
/// returned `version` is 0; the query service stamps its own token.
pub fn aggregate_intervals(
    entity_id: &str,
    records: &[RawIntervalRecord],
    window: QueryWindow,
    options: &AggregationOptions,
) -> IntervalAggregationDto {
    // 1️⃣ normalize
    let normalized = normalize_intervals(records, &window);
    let intervals = normalized.intervals;
    let mut diagnostics = normalized.diagnostics;

    // 2️⃣ totals + groups
    let totals = accumulate_durations(&intervals, options.group_by);
    let grouped = group_intervals(&intervals, options.group_by);

    // 3️⃣ hour-of-day grid over the full set, not the sampled one
    let hourly_grid = hour_grid(&intervals, options);
    diagnostics.capped_intervals = hourly_grid.capped_intervals;

    // 4️⃣ overall series + pages
    let series = to_series(&downsample(&intervals, options.max_points), options.group_by);
    let pages = all_pages(&series, options.page_size);
    let series_pages = total_pages(series.len(), options.page_size);

    // 5️⃣ per-group series (+ hour grid for movement views)
    let groups = grouped
        .groups
        .iter()
        .map(|group| {
            let group_series = to_series(&downsample(&group.intervals, options.max_points), options.group_by);
            IntervalGroupDto {
                color: label_color(&group.key),
                key: group.key.clone(),
                interval_count: group.intervals.len(),
                total_secs: group.total_secs(),
                total_pages: total_pages(group_series.len(), options.page_size),
                series: group_series,
                hourly_grid: match options.group_by {
                    GroupBy::Label => Some(hour_grid(&group.intervals, options)),
                    GroupBy::Status => None,
                },
            }
        })
        .collect();

    let status = if intervals.is_empty() {
        ResultStatus::NoData
    } else {
        ResultStatus::Ok
    };

    debug!(
        "Aggregated '{}': {} intervals, {} series points, {} groups, status={:?}",
        entity_id,
        intervals.len(),
        series.len(),
        grouped.len(),
        status
    );

    IntervalAggregationDto {
        entity_id: entity_id.to_string(),
        version: 0,
        window,
        group_by: options.group_by,
        status,
        totals,
        hourly_grid,
        series,
        pages,
        total_pages: series_pages,
        groups,
        diagnostics,
    }
}

/// Page `page_index` of the downsampled series of one group, or `None` when
/// the group key does not occur in the window.
pub fn group_series_page(
    aggregation: &IntervalAggregationDto,
    key: &str,
    page_size: usize,
    page_index: i64,
) -> Option<Page<SeriesPoint>> {
    aggregation
        .groups
        .iter()
        .find(|g| g.key == key)
        .map(|g| paginate(&g.series, page_size, page_index))
}

/// Hour-of-day grid over `intervals`, filtered by `options.bucket_source`.
fn hour_grid(intervals: &[Interval], options: &AggregationOptions) -> HourBucketGrid {
    match options.bucket_source {
        BucketSource::ActiveOnly => {
            let active: Vec<Interval> = intervals
                .iter()
                .filter(|i| i.status == MachineStatus::On)
                .cloned()
                .collect();
            bucketize(&active, options.utc_offset_minutes, options.max_interval_hours)
        }
        BucketSource::All => bucketize(intervals, options.utc_offset_minutes, options.max_interval_hours),
    }
}

pub fn to_series(intervals: &[Interval], group_by: GroupBy) -> Vec<SeriesPoint> {
    intervals
        .iter()
        .map(|i| SeriesPoint {
            time: i.start,
            end: i.end,
            key: interval_key(i, group_by),
            value: match group_by {
                GroupBy::Status => i.status.level(),
                GroupBy::Label => i.duration_secs as f64,
            },
            duration_secs: i.duration_secs,
        })
        .collect()
}
