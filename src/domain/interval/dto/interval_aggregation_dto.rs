use serde::Serialize;

use crate::domain::common::model::{GroupBy, Page, QueryWindow};
use crate::domain::interval::dto::{
    AggregationDiagnostics, DurationTotals, HourBucketGrid, SeriesPoint,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultStatus {
    Ok,
    /// No interval survived normalization for the window.
    NoData,
    /// The fetch collaborator failed; aggregates are computed over an empty input.
    FetchFailed { retryable: bool, message: String },
}

/// Per-label slice of a query, already downsampled.
#[derive(Debug, Clone, Serialize)]
pub struct IntervalGroupDto {
    pub key: String,
    pub color: String,
    pub interval_count: usize,
    pub total_secs: i64,
    pub series: Vec<SeriesPoint>,
    pub total_pages: usize,
    /// Hour-of-day grid of this group alone; present in the label view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_grid: Option<HourBucketGrid>,
}

/// Everything a chart or table renderer needs for one (machine, window) query.
#[derive(Debug, Clone, Serialize)]
pub struct IntervalAggregationDto {
    pub entity_id: String,
    pub version: u64,
    pub window: QueryWindow,
    pub group_by: GroupBy,
    pub status: ResultStatus,
    pub totals: DurationTotals,
    pub hourly_grid: HourBucketGrid,
    pub series: Vec<SeriesPoint>,
    pub pages: Vec<Page<SeriesPoint>>,
    pub total_pages: usize,
    pub groups: Vec<IntervalGroupDto>,
    pub diagnostics: AggregationDiagnostics,
}

/// Compact per-machine numbers for the multi-machine dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct MachineSummaryDto {
    pub entity_id: String,
    pub status: ResultStatus,
    pub totals: DurationTotals,
    pub interval_count: usize,
    /// Hour of day with the largest accumulated time, if any.
    pub peak_hour: Option<u8>,
}
