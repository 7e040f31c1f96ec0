use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use tracing::{debug, error, info};

use crate::core::client::interval_client::IntervalFetcher;
use crate::core::state::query_version::QueryVersionTracker;
use crate::domain::common::model::{AggregationOptions, GroupBy, Page, QueryWindow, RawIntervalRecord};
use crate::domain::interval::dto::interval_aggregation_dto::{
    IntervalAggregationDto, MachineSummaryDto, ResultStatus,
};
use crate::domain::interval::dto::SeriesPoint;
use crate::domain::interval::service::interval_aggregation_service::{aggregate_intervals, group_series_page};
use crate::domain::interval::service::paginator::paginate;
use crate::domain::visit::service::visit_service::VisitService;
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct IntervalQuery {
    pub entity_id: String,
    pub window: QueryWindow,
    pub options: AggregationOptions,
    pub view_key: Option<String>,
}

impl IntervalQuery {
    /// Version scope for one endpoint. Only repeated requests to the same
    /// endpoint of a view supersede each other; a chart and its table pages
    /// run side by side.
    fn scoped_view_key(&self, endpoint: &str) -> String {
        format!("{}:{}", self.view_key.as_deref().unwrap_or(&self.entity_id), endpoint)
    }
}

/// Result of a query that may have been overtaken by a newer one for the same view.
#[derive(Debug, Clone)]
pub enum QueryOutcome<T> {
    Current(T),
    Superseded { version: u64, latest: u64 },
}

impl<T> QueryOutcome<T> {
    /// Converts a superseded outcome into `AppError::Superseded`.
    pub fn into_current(self) -> Result<T> {
        match self {
            QueryOutcome::Current(v) => Ok(v),
            QueryOutcome::Superseded { version, latest } => Err(AppError::Superseded { version, latest }.into()),
        }
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutcome<U> {
        match self {
            QueryOutcome::Current(v) => QueryOutcome::Current(f(v)),
            QueryOutcome::Superseded { version, latest } => QueryOutcome::Superseded { version, latest },
        }
    }
}

/// Drives fetch → aggregate for the HTTP layer.
///
/// Owns the pieces the engine deliberately leaves out: the fetch
/// collaborator, per-view version tokens and visit recording.
pub struct IntervalQueryService {
    fetcher: Arc<dyn IntervalFetcher>,
    visit_service: Arc<VisitService>,
    versions: QueryVersionTracker,
    defaults: AggregationOptions,
}

impl IntervalQueryService {
    pub fn new(
        fetcher: Arc<dyn IntervalFetcher>,
        visit_service: Arc<VisitService>,
        defaults: AggregationOptions,
    ) -> Self {
        Self {
            fetcher,
            visit_service,
            versions: QueryVersionTracker::new(),
            defaults,
        }
    }

    pub fn defaults(&self) -> &AggregationOptions {
        &self.defaults
    }

    /// Full aggregation for one machine; records a visit when the result is current.
    pub async fn aggregate(&self, query: IntervalQuery) -> Result<QueryOutcome<IntervalAggregationDto>> {
        let outcome = self.run(&query, "aggregate").await;

        if let QueryOutcome::Current(dto) = &outcome {
            let view = match query.options.group_by {
                GroupBy::Status => "status",
                GroupBy::Label => "label",
            };
            self.visit_service.record_visit(&dto.entity_id, view, &query.window);
        }

        Ok(outcome)
    }

    /// One page of the overall downsampled series.
    pub async fn series_page(&self, query: IntervalQuery, page_index: i64) -> Result<QueryOutcome<Page<SeriesPoint>>> {
        let page_size = query.options.page_size;
        Ok(self
            .run(&query, "series")
            .await
            .map(|dto| paginate(&dto.series, page_size, page_index)))
    }

    /// One page of a single label group's downsampled series.
    pub async fn group_page(
        &self,
        query: IntervalQuery,
        key: &str,
        page_index: i64,
    ) -> Result<QueryOutcome<Page<SeriesPoint>>> {
        let page_size = query.options.page_size;
        match self.run(&query, &format!("group:{}", key)).await {
            QueryOutcome::Current(dto) => group_series_page(&dto, key, page_size, page_index)
                .map(QueryOutcome::Current)
                .ok_or_else(|| {
                    AppError::NotFound(format!("group '{}' has no intervals for '{}'", key, dto.entity_id)).into()
                }),
            QueryOutcome::Superseded { version, latest } => Ok(QueryOutcome::Superseded { version, latest }),
        }
    }

    /// Totals for several machines at once, fetched concurrently.
    /// Each machine is independent; one failing fetch does not affect the others.
    /// Fails with `AppError::UpstreamError` only when every fetch failed.
    pub async fn summarize_machines(
        &self,
        entity_ids: &[String],
        window: QueryWindow,
        group_by: GroupBy,
    ) -> Result<Vec<MachineSummaryDto>> {
        let options = self.defaults.for_group_by(group_by);

        let tasks = entity_ids.iter().map(|id| {
            let options = options.clone();
            async move {
                let (records, fetch_error) = self.fetch(id, &window).await;
                let dto = aggregate_intervals(id, &records, window, &options);
                let peak_hour = dto
                    .hourly_grid
                    .slots
                    .iter()
                    .filter(|s| s.accumulated_secs > 0)
                    .max_by_key(|s| (s.accumulated_secs, std::cmp::Reverse(s.hour_of_day)))
                    .map(|s| s.hour_of_day);

                MachineSummaryDto {
                    entity_id: id.clone(),
                    status: fetch_error.map(fetch_failed).unwrap_or(dto.status),
                    interval_count: dto.diagnostics.kept,
                    totals: dto.totals,
                    peak_hour,
                }
            }
        });

        let summaries = join_all(tasks).await;

        let failed = summaries
            .iter()
            .filter(|s| matches!(s.status, ResultStatus::FetchFailed { .. }))
            .count();
        if failed > 0 && failed == summaries.len() {
            return Err(AppError::UpstreamError(format!("all {} interval fetches failed", failed)).into());
        }

        info!("Summarized {} machine(s), {} fetch failure(s)", summaries.len(), failed);
        Ok(summaries)
    }

    async fn run(&self, query: &IntervalQuery, endpoint: &str) -> QueryOutcome<IntervalAggregationDto> {
        let ticket = self.versions.begin(&query.scoped_view_key(endpoint));

        let (records, fetch_error) = self.fetch(&query.entity_id, &query.window).await;
        let mut dto = aggregate_intervals(&query.entity_id, &records, query.window, &query.options);
        dto.version = ticket.version;
        if let Some(message) = fetch_error {
            dto.status = fetch_failed(message);
        }

        if !self.versions.is_current(&ticket) {
            let latest = self.versions.latest_version(&ticket.view_key).unwrap_or(ticket.version);
            debug!(
                "Discarding stale result for view '{}' (version {} < {}, {} view(s) in flight)",
                ticket.view_key,
                ticket.version,
                latest,
                self.versions.tracked_views()
            );
            return QueryOutcome::Superseded {
                version: ticket.version,
                latest,
            };
        }

        QueryOutcome::Current(dto)
    }

    /// A failed fetch becomes an empty input plus the error text.
    async fn fetch(&self, entity_id: &str, window: &QueryWindow) -> (Vec<RawIntervalRecord>, Option<String>) {
        match self.fetcher.fetch_intervals(entity_id, window.from, window.to).await {
            Ok(records) => (records, None),
            Err(err) => {
                error!("❌ Failed to fetch intervals for '{}': {:?}", entity_id, err);
                (Vec::new(), Some(err.to_string()))
            }
        }
    }
}

fn fetch_failed(message: String) -> ResultStatus {
    ResultStatus::FetchFailed {
        retryable: true,
        message,
    }
}
