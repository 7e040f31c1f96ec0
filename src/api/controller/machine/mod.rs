//! Machine interval controller: connects routes to the interval query service

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use validator::Validate;

use crate::api::dto::interval_query_dto::{IntervalRangeQuery, MachineSummaryQuery};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::common::model::Page;
use crate::domain::common::service::time_window::resolve_query_window;
use crate::domain::interval::dto::interval_aggregation_dto::{IntervalAggregationDto, MachineSummaryDto};
use crate::domain::interval::dto::SeriesPoint;
use crate::domain::interval::service::interval_query_service::IntervalQuery;
use crate::errors::AppError;

pub struct MachineIntervalController;

impl MachineIntervalController {
    pub async fn aggregate(
        State(state): State<AppState>,
        Path(machine_id): Path<String>,
        Query(q): Query<IntervalRangeQuery>,
    ) -> Result<Json<ApiResponse<IntervalAggregationDto>>, AppError> {
        let query = build_query(&state, machine_id, &q)?;
        to_json(
            state
                .interval_service
                .aggregate(query)
                .await
                .and_then(|outcome| outcome.into_current()),
        )
    }

    pub async fn series_page(
        State(state): State<AppState>,
        Path((machine_id, page)): Path<(String, i64)>,
        Query(q): Query<IntervalRangeQuery>,
    ) -> Result<Json<ApiResponse<Page<SeriesPoint>>>, AppError> {
        let query = build_query(&state, machine_id, &q)?;
        to_json(
            state
                .interval_service
                .series_page(query, page)
                .await
                .and_then(|outcome| outcome.into_current()),
        )
    }

    pub async fn group_page(
        State(state): State<AppState>,
        Path((machine_id, label, page)): Path<(String, String, i64)>,
        Query(q): Query<IntervalRangeQuery>,
    ) -> Result<Json<ApiResponse<Page<SeriesPoint>>>, AppError> {
        let query = build_query(&state, machine_id, &q)?;
        to_json(
            state
                .interval_service
                .group_page(query, &label, page)
                .await
                .and_then(|outcome| outcome.into_current()),
        )
    }

    pub async fn summary(
        State(state): State<AppState>,
        Query(q): Query<MachineSummaryQuery>,
    ) -> Result<Json<ApiResponse<Vec<MachineSummaryDto>>>, AppError> {
        q.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

        let ids = q.machine_ids();
        if ids.is_empty() {
            return Err(AppError::BadRequest("ids must name at least one machine".into()));
        }

        let window = resolve_query_window(q.from, q.to, Utc::now());
        let group_by = q.group_by.unwrap_or(state.interval_service.defaults().group_by);
        to_json(
            state
                .interval_service
                .summarize_machines(&ids, window, group_by)
                .await,
        )
    }
}

fn build_query(state: &AppState, machine_id: String, q: &IntervalRangeQuery) -> Result<IntervalQuery, AppError> {
    q.validate().map_err(|e| AppError::BadRequest(e.to_string()))?;

    if machine_id.trim().is_empty() {
        return Err(AppError::BadRequest("machine id must not be empty".into()));
    }

    Ok(IntervalQuery {
        window: resolve_query_window(q.from, q.to, Utc::now()),
        options: q.to_options(state.interval_service.defaults()),
        view_key: q.view.clone(),
        entity_id: machine_id,
    })
}
