//! Visit controller: read access to the dashboard visit log

use axum::extract::{Query, State};
use axum::Json;

use crate::api::dto::interval_query_dto::VisitListQuery;
use crate::api::dto::paginated_response::PaginatedResponse;
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::persistence::visits::visit_log_entity::VisitLogEntity;
use crate::errors::AppError;

pub struct VisitController;

impl VisitController {
    pub async fn list_visits(
        State(state): State<AppState>,
        Query(q): Query<VisitListQuery>,
    ) -> Result<Json<ApiResponse<PaginatedResponse<VisitLogEntity>>>, AppError> {
        to_json(
            state
                .visit_service
                .list_visits(q.entity_id.as_deref(), q.limit, q.offset)
                .await,
        )
    }
}
