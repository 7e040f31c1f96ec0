use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use crate::app_state::AppState;

/// Build the main application router
pub fn app_router() -> Router<AppState> {
    // Machine and visit subrouters live under /api/v1
    let api_v1 = Router::new()
        .nest("/machines", crate::api::routes::machine_routes::machine_routes())
        .nest("/visits", crate::api::routes::visit_routes::visit_routes());

    Router::new()
        // Root route
        .route("/", get(root))
        // Health check
        .route("/health", get(health_check))
        // API v1
        .nest("/api/v1", api_v1)

        // Fallback handler for 404
        .fallback(handler_404)
        // ✅ Apply CORS layer to all routes
        .layer(CorsLayer::very_permissive())
}

// Handler for root
async fn root(State(state): State<AppState>) -> String {
    format!("Server is running! (upstream: {})", state.config.api_base_url)
}

// Handler for health check
async fn health_check() -> &'static str {
    "OK"
}

// Handler for 404 Not Found
async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::client::interval_client::IntervalFetcher;
    use crate::core::persistence::visits::visit_log_entity::VisitLogEntity;
    use crate::core::persistence::visits::visit_log_fs_adapter_trait::VisitLogFsAdapterTrait;
    use crate::core::persistence::visits::visit_log_repository::VisitLogRepository;
    use crate::domain::common::model::RawIntervalRecord;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    struct MockFetcher;

    #[async_trait]
    impl IntervalFetcher for MockFetcher {
        async fn fetch_intervals(
            &self,
            entity_id: &str,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> anyhow::Result<Vec<RawIntervalRecord>> {
            if entity_id != "press-1" {
                return Ok(Vec::new());
            }
            Ok(vec![
                RawIntervalRecord {
                    start_time: Some(json!("2024-09-01T08:00:00Z")),
                    end_time: Some(json!("2024-09-01T09:30:00Z")),
                    status: Some(json!("ON")),
                    label: Some("stamp".into()),
                    alert_id: None,
                },
                RawIntervalRecord {
                    start_time: Some(json!("2024-09-01T09:30:00Z")),
                    end_time: Some(json!("2024-09-01T10:00:00Z")),
                    status: Some(json!("OFF")),
                    label: None,
                    alert_id: Some(json!(7)),
                },
            ])
        }
    }

    #[derive(Default)]
    struct MockVisitAdapter {
        state: Mutex<Vec<VisitLogEntity>>,
    }

    impl VisitLogFsAdapterTrait for MockVisitAdapter {
        fn append(&self, entry: &VisitLogEntity) -> anyhow::Result<()> {
            self.state.lock().unwrap().push(entry.clone());
            Ok(())
        }

        fn read_all(&self) -> anyhow::Result<Vec<VisitLogEntity>> {
            Ok(self.state.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct MockVisitRepository {
        adapter: MockVisitAdapter,
    }

    impl VisitLogRepository for MockVisitRepository {
        fn fs_adapter(&self) -> &dyn VisitLogFsAdapterTrait {
            &self.adapter
        }
    }

    fn app() -> Router {
        let state = AppState::with_parts(
            AppConfig::default(),
            Arc::new(MockFetcher),
            Arc::new(MockVisitRepository::default()),
        );
        app_router().with_state(state)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    const WINDOW: &str = "from=2024-09-01T00:00:00&to=2024-09-02T00:00:00";

    #[tokio::test]
    async fn aggregate_returns_envelope() {
        let uri = format!("/api/v1/machines/press-1/intervals/aggregate?{}", WINDOW);
        let (status, body) = get(app(), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_successful"], json!(true));
        assert_eq!(body["data"]["totals"]["per_key"]["ON"], json!(5400));
        assert_eq!(body["data"]["totals"]["per_key"]["OFF"], json!(1800));
        assert_eq!(body["data"]["status"]["state"], json!("ok"));
    }

    #[tokio::test]
    async fn label_group_page_and_missing_group() {
        let app = app();
        let uri = format!("/api/v1/machines/press-1/intervals/groups/alert_7/pages/0?group_by=label&{}", WINDOW);
        let (status, body) = get(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"][0]["key"], json!("alert_7"));

        let uri = format!("/api/v1/machines/press-1/intervals/groups/welding/pages/0?group_by=label&{}", WINDOW);
        let (status, body) = get(app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_code"], json!("NOT_FOUND"));
    }

    #[tokio::test]
    async fn invalid_max_points_is_bad_request() {
        let uri = format!("/api/v1/machines/press-1/intervals/aggregate?max_points=0&{}", WINDOW);
        let (status, body) = get(app(), &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["is_successful"], json!(false));
    }

    #[tokio::test]
    async fn summary_and_visits() {
        let app = app();
        let uri = format!("/api/v1/machines/summary?ids=press-1,press-2&{}", WINDOW);
        let (status, body) = get(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][1]["status"]["state"], json!("no_data"));

        let uri = format!("/api/v1/machines/press-1/intervals/aggregate?{}", WINDOW);
        get(app.clone(), &uri).await;
        let (status, body) = get(app, "/api/v1/visits").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], json!(1));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let resp = app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
