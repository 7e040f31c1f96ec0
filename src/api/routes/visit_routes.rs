//! Visit log routes (e.g., /api/v1/visits)

use axum::{routing::get, Router};
use crate::api::controller::visit::VisitController;
use crate::app_state::AppState;

pub fn visit_routes() -> Router<AppState> {
    Router::new().route("/", get(VisitController::list_visits))
}
