//! Machine interval routes (e.g., /api/v1/machines/*)

use axum::{routing::get, Router};
use crate::api::controller::machine::MachineIntervalController;
use crate::app_state::AppState;

pub fn machine_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(MachineIntervalController::summary))

        .route("/{machine_id}/intervals/aggregate", get(MachineIntervalController::aggregate))
        .route("/{machine_id}/intervals/pages/{page}", get(MachineIntervalController::series_page))
        .route(
            "/{machine_id}/intervals/groups/{label}/pages/{page}",
            get(MachineIntervalController::group_page),
        )
}
