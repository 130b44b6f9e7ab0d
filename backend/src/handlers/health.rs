use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub time_zone: String,
    pub edit_window_days: u32,
}

/// Liveness only; Frappe is not contacted.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        time_zone: state.config.time_zone.to_string(),
        edit_window_days: state.edit_window().days(),
    })
}
