use axum::{Json, extract::State, response::IntoResponse};

use super::DashboardApiError;
use crate::state::AppState;

/// `GET /activity` — the wallet's activity feed, labelled for display.
pub(super) async fn get_activity(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DashboardApiError> {
    let entries = state.dashboard.activity().await?;
    Ok(Json(entries))
}
