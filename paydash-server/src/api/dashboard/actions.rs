use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use paydash_sdk::objects::AmountRequest;

use super::DashboardApiError;
use crate::state::AppState;

/// `POST /claim` — claim payroll, then answer with the updated snapshot.
///
/// The balance poller keeps watching for the funds after the response.
pub(super) async fn claim(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DashboardApiError> {
    state.dashboard.claim_payroll().await?;
    Ok(Json(state.dashboard.state().snapshot()))
}

/// `POST /offramp` — send `amount` USDC to the treasury.
///
/// Answers 202 once the transfer is submitted; settlement is reported
/// through the snapshot's `offramp_status`.
pub(super) async fn offramp(
    State(state): State<AppState>,
    Json(body): Json<AmountRequest>,
) -> Result<impl IntoResponse, DashboardApiError> {
    let accepted = state.dashboard.offramp(body.amount).await?;
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

/// `POST /card` — register with the issuer and issue the virtual card.
pub(super) async fn create_card(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DashboardApiError> {
    let card = state.dashboard.create_card().await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// `POST /card/fund` — send `amount` USDC to the card's deposit address.
pub(super) async fn fund_card(
    State(state): State<AppState>,
    Json(body): Json<AmountRequest>,
) -> Result<impl IntoResponse, DashboardApiError> {
    let accepted = state.dashboard.fund_card(body.amount).await?;
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}
