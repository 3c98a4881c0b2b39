use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use paydash_core::issuing::FetchCreditBalances;

use super::IssuerApiError;
use crate::state::AppState;

/// `GET /users/{user_id}/balances` — the issuer's credit balances, as is.
pub(super) async fn get_balances(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, IssuerApiError> {
    let balances = state
        .issuing
        .process(FetchCreditBalances { user_id })
        .await
        .map_err(IssuerApiError::failed("Failed to fetch user balances"))?;

    Ok(Json(balances))
}
