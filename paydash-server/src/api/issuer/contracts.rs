use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use paydash_core::issuing::{EnsureContract, FetchContract};
use paydash_sdk::objects::{ContractsQuery, CreateContractBody};

use super::IssuerApiError;
use crate::state::AppState;

/// `GET /users/{user_id}/contracts?chainId=` — the user's contract on one
/// chain (the configured chain when `chainId` is omitted).
///
/// The issuer deploys contracts asynchronously, so the lookup is retried a
/// few times before answering 404.
pub(super) async fn get_contract(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ContractsQuery>,
) -> Result<impl IntoResponse, IssuerApiError> {
    let chain_id = query.chain_id.unwrap_or(state.chain_id);

    let contract = state
        .issuing
        .process(FetchContract { user_id, chain_id })
        .await
        .map_err(IssuerApiError::failed("Failed to fetch user contracts"))?
        .ok_or(IssuerApiError::NotFound("No contract found for this chain"))?;

    Ok(Json(contract))
}

/// `POST /users/{user_id}/contracts` — deploy the user's contract.
///
/// An existing contract (issuer answers 409) is reported as success.
pub(super) async fn create_contract(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<CreateContractBody>,
) -> Result<impl IntoResponse, IssuerApiError> {
    let created = state
        .issuing
        .process(EnsureContract {
            user_id,
            chain_id: body.chain_id.unwrap_or_default(),
        })
        .await
        .map_err(IssuerApiError::failed("Failed to create Rain user contract"))?;

    Ok(Json(created))
}
